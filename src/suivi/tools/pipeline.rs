use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::suivi::tools::error::{Result, ToolError};
use crate::suivi::tools::inspect::{self, WorkbookSummary};
use crate::suivi::tools::io::{excel_read, excel_write};
use crate::suivi::tools::normalize::{self, ConversionReport, NormalizeOptions};
use crate::suivi::tools::roster::Roster;

/// Suffix appended to the input file stem when no output path is given.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_NORMALISE";

/// Derives `<stem>_NORMALISE.xlsx` next to the input workbook.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workbook".to_string());
    input.with_file_name(format!("{stem}{DEFAULT_OUTPUT_SUFFIX}.xlsx"))
}

/// Reads a tracking workbook, reshapes it into the four normalised tables
/// and writes them to `output`.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn normalize_file(
    input: &Path,
    output: &Path,
    options: &NormalizeOptions,
) -> Result<ConversionReport> {
    if !input.exists() {
        return Err(ToolError::MissingInput(input.to_path_buf()));
    }
    if same_file(input, output) {
        return Err(ToolError::OutputOverwritesInput(output.to_path_buf()));
    }

    let source = excel_read::read_workbook(input)?;
    info!(sheet_count = source.sheet_names().len(), "read source workbook");
    if inspect::is_normalized(&source) {
        return Err(ToolError::AlreadyNormalized(input.to_path_buf()));
    }

    let (normalized, report) = normalize::normalize(&source, options)?;
    let workbook = normalized.into_workbook_data();
    debug!(sheet_count = workbook.tables.len(), "workbook constructed");
    excel_write::write_workbook(output, &workbook)?;

    info!(
        active = report.active_rows,
        archives = report.archive_rows,
        franchises = report.franchise_rows,
        projects = report.project_rows,
        skipped = report.skipped_rows(),
        "normalised workbook written"
    );
    Ok(report)
}

/// Classifies the sheets of a workbook without converting it.
#[instrument(level = "info", skip_all, fields(input = %input.display()))]
pub fn inspect_file(input: &Path, roster: &Roster) -> Result<WorkbookSummary> {
    if !input.exists() {
        return Err(ToolError::MissingInput(input.to_path_buf()));
    }
    let source = excel_read::read_workbook(input)?;
    Ok(inspect::classify_workbook(&source, roster))
}

/// Persists a conversion report as pretty-printed JSON.
#[instrument(level = "debug", skip(report), fields(output = %output.display()))]
pub fn write_report(output: &Path, report: &ConversionReport) -> Result<()> {
    let json_string = serde_json::to_string_pretty(report)?;
    fs::write(output, json_string)?;
    Ok(())
}

fn same_file(lhs: &Path, rhs: &Path) -> bool {
    match (fs::canonicalize(lhs), fs::canonicalize(rhs)) {
        (Ok(lhs), Ok(rhs)) => lhs == rhs,
        _ => lhs == rhs,
    }
}
