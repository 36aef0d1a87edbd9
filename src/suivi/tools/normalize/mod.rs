use serde::Serialize;
use tracing::{debug, info, warn};

use crate::suivi::tools::dates::DateParser;
use crate::suivi::tools::error::{Result, ToolError};
use crate::suivi::tools::model::{
    Cell, DossierRecord, FranchiseRecord, NormalizedWorkbook, ProjectRecord, SheetRows,
    SourceWorkbook,
};
use crate::suivi::tools::roster::Roster;
use crate::suivi::tools::status::StatusMapper;

/// Global archive sheet; column `A` holds designer initials.
pub const ARCHIVE_SOURCE_SHEET: &str = "ARCHIVE";
/// Franchise assignment matrix.
pub const FRANCHISES_SOURCE_SHEET: &str = "FRANCHISES";
/// Internal projects list.
pub const PROJECTS_SOURCE_SHEET: &str = "PROJETS_INTERNE";

/// Designer and archive sheets carry two header rows.
const DOSSIER_FIRST_ROW: usize = 2;
/// Franchise and project sheets carry one header row.
const TABLE_FIRST_ROW: usize = 1;

const COL_INITIALS: usize = 0;
const COL_NAME: usize = 1;
const COL_DATE: usize = 2;
const COL_STATUS: usize = 6;
const COL_COMMENTS: usize = 7;
const COL_COMPLETED: usize = 8;

const PROJECT_COLUMN_COUNT: usize = 5;

const PLACEHOLDER_NAMES: [&str; 4] = ["VRAI", "FAUX", "TRUE", "FALSE"];
const HEADER_MARKERS: [&str; 2] = ["DOSSIER", "ARCHIVE"];
const COMPLETED_FLAGS: [&str; 5] = ["VRAI", "TRUE", "OUI", "YES", "1"];

/// Knobs applied while reshaping the source workbook.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    pub roster: Roster,
    pub dates: DateParser,
    /// When set, statuses are mapped onto the canonical vocabulary.
    pub statuses: Option<StatusMapper>,
}

/// Row accounting for one source sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetCounts {
    pub sheet: String,
    /// Data rows examined, header rows excluded.
    pub scanned: usize,
    pub active: usize,
    pub archived: usize,
    pub franchises: usize,
    pub projects: usize,
    pub skipped: usize,
}

impl SheetCounts {
    fn new(sheet: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
            scanned: 0,
            active: 0,
            archived: 0,
            franchises: 0,
            projects: 0,
            skipped: 0,
        }
    }

    /// Rows that made it into one of the output tables.
    pub fn kept(&self) -> usize {
        self.active + self.archived + self.franchises + self.projects
    }
}

/// Summary of a normalisation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ConversionReport {
    pub sheets: Vec<SheetCounts>,
    /// Expected sheets that the workbook does not contain.
    pub missing_sheets: Vec<String>,
    pub active_rows: usize,
    pub archive_rows: usize,
    pub franchise_rows: usize,
    pub project_rows: usize,
}

impl ConversionReport {
    fn record(&mut self, counts: SheetCounts) {
        self.active_rows += counts.active;
        self.archive_rows += counts.archived;
        self.franchise_rows += counts.franchises;
        self.project_rows += counts.projects;
        self.sheets.push(counts);
    }

    pub fn skipped_rows(&self) -> usize {
        self.sheets.iter().map(|counts| counts.skipped).sum()
    }
}

/// Reshapes every recognised sheet of the source workbook into the four
/// normalised tables.
///
/// Fails only when none of the expected sheets are present; missing sheets
/// are otherwise reported and skipped.
pub fn normalize(
    source: &SourceWorkbook,
    options: &NormalizeOptions,
) -> Result<(NormalizedWorkbook, ConversionReport)> {
    let mut workbook = NormalizedWorkbook {
        franchise_designers: options
            .roster
            .active()
            .map(|designer| designer.name.clone())
            .collect(),
        ..NormalizedWorkbook::default()
    };
    let mut report = ConversionReport::default();

    for designer in options.roster.designers() {
        let Some(sheet) = source.find_sheet(&designer.name) else {
            warn!(sheet = %designer.name, "designer sheet not found");
            report.missing_sheets.push(designer.name.clone());
            continue;
        };
        let counts = collect_designer_sheet(&designer.name, sheet, options, &mut workbook);
        info!(
            sheet = %designer.name,
            active = counts.active,
            archived = counts.archived,
            skipped = counts.skipped,
            "designer sheet processed"
        );
        report.record(counts);
    }

    let optional_sheets: [(&str, SheetCollector); 3] = [
        (ARCHIVE_SOURCE_SHEET, collect_archive_sheet),
        (FRANCHISES_SOURCE_SHEET, collect_franchises),
        (PROJECTS_SOURCE_SHEET, collect_projects),
    ];
    for (name, collect) in optional_sheets {
        let Some(sheet) = source.find_sheet(name) else {
            warn!(sheet = name, "sheet not found");
            report.missing_sheets.push(name.to_string());
            continue;
        };
        let counts = collect(sheet, options, &mut workbook);
        info!(
            sheet = name,
            kept = counts.kept(),
            skipped = counts.skipped,
            "sheet processed"
        );
        report.record(counts);
    }

    if report.sheets.is_empty() {
        return Err(ToolError::InvalidWorkbook(
            "none of the designer, archive, franchise or project sheets were found".into(),
        ));
    }

    Ok((workbook, report))
}

type SheetCollector = fn(&SheetRows, &NormalizeOptions, &mut NormalizedWorkbook) -> SheetCounts;

/// Returns `true` when the text names a real dossier rather than a blank,
/// a stray boolean, or a repeated header.
pub fn is_valid_dossier_name(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() < 3 {
        return false;
    }
    let upper = trimmed.to_uppercase();
    if PLACEHOLDER_NAMES.contains(&upper.as_str()) {
        return false;
    }
    !HEADER_MARKERS.iter().any(|marker| upper.contains(marker))
}

/// Interprets the "Terminé" column of a designer sheet.
pub fn is_completed_flag(cell: &Cell) -> bool {
    match cell {
        Cell::Bool(value) => *value,
        Cell::Number(value) => *value == 1.0,
        Cell::Text(text) => COMPLETED_FLAGS.contains(&text.trim().to_uppercase().as_str()),
        Cell::Empty | Cell::Date(_) => false,
    }
}

fn dossier_from_row(
    designer: String,
    sheet: &SheetRows,
    row: usize,
    options: &NormalizeOptions,
) -> DossierRecord {
    let status = sheet.cell(row, COL_STATUS).trimmed_text();
    let status = match &options.statuses {
        Some(mapper) => mapper.canonicalize(&status),
        None => status,
    };

    DossierRecord {
        designer,
        name: sheet.cell(row, COL_NAME).trimmed_text(),
        created_on: options.dates.parse_cell(sheet.cell(row, COL_DATE)),
        status,
        comments: sheet.cell(row, COL_COMMENTS).trimmed_text(),
    }
}

/// Splits a designer's sheet into active and archived dossiers.
pub fn collect_designer_sheet(
    designer: &str,
    sheet: &SheetRows,
    options: &NormalizeOptions,
    workbook: &mut NormalizedWorkbook,
) -> SheetCounts {
    let mut counts = SheetCounts::new(designer);

    for row in DOSSIER_FIRST_ROW..sheet.len() {
        counts.scanned += 1;
        let name = sheet.cell(row, COL_NAME).display_text();
        if !is_valid_dossier_name(&name) {
            debug!(sheet = designer, row = row + 1, "row skipped");
            counts.skipped += 1;
            continue;
        }

        let record = dossier_from_row(designer.to_string(), sheet, row, options);
        if is_completed_flag(sheet.cell(row, COL_COMPLETED)) {
            workbook.archives.push(record);
            counts.archived += 1;
        } else {
            workbook.active.push(record);
            counts.active += 1;
        }
    }

    counts
}

/// Appends the global archive, resolving each row's initials to a designer.
pub fn collect_archive_sheet(
    sheet: &SheetRows,
    options: &NormalizeOptions,
    workbook: &mut NormalizedWorkbook,
) -> SheetCounts {
    let mut counts = SheetCounts::new(ARCHIVE_SOURCE_SHEET);

    for row in DOSSIER_FIRST_ROW..sheet.len() {
        counts.scanned += 1;
        let name = sheet.cell(row, COL_NAME).display_text();
        if !is_valid_dossier_name(&name) {
            debug!(sheet = ARCHIVE_SOURCE_SHEET, row = row + 1, "row skipped");
            counts.skipped += 1;
            continue;
        }

        let initials = sheet.cell(row, COL_INITIALS).display_text();
        let designer = options.roster.resolve_code(&initials).to_string();
        if designer == options.roster.unknown_label() {
            debug!(row = row + 1, initials = %initials, "initials not in roster");
        }
        workbook
            .archives
            .push(dossier_from_row(designer, sheet, row, options));
        counts.archived += 1;
    }

    counts
}

/// Copies the franchise matrix, one column per active designer.
pub fn collect_franchises(
    sheet: &SheetRows,
    _options: &NormalizeOptions,
    workbook: &mut NormalizedWorkbook,
) -> SheetCounts {
    let mut counts = SheetCounts::new(FRANCHISES_SOURCE_SHEET);
    let designer_columns = workbook.franchise_designers.len();

    for row in TABLE_FIRST_ROW..sheet.len() {
        counts.scanned += 1;
        let name = sheet.cell(row, 0).trimmed_text();
        if name.chars().count() < 2 {
            counts.skipped += 1;
            continue;
        }

        let assignments = (1..=designer_columns)
            .map(|col| sheet.cell(row, col).display_text())
            .collect();
        workbook.franchises.push(FranchiseRecord { name, assignments });
        counts.franchises += 1;
    }

    counts
}

/// Copies internal projects that name a task.
pub fn collect_projects(
    sheet: &SheetRows,
    _options: &NormalizeOptions,
    workbook: &mut NormalizedWorkbook,
) -> SheetCounts {
    let mut counts = SheetCounts::new(PROJECTS_SOURCE_SHEET);

    for row in TABLE_FIRST_ROW..sheet.len() {
        counts.scanned += 1;
        let [commercial, task, requested, designer, done]: [String; PROJECT_COLUMN_COUNT] =
            std::array::from_fn(|col| sheet.cell(row, col).trimmed_text());

        if task.chars().count() < 2 {
            debug!(sheet = PROJECTS_SOURCE_SHEET, row = row + 1, "row skipped");
            counts.skipped += 1;
            continue;
        }

        workbook.projects.push(ProjectRecord {
            commercial,
            task,
            requested,
            designer,
            done,
        });
        counts.projects += 1;
    }

    counts
}
