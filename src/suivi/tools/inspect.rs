use serde::Serialize;

use crate::suivi::tools::model::{
    ACTIVE_SHEET, ARCHIVES_SHEET, FRANCHISES_SHEET, PROJECTS_SHEET, SourceWorkbook,
    sheet_names_match,
};
use crate::suivi::tools::roster::Roster;

/// What a worksheet appears to contain, judged from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetKind {
    Designer,
    Archive,
    Franchises,
    Projects,
    Stats,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
    pub name: String,
    pub rows: usize,
    pub kind: SheetKind,
}

/// Result of looking at a workbook without converting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkbookSummary {
    /// `true` when the workbook already uses the four-table layout.
    pub normalized: bool,
    pub sheets: Vec<SheetSummary>,
}

/// Returns `true` when the workbook already holds the normalised active or
/// archive tables.
pub fn is_normalized(source: &SourceWorkbook) -> bool {
    source.sheet_names().iter().any(|name| {
        sheet_names_match(name, ACTIVE_SHEET) || sheet_names_match(name, ARCHIVES_SHEET)
    })
}

pub fn classify_workbook(source: &SourceWorkbook, roster: &Roster) -> WorkbookSummary {
    let normalized = is_normalized(source);
    let sheets = source
        .sheet_names()
        .iter()
        .map(|name| SheetSummary {
            name: name.clone(),
            rows: source.sheet(name).map_or(0, |sheet| sheet.len()),
            kind: classify_sheet(name, normalized, roster),
        })
        .collect();

    WorkbookSummary { normalized, sheets }
}

pub fn classify_sheet(name: &str, normalized: bool, roster: &Roster) -> SheetKind {
    let upper = name.trim().to_uppercase();

    if normalized {
        return match upper.as_str() {
            ACTIVE_SHEET => SheetKind::Designer,
            ARCHIVES_SHEET => SheetKind::Archive,
            FRANCHISES_SHEET => SheetKind::Franchises,
            PROJECTS_SHEET => SheetKind::Projects,
            _ => SheetKind::Unknown,
        };
    }

    if roster.is_designer_sheet(&upper) {
        SheetKind::Designer
    } else if upper.contains("ARCHIVE") {
        SheetKind::Archive
    } else if upper.contains("FRANCHISE") {
        SheetKind::Franchises
    } else if upper.contains("PROJET") || upper.contains("INTERNE") {
        SheetKind::Projects
    } else if upper.contains("STATS") || contains_year(&upper) {
        SheetKind::Stats
    } else {
        SheetKind::Unknown
    }
}

/// Matches a four-digit year from 2000 to 2099 anywhere in the name.
fn contains_year(name: &str) -> bool {
    name.as_bytes()
        .windows(4)
        .any(|window| window.starts_with(b"20") && window.iter().all(u8::is_ascii_digit))
}
