use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::suivi::tools::dates;

/// Sheet receiving every dossier that is still in progress.
pub const ACTIVE_SHEET: &str = "DOSSIERS_ACTIFS";
/// Sheet receiving completed dossiers, from designer sheets and the archive.
pub const ARCHIVES_SHEET: &str = "ARCHIVES";
/// Sheet receiving the franchise assignment matrix.
pub const FRANCHISES_SHEET: &str = "FRANCHISES";
/// Sheet receiving internal projects.
pub const PROJECTS_SHEET: &str = "PROJETS";

/// Columns shared by the active and archived dossier sheets.
pub const DOSSIER_COLUMNS: [&str; 5] = [
    "Graphiste",
    "Nom",
    "Date création",
    "Statut",
    "Commentaires",
];
/// Columns of the internal projects sheet.
pub const PROJECT_COLUMNS: [&str; 5] = ["Commercial", "Tâche", "Demande", "Graphiste", "Terminé"];
/// Leading column of the franchise sheet; designer columns follow it.
pub const FRANCHISE_NAME_COLUMN: &str = "Nom";

/// A single cell as read from the source workbook.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Date-formatted cell, stored as an Excel serial day count.
    Date(f64),
}

impl Cell {
    /// Renders the cell the way a spreadsheet would display it in a plain
    /// text export.
    pub fn display_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(value) => value.clone(),
            Cell::Number(value) => format_number(*value),
            Cell::Date(serial) => dates::from_excel_serial(*serial)
                .map(|date| date.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| format_number(*serial)),
            Cell::Bool(true) => "TRUE".to_string(),
            Cell::Bool(false) => "FALSE".to_string(),
        }
    }

    /// Displayed text with surrounding whitespace removed.
    pub fn trimmed_text(&self) -> String {
        self.display_text().trim().to_string()
    }
}

/// Excel shows at most 15 significant digits, so `0.1 + 0.2` reads `0.3`.
fn format_number(value: f64) -> String {
    let rounded = format!("{value:.14e}").parse::<f64>().unwrap_or(value);
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        format!("{}", rounded as i64)
    } else {
        rounded.to_string()
    }
}

/// A worksheet laid out on absolute coordinates: row 0 is the first
/// spreadsheet row and column 0 is column `A`, whatever the used range is.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetRows {
    rows: Vec<Vec<Cell>>,
}

static EMPTY_CELL: Cell = Cell::Empty;

impl SheetRows {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Number of rows up to and including the last used one.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the cell at the given position, or an empty cell when the
    /// position lies outside the used range.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

/// Every worksheet of the source workbook, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct SourceWorkbook {
    sheets: BTreeMap<String, SheetRows>,
    order: Vec<String>,
}

impl SourceWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sheet, replacing any previous sheet with the same name.
    pub fn insert(&mut self, name: impl Into<String>, rows: SheetRows) {
        let name = name.into();
        if self.sheets.insert(name.clone(), rows).is_none() {
            self.order.push(name);
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetRows> {
        self.sheets.get(name)
    }

    /// Looks a sheet up by name, falling back to a case-insensitive match
    /// on the trimmed name, so that `Jordan ` finds the `JORDAN` sheet.
    pub fn find_sheet(&self, name: &str) -> Option<&SheetRows> {
        self.sheet(name).or_else(|| {
            self.order
                .iter()
                .find(|candidate| sheet_names_match(candidate, name))
                .and_then(|candidate| self.sheets.get(candidate))
        })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> &[String] {
        &self.order
    }
}

/// Sheet-name comparison shared by lookups and sheet classification:
/// surrounding whitespace and letter case are ignored.
pub fn sheet_names_match(lhs: &str, rhs: &str) -> bool {
    lhs.trim().to_uppercase() == rhs.trim().to_uppercase()
}

/// A design job ("dossier") tracked for one designer.
#[derive(Debug, Clone, PartialEq)]
pub struct DossierRecord {
    pub designer: String,
    pub name: String,
    pub created_on: Option<NaiveDate>,
    pub status: String,
    pub comments: String,
}

impl DossierRecord {
    fn into_cells(self) -> Vec<String> {
        vec![
            self.designer,
            self.name,
            self.created_on
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            self.status,
            self.comments,
        ]
    }
}

/// A franchise and the value found under each active designer's column.
#[derive(Debug, Clone, PartialEq)]
pub struct FranchiseRecord {
    pub name: String,
    pub assignments: Vec<String>,
}

/// An internal project row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub commercial: String,
    pub task: String,
    pub requested: String,
    pub designer: String,
    pub done: String,
}

/// The four normalised tables produced from a tracking workbook.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedWorkbook {
    pub active: Vec<DossierRecord>,
    pub archives: Vec<DossierRecord>,
    pub franchises: Vec<FranchiseRecord>,
    pub projects: Vec<ProjectRecord>,
    /// Designer names heading the franchise columns, in roster order.
    pub franchise_designers: Vec<String>,
}

impl NormalizedWorkbook {
    /// Lays the records out as the sheets of the output workbook.
    pub fn into_workbook_data(self) -> WorkbookData {
        let dossier_columns: Vec<String> =
            DOSSIER_COLUMNS.iter().map(|name| name.to_string()).collect();

        let active = SheetTable {
            sheet_name: ACTIVE_SHEET.to_string(),
            columns: dossier_columns.clone(),
            rows: self.active.into_iter().map(DossierRecord::into_cells).collect(),
        };

        let archives = SheetTable {
            sheet_name: ARCHIVES_SHEET.to_string(),
            columns: dossier_columns,
            rows: self
                .archives
                .into_iter()
                .map(DossierRecord::into_cells)
                .collect(),
        };

        let mut franchise_columns = Vec::with_capacity(self.franchise_designers.len() + 1);
        franchise_columns.push(FRANCHISE_NAME_COLUMN.to_string());
        franchise_columns.extend(self.franchise_designers);
        let franchises = SheetTable {
            sheet_name: FRANCHISES_SHEET.to_string(),
            columns: franchise_columns,
            rows: self
                .franchises
                .into_iter()
                .map(|franchise| {
                    let mut cells = Vec::with_capacity(franchise.assignments.len() + 1);
                    cells.push(franchise.name);
                    cells.extend(franchise.assignments);
                    cells
                })
                .collect(),
        };

        let projects = SheetTable {
            sheet_name: PROJECTS_SHEET.to_string(),
            columns: PROJECT_COLUMNS.iter().map(|name| name.to_string()).collect(),
            rows: self
                .projects
                .into_iter()
                .map(|project| {
                    vec![
                        project.commercial,
                        project.task,
                        project.requested,
                        project.designer,
                        project.done,
                    ]
                })
                .collect(),
        };

        WorkbookData {
            tables: vec![active, archives, franchises, projects],
        }
    }
}

/// A table that will be materialised as an Excel sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Represents all tables required to materialise the Excel workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookData {
    pub tables: Vec<SheetTable>,
}
