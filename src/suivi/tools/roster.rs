use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::suivi::tools::error::{Result, ToolError};
use crate::suivi::tools::model::sheet_names_match;

/// Label used when an archive row carries missing or unmapped initials.
pub const UNKNOWN_DESIGNER: &str = "INCONNU";

/// A graphic designer tracked by the workbook. Each designer owns a
/// worksheet named after them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Designer {
    pub name: String,
    /// Active designers get a column in the franchise matrix.
    #[serde(default)]
    pub active: bool,
    /// Short codes used in the archive sheet's initials column.
    #[serde(default)]
    pub initials: Vec<String>,
}

impl Designer {
    fn new(name: &str, active: bool, initials: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            active,
            initials: initials.iter().map(|code| code.to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    designers: Vec<Designer>,
    #[serde(default = "default_unknown_label")]
    unknown_label: String,
}

fn default_unknown_label() -> String {
    UNKNOWN_DESIGNER.to_string()
}

/// The ordered list of designers together with the initials lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    designers: Vec<Designer>,
    codes: HashMap<String, usize>,
    unknown_label: String,
}

impl Default for Roster {
    fn default() -> Self {
        let designers = vec![
            Designer::new("JORDAN", true, &["J"]),
            Designer::new("CAROLE", true, &["C"]),
            Designer::new("JULIETTE", true, &["JU"]),
            Designer::new("QUENTIN", true, &["Q"]),
            Designer::new("HUGO", false, &["H"]),
            Designer::new("AUDREY", false, &["A"]),
            Designer::new("LAURIE", false, &["L"]),
            Designer::new("GUILLAUME", false, &["G"]),
            Designer::new("MARION", false, &["MA"]),
            Designer::new("LUCIE", false, &["LU"]),
            Designer::new("PAUL", false, &["P"]),
            Designer::new("FRANK", false, &["F"]),
            Designer::new("JB", false, &[]),
            Designer::new("MICKAEL", false, &["MI", "M"]),
            Designer::new("DAVID", false, &["D"]),
            Designer::new("MARIE", false, &["MR"]),
        ];
        match Self::new(designers, UNKNOWN_DESIGNER) {
            Ok(roster) => roster,
            Err(error) => unreachable!("built-in roster is inconsistent: {error}"),
        }
    }
}

impl Roster {
    /// Builds a roster, validating that names are unique and that no code
    /// points at two different designers. A designer's full name is always
    /// accepted as its own code.
    pub fn new(designers: Vec<Designer>, unknown_label: impl Into<String>) -> Result<Self> {
        if designers.is_empty() {
            return Err(ToolError::InvalidRoster("no designers declared".into()));
        }

        let mut names = HashSet::new();
        for designer in &designers {
            let name = designer.name.trim();
            if name.is_empty() {
                return Err(ToolError::InvalidRoster("designer with an empty name".into()));
            }
            if !names.insert(name.to_uppercase()) {
                return Err(ToolError::InvalidRoster(format!(
                    "designer '{name}' is declared twice"
                )));
            }
        }

        let mut codes: HashMap<String, usize> = HashMap::new();
        for (index, designer) in designers.iter().enumerate() {
            let own_name = std::iter::once(designer.name.as_str());
            for code in own_name.chain(designer.initials.iter().map(String::as_str)) {
                let code = normalize_code(code);
                if code.is_empty() {
                    continue;
                }
                match codes.get(&code) {
                    Some(&existing) if existing != index => {
                        return Err(ToolError::InvalidRoster(format!(
                            "code '{code}' maps to both {} and {}",
                            designers[existing].name, designer.name
                        )));
                    }
                    _ => {
                        codes.insert(code, index);
                    }
                }
            }
        }

        Ok(Self {
            designers,
            codes,
            unknown_label: unknown_label.into(),
        })
    }

    /// Loads a roster from a JSON document of the form
    /// `{"designers": [{"name": "...", "active": true, "initials": ["..."]}]}`.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let file: RosterFile = serde_json::from_str(source)?;
        Self::new(file.designers, file.unknown_label)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    pub fn designers(&self) -> &[Designer] {
        &self.designers
    }

    /// Active designers, in roster order.
    pub fn active(&self) -> impl Iterator<Item = &Designer> {
        self.designers.iter().filter(|designer| designer.active)
    }

    pub fn unknown_label(&self) -> &str {
        &self.unknown_label
    }

    /// Uses the same name comparison as the sheet lookup during
    /// normalisation, so a sheet classified here is also the one read there.
    pub fn is_designer_sheet(&self, sheet_name: &str) -> bool {
        self.designers
            .iter()
            .any(|designer| sheet_names_match(&designer.name, sheet_name))
    }

    /// Resolves an initials cell to a designer name. Blank and unmapped
    /// codes resolve to the unknown label so the row is kept.
    pub fn resolve_code(&self, raw: &str) -> &str {
        self.codes
            .get(&normalize_code(raw))
            .map(|&index| self.designers[index].name.as_str())
            .unwrap_or(self.unknown_label.as_str())
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
