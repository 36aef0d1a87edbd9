use std::collections::HashMap;

const CANONICAL_STATUSES: &[(&str, &str)] = &[
    ("! urgent !", "! Urgent !"),
    ("urgent", "! Urgent !"),
    ("a faire", "A faire"),
    ("à faire", "A faire"),
    ("en cours", "En cours"),
    ("attente r.", "Attente R."),
    ("attente r", "Attente R."),
    ("attente retour", "Attente R."),
    ("stand-by", "Stand-by"),
    ("standby", "Stand-by"),
    ("stand by", "Stand-by"),
    ("à relancer", "À relancer"),
    ("a relancer", "À relancer"),
    ("relancer", "À relancer"),
    ("mairie", "Mairie"),
];

/// Maps the free-text statuses typed in the designer sheets onto a small
/// canonical vocabulary. Unknown statuses are kept verbatim.
#[derive(Debug, Clone)]
pub struct StatusMapper {
    mapping: HashMap<String, &'static str>,
}

impl Default for StatusMapper {
    fn default() -> Self {
        Self {
            mapping: CANONICAL_STATUSES
                .iter()
                .map(|(raw, canonical)| (raw.to_string(), *canonical))
                .collect(),
        }
    }
}

impl StatusMapper {
    pub fn canonicalize(&self, status: &str) -> String {
        let trimmed = status.trim();
        self.mapping
            .get(&trimmed.to_lowercase())
            .map(|canonical| canonical.to_string())
            .unwrap_or_else(|| trimmed.to_string())
    }
}
