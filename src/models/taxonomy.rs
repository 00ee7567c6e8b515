//! arXiv category taxonomy row.

use serde::{Deserialize, Serialize};

/// One category from the arXiv taxonomy page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyRow {
    /// Category code, e.g. `cs.AI`
    #[serde(rename = "Short Name")]
    pub short_name: String,

    /// Human-readable name, e.g. `Artificial Intelligence`
    #[serde(rename = "Long Name")]
    pub long_name: String,

    #[serde(rename = "Description")]
    pub description: String,
}

impl TaxonomyRow {
    pub fn new(
        short_name: impl Into<String>,
        long_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            short_name: short_name.into(),
            long_name: long_name.into(),
            description: description.into(),
        }
    }

    /// Archive part of the code (`cs` for `cs.AI`, `hep-th` for `hep-th`)
    pub fn archive(&self) -> &str {
        self.short_name
            .split_once('.')
            .map(|(archive, _)| archive)
            .unwrap_or(&self.short_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names() {
        let row = TaxonomyRow::new("cs.AI", "Artificial Intelligence", "Covers all areas of AI.");
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Short Name"], "cs.AI");
        assert_eq!(json["Long Name"], "Artificial Intelligence");
        assert_eq!(json["Description"], "Covers all areas of AI.");
    }

    #[test]
    fn test_archive() {
        assert_eq!(TaxonomyRow::new("cs.AI", "", "").archive(), "cs");
        assert_eq!(TaxonomyRow::new("hep-th", "", "").archive(), "hep-th");
    }
}
