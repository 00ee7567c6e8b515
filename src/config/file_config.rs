//! Configuration file support for arxiv-feed.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! query_url = "http://export.arxiv.org/api/query"
//! taxonomy_url = "https://arxiv.org/category_taxonomy"
//! timeout_secs = 30
//! user_agent = "arxiv-feed/0.1.0"
//!
//! [search]
//! max_results = 10
//! sort_by = "submittedDate"
//! ascending = false
//!
//! [logging]
//! level = "info"
//! ```

use std::path::Path;

use super::Config;

impl Config {
    /// Load configuration from a TOML file, without environment overrides
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        std::fs::write(path, self.to_toml()?).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigFileError> {
        toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
