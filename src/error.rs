//! Error type shared by the query builder, the feed extractor and the client.

/// Errors that can occur when building arXiv requests or reading arXiv responses
#[derive(Debug, thiserror::Error)]
pub enum ArxivError {
    /// Caller-supplied arguments violate a precondition
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An Atom entry lacks a field the extractor requires
    #[error("Malformed entry: {0}")]
    MalformedEntry(String),

    /// Document-level parsing error (XML syntax, unexpected root, etc.)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Error status or error entry reported by arXiv
    #[error("API error: {0}")]
    Api(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArxivError {
    /// Whether the error came from a single bad entry rather than the whole document
    pub fn is_malformed_entry(&self) -> bool {
        matches!(self, ArxivError::MalformedEntry(_))
    }
}

impl From<reqwest::Error> for ArxivError {
    fn from(err: reqwest::Error) -> Self {
        ArxivError::Network(err.to_string())
    }
}

impl From<roxmltree::Error> for ArxivError {
    fn from(err: roxmltree::Error) -> Self {
        ArxivError::Parse(format!("XML: {}", err))
    }
}

impl From<url::ParseError> for ArxivError {
    fn from(err: url::ParseError) -> Self {
        ArxivError::InvalidInput(format!("URL: {}", err))
    }
}
