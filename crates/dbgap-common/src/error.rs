//! Error types for dbGaP ingestion

use thiserror::Error;

/// Result type alias for dbGaP operations
pub type Result<T> = std::result::Result<T, DbgapError>;

/// Main error type for dbGaP ingestion
#[derive(Error, Debug)]
pub enum DbgapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// A field required by the biocaddie mapping is absent from the exchange document
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid study identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl DbgapError {
    pub fn missing_field(path: impl Into<String>) -> Self {
        Self::MissingField(path.into())
    }

    pub fn network(msg: impl std::fmt::Display) -> Self {
        Self::Network(msg.to_string())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
