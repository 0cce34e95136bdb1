//! Error types for index construction and queries.

use proxima_types::DbId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProximaError>;

#[derive(Debug, Error)]
pub enum ProximaError {
    /// Caller-supplied arguments violate a documented precondition.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An index cannot be built over zero objects.
    #[error("Cannot build an index over an empty relation")]
    EmptyRelation,

    #[error("Dimensionality mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Unknown object id {0}")]
    UnknownId(DbId),

    /// Failure while reading or parsing a configuration document.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ProximaError {
    fn from(err: serde_json::Error) -> Self {
        ProximaError::Config(err.to_string())
    }
}

#[cfg(feature = "toml")]
impl From<toml::de::Error> for ProximaError {
    fn from(err: toml::de::Error) -> Self {
        ProximaError::Config(err.to_string())
    }
}

#[cfg(feature = "toml")]
impl From<toml::ser::Error> for ProximaError {
    fn from(err: toml::ser::Error) -> Self {
        ProximaError::Config(err.to_string())
    }
}

impl From<std::io::Error> for ProximaError {
    fn from(err: std::io::Error) -> Self {
        ProximaError::Config(err.to_string())
    }
}
