//! Error types for grid operations.

use thiserror::Error;

/// Result type alias using GcmError.
pub type Result<T> = std::result::Result<T, GcmError>;

/// Errors that can occur while resolving coordinates or applying grid
/// operators.
///
/// All variants are raised synchronously at the point of detection; there are
/// no partial results and nothing is retried.
#[derive(Debug, Error)]
pub enum GcmError {
    /// A variable required by the model manifest is absent from the dataset.
    #[error("needed variable '{0}' not found in dataset")]
    MissingVariable(String),

    /// No manifest was supplied and none could be inferred from metadata.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Zero or multiple candidate coordinates matched a query that needs
    /// exactly one.
    #[error("ambiguous coordinate for {query}: candidates {candidates:?}")]
    AmbiguousCoordinate {
        query: String,
        candidates: Vec<String>,
    },

    /// A coordinate was asserted periodic but the manifest says otherwise.
    #[error("coordinate '{0}' is not periodic")]
    NotPeriodic(String),

    /// An operator was invoked on an array lacking the dimension it requires.
    #[error("invalid axis: {0}")]
    InvalidAxis(String),
}

impl GcmError {
    /// Create a MissingVariable error.
    pub fn missing_variable(name: impl Into<String>) -> Self {
        Self::MissingVariable(name.into())
    }

    /// Create a Configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an AmbiguousCoordinate error.
    pub fn ambiguous(query: impl Into<String>, candidates: Vec<String>) -> Self {
        Self::AmbiguousCoordinate {
            query: query.into(),
            candidates,
        }
    }

    /// Create an InvalidAxis error.
    pub fn invalid_axis(msg: impl Into<String>) -> Self {
        Self::InvalidAxis(msg.into())
    }
}
