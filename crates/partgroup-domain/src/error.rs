//! Grouping error types

use thiserror::Error;

/// Result type alias for grouping operations
pub type Result<T> = std::result::Result<T, GroupingError>;

/// Errors that can occur while grouping parts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupingError {
    /// Not enough parts to form an initial seed pair
    #[error("Insufficient data: {parts} part(s) loaded, at least 2 are required")]
    InsufficientData {
        /// Number of parts that were available
        parts: usize,
    },

    /// Requested seed count cannot anchor a grouping
    #[error("Invalid seed count {requested}: at least 2 seeds are required")]
    InvalidSeedCount {
        /// The rejected seed count
        requested: usize,
    },

    /// Malformed dataset handed to the core
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// The data-loading collaborator failed
    #[error("Dataset source error: {0}")]
    Source(String),
}
