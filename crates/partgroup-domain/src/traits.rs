//! Trait definitions for external interactions
//!
//! Loading parts from files or other stores is not part of the core; it is
//! supplied by an implementation of [`DatasetSource`] living in another crate.

use crate::Dataset;

/// Source of a dataset (mapping from part id to feature tokens)
///
/// Implemented by the application layer (partgroup-cli)
pub trait DatasetSource {
    /// Error type for load operations
    type Error: std::fmt::Display;

    /// Load the full dataset
    fn load(&self) -> Result<Dataset, Self::Error>;

    /// Human-readable description used in log messages
    fn describe(&self) -> String {
        "dataset".to_string()
    }
}

/// In-memory datasets are their own source
impl DatasetSource for Dataset {
    type Error = std::convert::Infallible;

    fn load(&self) -> Result<Dataset, Self::Error> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory dataset ({} parts)", self.len())
    }
}
