//! Partgroup Domain Layer
//!
//! This crate contains the grouping heuristic that partitions a collection of
//! parts, each described by a set of categorical feature tokens, into a target
//! number of cohesive groups. It performs no I/O: datasets arrive through the
//! [`DatasetSource`] trait and results are returned as plain values.
//!
//! ## Stages
//!
//! - **Similarity**: Jaccard score for every ordered pair of distinct parts
//! - **Seed selection**: the most dissimilar pair, grown greedily into an
//!   indicator group of the requested size
//! - **Assignment**: remaining parts placed one at a time, always committing
//!   the globally best (part, group) match
//! - **Objective**: mean within-group similarity (H) per group and overall
//!
//! ## Determinism
//!
//! Every scan runs in ascending part id order (then ascending group index),
//! and ties keep the first candidate seen. Repeated runs on the same input
//! produce identical output.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assign;
pub mod error;
pub mod objective;
pub mod part;
pub mod pipeline;
pub mod seed;
pub mod similarity;
pub mod traits;

// Re-exports for convenience
pub use assign::{Assignment, AssignmentOutcome, GroupAssigner, Groups};
pub use error::{GroupingError, Result};
pub use objective::{GroupCohesion, ObjectiveReport, ObjectiveScorer};
pub use part::{Dataset, FeatureSet, Part, PartId};
pub use pipeline::{GroupingConfig, GroupingOutcome, GroupingPipeline, DEFAULT_SEED_COUNT};
pub use seed::{IndicatorGroup, RemainingSet, SeedOutcome, SeedSelector};
pub use similarity::SimilarityMatrix;
pub use traits::DatasetSource;
