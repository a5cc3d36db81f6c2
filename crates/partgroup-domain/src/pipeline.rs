//! Grouping pipeline - runs the four stages in order
//!
//! 1. Pairwise similarity
//! 2. Seed (indicator group) selection
//! 3. Assignment of the remaining parts
//! 4. Objective scoring
//!
//! Each stage receives the previous stage's output by value or reference and
//! returns its own; nothing is shared between runs.

use crate::assign::{Assignment, GroupAssigner, Groups};
use crate::error::{GroupingError, Result};
use crate::objective::{ObjectiveReport, ObjectiveScorer};
use crate::part::Dataset;
use crate::seed::{SeedOutcome, SeedSelector};
use crate::similarity::SimilarityMatrix;
use crate::traits::DatasetSource;

/// Default number of groups to seed
pub const DEFAULT_SEED_COUNT: usize = 4;

/// Configuration for a grouping run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingConfig {
    /// Target number of seeds (and therefore groups)
    pub seed_count: usize,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            seed_count: DEFAULT_SEED_COUNT,
        }
    }
}

impl GroupingConfig {
    /// Configuration with an explicit seed count
    pub fn with_seed_count(seed_count: usize) -> Self {
        Self { seed_count }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.seed_count < 2 {
            return Err(GroupingError::InvalidSeedCount {
                requested: self.seed_count,
            });
        }
        Ok(())
    }
}

/// Everything a grouping run produces
#[derive(Debug, Clone, PartialEq)]
pub struct GroupingOutcome {
    /// Pairwise similarity matrix
    pub matrix: SimilarityMatrix,

    /// Seed selection result, as handed to the assignment stage
    pub seeds: SeedOutcome,

    /// Assignments in the order they were made
    pub trail: Vec<Assignment>,

    /// Final partition
    pub groups: Groups,

    /// Cohesion report
    pub report: ObjectiveReport,
}

/// Runs the grouping heuristic end to end
///
/// # Examples
///
/// ```
/// use partgroup_domain::{Dataset, GroupingConfig, GroupingPipeline};
///
/// let dataset = Dataset::from_rows(vec![
///     vec!["A", "B", "C"],
///     vec!["A", "B", "D"],
///     vec!["X", "Y", "Z"],
///     vec!["X", "Y", "W"],
/// ]);
///
/// let outcome = GroupingPipeline::new(GroupingConfig::with_seed_count(2))
///     .run(&dataset)
///     .unwrap();
/// assert_eq!(outcome.groups.len(), 2);
/// assert_eq!(outcome.report.overall, 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GroupingPipeline {
    config: GroupingConfig,
}

impl GroupingPipeline {
    /// Create a pipeline with the given configuration
    pub fn new(config: GroupingConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    /// Compute the matrix and select seeds only
    pub fn seed(&self, dataset: &Dataset) -> Result<(SimilarityMatrix, SeedOutcome)> {
        self.config.validate()?;

        let matrix = SimilarityMatrix::compute(dataset);
        let seeds = SeedSelector::new(&matrix).select(&dataset.ids(), self.config.seed_count)?;
        Ok((matrix, seeds))
    }

    /// Run all four stages on a dataset
    ///
    /// # Errors
    /// - [`GroupingError::InvalidSeedCount`] if the configured seed count is below 2
    /// - [`GroupingError::InsufficientData`] if the dataset has fewer than 2 parts
    pub fn run(&self, dataset: &Dataset) -> Result<GroupingOutcome> {
        tracing::info!(
            "Grouping {} parts into {} groups",
            dataset.len(),
            self.config.seed_count
        );

        let (matrix, seeds) = self.seed(dataset)?;
        let ids = dataset.ids();

        let assignment =
            GroupAssigner::new(&matrix).assign(&seeds.indicator, seeds.remaining.clone(), &ids);
        let report = ObjectiveScorer::new(&matrix).score(&assignment.groups);

        Ok(GroupingOutcome {
            matrix,
            seeds,
            trail: assignment.trail,
            groups: assignment.groups,
            report,
        })
    }

    /// Load a dataset from a source and run all four stages
    ///
    /// Load failures are terminal and reported as [`GroupingError::Source`].
    pub fn run_from<S: DatasetSource>(&self, source: &S) -> Result<GroupingOutcome> {
        tracing::info!("Loading {}", source.describe());
        let dataset = source
            .load()
            .map_err(|e| GroupingError::Source(e.to_string()))?;
        self.run(&dataset)
    }
}
