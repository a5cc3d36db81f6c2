//! Seed selection - builds the indicator group of spread-out anchor parts
//!
//! Starts from the single most dissimilar pair in the matrix and grows the
//! group one part at a time, always adding the remaining part whose summed
//! separation score against the current seeds is lowest.

use crate::error::{GroupingError, Result};
use crate::part::PartId;
use crate::similarity::SimilarityMatrix;
use std::collections::BTreeSet;

/// Growing set of seed parts, capped at a target size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorGroup {
    members: BTreeSet<PartId>,
    order: Vec<PartId>,
    target: usize,
}

impl IndicatorGroup {
    /// Start a group from its initial pair
    pub fn new(first: PartId, second: PartId, target: usize) -> Self {
        let mut group = Self {
            members: BTreeSet::new(),
            order: Vec::with_capacity(target.max(2)),
            target,
        };
        group.insert(first);
        group.insert(second);
        group
    }

    fn insert(&mut self, id: PartId) {
        if self.members.insert(id) {
            self.order.push(id);
        }
    }

    /// Number of seeds
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the group has no seeds
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Requested size
    pub fn target(&self) -> usize {
        self.target
    }

    /// True once the requested size is reached
    pub fn is_full(&self) -> bool {
        self.len() >= self.target
    }

    /// Check membership
    pub fn contains(&self, id: PartId) -> bool {
        self.members.contains(&id)
    }

    /// Seeds in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = PartId> + '_ {
        self.members.iter().copied()
    }

    /// Seeds in the order they were selected
    pub fn selection_order(&self) -> &[PartId] {
        &self.order
    }
}

/// Parts not yet assigned to any group
///
/// Only ever shrinks once created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemainingSet {
    ids: BTreeSet<PartId>,
}

impl RemainingSet {
    /// Create a remaining set from identifiers
    pub fn new<I: IntoIterator<Item = PartId>>(ids: I) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Number of pending parts
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when every part has been consumed
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Check membership
    pub fn contains(&self, id: PartId) -> bool {
        self.ids.contains(&id)
    }

    /// Pending parts in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = PartId> + '_ {
        self.ids.iter().copied()
    }

    /// Consume one part
    pub(crate) fn take(&mut self, id: PartId) -> bool {
        self.ids.remove(&id)
    }
}

/// Result of seed selection
#[derive(Debug, Clone, PartialEq)]
pub struct SeedOutcome {
    /// Selected seeds
    pub indicator: IndicatorGroup,

    /// Parts left for the assignment stage
    pub remaining: RemainingSet,

    /// The most dissimilar pair the group started from
    pub initial_pair: (PartId, PartId),

    /// Similarity of the initial pair
    pub initial_similarity: f64,
}

impl SeedOutcome {
    /// Seed count that was asked for
    pub fn requested(&self) -> usize {
        self.indicator.target()
    }

    /// How many seeds short of the request the selection ended
    pub fn shortfall(&self) -> usize {
        self.requested().saturating_sub(self.indicator.len())
    }

    /// True when the full requested seed count was produced
    pub fn is_complete(&self) -> bool {
        self.shortfall() == 0
    }
}

/// Selects the indicator group from a similarity matrix
pub struct SeedSelector<'a> {
    matrix: &'a SimilarityMatrix,
}

impl<'a> SeedSelector<'a> {
    /// Create a selector over a matrix
    pub fn new(matrix: &'a SimilarityMatrix) -> Self {
        Self { matrix }
    }

    /// Select `target` seeds among `universe`
    ///
    /// Candidates are scanned in ascending id order each round and only a
    /// strictly lower score displaces the current best, so ties go to the
    /// smallest id. If the universe runs out first the group is returned
    /// smaller than requested; see [`SeedOutcome::shortfall`].
    ///
    /// # Errors
    /// - [`GroupingError::InvalidSeedCount`] if `target < 2`
    /// - [`GroupingError::InvalidDataset`] if `universe` is not the matrix's part set
    /// - [`GroupingError::InsufficientData`] if no pair of distinct parts exists
    pub fn select(&self, universe: &[PartId], target: usize) -> Result<SeedOutcome> {
        if target < 2 {
            return Err(GroupingError::InvalidSeedCount { requested: target });
        }

        let universe: BTreeSet<PartId> = universe.iter().copied().collect();
        if !universe.iter().eq(self.matrix.ids().iter()) {
            return Err(GroupingError::InvalidDataset(format!(
                "universe of {} parts does not match the {} parts of the similarity matrix",
                universe.len(),
                self.matrix.ids().len()
            )));
        }

        let ((first, second), initial_similarity) =
            self.matrix
                .min_pair()
                .ok_or(GroupingError::InsufficientData {
                    parts: universe.len(),
                })?;

        tracing::info!(
            "Initial indicator pair ({}, {}) with similarity {:.3}",
            first,
            second,
            initial_similarity
        );

        let mut indicator = IndicatorGroup::new(first, second, target);
        let mut remaining =
            RemainingSet::new(universe.iter().copied().filter(|id| !indicator.contains(*id)));

        while !indicator.is_full() && !remaining.is_empty() {
            let scores: Vec<(PartId, f64)> = remaining
                .iter()
                .map(|i| (i, self.outlier_score(i, &indicator, &universe)))
                .collect();

            let Some((best, score)) = argmin(&scores) else {
                break;
            };

            remaining.take(best);
            indicator.insert(best);
            tracing::info!(
                "Added {} to indicator group (O = {:.3}), {} of {} seeds",
                best,
                score,
                indicator.len(),
                target
            );
        }

        if indicator.len() < target {
            tracing::warn!(
                "Only {} of {} requested seeds available",
                indicator.len(),
                target
            );
        }

        Ok(SeedOutcome {
            indicator,
            remaining,
            initial_pair: (first, second),
            initial_similarity,
        })
    }

    /// Separation of candidate `i` from seed `j`: Y(i, j)
    ///
    /// `similarity(i, j)` minus the mean similarity of `i` and `j` to every
    /// other part of the universe (not just the remaining ones).
    pub fn separation(&self, i: PartId, j: PartId, universe: &BTreeSet<PartId>) -> f64 {
        let rest: Vec<&PartId> = universe.iter().filter(|k| **k != i && **k != j).collect();
        let background = if rest.is_empty() {
            0.0
        } else {
            let total = self.matrix.sum_to(i, rest.iter().copied())
                + self.matrix.sum_to(j, rest.iter().copied());
            total / (2.0 * rest.len() as f64)
        };
        self.matrix.get(i, j) - background
    }

    /// Summed separation of candidate `i` against every seed: O(i)
    pub fn outlier_score(
        &self,
        i: PartId,
        indicator: &IndicatorGroup,
        universe: &BTreeSet<PartId>,
    ) -> f64 {
        let total = indicator
            .iter()
            .map(|j| {
                let y = self.separation(i, j, universe);
                tracing::debug!("Y[{},{}] = {:.3}", i, j, y);
                y
            })
            .sum::<f64>();
        tracing::debug!("O[{}] = {:.3}", i, total);
        total
    }
}

/// First strictly minimal entry
fn argmin(scores: &[(PartId, f64)]) -> Option<(PartId, f64)> {
    let mut best: Option<(PartId, f64)> = None;
    for &(id, score) in scores {
        match best {
            Some((_, best_score)) if score >= best_score => {}
            _ => best = Some((id, score)),
        }
    }
    best
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::part::Dataset;
    use proptest::prelude::*;

    fn dataset_strategy() -> impl Strategy<Value = Dataset> {
        prop::collection::vec(prop::collection::vec("[a-f]", 0..5), 2..9)
            .prop_map(|rows| Dataset::from_rows(rows))
    }

    proptest! {
        /// Property: seeds and remaining parts split the universe exactly
        #[test]
        fn test_seed_partition(dataset in dataset_strategy(), target in 2usize..12) {
            let matrix = SimilarityMatrix::compute(&dataset);
            let ids = dataset.ids();
            let outcome = SeedSelector::new(&matrix).select(&ids, target).unwrap();

            for id in &ids {
                prop_assert!(outcome.indicator.contains(*id) != outcome.remaining.contains(*id));
            }
            prop_assert_eq!(outcome.indicator.len() + outcome.remaining.len(), ids.len());
            prop_assert_eq!(outcome.indicator.len(), target.min(ids.len()));
        }
    }
}
