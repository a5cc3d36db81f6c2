//! Similarity module - pairwise Jaccard scores between parts

use crate::part::{Dataset, FeatureSet, PartId};
use std::collections::BTreeMap;

/// Jaccard similarity of two feature sets
///
/// `|a ∩ b| / |a ∪ b|`, defined as 0 when the union is empty.
///
/// # Examples
///
/// ```
/// use partgroup_domain::similarity::jaccard;
/// use partgroup_domain::FeatureSet;
///
/// let a: FeatureSet = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
/// let b: FeatureSet = ["A", "B", "D"].iter().map(|s| s.to_string()).collect();
/// assert_eq!(jaccard(&a, &b), 0.5);
/// assert_eq!(jaccard(&FeatureSet::new(), &FeatureSet::new()), 0.0);
/// ```
pub fn jaccard(a: &FeatureSet, b: &FeatureSet) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Similarity score for every ordered pair of distinct parts
///
/// Values are symmetric but stored per directed pair. Self-pairs are never
/// stored; any pair without an entry reads as 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrix {
    ids: Vec<PartId>,
    scores: BTreeMap<(PartId, PartId), f64>,
}

impl SimilarityMatrix {
    /// Compute the matrix for a dataset
    pub fn compute(dataset: &Dataset) -> Self {
        let ids = dataset.ids();
        let mut scores = BTreeMap::new();

        for (i, features_i) in dataset.iter() {
            for (j, features_j) in dataset.iter() {
                if i == j {
                    continue;
                }
                scores.insert((i, j), jaccard(features_i, features_j));
            }
        }

        tracing::debug!(parts = ids.len(), pairs = scores.len(), "Computed similarity matrix");

        Self { ids, scores }
    }

    /// Similarity of an ordered pair, 0 when absent
    pub fn get(&self, i: PartId, j: PartId) -> f64 {
        self.try_get(i, j).unwrap_or(0.0)
    }

    /// Similarity of an ordered pair, if it was computed
    pub fn try_get(&self, i: PartId, j: PartId) -> Option<f64> {
        self.scores.get(&(i, j)).copied()
    }

    /// Identifiers covered by the matrix, ascending
    pub fn ids(&self) -> &[PartId] {
        &self.ids
    }

    /// Number of stored directed pairs
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True when no pairs are stored
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// All entries in ascending (i, j) order
    pub fn entries(&self) -> impl Iterator<Item = ((PartId, PartId), f64)> + '_ {
        self.scores.iter().map(|(pair, score)| (*pair, *score))
    }

    /// The most dissimilar ordered pair
    ///
    /// Pairs are scanned in ascending (i, j) order and only a strictly smaller
    /// score replaces the current best, so the first minimum wins ties.
    pub fn min_pair(&self) -> Option<((PartId, PartId), f64)> {
        let mut best: Option<((PartId, PartId), f64)> = None;
        for (pair, score) in self.entries() {
            match best {
                Some((_, best_score)) if score >= best_score => {}
                _ => best = Some((pair, score)),
            }
        }
        best
    }

    /// Sum of `similarity(i, k)` over the given parts
    pub fn sum_to<'a, I>(&self, i: PartId, others: I) -> f64
    where
        I: IntoIterator<Item = &'a PartId>,
    {
        others.into_iter().map(|k| self.get(i, *k)).sum()
    }
}
