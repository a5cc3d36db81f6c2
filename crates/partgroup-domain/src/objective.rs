//! Objective function - cohesion of a finished partition

use crate::assign::Groups;
use crate::part::PartId;
use crate::similarity::SimilarityMatrix;
use std::collections::BTreeSet;

/// Cohesion of one group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupCohesion {
    /// Position of the group in the partition (0-based)
    pub index: usize,

    /// Number of members
    pub size: usize,

    /// Mean pairwise similarity within the group (H)
    pub cohesion: f64,
}

/// Per-group and overall cohesion of a partition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectiveReport {
    /// One entry per group, in partition order
    pub groups: Vec<GroupCohesion>,

    /// Arithmetic mean of the per-group cohesion values
    pub overall: f64,
}

impl ObjectiveReport {
    /// Cohesion of a group by index
    pub fn cohesion(&self, index: usize) -> Option<f64> {
        self.groups.get(index).map(|g| g.cohesion)
    }
}

/// Scores a partition against a similarity matrix
pub struct ObjectiveScorer<'a> {
    matrix: &'a SimilarityMatrix,
}

impl<'a> ObjectiveScorer<'a> {
    /// Create a scorer over a matrix
    pub fn new(matrix: &'a SimilarityMatrix) -> Self {
        Self { matrix }
    }

    /// Score every group and the partition as a whole
    pub fn score(&self, groups: &Groups) -> ObjectiveReport {
        let per_group: Vec<GroupCohesion> = groups
            .iter()
            .enumerate()
            .map(|(index, members)| GroupCohesion {
                index,
                size: members.len(),
                cohesion: self.cohesion(members),
            })
            .collect();

        let overall = if per_group.is_empty() {
            0.0
        } else {
            per_group.iter().map(|g| g.cohesion).sum::<f64>() / per_group.len() as f64
        };

        for group in &per_group {
            tracing::info!("H for group {} = {:.3}", group.index + 1, group.cohesion);
        }
        tracing::info!("Overall H = {:.3}", overall);

        ObjectiveReport {
            groups: per_group,
            overall,
        }
    }

    /// Mean similarity over all ordered pairs of distinct members
    ///
    /// Groups of size 0 or 1 have cohesion 0.
    pub fn cohesion(&self, members: &BTreeSet<PartId>) -> f64 {
        if members.len() <= 1 {
            return 0.0;
        }

        let mut total = 0.0;
        let mut pairs = 0usize;
        for &p in members {
            for &k in members {
                if p != k {
                    total += self.matrix.get(p, k);
                    pairs += 1;
                }
            }
        }

        total / pairs as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::Dataset;

    fn set(ids: &[u64]) -> BTreeSet<PartId> {
        ids.iter().copied().map(PartId::from_value).collect()
    }

    fn scenario_matrix() -> SimilarityMatrix {
        SimilarityMatrix::compute(&Dataset::from_rows(vec![
            vec!["A", "B", "C"],
            vec!["A", "B", "D"],
            vec!["X", "Y", "Z"],
            vec!["X", "Y", "W"],
        ]))
    }

    #[test]
    fn test_scenario_report() {
        let matrix = scenario_matrix();
        let groups = Groups::from_sets(vec![set(&[1, 2]), set(&[3, 4])]);
        let report = ObjectiveScorer::new(&matrix).score(&groups);

        assert_eq!(report.cohesion(0), Some(0.5));
        assert_eq!(report.cohesion(1), Some(0.5));
        assert_eq!(report.overall, 0.5);
        assert_eq!(report.groups[1].size, 2);
    }

    #[test]
    fn test_singleton_group_scores_zero() {
        let matrix = scenario_matrix();
        let groups = Groups::from_sets(vec![set(&[1]), set(&[2, 3, 4])]);
        let report = ObjectiveScorer::new(&matrix).score(&groups);

        assert_eq!(report.cohesion(0), Some(0.0));
        // pairs: (3,4) and (4,3) score 0.5, the other four 0
        assert!((report.cohesion(1).unwrap() - 1.0 / 6.0).abs() < 1e-12);
        assert!((report.overall - 1.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_groups_scores_zero() {
        let matrix = scenario_matrix();
        let report = ObjectiveScorer::new(&matrix).score(&Groups::default());
        assert!(report.groups.is_empty());
        assert_eq!(report.overall, 0.0);
        assert_eq!(report.cohesion(0), None);
    }

    #[test]
    fn test_missing_pairs_count_as_zero() {
        let matrix = scenario_matrix();
        // 99 is not in the matrix
        let cohesion = ObjectiveScorer::new(&matrix).cohesion(&set(&[1, 99]));
        assert_eq!(cohesion, 0.0);
    }
}
