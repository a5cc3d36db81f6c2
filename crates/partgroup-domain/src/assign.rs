//! Group assignment - distributes remaining parts over the seeded groups
//!
//! Every round rebuilds the full (candidate, group) scoring table and commits
//! only the single best pair, so each assignment sees the effect of all
//! previous ones.

use crate::part::PartId;
use crate::seed::{IndicatorGroup, RemainingSet};
use crate::similarity::SimilarityMatrix;
use std::collections::BTreeSet;

/// Final partition: one set of part ids per seed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Groups {
    groups: Vec<BTreeSet<PartId>>,
}

impl Groups {
    /// Build groups from explicit member sets
    pub fn from_sets(groups: Vec<BTreeSet<PartId>>) -> Self {
        Self { groups }
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when there are no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Members of one group
    pub fn get(&self, index: usize) -> Option<&BTreeSet<PartId>> {
        self.groups.get(index)
    }

    /// Iterate over groups in order
    pub fn iter(&self) -> impl Iterator<Item = &BTreeSet<PartId>> {
        self.groups.iter()
    }

    /// Index of the group holding a part
    pub fn group_of(&self, id: PartId) -> Option<usize> {
        self.groups.iter().position(|g| g.contains(&id))
    }

    /// Total number of assigned parts
    pub fn member_count(&self) -> usize {
        self.groups.iter().map(BTreeSet::len).sum()
    }

    /// Underlying sets
    pub fn as_slice(&self) -> &[BTreeSet<PartId>] {
        &self.groups
    }
}

/// One committed assignment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    /// The part that was placed
    pub part: PartId,

    /// Index of the receiving group
    pub group: usize,

    /// Winning matching score M(part, group)
    pub score: f64,
}

/// Result of the assignment stage
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentOutcome {
    /// Final partition
    pub groups: Groups,

    /// Assignments in the order they were committed
    pub trail: Vec<Assignment>,
}

/// Assigns remaining parts to seeded groups
pub struct GroupAssigner<'a> {
    matrix: &'a SimilarityMatrix,
}

impl<'a> GroupAssigner<'a> {
    /// Create an assigner over a matrix
    pub fn new(matrix: &'a SimilarityMatrix) -> Self {
        Self { matrix }
    }

    /// Assign every remaining part to one of the groups seeded by `indicator`
    ///
    /// Groups are created in ascending seed id order. Each round enumerates
    /// candidates in ascending id order and, per candidate, groups in index
    /// order; only a strictly higher score replaces the current best.
    pub fn assign(
        &self,
        indicator: &IndicatorGroup,
        mut remaining: RemainingSet,
        universe: &[PartId],
    ) -> AssignmentOutcome {
        let mut groups: Vec<BTreeSet<PartId>> =
            indicator.iter().map(|seed| BTreeSet::from([seed])).collect();
        let mut trail = Vec::with_capacity(remaining.len());

        while let Some(best) = self.best_match(&remaining, &groups, universe) {
            remaining.take(best.part);
            groups[best.group].insert(best.part);
            tracing::info!(
                "Assigned {} -> group {} (M = {:.3})",
                best.part,
                best.group + 1,
                best.score
            );
            trail.push(best);
        }

        AssignmentOutcome {
            groups: Groups::from_sets(groups),
            trail,
        }
    }

    /// Best (candidate, group) pair over the whole pending set
    fn best_match(
        &self,
        remaining: &RemainingSet,
        groups: &[BTreeSet<PartId>],
        universe: &[PartId],
    ) -> Option<Assignment> {
        let mut best: Option<Assignment> = None;
        for part in remaining.iter() {
            for (group, members) in groups.iter().enumerate() {
                let score = self.match_score(part, members, universe);
                tracing::debug!("M[{},{:?}] = {:.3}", part, members, score);
                match best {
                    Some(current) if score <= current.score => {}
                    _ => best = Some(Assignment { part, group, score }),
                }
            }
        }
        best
    }

    /// Matching score M(i, g)
    ///
    /// Mean similarity of `i` to the group minus its mean similarity to
    /// everything outside the group. Empty averages are 0.
    pub fn match_score(&self, i: PartId, group: &BTreeSet<PartId>, universe: &[PartId]) -> f64 {
        let inside = if group.is_empty() {
            0.0
        } else {
            self.matrix.sum_to(i, group) / group.len() as f64
        };

        let outside: Vec<&PartId> = universe
            .iter()
            .filter(|l| **l != i && !group.contains(*l))
            .collect();
        let background = if outside.is_empty() {
            0.0
        } else {
            self.matrix.sum_to(i, outside.iter().copied()) / outside.len() as f64
        };

        inside - background
    }
}
