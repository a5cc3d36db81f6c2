//! Part module - the unit of data being grouped

use crate::error::{GroupingError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identifier for a part
///
/// Identifiers are totally ordered; every deterministic traversal in the
/// grouping stages walks parts in ascending identifier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartId(u64);

impl PartId {
    /// Create a PartId from a raw value
    pub fn from_value(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Parse a PartId from its decimal representation
    ///
    /// # Examples
    ///
    /// ```
    /// use partgroup_domain::PartId;
    ///
    /// let id = PartId::parse(" 7 ").unwrap();
    /// assert_eq!(id.value(), 7);
    /// assert!(PartId::parse("seven").is_err());
    /// ```
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| format!("Invalid part id '{}': {}", s, e))
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PartId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for PartId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Unordered set of categorical feature tokens
pub type FeatureSet = BTreeSet<String>;

/// A part: an identifier paired with its feature tokens
///
/// Parts are immutable once loaded and referenced by identifier everywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Unique identifier
    pub id: PartId,

    /// Feature tokens describing the part
    pub features: FeatureSet,
}

impl Part {
    /// Create a part from any collection of tokens
    pub fn new<I, T>(id: PartId, features: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            id,
            features: features.into_iter().map(Into::into).collect(),
        }
    }
}

/// The full collection of parts to be grouped
///
/// This is the boundary contract with the data-loading collaborator:
/// a mapping from identifier to feature set, iterated in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    parts: BTreeMap<PartId, FeatureSet>,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from rows of cells, numbering rows from 1
    ///
    /// Cells are trimmed and empty cells are skipped, so a row only
    /// contributes the tokens actually present in it.
    ///
    /// # Examples
    ///
    /// ```
    /// use partgroup_domain::{Dataset, PartId};
    ///
    /// let dataset = Dataset::from_rows(vec![
    ///     vec!["A1", "B3", ""],
    ///     vec!["A2", "B3", "C4"],
    /// ]);
    /// assert_eq!(dataset.len(), 2);
    /// assert_eq!(dataset.features(PartId::from_value(1)).unwrap().len(), 2);
    /// ```
    pub fn from_rows<R, C, T>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let parts = rows
            .into_iter()
            .zip(1u64..)
            .map(|(row, idx)| {
                let features = row
                    .into_iter()
                    .map(|cell| cell.as_ref().trim().to_string())
                    .filter(|cell| !cell.is_empty())
                    .collect();
                (PartId(idx), features)
            })
            .collect();

        Self { parts }
    }

    /// Build a dataset from explicit parts
    ///
    /// # Errors
    /// Returns an error if two parts share an identifier
    pub fn from_parts<I>(parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = Part>,
    {
        let mut dataset = Self::new();
        for part in parts {
            dataset.insert(part)?;
        }
        Ok(dataset)
    }

    /// Add a part
    ///
    /// # Errors
    /// Returns an error if the identifier is already present
    pub fn insert(&mut self, part: Part) -> Result<()> {
        if self.parts.contains_key(&part.id) {
            return Err(GroupingError::InvalidDataset(format!(
                "duplicate part id {}",
                part.id
            )));
        }
        self.parts.insert(part.id, part.features);
        Ok(())
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// True when no parts are loaded
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// All identifiers in ascending order
    pub fn ids(&self) -> Vec<PartId> {
        self.parts.keys().copied().collect()
    }

    /// Feature set of one part
    pub fn features(&self, id: PartId) -> Option<&FeatureSet> {
        self.parts.get(&id)
    }

    /// Iterate over (id, features) in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (PartId, &FeatureSet)> {
        self.parts.iter().map(|(id, features)| (*id, features))
    }

    /// Iterate over owned parts
    pub fn parts(&self) -> impl Iterator<Item = Part> + '_ {
        self.iter().map(|(id, features)| Part {
            id,
            features: features.clone(),
        })
    }
}
