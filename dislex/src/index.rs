// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

use std::{cmp::Ordering, ops::Range};

use crate::{
    construct::{ConstructConfig, construct_with_config},
    error::ConstructError,
    shape::Shape,
    suffix::{GappedSuffix, ShapeTable, SuffixComparator},
    text::{Layout, Text},
};

/// A text together with its gapped suffix array.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), dislex::ConstructError> {
/// use dislex::{CyclicShape, GappedIndex};
///
/// let shape: CyclicShape = "101".parse().unwrap();
/// let index = GappedIndex::new(b"ACGTACCTA", &shape)?;
///
/// // Matches "A?G" and "A?C"
/// assert_eq!(index.find(b"AG"), [0]);
/// assert_eq!(index.count(b"AC"), 1);
/// assert!(!index.contains(b"TT"));
/// # Ok(())
/// # }
/// ```
pub struct GappedIndex<'t, T: Text + ?Sized> {
    layout: Layout<'t>,
    table: ShapeTable,
    sa: Vec<T::Position>,
}

impl<'t, T: Text + ?Sized> GappedIndex<'t, T> {
    /// Builds the index of `text` under `shape` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if construction fails.
    pub fn new<S: Shape + ?Sized>(text: &'t T, shape: &S) -> Result<Self, ConstructError> {
        Self::with_config(text, shape, &ConstructConfig::default())
    }

    /// Builds the index of `text` under `shape`.
    ///
    /// # Errors
    ///
    /// Returns an error if construction fails.
    pub fn with_config<S: Shape + ?Sized>(
        text: &'t T,
        shape: &S,
        config: &ConstructConfig,
    ) -> Result<Self, ConstructError> {
        let sa = construct_with_config(text, shape, config)?;

        Ok(Self {
            layout: text.layout(),
            table: ShapeTable::new(shape)?,
            sa,
        })
    }

    /// Returns the number of indexed positions.
    pub fn len(&self) -> usize {
        self.sa.len()
    }

    /// Returns `true` if and only if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.sa.is_empty()
    }

    /// Returns the gapped suffix array.
    pub fn suffix_array(&self) -> &[T::Position] {
        &self.sa
    }

    /// Consumes the index, returning the gapped suffix array.
    pub fn into_suffix_array(self) -> Vec<T::Position> {
        self.sa
    }

    /// Returns the gapped suffix starting at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` lies outside the text.
    pub fn gapped_suffix(&self, position: T::Position) -> GappedSuffix<'_> {
        SuffixComparator::new(&self.layout, &self.table).suffix(T::seq_pos(position))
    }

    /// Returns the positions whose gapped suffixes start with `pattern`, in suffix array order.
    pub fn find(&self, pattern: &[u8]) -> &[T::Position] {
        &self.sa[self.find_range(pattern)]
    }

    /// Returns the range of the suffix array holding the positions whose gapped suffixes start
    /// with `pattern`.
    pub fn find_range(&self, pattern: &[u8]) -> Range<usize> {
        let comparator = SuffixComparator::new(&self.layout, &self.table);
        let prefix_order = |&position: &T::Position| {
            comparator
                .suffix(T::seq_pos(position))
                .iter()
                .take(pattern.len())
                .cmp(pattern.iter().copied())
        };

        let start = self
            .sa
            .partition_point(|p| prefix_order(p) == Ordering::Less);
        let len = self.sa[start..].partition_point(|p| prefix_order(p) == Ordering::Equal);

        start..start + len
    }

    /// Returns the number of positions whose gapped suffixes start with `pattern`.
    pub fn count(&self, pattern: &[u8]) -> usize {
        self.find(pattern).len()
    }

    /// Returns whether any gapped suffix starts with `pattern`.
    pub fn contains(&self, pattern: &[u8]) -> bool {
        !self.find(pattern).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        shape::CyclicShape,
        text::{SeqPos, StringSet},
    };

    #[test]
    fn ungapped_search() {
        let index = GappedIndex::new(b"abracadabra", &CyclicShape::ungapped()).unwrap();

        let mut hits = index.find(b"abra").to_vec();
        hits.sort_unstable();
        assert_eq!(hits, [0, 7]);
        assert_eq!(index.count(b"a"), 5);
        assert_eq!(index.count(b""), 11);
        assert!(!index.contains(b"abrab"));
    }

    #[test]
    fn gapped_search_in_collection() {
        let set: StringSet = ["AxCyG", "AzC", "A"].into_iter().collect();
        let shape: CyclicShape = "10".parse().unwrap();
        let index = GappedIndex::new(&set, &shape).unwrap();

        assert_eq!(index.find(b"AC"), [SeqPos::new(1, 0), SeqPos::new(0, 0)]);
        assert_eq!(index.find(b"ACG"), [SeqPos::new(0, 0)]);
        assert_eq!(index.find_range(b"ACG").len(), 1);
        assert_eq!(index.find_range(b"Q").len(), 0);
        assert_eq!(index.gapped_suffix(SeqPos::new(0, 1)).iter().collect::<Vec<_>>(), b"xy");
    }

    #[test]
    fn empty_index() {
        let index = GappedIndex::new(b"", &CyclicShape::ungapped()).unwrap();

        assert!(index.is_empty());
        assert!(index.find(b"a").is_empty());
    }
}
