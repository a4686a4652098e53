// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

use std::{borrow::Cow, cmp::Ordering, iter::FusedIterator};

use crate::{
    shape::{Shape, ShapeError},
    text::{Layout, SeqPos},
};

/// Precomputed shape data shared by tuplers, comparators and sorters.
#[derive(Clone, Debug)]
pub(crate) struct ShapeTable {
    span: usize,
    care: Vec<usize>,
    lengths: Vec<usize>,
}

impl ShapeTable {
    /// Validates `shape` and tabulates its care offsets.
    pub(crate) fn new<S: Shape + ?Sized>(shape: &S) -> Result<Self, ShapeError> {
        let span = shape.span();
        if span == 0 {
            return Err(ShapeError::ZeroSpan);
        }
        let care = shape.care_positions();
        if let Some(&offset) = care.iter().find(|&&offset| offset >= span) {
            return Err(ShapeError::CareOutsideSpan { offset, span });
        }
        if care.is_empty() {
            return Err(ShapeError::ZeroWeight);
        }

        let mut lengths = Vec::with_capacity(2 * span);
        let mut next = care.iter().peekable();
        let mut count = 0;
        for l in 0..span {
            lengths.push(count);
            if next.next_if_eq(&&l).is_some() {
                count += 1;
            }
        }
        for l in 0..span {
            lengths.push(care.len() + lengths[l]);
        }

        Ok(Self {
            span,
            care,
            lengths,
        })
    }

    pub(crate) fn span(&self) -> usize {
        self.span
    }

    pub(crate) fn weight(&self) -> usize {
        self.care.len()
    }

    /// Care offsets in ascending order
    pub(crate) fn care(&self) -> &[usize] {
        &self.care
    }

    /// Returns the number of real characters in the two-period window of a suffix with
    /// `remaining` characters left.
    pub(crate) fn window_len(&self, remaining: usize) -> usize {
        if remaining < self.lengths.len() {
            self.lengths[remaining]
        } else {
            2 * self.weight()
        }
    }

    pub(crate) fn gapped_len(&self, remaining: usize) -> usize {
        remaining / self.span * self.weight() + self.lengths[remaining % self.span]
    }
}

/// The characters a cyclic shape selects from one suffix.
///
/// # Examples
///
/// ```
/// use dislex::{FixedShape, GappedSuffix};
///
/// let shape = FixedShape::new(2, 0b01).unwrap();
/// let suffix = GappedSuffix::new(b"abcde", 1, &shape).unwrap();
///
/// assert_eq!(suffix.len(), 2);
/// assert_eq!(suffix.get(1), Some(b'd'));
/// assert_eq!(suffix.iter().collect::<Vec<_>>(), b"bd");
/// ```
#[derive(Clone, Debug)]
pub struct GappedSuffix<'a> {
    sequence: &'a [u8],
    start: usize,
    span: usize,
    care: Cow<'a, [usize]>,
    len: usize,
}

impl<'a> GappedSuffix<'a> {
    /// Creates the gapped suffix of `sequence` starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if `shape` is degenerate.
    ///
    /// # Panics
    ///
    /// Panics if `start` is greater than `sequence.len()`.
    pub fn new<S: Shape + ?Sized>(
        sequence: &'a [u8],
        start: usize,
        shape: &S,
    ) -> Result<Self, ShapeError> {
        assert!(start <= sequence.len(), "suffix start lies beyond the sequence");

        let table = ShapeTable::new(shape)?;
        Ok(Self {
            sequence,
            start,
            span: table.span,
            len: table.gapped_len(sequence.len() - start),
            care: Cow::Owned(table.care),
        })
    }

    pub(crate) fn with_table(sequence: &'a [u8], start: usize, table: &'a ShapeTable) -> Self {
        Self {
            sequence,
            start,
            span: table.span(),
            care: Cow::Borrowed(table.care()),
            len: table.gapped_len(sequence.len() - start),
        }
    }

    /// Returns the number of characters in the gapped suffix.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if and only if the gapped suffix has no characters.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the `i`th character of the gapped suffix, or `None` past its end.
    pub fn get(&self, i: usize) -> Option<u8> {
        if i >= self.len {
            return None;
        }

        let weight = self.care.len();
        Some(self.sequence[self.start + i / weight * self.span + self.care[i % weight]])
    }

    /// Returns an iterator over the characters of the gapped suffix.
    pub fn iter(&self) -> Chars<'_, 'a> {
        self.chars_from(0)
    }

    /// Returns an iterator over the characters of the gapped suffix, skipping the first `skip`.
    pub fn chars_from(&self, skip: usize) -> Chars<'_, 'a> {
        Chars {
            suffix: self,
            next: skip.min(self.len),
        }
    }
}

/// An iterator over the characters of a [`GappedSuffix`]
#[derive(Clone, Debug)]
pub struct Chars<'s, 'a> {
    suffix: &'s GappedSuffix<'a>,
    next: usize,
}

impl Iterator for Chars<'_, '_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let c = self.suffix.get(self.next)?;
        self.next += 1;
        Some(c)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.suffix.len - self.next;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Chars<'_, '_> {}

impl FusedIterator for Chars<'_, '_> {}

/// Orders suffixes of a text by their gapped suffixes.
///
/// Gapped suffixes compare lexicographically, a proper prefix sorting first. Suffixes whose gapped
/// suffixes are equal sort by descending sequence index and then by descending offset.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SuffixComparator<'a> {
    layout: &'a Layout<'a>,
    table: &'a ShapeTable,
}

impl<'a> SuffixComparator<'a> {
    pub(crate) fn new(layout: &'a Layout<'a>, table: &'a ShapeTable) -> Self {
        Self { layout, table }
    }

    pub(crate) fn suffix(&self, pos: SeqPos) -> GappedSuffix<'a> {
        GappedSuffix::with_table(
            self.layout.sequence(pos.seq as usize),
            pos.offset as usize,
            self.table,
        )
    }

    pub(crate) fn compare(&self, a: SeqPos, b: SeqPos) -> Ordering {
        self.compare_from(a, b, 0)
    }

    /// Compares two suffixes known to share their first `depth` gapped characters.
    pub(crate) fn compare_from(&self, a: SeqPos, b: SeqPos, depth: usize) -> Ordering {
        let (sa, sb) = (self.suffix(a), self.suffix(b));

        sa.chars_from(depth)
            .cmp(sb.chars_from(depth))
            .then_with(|| tie_break(a, b))
    }
}

/// Orders suffixes with equal gapped suffixes.
pub(crate) fn tie_break(a: SeqPos, b: SeqPos) -> Ordering {
    b.seq.cmp(&a.seq).then_with(|| b.offset.cmp(&a.offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        shape::{CyclicShape, DynamicShape, FixedShape},
        text::{StringSet, Text},
    };

    #[test]
    fn window_lengths() {
        let table = ShapeTable::new(&"1101".parse::<CyclicShape>().unwrap()).unwrap();

        assert_eq!(table.care(), [0, 1, 3]);
        assert_eq!(table.window_len(0), 0);
        assert_eq!(table.window_len(3), 2);
        assert_eq!(table.window_len(7), 5);
        assert_eq!(table.window_len(8), 6);
        assert_eq!(table.window_len(1000), 6);
    }

    #[test]
    fn table_agrees_with_shape() {
        let shape = "0110100".parse::<CyclicShape>().unwrap();
        let table = ShapeTable::new(&shape).unwrap();

        for remaining in 0..40 {
            assert_eq!(table.gapped_len(remaining), shape.gapped_len(remaining));
        }
        assert_eq!(table.window_len(5), shape.suffix_lengths()[5]);
    }

    #[test]
    fn rejects_empty_care_set() {
        let shape = DynamicShape::from_mask(&[true, false]).unwrap();
        assert!(ShapeTable::new(&shape).is_ok());

        struct Blank;
        impl Shape for Blank {
            fn span(&self) -> usize {
                3
            }

            fn is_care(&self, _: usize) -> bool {
                false
            }
        }
        assert_eq!(ShapeTable::new(&Blank).unwrap_err(), ShapeError::ZeroWeight);
    }

    #[test]
    fn gapped_suffix_view() {
        let shape = FixedShape::new(3, 0b101).unwrap();
        let suffix = GappedSuffix::new(b"abcdefgh", 1, &shape).unwrap();

        assert_eq!(suffix.len(), 5);
        assert_eq!(suffix.iter().collect::<Vec<_>>(), b"bdegh");
        assert_eq!(suffix.get(4), Some(b'h'));
        assert_eq!(suffix.get(5), None);

        let empty = GappedSuffix::new(b"abc", 3, &shape).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn comparator_orders_by_gapped_characters() {
        let text = b"babab";
        let layout = text.layout();
        let table = ShapeTable::new(&"10".parse::<CyclicShape>().unwrap()).unwrap();
        let comparator = SuffixComparator::new(&layout, &table);

        let mut positions: Vec<_> = layout.positions().collect();
        positions.sort_by(|&a, &b| comparator.compare(a, b));
        let offsets: Vec<_> = positions.iter().map(|p| p.offset).collect();

        assert_eq!(offsets, [3, 1, 4, 2, 0]);
    }

    #[test]
    fn equal_suffixes_break_ties_backwards() {
        let set: StringSet = ["ab", "ab"].into_iter().collect();
        let layout = set.layout();
        let table = ShapeTable::new(&CyclicShape::ungapped()).unwrap();
        let comparator = SuffixComparator::new(&layout, &table);

        assert_eq!(
            comparator.compare(SeqPos::new(1, 0), SeqPos::new(0, 0)),
            Ordering::Less,
        );
        assert_eq!(
            comparator.compare(SeqPos::new(0, 1), SeqPos::new(0, 0)),
            Ordering::Greater,
        );
    }
}
