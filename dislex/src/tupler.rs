// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

use std::iter::FusedIterator;

use crate::{
    shape::{Shape, ShapeError},
    suffix::ShapeTable,
    text::{Layout, SeqPos, Text},
};

/// The characters selected by the first period of a shape at one text position.
///
/// Care offsets reaching past the end of the position's sequence read as `0`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Tuple {
    /// The position the tuple was read at
    pub pos: SeqPos,
    /// One character per care offset
    pub chars: Vec<u8>,
}

/// Streams one [`Tuple`] per text position, sequence by sequence.
///
/// Tuples never read across the end of a sequence, so every sequence contributes exactly as many
/// tuples as it has characters.
///
/// # Examples
///
/// ```
/// use dislex::{CyclicShape, GappedTupler};
///
/// let shape: CyclicShape = "101".parse().unwrap();
/// let tuples: Vec<_> = GappedTupler::new(b"ACGT", &shape)
///     .unwrap()
///     .map(|tuple| tuple.chars)
///     .collect();
///
/// assert_eq!(tuples, [*b"AG", *b"CT", [b'G', 0], [b'T', 0]]);
/// ```
#[derive(Clone, Debug)]
pub struct GappedTupler<'a> {
    layout: Layout<'a>,
    care: Vec<usize>,
    seq: usize,
    offset: usize,
    left: usize,
}

impl<'a> GappedTupler<'a> {
    /// Creates a tupler over `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if `shape` is degenerate.
    pub fn new<T, S>(text: &'a T, shape: &S) -> Result<Self, ShapeError>
    where
        T: Text + ?Sized,
        S: Shape + ?Sized,
    {
        let table = ShapeTable::new(shape)?;
        Ok(Self::with_table(text.layout(), &table))
    }

    pub(crate) fn with_table(layout: Layout<'a>, table: &ShapeTable) -> Self {
        let left = layout.len();
        Self {
            layout,
            care: table.care().to_vec(),
            seq: 0,
            offset: 0,
            left,
        }
    }
}

impl Iterator for GappedTupler<'_> {
    type Item = Tuple;

    fn next(&mut self) -> Option<Tuple> {
        while self.seq < self.layout.sequence_count() {
            let sequence = self.layout.sequence(self.seq);
            if self.offset < sequence.len() {
                let chars = self
                    .care
                    .iter()
                    .map(|&c| sequence.get(self.offset + c).copied().unwrap_or(0))
                    .collect();
                let pos = SeqPos::new(self.seq as u32, self.offset as u32);

                self.offset += 1;
                self.left -= 1;
                return Some(Tuple { pos, chars });
            }

            self.seq += 1;
            self.offset = 0;
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.left, Some(self.left))
    }
}

impl ExactSizeIterator for GappedTupler<'_> {}

impl FusedIterator for GappedTupler<'_> {}

/// Returns how many tuples of a sequence with `len` characters read padding.
///
/// These are the tuples at the last `min(len, c)` positions, where `c` is the largest care offset
/// of `shape`.
///
/// # Errors
///
/// Returns an error if `shape` is degenerate.
pub fn padded_tuples<S: Shape + ?Sized>(shape: &S, len: usize) -> Result<usize, ShapeError> {
    let table = ShapeTable::new(shape)?;
    let last = table.care().last().copied().unwrap_or(0);

    Ok(len.min(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{shape::CyclicShape, text::StringSet};

    #[test]
    fn one_tuple_per_position() {
        let set: StringSet = ["ACGTA", "", "CC", "G"].into_iter().collect();
        let shape: CyclicShape = "0101".parse().unwrap();

        let tupler = GappedTupler::new(&set, &shape).unwrap();
        assert_eq!(tupler.len(), 8);

        let tuples: Vec<_> = tupler.collect();
        assert_eq!(tuples.len(), 8);
        assert_eq!(tuples[0].pos, SeqPos::new(0, 0));
        assert_eq!(tuples[0].chars, b"CT");
        assert_eq!(tuples[2].chars, [b'T', 0]);
        assert_eq!(tuples[3].chars, [b'A', 0]);
        assert_eq!(tuples[5].pos, SeqPos::new(2, 0));
        assert_eq!(tuples[5].chars, [b'C', 0]);
        assert_eq!(tuples[7].pos, SeqPos::new(3, 0));
        assert_eq!(tuples[7].chars, [0, 0]);
    }

    #[test]
    fn padded_tail_lengths() {
        let shape: CyclicShape = "1101".parse().unwrap();

        assert_eq!(padded_tuples(&shape, 0), Ok(0));
        assert_eq!(padded_tuples(&shape, 2), Ok(2));
        assert_eq!(padded_tuples(&shape, 10), Ok(3));

        let tuples: Vec<_> = GappedTupler::new(b"ACGTACGTAC", &shape).unwrap().collect();
        let padded = tuples.iter().filter(|t| t.pos.offset as usize + 3 >= 10).count();
        assert_eq!(Ok(padded), padded_tuples(&shape, 10));
        assert_eq!(tuples[6].chars, b"GTC");
        assert_eq!(tuples[7].chars, [b'T', b'A', 0]);
    }

    #[test]
    fn empty_text() {
        let shape = CyclicShape::ungapped();

        assert_eq!(GappedTupler::new(b"", &shape).unwrap().count(), 0);
    }

    #[test]
    fn padding_needs_a_care_offset() {
        struct AllGaps;
        impl Shape for AllGaps {
            fn span(&self) -> usize {
                3
            }

            fn is_care(&self, _: usize) -> bool {
                false
            }
        }

        assert_eq!(padded_tuples(&AllGaps, 10), Err(ShapeError::ZeroWeight));
        assert_eq!(padded_tuples(&CyclicShape::ungapped(), 10), Ok(0));
    }
}
