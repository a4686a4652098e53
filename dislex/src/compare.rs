// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

use std::cmp::Ordering;

use crate::{
    shape::{Shape, ShapeError},
    suffix::ShapeTable,
    text::{Layout, SeqPos, Text},
    tupler::Tuple,
};

/// Orders tuples so that equal names go exactly to positions whose gapped suffixes can not yet be
/// told apart.
///
/// A tuple is *full* if its position still has more than `weight` real characters in the first
/// two periods of its gapped suffix. Two full tuples with the same characters are equal. Every
/// other tuple is unique: after its real characters, shorter windows sort first, then the higher
/// sequence index, then the position closer to the end of its sequence.
///
/// Unique tuples are what end the chains of the transformed text, so those chains compare exactly
/// like the gapped suffixes they stand for.
#[derive(Clone, Debug)]
pub struct TupleComparator<'a> {
    layout: Layout<'a>,
    table: ShapeTable,
}

impl<'a> TupleComparator<'a> {
    /// Creates a comparator for tuples read from `text` through `shape`.
    ///
    /// # Errors
    ///
    /// Returns an error if `shape` is degenerate.
    pub fn new<T, S>(text: &'a T, shape: &S) -> Result<Self, ShapeError>
    where
        T: Text + ?Sized,
        S: Shape + ?Sized,
    {
        Ok(Self::with_table(text.layout(), ShapeTable::new(shape)?))
    }

    pub(crate) fn with_table(layout: Layout<'a>, table: ShapeTable) -> Self {
        Self { layout, table }
    }

    /// Returns whether `tuple` is full, that is whether it can compare equal to another tuple.
    pub fn is_full(&self, tuple: &Tuple) -> bool {
        self.table.window_len(self.layout.remaining(tuple.pos)) > self.table.weight()
    }

    /// Compares two tuples.
    pub fn compare(&self, a: &Tuple, b: &Tuple) -> Ordering {
        self.order(a.pos, b.pos, |common| a.chars[..common].cmp(&b.chars[..common]))
    }

    /// Compares the tuples at two positions, reading their characters from the text.
    ///
    /// This agrees with [`compare`](Self::compare) on the tuples a [`GappedTupler`] reads at `a`
    /// and `b`.
    ///
    /// [`GappedTupler`]: crate::GappedTupler
    pub fn compare_positions(&self, a: SeqPos, b: SeqPos) -> Ordering {
        self.order(a, b, |common| {
            let care = &self.table.care()[..common];
            self.care_chars(a, care).cmp(self.care_chars(b, care))
        })
    }

    // Only the first `common` care offsets are read, and those never leave the sequence.
    fn care_chars(&self, pos: SeqPos, care: &[usize]) -> impl Iterator<Item = u8> {
        let sequence = self.layout.sequence(pos.seq as usize);
        let start = pos.offset as usize;
        care.iter().map(move |&c| sequence[start + c])
    }

    fn order(&self, a: SeqPos, b: SeqPos, chars: impl FnOnce(usize) -> Ordering) -> Ordering {
        let weight = self.table.weight();
        let (la, lb) = (self.layout.remaining(a), self.layout.remaining(b));
        let (rla, rlb) = (self.table.window_len(la), self.table.window_len(lb));

        let common = weight.min(rla).min(rlb);
        match chars(common) {
            Ordering::Equal => {}
            ord => return ord,
        }

        if rla > weight && rlb > weight {
            return Ordering::Equal;
        }

        rla.cmp(&rlb)
            .then_with(|| b.seq.cmp(&a.seq))
            .then_with(|| la.cmp(&lb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{shape::CyclicShape, text::StringSet, tupler::GappedTupler};

    fn tuple(seq: u32, offset: u32, chars: &[u8]) -> Tuple {
        Tuple {
            pos: SeqPos::new(seq, offset),
            chars: chars.to_vec(),
        }
    }

    #[test]
    fn full_tuples_compare_by_characters() {
        let text = b"aaaaaa";
        let shape: CyclicShape = "10".parse().unwrap();
        let comparator = TupleComparator::new(text, &shape).unwrap();

        let (a, b) = (tuple(0, 0, b"a"), tuple(0, 1, b"a"));
        assert!(comparator.is_full(&a));
        assert!(comparator.is_full(&b));
        assert_eq!(comparator.compare(&a, &b), Ordering::Equal);
        assert_eq!(comparator.compare(&a, &tuple(0, 2, b"b")), Ordering::Less);
    }

    #[test]
    fn chain_ends_are_unique() {
        // Under "10", offsets 4 and 5 of six characters have windows of length one.
        let text = b"aaaaaa";
        let shape: CyclicShape = "10".parse().unwrap();
        let comparator = TupleComparator::new(text, &shape).unwrap();

        let (near_end, last) = (tuple(0, 4, b"a"), tuple(0, 5, b"a"));
        assert!(!comparator.is_full(&near_end));
        assert_eq!(comparator.compare(&last, &near_end), Ordering::Less);
        assert_eq!(comparator.compare(&near_end, &tuple(0, 3, b"a")), Ordering::Less);
    }

    #[test]
    fn short_windows_sort_first() {
        let text = b"abab";
        let shape: CyclicShape = "11".parse().unwrap();
        let comparator = TupleComparator::new(text, &shape).unwrap();

        // Offset 3 reads "b" and then padding.
        assert_eq!(
            comparator.compare(&tuple(0, 3, &[b'b', 0]), &tuple(0, 1, b"ba")),
            Ordering::Less,
        );
    }

    #[test]
    fn higher_sequences_win_ties() {
        let set: StringSet = ["xa", "ya"].into_iter().collect();
        let shape = CyclicShape::ungapped();
        let comparator = TupleComparator::new(&set, &shape).unwrap();

        let tuples: Vec<_> = GappedTupler::new(&set, &shape).unwrap().collect();
        assert_eq!(comparator.compare(&tuples[3], &tuples[1]), Ordering::Less);
        assert_eq!(comparator.compare(&tuples[1], &tuples[3]), Ordering::Greater);
    }

    #[test]
    fn sorted_names_are_consistent() {
        let text = b"mississippi";
        let shape: CyclicShape = "1011".parse().unwrap();
        let comparator = TupleComparator::new(text, &shape).unwrap();

        let mut tuples: Vec<_> = GappedTupler::new(text, &shape).unwrap().collect();
        tuples.sort_by(|a, b| comparator.compare(a, b));

        for pair in tuples.windows(2) {
            assert_ne!(comparator.compare(&pair[0], &pair[1]), Ordering::Greater);
            if comparator.compare(&pair[0], &pair[1]) == Ordering::Equal {
                assert!(comparator.is_full(&pair[0]));
                assert_eq!(pair[0].chars, pair[1].chars);
            }
        }
    }

    #[test]
    fn positions_agree_with_tuples() {
        let set: StringSet = ["mississippi", "", "sip", "ississ"].into_iter().collect();

        for shape in ["1", "10", "0101", "1100101"] {
            let shape: CyclicShape = shape.parse().unwrap();
            let comparator = TupleComparator::new(&set, &shape).unwrap();
            let tuples: Vec<_> = GappedTupler::new(&set, &shape).unwrap().collect();

            for a in &tuples {
                for b in &tuples {
                    assert_eq!(
                        comparator.compare_positions(a.pos, b.pos),
                        comparator.compare(a, b),
                        "{:?} against {:?} under {shape}",
                        a.pos,
                        b.pos,
                    );
                }
            }
        }
    }
}
