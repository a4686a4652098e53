// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

use crate::text::SeqPos;

/// The DisLex bijection between the positions of one string and the indices of its lex text.
///
/// Positions are dealt into `span` residue classes counted from the end of the string. The class
/// whose positions end exactly on a period boundary comes last, and inside a class positions keep
/// their order. Consecutive lex-text entries therefore hold the names of tuples one period apart,
/// so an ordinary suffix of the lex text spells out a gapped suffix period by period.
///
/// # Examples
///
/// ```
/// use dislex::DislexTransform;
///
/// let transform = DislexTransform::new(3, 7);
/// let lex: Vec<_> = (0..7).map(|x| transform.forward(x)).collect();
///
/// assert_eq!(lex, [2, 5, 0, 3, 6, 1, 4]);
/// assert!((0..7).all(|x| transform.reverse(transform.forward(x)) == x));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DislexTransform {
    span: usize,
    len: usize,
    periods: usize,
    rest: usize,
}

impl DislexTransform {
    /// Creates the transform for a string of `len` characters.
    ///
    /// # Panics
    ///
    /// Panics if `span` is 0.
    pub fn new(span: usize, len: usize) -> Self {
        assert_ne!(span, 0, "span must not be 0");

        Self {
            span,
            len,
            periods: len / span,
            rest: len % span,
        }
    }

    /// Returns the number of positions the transform maps.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if and only if the transform maps no positions.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maps a text position to its lex-text index.
    ///
    /// # Panics
    ///
    /// Panics if `x` is not smaller than [`len()`](Self::len).
    pub fn forward(&self, x: usize) -> usize {
        assert!(x < self.len, "position {x} is out of bounds");

        let (span, periods, rest) = (self.span, self.periods, self.rest);
        let r = x / span;
        let b = (self.len - x) % span;

        let y = (span - 1 - b) * periods + r;
        if b <= rest { y + rest - b } else { y }
    }

    /// Maps a lex-text index back to its text position.
    ///
    /// # Panics
    ///
    /// Panics if `y` is not smaller than [`len()`](Self::len).
    pub fn reverse(&self, y: usize) -> usize {
        assert!(y < self.len, "lex index {y} is out of bounds");

        let (span, periods, rest) = (self.span, self.periods, self.rest);

        // Classes with `b > rest` hold `periods` positions each and come first.
        let short = (span - rest - 1) * periods;
        if y < short {
            let b = span - 1 - y / periods;
            let r = y - (span - b - 1) * periods;
            (r + 1) * span + rest - b
        } else {
            let t = y - short;
            let q = t / (periods + 1);
            let r = t - q * (periods + 1);
            r * span + q
        }
    }
}

/// The DisLex bijection for a collection of sequences.
///
/// Every sequence is transformed on its own and keeps its slot `limits[i]..limits[i + 1]` of the
/// lex text.
#[derive(Clone, Debug)]
pub struct DislexSetTransform<'a> {
    span: usize,
    limits: &'a [usize],
}

impl<'a> DislexSetTransform<'a> {
    /// Creates the transform for sequences delimited by `limits`.
    ///
    /// # Panics
    ///
    /// Panics if `span` is 0 or `limits` is empty.
    pub fn new(span: usize, limits: &'a [usize]) -> Self {
        assert_ne!(span, 0, "span must not be 0");
        assert!(!limits.is_empty(), "limits must start with 0");

        Self { span, limits }
    }

    /// Returns the total number of positions the transform maps.
    pub fn len(&self) -> usize {
        self.limits[self.limits.len() - 1]
    }

    /// Returns `true` if and only if the transform maps no positions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sequence(&self, seq: usize) -> DislexTransform {
        DislexTransform::new(self.span, self.limits[seq + 1] - self.limits[seq])
    }

    /// Maps a sequence position to its lex-text index.
    ///
    /// # Panics
    ///
    /// Panics if `pos` does not point to a character.
    pub fn forward(&self, pos: SeqPos) -> usize {
        let seq = pos.seq as usize;
        self.limits[seq] + self.sequence(seq).forward(pos.offset as usize)
    }

    /// Maps a lex-text index back to its sequence position.
    ///
    /// # Panics
    ///
    /// Panics if `y` is not smaller than [`len()`](Self::len).
    pub fn reverse(&self, y: usize) -> SeqPos {
        assert!(y < self.len(), "lex index {y} is out of bounds");

        let seq = self.limits.partition_point(|&limit| limit <= y) - 1;
        let offset = self.sequence(seq).reverse(y - self.limits[seq]);

        SeqPos::new(seq as u32, offset as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{StringSet, Text};

    fn assert_bijection(span: usize, len: usize) {
        let transform = DislexTransform::new(span, len);
        let mut seen = vec![false; len];

        for x in 0..len {
            let y = transform.forward(x);
            assert!(!seen[y], "span {span}, len {len}: {y} hit twice");
            seen[y] = true;
            assert_eq!(transform.reverse(y), x, "span {span}, len {len}");
        }
    }

    #[test]
    fn exhaustive_small() {
        for span in 1..=12 {
            for len in 0..=200 {
                assert_bijection(span, len);
            }
        }
    }

    #[test]
    fn large() {
        for span in [1, 2, 3, 7, 12, 64, 100] {
            assert_bijection(span, 10_000);
        }
    }

    #[test]
    fn identity_below_span() {
        let transform = DislexTransform::new(8, 5);

        for x in 0..5 {
            assert_eq!(transform.forward(x), x);
        }
    }

    #[test]
    fn periods_become_contiguous() {
        // Positions one period apart land next to each other.
        let transform = DislexTransform::new(2, 6);

        assert_eq!(transform.forward(0) + 1, transform.forward(2));
        assert_eq!(transform.forward(2) + 1, transform.forward(4));
        assert_eq!(transform.forward(1) + 1, transform.forward(3));
    }

    #[test]
    fn collection_round_trip() {
        let set: StringSet = ["0123456789", "012", "0", "0123456789", "012"]
            .into_iter()
            .collect();
        let layout = set.layout();
        let transform = DislexSetTransform::new(3, layout.limits());

        assert_eq!(transform.len(), set.len());

        let mut per_sequence = vec![0; set.sequence_count()];
        for y in 0..transform.len() {
            let pos = transform.reverse(y);
            let seq = pos.seq as usize;
            assert!((pos.offset as usize) < set.get(seq).unwrap().len());
            assert_eq!(transform.forward(pos), y);
            per_sequence[seq] += 1;
        }

        let lengths: Vec<_> = set.iter().map(<[u8]>::len).collect();
        assert_eq!(per_sequence, lengths);
        assert_eq!(per_sequence.iter().sum::<usize>(), transform.len());
    }

    #[test]
    fn collection_with_empty_sequences() {
        let set: StringSet = ["", "ab", "", "", "c", ""].into_iter().collect();
        let layout = set.layout();
        let transform = DislexSetTransform::new(2, layout.limits());

        let positions: Vec<_> = (0..transform.len()).map(|y| transform.reverse(y)).collect();
        assert_eq!(
            positions,
            [SeqPos::new(1, 1), SeqPos::new(1, 0), SeqPos::new(4, 0)],
        );
    }
}
