// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

use std::borrow::Cow;

/// A position inside a collection of sequences.
///
/// Positions order by sequence first and offset second.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SeqPos {
    /// The index of the sequence
    pub seq: u32,
    /// The offset inside the sequence
    pub offset: u32,
}

impl SeqPos {
    /// Creates a new position.
    pub const fn new(seq: u32, offset: u32) -> Self {
        Self { seq, offset }
    }
}

/// A read-only view of a text as a run of concatenated sequences.
///
/// Sequence `i` occupies `data[limits[i]..limits[i + 1]]`. A single string is a layout with one
/// sequence.
#[derive(Clone, Debug)]
pub struct Layout<'a> {
    data: &'a [u8],
    limits: Cow<'a, [usize]>,
}

impl<'a> Layout<'a> {
    /// Creates the layout of a single string.
    pub fn single(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: Cow::Owned(vec![0, data.len()]),
        }
    }

    /// Returns the total number of characters.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if and only if the text has no characters.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of sequences.
    pub fn sequence_count(&self) -> usize {
        self.limits.len() - 1
    }

    /// Returns the cumulative sequence lengths, starting with 0 and ending with
    /// [`len()`](Self::len).
    pub fn limits(&self) -> &[usize] {
        &self.limits
    }

    /// Returns the characters of sequence `seq`.
    ///
    /// # Panics
    ///
    /// Panics if `seq` is not smaller than [`sequence_count()`](Self::sequence_count).
    pub fn sequence(&self, seq: usize) -> &'a [u8] {
        &self.data[self.limits[seq]..self.limits[seq + 1]]
    }

    /// Returns the number of characters from `pos` to the end of its sequence.
    pub fn remaining(&self, pos: SeqPos) -> usize {
        let seq = pos.seq as usize;
        self.limits[seq + 1] - self.limits[seq] - pos.offset as usize
    }

    /// Maps a position in the concatenated text to its sequence and offset.
    ///
    /// Empty sequences never contain a position, so the result always points to a character.
    ///
    /// # Panics
    ///
    /// Panics if `global` is not smaller than [`len()`](Self::len).
    pub fn localize(&self, global: usize) -> SeqPos {
        assert!(global < self.len(), "position {global} is out of bounds");

        let seq = self.limits.partition_point(|&limit| limit <= global) - 1;
        SeqPos::new(seq as u32, (global - self.limits[seq]) as u32)
    }

    /// Maps a sequence position to its position in the concatenated text.
    pub fn globalize(&self, pos: SeqPos) -> usize {
        self.limits[pos.seq as usize] + pos.offset as usize
    }

    /// Returns every position of the text, sequence by sequence.
    pub fn positions(&self) -> impl Iterator<Item = SeqPos> + '_ {
        (0..self.sequence_count()).flat_map(move |seq| {
            let len = self.limits[seq + 1] - self.limits[seq];
            (0..len).map(move |offset| SeqPos::new(seq as u32, offset as u32))
        })
    }
}

/// A text that gapped suffix arrays can be built for.
///
/// The text decides how positions in the finished array are represented: a plain offset for
/// single strings and a [`SeqPos`] for collections.
pub trait Text {
    /// The position marker stored in suffix arrays of this text
    type Position: Copy + Eq;

    /// Returns the text as concatenated sequences.
    fn layout(&self) -> Layout<'_>;

    /// Converts a sequence position into this text's position marker.
    fn position(pos: SeqPos) -> Self::Position;

    /// Converts this text's position marker into a sequence position.
    fn seq_pos(position: Self::Position) -> SeqPos;
}

impl Text for [u8] {
    type Position = u32;

    fn layout(&self) -> Layout<'_> {
        Layout::single(self)
    }

    fn position(pos: SeqPos) -> u32 {
        pos.offset
    }

    fn seq_pos(position: u32) -> SeqPos {
        SeqPos::new(0, position)
    }
}

impl<const N: usize> Text for [u8; N] {
    type Position = u32;

    fn layout(&self) -> Layout<'_> {
        Layout::single(self)
    }

    fn position(pos: SeqPos) -> u32 {
        pos.offset
    }

    fn seq_pos(position: u32) -> SeqPos {
        SeqPos::new(0, position)
    }
}

impl Text for Vec<u8> {
    type Position = u32;

    fn layout(&self) -> Layout<'_> {
        Layout::single(self)
    }

    fn position(pos: SeqPos) -> u32 {
        pos.offset
    }

    fn seq_pos(position: u32) -> SeqPos {
        SeqPos::new(0, position)
    }
}

/// An ordered collection of sequences stored back to back.
///
/// # Examples
///
/// ```
/// use dislex::{SeqPos, StringSet};
///
/// let set: StringSet = ["ACGT", "", "GG"].into_iter().collect();
///
/// assert_eq!(set.len(), 6);
/// assert_eq!(set.sequence_count(), 3);
/// assert_eq!(set.limits(), [0, 4, 4, 6]);
/// assert_eq!(set.get(2), Some(&b"GG"[..]));
/// assert_eq!(set.localize(4), SeqPos::new(2, 0));
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct StringSet {
    data: Vec<u8>,
    limits: Vec<usize>,
}

impl StringSet {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            limits: vec![0],
        }
    }

    /// Appends a sequence.
    pub fn push(&mut self, sequence: impl AsRef<[u8]>) {
        self.data.extend_from_slice(sequence.as_ref());
        self.limits.push(self.data.len());
    }

    /// Returns the total number of characters over all sequences.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if and only if no sequence has any character.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of sequences.
    pub fn sequence_count(&self) -> usize {
        self.limits.len() - 1
    }

    /// Returns sequence `seq`, if it exists.
    pub fn get(&self, seq: usize) -> Option<&[u8]> {
        let end = *self.limits.get(seq + 1)?;
        Some(&self.data[self.limits[seq]..end])
    }

    /// Returns an iterator over the sequences.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.limits.windows(2).map(|w| &self.data[w[0]..w[1]])
    }

    /// Returns the cumulative sequence lengths, starting with 0.
    pub fn limits(&self) -> &[usize] {
        &self.limits
    }

    /// Returns all sequences concatenated.
    pub fn concat(&self) -> &[u8] {
        &self.data
    }

    /// Maps a position in the concatenated text to its sequence and offset.
    ///
    /// # Panics
    ///
    /// Panics if `global` is not smaller than [`len()`](Self::len).
    pub fn localize(&self, global: usize) -> SeqPos {
        self.layout().localize(global)
    }
}

impl Default for StringSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AsRef<[u8]>> FromIterator<S> for StringSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = StringSet::new();
        for sequence in iter {
            set.push(sequence);
        }
        set
    }
}

impl Text for StringSet {
    type Position = SeqPos;

    fn layout(&self) -> Layout<'_> {
        Layout {
            data: &self.data,
            limits: Cow::Borrowed(&self.limits),
        }
    }

    fn position(pos: SeqPos) -> SeqPos {
        pos
    }

    fn seq_pos(position: SeqPos) -> SeqPos {
        position
    }
}
