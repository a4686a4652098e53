// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

use std::cmp::Ordering;

use crate::{error::ConstructError, text::SeqPos, tupler::Tuple};

/// A position together with the rank of its tuple
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Named {
    /// The position the tuple was read at
    pub pos: SeqPos,
    /// The dense rank of the tuple, starting from 0
    pub rank: u32,
}

/// A value read at one text position.
pub trait Located {
    /// Returns the position the value was read at.
    fn pos(&self) -> SeqPos;
}

impl Located for Tuple {
    fn pos(&self) -> SeqPos {
        self.pos
    }
}

impl Located for SeqPos {
    fn pos(&self) -> SeqPos {
        *self
    }
}

/// Assigns dense ranks to a stream of sorted tuples.
///
/// The stream may also carry bare [`SeqPos`] values when `compare` reads the tuples from the text
/// itself.
///
/// The rank increases by one whenever a tuple compares greater than its predecessor. A tuple that
/// compares less than its predecessor means the stream was not sorted and yields
/// [`ConstructError::InvariantViolation`].
///
/// # Examples
///
/// ```
/// use dislex::{Namer, SeqPos, Tuple};
///
/// let tuples = [b"a", b"a", b"c"]
///     .into_iter()
///     .enumerate()
///     .map(|(i, chars)| Ok(Tuple { pos: SeqPos::new(0, i as u32), chars: chars.to_vec() }));
/// let mut namer = Namer::new(tuples, |a: &Tuple, b: &Tuple| a.chars.cmp(&b.chars));
///
/// let ranks: Vec<_> = namer.by_ref().map(|named| named.unwrap().rank).collect();
/// assert_eq!(ranks, [0, 0, 1]);
/// assert_eq!(namer.rank_count(), 2);
/// ```
#[derive(Debug)]
pub struct Namer<I, T, F> {
    tuples: I,
    compare: F,
    prev: Option<T>,
    rank: u32,
}

impl<I, T, F> Namer<I, T, F>
where
    I: Iterator<Item = Result<T, ConstructError>>,
    T: Located,
    F: FnMut(&T, &T) -> Ordering,
{
    /// Creates a namer over `tuples`, which must be sorted by `compare`.
    pub fn new(tuples: I, compare: F) -> Self {
        Self {
            tuples,
            compare,
            prev: None,
            rank: 0,
        }
    }

    /// Returns the number of distinct ranks handed out so far.
    pub fn rank_count(&self) -> u32 {
        match self.prev {
            Some(_) => self.rank + 1,
            None => 0,
        }
    }
}

impl<I, T, F> Iterator for Namer<I, T, F>
where
    I: Iterator<Item = Result<T, ConstructError>>,
    T: Located,
    F: FnMut(&T, &T) -> Ordering,
{
    type Item = Result<Named, ConstructError>;

    fn next(&mut self) -> Option<Self::Item> {
        let tuple = match self.tuples.next()? {
            Ok(tuple) => tuple,
            Err(e) => return Some(Err(e)),
        };

        if let Some(prev) = &self.prev {
            match (self.compare)(prev, &tuple) {
                Ordering::Less => self.rank += 1,
                Ordering::Equal => {}
                Ordering::Greater => {
                    return Some(Err(ConstructError::InvariantViolation(
                        "tuples reached the namer out of order",
                    )));
                }
            }
        }

        let named = Named {
            pos: tuple.pos(),
            rank: self.rank,
        };
        self.prev = Some(tuple);

        Some(Ok(named))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tuples.size_hint()
    }
}
