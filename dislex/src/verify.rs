// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

//! Checks for suffix arrays produced elsewhere, e.g. read back from storage.

use crate::{
    shape::{Shape, ShapeError},
    suffix::{ShapeTable, SuffixComparator},
    text::Text,
};

/// Returns whether `sa` lists every position of `text` exactly once.
pub fn is_permutation<T: Text + ?Sized>(text: &T, sa: &[T::Position]) -> bool {
    let layout = text.layout();
    if sa.len() != layout.len() {
        return false;
    }

    let mut seen = vec![false; layout.len()];
    for &position in sa {
        let pos = T::seq_pos(position);
        let seq = pos.seq as usize;
        if seq >= layout.sequence_count() || pos.offset as usize >= layout.sequence(seq).len() {
            return false;
        }

        let global = layout.globalize(pos);
        if seen[global] {
            return false;
        }
        seen[global] = true;
    }

    true
}

/// Returns whether consecutive entries of `sa` are in strictly increasing gapped suffix order.
///
/// # Errors
///
/// Returns an error if `shape` is degenerate.
///
/// # Panics
///
/// Panics if `sa` contains a position outside `text`.
pub fn is_sorted<T, S>(text: &T, shape: &S, sa: &[T::Position]) -> Result<bool, ShapeError>
where
    T: Text + ?Sized,
    S: Shape + ?Sized,
{
    let table = ShapeTable::new(shape)?;
    let layout = text.layout();
    let comparator = SuffixComparator::new(&layout, &table);

    Ok(sa.windows(2).all(|w| {
        comparator
            .compare(T::seq_pos(w[0]), T::seq_pos(w[1]))
            .is_lt()
    }))
}
