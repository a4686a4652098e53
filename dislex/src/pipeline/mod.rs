// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

//! DisLex construction as a chain of stages.
//!
//! Tuples are sorted and named, every name is stored at the lex-text slot of its position, the
//! lex text is suffix sorted, and the result is mapped back to text positions. The in-memory
//! variant sorts bare positions and reads their tuples from the text. The external variant passes
//! materialized tuples and names through [`ExternalSorter`]s that spill sorted runs to temporary
//! files.

mod pool;

use std::{cmp::Ordering, io, time::Instant};

use log::debug;
use sufsort::InnerAlgorithm;

use crate::{
    compare::TupleComparator,
    error::ConstructError,
    namer::{Named, Namer},
    suffix::ShapeTable,
    text::{Layout, SeqPos},
    transform::DislexSetTransform,
    tupler::{GappedTupler, Tuple},
};

pub(crate) use pool::SpillPool;
use pool::{ExternalSorter, Mapped, Sorted};

/// Builds the gapped suffix array with every stage held in memory.
pub(crate) fn dislex(
    layout: &Layout,
    table: &ShapeTable,
    inner: InnerAlgorithm,
) -> Result<Vec<SeqPos>, ConstructError> {
    let comparator = TupleComparator::with_table(layout.clone(), table.clone());
    let transform = DislexSetTransform::new(table.span(), layout.limits());

    // Tuples are read in place, so only positions are sorted.
    let now = Instant::now();
    let mut positions: Vec<_> = layout.positions().collect();
    positions.sort_unstable_by(|&a, &b| comparator.compare_positions(a, b));
    debug!("Sorted {} tuples in {:?}", positions.len(), now.elapsed());

    let now = Instant::now();
    let mut namer = Namer::new(positions.into_iter().map(Ok), |a: &SeqPos, b: &SeqPos| {
        comparator.compare_positions(*a, *b)
    });
    let mut lex = vec![0; layout.len() + 1];
    for named in &mut namer {
        let named = named?;
        lex[transform.forward(named.pos)] = named.rank + 1;
    }
    debug!("Named tuples with {} ranks in {:?}", namer.rank_count(), now.elapsed());

    Ok(finish(&lex, namer.rank_count(), inner, &transform))
}

/// Builds the gapped suffix array, spilling tuples and names in runs of `capacity` records.
pub(crate) fn dislex_external(
    layout: &Layout,
    table: &ShapeTable,
    inner: InnerAlgorithm,
    pool: &SpillPool,
    capacity: usize,
) -> Result<Vec<SeqPos>, ConstructError> {
    let comparator = TupleComparator::with_table(layout.clone(), table.clone());
    let transform = DislexSetTransform::new(table.span(), layout.limits());

    let now = Instant::now();
    let sorted = sort_tuples(
        GappedTupler::with_table(layout.clone(), table),
        &comparator,
        pool,
        capacity,
    )?;
    debug!("Ran tuples into the sorter in {:?}", now.elapsed());

    let now = Instant::now();
    let tuples = sorted.map(|tuple| tuple.map_err(ConstructError::from));
    let mut namer = Namer::new(tuples, |a: &Tuple, b: &Tuple| comparator.compare(a, b));
    let mapped = map_names(&mut namer, &transform, pool, capacity)?;
    debug!("Named tuples with {} ranks in {:?}", namer.rank_count(), now.elapsed());

    let now = Instant::now();
    let lex = strip_positions(mapped, layout.len())?;
    debug!("Gathered the lex text in {:?}", now.elapsed());

    Ok(finish(&lex, namer.rank_count(), inner, &transform))
}

fn sort_tuples(
    tuples: impl Iterator<Item = Tuple>,
    comparator: &TupleComparator,
    pool: &SpillPool,
    capacity: usize,
) -> io::Result<impl Iterator<Item = io::Result<Tuple>>> {
    let mut sorter = ExternalSorter::new(pool, capacity, |a: &Tuple, b: &Tuple| {
        comparator.compare(a, b)
    });
    for tuple in tuples {
        sorter.push(tuple)?;
    }

    sorter.finish()
}

fn by_index(a: &Mapped, b: &Mapped) -> Ordering {
    a.index.cmp(&b.index)
}

/// Sorts names by their lex-text slot.
fn map_names(
    named: impl Iterator<Item = Result<Named, ConstructError>>,
    transform: &DislexSetTransform,
    pool: &SpillPool,
    capacity: usize,
) -> Result<Sorted<Mapped, fn(&Mapped, &Mapped) -> Ordering>, ConstructError> {
    let mut sorter = ExternalSorter::new(
        pool,
        capacity,
        by_index as fn(&Mapped, &Mapped) -> Ordering,
    );
    for named in named {
        let named = named?;
        sorter.push(Mapped {
            index: transform.forward(named.pos) as u32,
            name: named.rank + 1,
        })?;
    }

    Ok(sorter.finish()?)
}

/// Drops the slots from names sorted by slot, checking that every slot is filled exactly once.
fn strip_positions(
    mapped: impl Iterator<Item = io::Result<Mapped>>,
    len: usize,
) -> Result<Vec<u32>, ConstructError> {
    let mut lex = Vec::with_capacity(len + 1);
    for record in mapped {
        let record = record?;
        if record.index as usize != lex.len() {
            return Err(ConstructError::InvariantViolation(
                "lex text slots are not filled exactly once",
            ));
        }
        lex.push(record.name);
    }
    if lex.len() != len {
        return Err(ConstructError::InvariantViolation(
            "lex text slots are not filled exactly once",
        ));
    }
    lex.push(0);

    Ok(lex)
}

/// Suffix sorts the lex text and maps its suffixes back to text positions.
///
/// `lex` ends with a 0 sentinel and holds names `1..=rank_count` everywhere else.
fn finish(
    lex: &[u32],
    rank_count: u32,
    inner: InnerAlgorithm,
    transform: &DislexSetTransform,
) -> Vec<SeqPos> {
    let now = Instant::now();
    let sa = sufsort::suffix_array(lex, rank_count as usize + 1, inner);
    debug!("Sorted the lex text with {inner} in {:?}", now.elapsed());

    // The sentinel suffix comes first.
    sa[1..]
        .iter()
        .map(|&y| transform.reverse(y as usize))
        .collect()
}
