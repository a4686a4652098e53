// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

//! Gapped suffix sorting by direct comparison of suffixes.

use crate::{
    suffix::{ShapeTable, SuffixComparator, tie_break},
    text::{Layout, SeqPos},
};

/// Buckets at most this large are finished with a comparison sort.
const SMALL_BUCKET: usize = 32;
/// One bucket for suffixes that end at the current depth, then one per character.
const BUCKETS: usize = u8::MAX as usize + 2;

/// Sorts all positions of `layout` with a comparison sort over whole gapped suffixes.
///
/// The running time is quadratic in the worst case, for example for unary texts.
pub(crate) fn quick_sort(layout: &Layout, table: &ShapeTable) -> Vec<SeqPos> {
    let comparator = SuffixComparator::new(layout, table);

    let mut positions: Vec<_> = layout.positions().collect();
    positions.sort_unstable_by(|&a, &b| comparator.compare(a, b));

    positions
}

/// Sorts all positions of `layout` with an MSD radix sort over gapped characters.
pub(crate) fn radix_sort(layout: &Layout, table: &ShapeTable) -> Vec<SeqPos> {
    let comparator = SuffixComparator::new(layout, table);
    let key = |pos: SeqPos, depth: usize| {
        comparator
            .suffix(pos)
            .get(depth)
            .map_or(0, |c| usize::from(c) + 1)
    };

    let mut positions: Vec<_> = layout.positions().collect();
    let mut scratch = Vec::with_capacity(positions.len());
    let mut counts = [0; BUCKETS];
    let mut stack = vec![(0, positions.len(), 0)];

    while let Some((start, end, depth)) = stack.pop() {
        let bucket = &mut positions[start..end];
        if bucket.len() < 2 {
            continue;
        }
        if bucket.len() <= SMALL_BUCKET {
            bucket.sort_unstable_by(|&a, &b| comparator.compare_from(a, b, depth));
            continue;
        }

        counts.fill(0);
        for &pos in bucket.iter() {
            counts[key(pos, depth)] += 1;
        }

        let mut offsets = [0; BUCKETS];
        for k in 1..BUCKETS {
            offsets[k] = offsets[k - 1] + counts[k - 1];
        }
        scratch.clear();
        scratch.resize(bucket.len(), SeqPos::default());
        for &pos in bucket.iter() {
            let k = key(pos, depth);
            scratch[offsets[k]] = pos;
            offsets[k] += 1;
        }
        bucket.copy_from_slice(&scratch);

        // Suffixes ending here have equal gapped suffixes.
        bucket[..counts[0]].sort_unstable_by(|&a, &b| tie_break(a, b));

        let mut lo = start + counts[0];
        for &count in &counts[1..] {
            if count > 1 {
                stack.push((lo, lo + count, depth + 1));
            }
            lo += count;
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        shape::CyclicShape,
        text::{StringSet, Text},
    };

    fn pseudo_random_text(len: usize, alphabet: &[u8], seed: u64) -> Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                alphabet[(state >> 33) as usize % alphabet.len()]
            })
            .collect()
    }

    #[test]
    fn radix_matches_quick_sort() {
        for (shape, alphabet) in [
            ("1", "ACGT"),
            ("110", "ACGT"),
            ("1011", "ab"),
            ("0100101", "a"),
        ] {
            let shape: CyclicShape = shape.parse().unwrap();
            let table = ShapeTable::new(&shape).unwrap();

            for len in [0, 1, 2, 31, 33, 100, 500] {
                let text = pseudo_random_text(len, alphabet.as_bytes(), len as u64);
                let layout = text.layout();

                assert_eq!(
                    radix_sort(&layout, &table),
                    quick_sort(&layout, &table),
                    "shape {shape}, length {len}",
                );
            }
        }
    }

    #[test]
    fn radix_sorts_collections() {
        let set: StringSet = (0..20)
            .map(|i| pseudo_random_text(i * 7 % 23, b"xy", i as u64))
            .collect();
        let layout = set.layout();
        let table = ShapeTable::new(&"101".parse::<CyclicShape>().unwrap()).unwrap();

        assert_eq!(radix_sort(&layout, &table), quick_sort(&layout, &table));
    }

    #[test]
    fn ungapped_banana() {
        let text = b"banana";
        let layout = text.layout();
        let table = ShapeTable::new(&CyclicShape::ungapped()).unwrap();
        let offsets: Vec<_> = quick_sort(&layout, &table)
            .into_iter()
            .map(|pos| pos.offset)
            .collect();

        assert_eq!(offsets, [5, 3, 1, 0, 4, 2]);
    }
}
