// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

/// Computes the suffix array of `text` by prefix doubling.
///
/// Each round sorts the suffixes by the pair of ranks of their first `k` and following `k`
/// symbols and then re-ranks them, doubling `k` until every rank is unique. A suffix that has no
/// following block ranks below every other one, so no sentinel is required by this function.
pub(crate) fn prefix_doubling(text: &[u32]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }

    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<i64> = text.iter().map(|&c| i64::from(c)).collect();
    let mut tmp: Vec<i64> = vec![0; n];

    let key = |rank: &[i64], i: usize, k: usize| (rank[i], if i + k < n { rank[i + k] } else { -1 });

    let mut k = 1;
    loop {
        sa.sort_unstable_by_key(|&i| key(&rank, i, k));

        tmp[sa[0]] = 0;
        for w in 1..n {
            let (prev, curr) = (sa[w - 1], sa[w]);
            let step = i64::from(key(&rank, curr, k) != key(&rank, prev, k));
            tmp[curr] = tmp[prev] + step;
        }
        rank.copy_from_slice(&tmp);

        // All ranks unique
        if rank[sa[n - 1]] as usize == n - 1 || k >= n {
            break;
        }
        k <<= 1;
    }

    sa.into_iter().map(|i| i as u32).collect()
}
