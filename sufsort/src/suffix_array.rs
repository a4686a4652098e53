// Copyright 2023 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::{doubling, sacak};

/// An algorithm for sorting the suffixes of a sentinel-terminated integer string.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum InnerAlgorithm {
    /// SACA-K induced sorting, *O*(*n*) time and *O*(1) workspace beyond the alphabet buckets
    #[default]
    SacaK,
    /// Prefix doubling over rank pairs, *O*(*n* log² *n*) time
    PrefixDoubling,
}

impl InnerAlgorithm {
    /// All available algorithms
    pub const ALL: [InnerAlgorithm; 2] = [InnerAlgorithm::SacaK, InnerAlgorithm::PrefixDoubling];

    /// Returns the name used to select this algorithm from text, e.g. on a command line.
    pub const fn name(self) -> &'static str {
        match self {
            InnerAlgorithm::SacaK => "saca-k",
            InnerAlgorithm::PrefixDoubling => "prefix-doubling",
        }
    }
}

impl Display for InnerAlgorithm {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An error returned when parsing an unknown [`InnerAlgorithm`] name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownAlgorithm(String);

impl Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "unknown suffix sorting algorithm '{}'", self.0)
    }
}

impl Error for UnknownAlgorithm {}

impl FromStr for InnerAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InnerAlgorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| UnknownAlgorithm(s.to_owned()))
    }
}

/// The longest text, sentinel included, that can be suffix sorted.
///
/// SACA-K marks empty suffix array slots with the top bit of a `u32`, so positions must stay below
/// `2^31`.
pub const MAX_LEN: usize = i32::MAX as usize;

/// Computes the suffix array of `text` over the alphabet `[0, alphabet_size)`.
///
/// Note that `text` MUST have a `0` appended to the end of the symbols you actually wish to sort,
/// and that the returned array therefore starts with the index of that sentinel.
///
/// # Panics
///
/// Panics if the last element of `text` is not 0, if an element is not smaller than
/// `alphabet_size` or if `text.len() > MAX_LEN`.
///
/// # Examples
///
/// ```
/// use sufsort::InnerAlgorithm;
///
/// let text = [1, 1, 1, 0];
///
/// for algorithm in InnerAlgorithm::ALL {
///     assert_eq!(sufsort::suffix_array(&text, 2, algorithm), [3, 2, 1, 0]);
/// }
/// ```
#[must_use]
pub fn suffix_array(text: &[u32], alphabet_size: usize, algorithm: InnerAlgorithm) -> Vec<u32> {
    assert!(
        text.len() <= MAX_LEN,
        "text of length {} is longer than {MAX_LEN}",
        text.len(),
    );
    assert!(
        text.iter().all(|&c| (c as usize) < alphabet_size),
        "every symbol must be smaller than the alphabet size {alphabet_size}",
    );

    match algorithm {
        InnerAlgorithm::SacaK => sacak::sacak(text, alphabet_size),
        InnerAlgorithm::PrefixDoubling => {
            if let Some(&last) = text.last() {
                assert_eq!(last, 0, "last element in `text` must be 0");
            }
            doubling::prefix_doubling(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(text: &[u32]) -> Vec<u32> {
        let mut sa: Vec<u32> = (0..text.len() as u32).collect();
        sa.sort_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));
        sa
    }

    fn make_text(len: usize, sigma: u32, seed: u32) -> Vec<u32> {
        let mut x = seed;
        let mut v: Vec<u32> = (0..len)
            .map(|_| {
                x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                1 + (x >> 16) % sigma
            })
            .collect();
        v.push(0);
        v
    }

    #[test]
    fn algorithms_match_naive() {
        for sigma in [1, 2, 4, 300] {
            for len in 0..=64 {
                let text = make_text(len, sigma, 7 * len as u32 + sigma);
                let expected = naive(&text);
                for algorithm in InnerAlgorithm::ALL {
                    assert_eq!(
                        suffix_array(&text, sigma as usize + 1, algorithm),
                        expected,
                        "{algorithm} on len={len} sigma={sigma}",
                    );
                }
            }
        }
    }

    #[test]
    fn parse_names() {
        for algorithm in InnerAlgorithm::ALL {
            assert_eq!(algorithm.name().parse(), Ok(algorithm));
        }
        assert!("skew7".parse::<InnerAlgorithm>().is_err());
    }

    #[test]
    #[should_panic]
    fn no_sentinel() {
        let _ = suffix_array(&[1, 2, 3], 4, InnerAlgorithm::SacaK);
    }

    #[test]
    #[should_panic]
    fn symbol_outside_alphabet() {
        let _ = suffix_array(&[5, 0], 4, InnerAlgorithm::PrefixDoubling);
    }
}
