// Copyright 2023 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

//! Suffix array construction for integer alphabets.
//!
//! The texts handled here are strings of `u32` symbols terminated by a single `0` sentinel, such as
//! the rank strings produced when a larger problem has been reduced to one of ordinary suffix
//! sorting. Two algorithms are provided, selected through [`InnerAlgorithm`].
//!
//! # Examples
//!
//! ```
//! use sufsort::InnerAlgorithm;
//!
//! // "banana" over the ranks a=1, b=2, n=3, followed by the sentinel
//! let text = [2, 1, 3, 1, 3, 1, 0];
//! let sa = sufsort::suffix_array(&text, 4, InnerAlgorithm::SacaK);
//!
//! assert_eq!(sa, [6, 5, 3, 1, 0, 4, 2]);
//! ```

mod doubling;
mod sacak;
mod suffix_array;

pub use suffix_array::{InnerAlgorithm, MAX_LEN, UnknownAlgorithm, suffix_array};
