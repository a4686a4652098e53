// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

//! Gapped suffix arrays over cyclic shapes.
//!
//! A cyclic shape such as `"1101"` marks which offsets of every period are significant. The gapped
//! suffix starting at a position reads only those offsets, period after period, and a gapped
//! suffix array lists all positions of a text ordered by their gapped suffixes. This crate builds
//! such arrays for single strings and for collections of sequences.
//!
//! The default strategy names the first period of every position, reorders the names with the
//! DisLex transform so that names one period apart become neighbors, and hands the result to an
//! ordinary suffix sorter from [`sufsort`]. An external variant of the same strategy spills its
//! intermediate data to temporary files.
//!
//! # Examples
//!
//! Sorting a single string:
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use dislex::CyclicShape;
//!
//! let shape: CyclicShape = "110".parse()?;
//! let sa = dislex::construct(b"0123456789", &shape)?;
//!
//! assert!(dislex::is_permutation(b"0123456789", &sa));
//! assert!(dislex::is_sorted(b"0123456789", &shape, &sa)?);
//! # Ok(())
//! # }
//! ```
//!
//! Searching a collection with a gapped pattern:
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use dislex::{CyclicShape, GappedIndex, SeqPos, StringSet};
//!
//! let reads: StringSet = ["GATTACA", "GCTTAGA"].into_iter().collect();
//! let shape: CyclicShape = "101".parse()?;
//! let index = GappedIndex::new(&reads, &shape)?;
//!
//! // "G?T" followed by "T?C" or "T?G"
//! assert_eq!(index.count(b"GT"), 2);
//! assert_eq!(index.find(b"GTTC"), [SeqPos::new(0, 0)]);
//! # Ok(())
//! # }
//! ```

mod compare;
mod construct;
mod error;
mod index;
mod namer;
mod pipeline;
mod shape;
mod sort;
mod suffix;
mod text;
mod transform;
mod tupler;
mod verify;

pub use compare::TupleComparator;
pub use construct::{
    Algorithm, ConstructConfig, MAX_SEQUENCES, MAX_TEXT_LEN, ParseAlgorithmError, construct,
    construct_with_config,
};
pub use error::ConstructError;
pub use index::GappedIndex;
pub use namer::{Located, Named, Namer};
pub use shape::{CyclicShape, DynamicShape, FixedShape, Shape, ShapeError};
pub use suffix::{Chars, GappedSuffix};
pub use sufsort::InnerAlgorithm;
pub use text::{Layout, SeqPos, StringSet, Text};
pub use transform::{DislexSetTransform, DislexTransform};
pub use tupler::{GappedTupler, Tuple, padded_tuples};
pub use verify::{is_permutation, is_sorted};
