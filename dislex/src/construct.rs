// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    path::PathBuf,
    str::FromStr,
    time::Instant,
};

use log::info;
use sufsort::InnerAlgorithm;

use crate::{
    error::ConstructError,
    pipeline::{self, SpillPool},
    shape::Shape,
    sort,
    suffix::ShapeTable,
    text::Text,
};

/// The largest number of characters a text may have.
///
/// The lex text, sentinel included, must fit the inner suffix sorter.
pub const MAX_TEXT_LEN: usize = sufsort::MAX_LEN - 1;

/// The largest number of sequences a collection may have.
pub const MAX_SEQUENCES: usize = u32::MAX as usize;

/// A strategy for sorting gapped suffixes
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Algorithm {
    /// Sorts all positions with a comparison sort over whole gapped suffixes
    ///
    /// Takes quadratic time on repetitive texts.
    QuickSort,
    /// Sorts all positions with an MSD radix sort over gapped characters
    RadixSort,
    /// Names one-period tuples and suffix sorts the DisLex-transformed names in memory
    #[default]
    Dislex,
    /// Like [`Dislex`](Algorithm::Dislex), but spills tuples and names to temporary files
    DislexExternal,
}

impl Algorithm {
    /// All available algorithms
    pub const ALL: [Algorithm; 4] = [
        Algorithm::QuickSort,
        Algorithm::RadixSort,
        Algorithm::Dislex,
        Algorithm::DislexExternal,
    ];

    /// Returns the name used to select this algorithm from text, e.g. on a command line.
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::QuickSort => "quick-sort",
            Algorithm::RadixSort => "radix-sort",
            Algorithm::Dislex => "dislex",
            Algorithm::DislexExternal => "dislex-external",
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An error returned when parsing an unknown [`Algorithm`] name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseAlgorithmError(String);

impl Display for ParseAlgorithmError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "unknown construction algorithm '{}'", self.0)
    }
}

impl Error for ParseAlgorithmError {}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| ParseAlgorithmError(s.to_owned()))
    }
}

/// Configuration for a construction.
///
/// This struct can be used to pick the sorting strategy and to bound the memory used by
/// [`Algorithm::DislexExternal`]. The defaults should work well for texts that fit in memory.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ConstructConfig {
    algorithm: Algorithm,
    inner: InnerAlgorithm,
    run_capacity: usize,
    spill_compression: i32,
    temp_dir: Option<PathBuf>,
}

impl ConstructConfig {
    /// Creates a new configuration for constructions
    ///
    /// This configuration can be reused across constructions.
    pub const fn new() -> Self {
        Self {
            algorithm: Algorithm::Dislex,
            inner: InnerAlgorithm::SacaK,
            run_capacity: Self::DEFAULT_RUN_CAPACITY,
            spill_compression: Self::DEFAULT_SPILL_COMPRESSION,
            temp_dir: None,
        }
    }

    /// Sets the strategy used to sort gapped suffixes.
    pub fn algorithm(&mut self, algorithm: Algorithm) -> &mut Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the algorithm that suffix sorts the lex text in the DisLex strategies.
    pub fn inner_algorithm(&mut self, inner: InnerAlgorithm) -> &mut Self {
        self.inner = inner;
        self
    }

    /// Sets how many records [`Algorithm::DislexExternal`] buffers before spilling a sorted run.
    ///
    /// Values below 1 are raised to 1.
    pub fn run_capacity(&mut self, records: usize) -> &mut Self {
        self.run_capacity = records.max(1);
        self
    }

    /// Sets the zstd level used to compress spilled runs.
    ///
    /// A level of 0 writes runs uncompressed.
    pub fn spill_compression(&mut self, level: i32) -> &mut Self {
        self.spill_compression = level;
        self
    }

    /// Sets the directory spilled runs are created in.
    ///
    /// By default, runs are created in the system's temporary directory.
    pub fn temp_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// The default number of records per spilled run
    pub const DEFAULT_RUN_CAPACITY: usize = 1 << 22;

    /// The default compression level of spilled runs
    pub const DEFAULT_SPILL_COMPRESSION: i32 = 0;
}

impl Default for ConstructConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Constructs the gapped suffix array of `text` under `shape`.
///
/// Positions are sorted by the characters `shape` selects from their suffixes, a proper prefix
/// sorting first. Positions with equal gapped suffixes sort by descending sequence index and then
/// by descending offset.
///
/// # Errors
///
/// Returns an error if `shape` has zero span or no care offset, if `text` is too large for 32-bit
/// positions or if constructing fails internally.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), dislex::ConstructError> {
/// use dislex::CyclicShape;
///
/// let shape: CyclicShape = "10".parse().unwrap();
/// let sa = dislex::construct(b"babab", &shape)?;
///
/// // "a", "aa", "b", "bb" and "bbb"
/// assert_eq!(sa, [3, 1, 4, 2, 0]);
/// # Ok(())
/// # }
/// ```
pub fn construct<T, S>(text: &T, shape: &S) -> Result<Vec<T::Position>, ConstructError>
where
    T: Text + ?Sized,
    S: Shape + ?Sized,
{
    construct_with_config(text, shape, &ConstructConfig::default())
}

/// Constructs the gapped suffix array of `text` under `shape`
///
/// This function is identical to [`construct()`], but it allows specifying a custom configuration
/// for fine-tuning.
///
/// # Errors
///
/// Returns an error if `shape` has zero span or no care offset, if `text` is too large for 32-bit
/// positions or if an I/O error occurs while spilling.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), dislex::ConstructError> {
/// use dislex::{Algorithm, ConstructConfig, CyclicShape, SeqPos, StringSet};
///
/// let set: StringSet = ["ab", "ab"].into_iter().collect();
/// let shape = CyclicShape::ungapped();
/// let mut config = ConstructConfig::new();
/// config.algorithm(Algorithm::DislexExternal).run_capacity(2);
///
/// let sa = dislex::construct_with_config(&set, &shape, &config)?;
///
/// assert_eq!(
///     sa,
///     [SeqPos::new(1, 0), SeqPos::new(0, 0), SeqPos::new(1, 1), SeqPos::new(0, 1)],
/// );
/// # Ok(())
/// # }
/// ```
pub fn construct_with_config<T, S>(
    text: &T,
    shape: &S,
    config: &ConstructConfig,
) -> Result<Vec<T::Position>, ConstructError>
where
    T: Text + ?Sized,
    S: Shape + ?Sized,
{
    let table = ShapeTable::new(shape)?;
    let layout = text.layout();
    check_size(layout.len(), layout.sequence_count())?;

    if layout.is_empty() {
        return Ok(Vec::new());
    }

    let now = Instant::now();
    let positions = match config.algorithm {
        Algorithm::QuickSort => sort::quick_sort(&layout, &table),
        Algorithm::RadixSort => sort::radix_sort(&layout, &table),
        Algorithm::Dislex => pipeline::dislex(&layout, &table, config.inner)?,
        Algorithm::DislexExternal => {
            let pool = SpillPool {
                compression_level: config.spill_compression,
                temp_dir: config.temp_dir.clone(),
            };
            pipeline::dislex_external(&layout, &table, config.inner, &pool, config.run_capacity)?
        }
    };
    info!(
        "Constructed gapped suffix array of {} positions with {} in {:?}",
        positions.len(),
        config.algorithm,
        now.elapsed(),
    );

    if positions.len() != layout.len() {
        return Err(ConstructError::InvariantViolation(
            "suffix array length differs from text length",
        ));
    }

    Ok(positions.into_iter().map(T::position).collect())
}

fn check_size(len: usize, sequences: usize) -> Result<(), ConstructError> {
    if len > MAX_TEXT_LEN {
        return Err(ConstructError::TextTooLong {
            len,
            max: MAX_TEXT_LEN,
        });
    }
    if sequences > MAX_SEQUENCES {
        return Err(ConstructError::TooManySequences {
            count: sequences,
            max: MAX_SEQUENCES,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        shape::{CyclicShape, FixedShape},
        text::Layout,
    };

    #[test]
    fn algorithm_names() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse(), Ok(algorithm));
        }
        assert!("merge-sort".parse::<Algorithm>().is_err());
    }

    #[test]
    fn run_capacity_is_clamped() {
        let mut config = ConstructConfig::new();
        config.run_capacity(0);

        assert_eq!(config.run_capacity, 1);
    }

    #[test]
    fn invalid_shape_comes_first() {
        struct Blank;
        impl Shape for Blank {
            fn span(&self) -> usize {
                4
            }

            fn is_care(&self, _: usize) -> bool {
                false
            }
        }

        for algorithm in Algorithm::ALL {
            let mut config = ConstructConfig::new();
            config.algorithm(algorithm);

            let result = construct_with_config(b"", &Blank, &config);
            assert!(matches!(result, Err(ConstructError::InvalidShape(_))));
        }
    }

    #[test]
    fn empty_text() {
        let shape = FixedShape::new(3, 0b011).unwrap();

        for algorithm in Algorithm::ALL {
            let mut config = ConstructConfig::new();
            config.algorithm(algorithm);

            assert_eq!(construct_with_config(b"", &shape, &config).unwrap(), []);
        }
    }

    #[test]
    fn size_limits() {
        let layout = Layout::single(b"abc");
        assert!(check_size(layout.len(), layout.sequence_count()).is_ok());
        assert!(check_size(MAX_TEXT_LEN, 1).is_ok());
        assert!(check_size(0, MAX_SEQUENCES).is_ok());

        assert_eq!(MAX_TEXT_LEN, 2_147_483_646);
        assert_eq!(MAX_SEQUENCES, 4_294_967_295);
    }

    #[test]
    fn lex_text_must_fit_the_inner_sorter() {
        // Positions from 2^31 on collide with the empty marker of SACA-K.
        assert!(matches!(
            check_size(MAX_TEXT_LEN + 1, 1),
            Err(ConstructError::TextTooLong { len: 2_147_483_647, max: MAX_TEXT_LEN })
        ));
        assert!(matches!(
            check_size(1 << 31, 1),
            Err(ConstructError::TextTooLong { .. })
        ));
        assert!(matches!(
            check_size(1, MAX_SEQUENCES + 1),
            Err(ConstructError::TooManySequences { .. })
        ));
    }

    #[test]
    fn strategies_agree() {
        let text = b"abracadabra, abracadabra";
        let shape: CyclicShape = "1101".parse().unwrap();
        let expected = construct(text, &shape).unwrap();

        for algorithm in Algorithm::ALL {
            let mut config = ConstructConfig::new();
            config.algorithm(algorithm).run_capacity(5);

            assert_eq!(construct_with_config(text, &shape, &config).unwrap(), expected);
        }
    }
}
