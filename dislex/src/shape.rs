// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// A periodic pattern of significant ("care") and ignored ("gap") offsets.
///
/// A shape of span `S` is applied to a suffix by repeating it every `S` characters, so the gapped
/// suffix starting at `p` consists of the characters at `p + k * S + c` for every period `k` and
/// every care offset `c`, read in increasing order and cut off at the end of the text.
///
/// Implementors must report a care set that is not empty and lies entirely inside `[0, span)`.
pub trait Shape {
    /// Returns the period length of the shape.
    fn span(&self) -> usize;

    /// Returns whether `offset` (which must be smaller than [`span()`](Shape::span)) is a care
    /// offset.
    fn is_care(&self, offset: usize) -> bool;

    /// Returns the number of care offsets per period.
    fn weight(&self) -> usize {
        (0..self.span()).filter(|&i| self.is_care(i)).count()
    }

    /// Returns the care offsets in ascending order.
    fn care_positions(&self) -> Vec<usize> {
        (0..self.span()).filter(|&i| self.is_care(i)).collect()
    }

    /// Returns the number of real characters of a gapped suffix for every remaining length below
    /// `2 * span`.
    ///
    /// Entry `l` is the number of care offsets a suffix with `l` characters left in its sequence
    /// can still read within its first two periods. Suffixes with at least `2 * span` characters
    /// left always read `2 * weight` characters.
    fn suffix_lengths(&self) -> Vec<usize> {
        let span = self.span();
        let weight = self.weight();

        let mut lengths = Vec::with_capacity(2 * span);
        let mut count = 0;
        for l in 0..span {
            lengths.push(count);
            if self.is_care(l) {
                count += 1;
            }
        }
        for l in 0..span {
            lengths.push(weight + lengths[l]);
        }

        lengths
    }

    /// Returns the length of the gapped suffix of a suffix with `remaining` characters.
    fn gapped_len(&self, remaining: usize) -> usize {
        let span = self.span();
        let tail = (0..remaining % span).filter(|&i| self.is_care(i)).count();

        remaining / span * self.weight() + tail
    }
}

/// An error indicating that a cyclic shape is degenerate or cannot be parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ShapeError {
    /// The shape has no offsets at all
    ZeroSpan,
    /// The shape has no care offsets
    ZeroWeight,
    /// A shape string contains something other than `'0'` and `'1'`
    InvalidSymbol {
        /// The offending character
        symbol: char,
        /// Its offset in the shape string
        offset: usize,
    },
    /// The span does not fit an inline shape
    SpanTooLarge {
        /// The requested span
        span: usize,
        /// The largest span supported
        max: usize,
    },
    /// A care offset was given at or beyond the span
    CareOutsideSpan {
        /// The offending offset
        offset: usize,
        /// The span of the shape
        span: usize,
    },
}

impl Display for ShapeError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ShapeError::ZeroSpan => write!(f, "shape has a span of zero"),
            ShapeError::ZeroWeight => write!(f, "shape has no care positions"),
            ShapeError::InvalidSymbol { symbol, offset } => {
                write!(f, "invalid shape symbol {symbol:?} at offset {offset}, expected '0' or '1'")
            }
            ShapeError::SpanTooLarge { span, max } => {
                write!(f, "span {span} exceeds the maximum of {max} for fixed shapes")
            }
            ShapeError::CareOutsideSpan { offset, span } => {
                write!(f, "care offset {offset} lies outside of span {span}")
            }
        }
    }
}

impl Error for ShapeError {}

/// A shape whose mask is stored inline as a bit set.
///
/// Bit `i` of the mask is set iff offset `i` is a care offset.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FixedShape {
    bits: u64,
    span: u8,
}

impl FixedShape {
    /// The largest span a fixed shape can hold
    pub const MAX_SPAN: usize = u64::BITS as usize;

    /// Creates a fixed shape of `span` offsets whose care offsets are the set bits of `bits`.
    ///
    /// # Errors
    ///
    /// Returns an error if the span is zero or larger than [`MAX_SPAN`](Self::MAX_SPAN), if no
    /// bit is set or if a bit at or beyond `span` is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use dislex::{FixedShape, Shape};
    ///
    /// // "110"
    /// let shape = FixedShape::new(3, 0b011)?;
    /// assert_eq!(shape.care_positions(), [0, 1]);
    /// # Ok::<(), dislex::ShapeError>(())
    /// ```
    pub fn new(span: usize, bits: u64) -> Result<Self, ShapeError> {
        if span == 0 {
            return Err(ShapeError::ZeroSpan);
        }
        if span > Self::MAX_SPAN {
            return Err(ShapeError::SpanTooLarge {
                span,
                max: Self::MAX_SPAN,
            });
        }
        if span < Self::MAX_SPAN && bits >> span != 0 {
            return Err(ShapeError::CareOutsideSpan {
                offset: (u64::BITS - 1 - bits.leading_zeros()) as usize,
                span,
            });
        }
        if bits == 0 {
            return Err(ShapeError::ZeroWeight);
        }

        Ok(Self {
            bits,
            span: span as u8,
        })
    }

    /// Returns the raw care mask.
    pub const fn bits(&self) -> u64 {
        self.bits
    }
}

impl Shape for FixedShape {
    fn span(&self) -> usize {
        self.span as usize
    }

    fn is_care(&self, offset: usize) -> bool {
        offset < self.span() && (self.bits >> offset) & 1 == 1
    }

    fn weight(&self) -> usize {
        self.bits.count_ones() as usize
    }
}

/// A shape of arbitrary span backed by a heap-allocated bit vector.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DynamicShape {
    words: Vec<u64>,
    span: usize,
    weight: usize,
}

impl DynamicShape {
    /// Creates a dynamic shape with the given care mask.
    ///
    /// # Errors
    ///
    /// Returns an error if `mask` is empty or contains no care offset.
    pub fn from_mask(mask: &[bool]) -> Result<Self, ShapeError> {
        if mask.is_empty() {
            return Err(ShapeError::ZeroSpan);
        }

        let mut words = vec![0u64; mask.len().div_ceil(64)];
        for (i, _) in mask.iter().enumerate().filter(|(_, care)| **care) {
            words[i / 64] |= 1 << (i % 64);
        }

        let weight = words.iter().map(|w| w.count_ones() as usize).sum();
        if weight == 0 {
            return Err(ShapeError::ZeroWeight);
        }

        Ok(Self {
            words,
            span: mask.len(),
            weight,
        })
    }

    /// Creates a dynamic shape of `span` offsets with care offsets at `care`.
    ///
    /// # Errors
    ///
    /// Returns an error if the span is zero, if `care` is empty or if an offset in `care` is not
    /// smaller than `span`.
    pub fn from_care_positions(span: usize, care: &[usize]) -> Result<Self, ShapeError> {
        let mut mask = vec![false; span];
        for &offset in care {
            *mask
                .get_mut(offset)
                .ok_or(ShapeError::CareOutsideSpan { offset, span })? = true;
        }

        Self::from_mask(&mask)
    }
}

impl Shape for DynamicShape {
    fn span(&self) -> usize {
        self.span
    }

    fn is_care(&self, offset: usize) -> bool {
        offset < self.span && (self.words[offset / 64] >> (offset % 64)) & 1 == 1
    }

    fn weight(&self) -> usize {
        self.weight
    }
}

/// A cyclic shape, stored inline when its span allows it.
///
/// The textual form has one character per offset, `'1'` for a care offset and `'0'` for a gap,
/// and parsing and formatting round-trip exactly. Two shapes are equal iff they have the same care
/// mask, regardless of their representation.
///
/// # Examples
///
/// ```
/// use dislex::{CyclicShape, Shape};
///
/// let shape: CyclicShape = "1101".parse()?;
///
/// assert_eq!(shape.span(), 4);
/// assert_eq!(shape.weight(), 3);
/// assert_eq!(shape.care_positions(), [0, 1, 3]);
/// assert_eq!(shape.to_string(), "1101");
/// # Ok::<(), dislex::ShapeError>(())
/// ```
#[derive(Clone, Debug)]
pub enum CyclicShape {
    /// A shape of span at most [`FixedShape::MAX_SPAN`]
    Fixed(FixedShape),
    /// A shape of any span
    Dynamic(DynamicShape),
}

impl CyclicShape {
    /// Creates a shape from a care mask, choosing the inline representation when possible.
    ///
    /// # Errors
    ///
    /// Returns an error if `mask` is empty or contains no care offset.
    pub fn from_mask(mask: &[bool]) -> Result<Self, ShapeError> {
        if mask.len() <= FixedShape::MAX_SPAN {
            let bits = mask
                .iter()
                .enumerate()
                .filter(|(_, care)| **care)
                .fold(0u64, |bits, (i, _)| bits | 1 << i);
            FixedShape::new(mask.len(), bits).map(CyclicShape::Fixed)
        } else {
            DynamicShape::from_mask(mask).map(CyclicShape::Dynamic)
        }
    }

    /// Creates the ungapped shape of span 1, under which gapped suffixes are ordinary suffixes.
    pub fn ungapped() -> Self {
        CyclicShape::Fixed(FixedShape { bits: 1, span: 1 })
    }

    fn as_shape(&self) -> &dyn Shape {
        match self {
            CyclicShape::Fixed(shape) => shape,
            CyclicShape::Dynamic(shape) => shape,
        }
    }
}

impl Shape for CyclicShape {
    fn span(&self) -> usize {
        self.as_shape().span()
    }

    fn is_care(&self, offset: usize) -> bool {
        self.as_shape().is_care(offset)
    }

    fn weight(&self) -> usize {
        self.as_shape().weight()
    }
}

impl PartialEq for CyclicShape {
    fn eq(&self, other: &Self) -> bool {
        self.span() == other.span() && (0..self.span()).all(|i| self.is_care(i) == other.is_care(i))
    }
}

impl Eq for CyclicShape {}

impl From<FixedShape> for CyclicShape {
    fn from(value: FixedShape) -> Self {
        CyclicShape::Fixed(value)
    }
}

impl From<DynamicShape> for CyclicShape {
    fn from(value: DynamicShape) -> Self {
        CyclicShape::Dynamic(value)
    }
}

impl FromStr for CyclicShape {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mask = s
            .chars()
            .enumerate()
            .map(|(offset, symbol)| match symbol {
                '1' => Ok(true),
                '0' => Ok(false),
                _ => Err(ShapeError::InvalidSymbol { symbol, offset }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        CyclicShape::from_mask(&mask)
    }
}

fn write_mask(shape: &dyn Shape, f: &mut Formatter) -> fmt::Result {
    for i in 0..shape.span() {
        f.write_str(if shape.is_care(i) { "1" } else { "0" })?;
    }
    Ok(())
}

impl Display for CyclicShape {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write_mask(self, f)
    }
}

impl Display for FixedShape {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write_mask(self, f)
    }
}

impl Display for DynamicShape {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write_mask(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_110() {
        let shape: CyclicShape = "110".parse().unwrap();

        assert!(matches!(shape, CyclicShape::Fixed(_)));
        assert_eq!(shape.span(), 3);
        assert_eq!(shape.weight(), 2);
        assert_eq!(shape.care_positions(), [0, 1]);
    }

    #[test]
    fn codec_round_trip() {
        for s in ["1", "10", "01", "110", "1101", "0011", "10001", "111100", "1001010"] {
            let shape: CyclicShape = s.parse().unwrap();
            assert_eq!(shape.to_string(), s);
            assert_eq!(shape.to_string().parse::<CyclicShape>().unwrap(), shape);
        }
    }

    #[test]
    fn long_shapes_are_dynamic() {
        let s = "10".repeat(40);
        let shape: CyclicShape = s.parse().unwrap();

        assert!(matches!(shape, CyclicShape::Dynamic(_)));
        assert_eq!(shape.span(), 80);
        assert_eq!(shape.weight(), 40);
        assert_eq!(shape.to_string(), s);
    }

    #[test]
    fn equality_ignores_representation() {
        let fixed: CyclicShape = "1101".parse().unwrap();
        let dynamic = CyclicShape::Dynamic(DynamicShape::from_care_positions(4, &[0, 1, 3]).unwrap());

        assert_eq!(fixed, dynamic);
        assert_ne!(fixed, "1100".parse::<CyclicShape>().unwrap());
        assert_ne!(fixed, "11010".parse::<CyclicShape>().unwrap());
    }

    #[test]
    fn full_width_fixed_shape() {
        let shape = FixedShape::new(64, u64::MAX).unwrap();

        assert_eq!(shape.weight(), 64);
        assert!(shape.is_care(63));
        assert!(!shape.is_care(64));
    }

    #[test]
    fn degenerate_shapes() {
        assert_eq!("".parse::<CyclicShape>(), Err(ShapeError::ZeroSpan));
        assert_eq!("000".parse::<CyclicShape>(), Err(ShapeError::ZeroWeight));
        assert_eq!(
            "1x0".parse::<CyclicShape>(),
            Err(ShapeError::InvalidSymbol {
                symbol: 'x',
                offset: 1
            }),
        );
        assert_eq!(FixedShape::new(0, 1), Err(ShapeError::ZeroSpan));
        assert_eq!(FixedShape::new(3, 0), Err(ShapeError::ZeroWeight));
        assert_eq!(
            FixedShape::new(3, 0b1001),
            Err(ShapeError::CareOutsideSpan { offset: 3, span: 3 }),
        );
        assert_eq!(
            FixedShape::new(65, 1),
            Err(ShapeError::SpanTooLarge { span: 65, max: 64 }),
        );
        assert_eq!(DynamicShape::from_mask(&[false; 100]), Err(ShapeError::ZeroWeight));
        assert_eq!(
            DynamicShape::from_care_positions(2, &[2]),
            Err(ShapeError::CareOutsideSpan { offset: 2, span: 2 }),
        );
    }

    #[test]
    fn suffix_lengths_table() {
        let shape: CyclicShape = "1101".parse().unwrap();

        assert_eq!(shape.suffix_lengths(), [0, 1, 2, 2, 3, 4, 5, 5]);
    }

    #[test]
    fn gapped_len_matches_table() {
        let shape: CyclicShape = "01101".parse().unwrap();
        let table = shape.suffix_lengths();

        for l in 0..2 * shape.span() {
            assert_eq!(shape.gapped_len(l), table[l], "remaining length {l}");
        }
        assert_eq!(shape.gapped_len(13), 2 * 3 + 2);
    }
}
