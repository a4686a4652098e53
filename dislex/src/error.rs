// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    io,
};

use crate::shape::ShapeError;

/// An error occurring while constructing a gapped suffix array
#[derive(Debug)]
#[non_exhaustive]
pub enum ConstructError {
    /// The shape has zero span or no care position
    InvalidShape(ShapeError),
    /// The text has more characters than a position can address
    TextTooLong {
        /// The number of characters in the text
        len: usize,
        /// The maximum number of characters supported
        max: usize,
    },
    /// The collection has more sequences than a position can address
    TooManySequences {
        /// The number of sequences in the collection
        count: usize,
        /// The maximum number of sequences supported
        max: usize,
    },
    /// An internal consistency check failed
    InvariantViolation(&'static str),
    /// An I/O error occurred while spilling to temporary storage
    Io(io::Error),
}

impl Display for ConstructError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ConstructError::InvalidShape(e) => write!(f, "invalid shape: {e}"),
            ConstructError::TextTooLong { len, max } => {
                write!(f, "text too long: found {len} characters, maximum is {max}")
            }
            ConstructError::TooManySequences { count, max } => {
                write!(f, "too many sequences: found {count}, maximum is {max}")
            }
            ConstructError::InvariantViolation(what) => write!(f, "invariant violated: {what}"),
            ConstructError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl Error for ConstructError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConstructError::InvalidShape(e) => Some(e),
            ConstructError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for ConstructError {
    fn from(value: ShapeError) -> Self {
        ConstructError::InvalidShape(value)
    }
}

impl From<io::Error> for ConstructError {
    fn from(value: io::Error) -> Self {
        ConstructError::Io(value)
    }
}
