//! Error types for OxiPDF filter operations.
//!
//! Every filter failure is one of these variants. `UnsupportedOperation` is the
//! only non-fatal one: it tells the caller a filter or direction is not
//! implemented, as opposed to the stream being corrupt.

use crate::traits::Direction;
use std::io;
use thiserror::Error;

/// The main error type for filter operations.
#[derive(Debug, Error)]
pub enum FilterError {
    /// I/O error from the output sink.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    /// The filter does not implement the requested direction, or the filter
    /// name is unknown.
    #[error("{filter} does not support {direction}")]
    UnsupportedOperation {
        /// Name of the filter as requested.
        filter: String,
        /// Requested direction.
        direction: Direction,
    },

    /// Malformed encoded data.
    #[error("Value out of range in {filter} at offset {offset}: {message}")]
    ValueOutOfRange {
        /// Name of the filter that rejected the input.
        filter: &'static str,
        /// Byte offset into the filter input where the problem was found.
        offset: u64,
        /// Description of the problem.
        message: String,
    },

    /// Unknown `/Predictor` value or PNG row tag.
    #[error("Invalid predictor: {0}")]
    InvalidPredictor(i64),

    /// The deflate engine rejected the compressed data.
    #[error("Flate decoding error: {message}")]
    FlateDecoding {
        /// Message reported by the engine.
        message: String,
    },

    /// The deflate engine failed while compressing.
    #[error("Flate encoding error: {message}")]
    FlateEncoding {
        /// Message reported by the engine.
        message: String,
    },

    /// An internal buffer or table could not be allocated.
    #[error("Out of memory: could not reserve {requested} bytes")]
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
    },

    /// A lifecycle method was called out of order.
    #[error("Invalid filter state: expected {expected}, found {found}")]
    InvalidState {
        /// State the call requires.
        expected: &'static str,
        /// State the filter was in.
        found: &'static str,
    },

    /// A `/DecodeParms` entry has a value the filter cannot work with.
    #[error("Invalid decode parameter /{key}: {value}")]
    InvalidParameter {
        /// Dictionary key.
        key: String,
        /// Offending value.
        value: i64,
    },
}

/// Result type alias for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;

impl FilterError {
    /// Create an unsupported operation error.
    pub fn unsupported(filter: impl Into<String>, direction: Direction) -> Self {
        Self::UnsupportedOperation {
            filter: filter.into(),
            direction,
        }
    }

    /// Create a value out of range error.
    pub fn value_out_of_range(
        filter: &'static str,
        offset: u64,
        message: impl Into<String>,
    ) -> Self {
        Self::ValueOutOfRange {
            filter,
            offset,
            message: message.into(),
        }
    }

    /// Create a flate decoding error.
    pub fn flate_decoding(message: impl Into<String>) -> Self {
        Self::FlateDecoding {
            message: message.into(),
        }
    }

    /// Create a flate encoding error.
    pub fn flate_encoding(message: impl Into<String>) -> Self {
        Self::FlateEncoding {
            message: message.into(),
        }
    }

    /// Create an out of memory error.
    pub fn out_of_memory(requested: usize) -> Self {
        Self::OutOfMemory { requested }
    }

    /// Create an invalid state error.
    pub fn invalid_state(expected: &'static str, found: &'static str) -> Self {
        Self::InvalidState { expected, found }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(key: impl Into<String>, value: i64) -> Self {
        Self::InvalidParameter {
            key: key.into(),
            value,
        }
    }

    /// Returns `true` for "not implemented" failures, which callers report
    /// differently from corrupt data.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation { .. })
    }
}

impl From<io::Error> for FilterError {
    /// Sink errors become [`FilterError::Io`], except allocation failures
    /// raised by in-memory sinks, which keep their `OutOfMemory` identity.
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::OutOfMemory {
            let requested = err
                .get_ref()
                .and_then(|inner| inner.downcast_ref::<FilterError>())
                .and_then(|inner| match inner {
                    Self::OutOfMemory { requested } => Some(*requested),
                    _ => None,
                });
            if let Some(requested) = requested {
                return Self::out_of_memory(requested);
            }
        }
        Self::Io(err)
    }
}

/// Reserve `additional` bytes in `buf`, mapping allocation failure to
/// [`FilterError::OutOfMemory`].
pub fn try_reserve(buf: &mut Vec<u8>, additional: usize) -> Result<()> {
    buf.try_reserve(additional)
        .map_err(|_| FilterError::out_of_memory(additional))
}
