//! Core traits for stream filters.
//!
//! Every filter follows the same session lifecycle per direction:
//! `begin` → zero or more blocks → `end`. Output is written to a sink borrowed
//! from the caller for each call, so a filter never owns its destination.

use crate::error::{FilterError, Result};
use crate::params::DecodeParms;
use std::fmt;
use std::io::Write;

/// Direction of a filter session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Produce encoded stream data from plain bytes.
    Encode,
    /// Recover plain bytes from encoded stream data.
    Decode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encode => write!(f, "encoding"),
            Direction::Decode => write!(f, "decoding"),
        }
    }
}

/// A stateful, chunk-tolerant PDF stream filter.
///
/// Blocks may split multi-byte units (hex pairs, 85-tuples, LZW codes, escape
/// sequences) at any position. Completed output is written to the sink as soon
/// as it is known.
///
/// Decode-only filters return [`FilterError::UnsupportedOperation`] from all
/// three encode methods; use [`StreamFilter::supports`] to probe first.
pub trait StreamFilter {
    /// Filter name, as it would appear in a `/Filter` entry.
    fn name(&self) -> &str;

    /// Whether the filter implements `direction`.
    fn supports(&self, direction: Direction) -> bool;

    /// Start an encode session, resetting all state.
    fn begin_encode(&mut self) -> Result<()>;

    /// Encode one block of input.
    fn encode_block(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()>;

    /// Flush pending output and finish the encode session.
    fn end_encode(&mut self, sink: &mut dyn Write) -> Result<()>;

    /// Start a decode session, resetting all state.
    ///
    /// # Arguments
    ///
    /// * `parms` - The stream's `/DecodeParms` entry for this filter, if any
    fn begin_decode(&mut self, parms: Option<&DecodeParms>) -> Result<()>;

    /// Decode one block of input.
    fn decode_block(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()>;

    /// Flush pending output and finish the decode session.
    fn end_decode(&mut self, sink: &mut dyn Write) -> Result<()>;

    /// Drop any session state after a failure.
    fn abort(&mut self) {}

    /// Encode all data at once (convenience method).
    fn encode(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let result = self
            .begin_encode()
            .and_then(|()| self.encode_block(input, &mut output))
            .and_then(|()| self.end_encode(&mut output));

        match result {
            Ok(()) => Ok(output),
            Err(e) => {
                self.abort();
                Err(e)
            }
        }
    }

    /// Decode all data at once (convenience method).
    fn decode(&mut self, input: &[u8], parms: Option<&DecodeParms>) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let result = self
            .begin_decode(parms)
            .and_then(|()| self.decode_block(input, &mut output))
            .and_then(|()| self.end_decode(&mut output));

        match result {
            Ok(()) => Ok(output),
            Err(e) => {
                self.abort();
                Err(e)
            }
        }
    }
}

impl<F: StreamFilter + ?Sized> StreamFilter for Box<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn supports(&self, direction: Direction) -> bool {
        (**self).supports(direction)
    }

    fn begin_encode(&mut self) -> Result<()> {
        (**self).begin_encode()
    }

    fn encode_block(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()> {
        (**self).encode_block(input, sink)
    }

    fn end_encode(&mut self, sink: &mut dyn Write) -> Result<()> {
        (**self).end_encode(sink)
    }

    fn begin_decode(&mut self, parms: Option<&DecodeParms>) -> Result<()> {
        (**self).begin_decode(parms)
    }

    fn decode_block(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()> {
        (**self).decode_block(input, sink)
    }

    fn end_decode(&mut self, sink: &mut dyn Write) -> Result<()> {
        (**self).end_decode(sink)
    }

    fn abort(&mut self) {
        (**self).abort()
    }
}

/// Return the error a decode-only filter reports for every encode call.
pub fn encode_unsupported(name: &str) -> FilterError {
    FilterError::unsupported(name, Direction::Encode)
}

/// Compression level for filters that support it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// No compression (store only).
    pub const NONE: Self = Self(0);
    /// Fastest compression.
    pub const FAST: Self = Self(1);
    /// Default compression (balanced).
    pub const DEFAULT: Self = Self(6);
    /// Best compression (slowest).
    pub const BEST: Self = Self(9);

    /// Create a custom compression level (0-9).
    pub fn new(level: u8) -> Self {
        Self(level.min(9))
    }

    /// Get the level value.
    pub fn level(&self) -> u8 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u8> for CompressionLevel {
    fn from(level: u8) -> Self {
        Self::new(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal decode-only filter used to exercise the provided methods.
    struct Upper {
        seen: usize,
    }

    impl StreamFilter for Upper {
        fn name(&self) -> &str {
            "Upper"
        }

        fn supports(&self, direction: Direction) -> bool {
            direction == Direction::Decode
        }

        fn begin_encode(&mut self) -> Result<()> {
            Err(encode_unsupported(self.name()))
        }

        fn encode_block(&mut self, _input: &[u8], _sink: &mut dyn Write) -> Result<()> {
            Err(encode_unsupported(self.name()))
        }

        fn end_encode(&mut self, _sink: &mut dyn Write) -> Result<()> {
            Err(encode_unsupported(self.name()))
        }

        fn begin_decode(&mut self, _parms: Option<&DecodeParms>) -> Result<()> {
            self.seen = 0;
            Ok(())
        }

        fn decode_block(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()> {
            self.seen += input.len();
            sink.write_all(&input.to_ascii_uppercase())?;
            Ok(())
        }

        fn end_decode(&mut self, _sink: &mut dyn Write) -> Result<()> {
            Ok(())
        }

        fn abort(&mut self) {
            self.seen = usize::MAX;
        }
    }

    #[test]
    fn test_provided_decode() {
        let mut filter = Upper { seen: 0 };
        assert_eq!(filter.decode(b"pdf", None).unwrap(), b"PDF");
        assert_eq!(filter.seen, 3);
    }

    #[test]
    fn test_provided_encode_aborts_on_failure() {
        let mut filter = Upper { seen: 0 };
        let err = filter.encode(b"pdf").unwrap_err();
        assert!(err.is_unsupported());
        assert_eq!(filter.seen, usize::MAX);
    }

    #[test]
    fn test_boxed_filter() {
        let mut filter: Box<dyn StreamFilter> = Box::new(Upper { seen: 0 });
        assert!(filter.supports(Direction::Decode));
        assert!(!filter.supports(Direction::Encode));
        assert_eq!(filter.decode(b"ab", None).unwrap(), b"AB");
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Encode.to_string(), "encoding");
        assert_eq!(Direction::Decode.to_string(), "decoding");
    }

    #[test]
    fn test_compression_level() {
        assert_eq!(CompressionLevel::NONE.level(), 0);
        assert_eq!(CompressionLevel::FAST.level(), 1);
        assert_eq!(CompressionLevel::DEFAULT.level(), 6);
        assert_eq!(CompressionLevel::BEST.level(), 9);

        // Test clamping
        assert_eq!(CompressionLevel::new(100).level(), 9);
    }
}
