//! # OxiPDF-Flate: FlateDecode for PDF streams
//!
//! Streaming zlib (RFC 1950) encoding and decoding on top of flate2's
//! low-level engines.
//!
//! ```text
//!   block ──► Decompress ──► staging (16 KiB) ──► sink
//!                                   │
//!                                   └──► PredictorBuffer ──► sink   (/Predictor > 1)
//! ```
//!
//! Decoding is lenient at the end of a stream: bytes after the zlib trailer
//! are ignored, and a stream cut short keeps everything decoded so far
//! (many PDF writers truncate the Adler-32 checksum).
//!
//! ## Example
//!
//! ```rust
//! use oxipdf_flate::{compress, decompress};
//! use oxipdf_core::CompressionLevel;
//!
//! let original = b"q 1 0 0 1 72 720 cm BT /F1 12 Tf (Hello) Tj ET Q";
//! let encoded = compress(original, CompressionLevel::DEFAULT).unwrap();
//! let decoded = decompress(&encoded, None).unwrap();
//! assert_eq!(decoded, original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod filter;

pub use config::{DEFAULT_BUFFER_SIZE, FlateConfig};
pub use filter::FlateFilter;

use oxipdf_core::error::Result;
use oxipdf_core::params::DecodeParms;
use oxipdf_core::traits::{CompressionLevel, StreamFilter};

/// Compress `data` into a zlib stream.
pub fn compress(data: &[u8], level: CompressionLevel) -> Result<Vec<u8>> {
    FlateFilter::with_config(FlateConfig::new().with_level(level)).encode(data)
}

/// Decompress a zlib stream, reverting any predictor named in `parms`.
pub fn decompress(data: &[u8], parms: Option<&DecodeParms>) -> Result<Vec<u8>> {
    FlateFilter::new().decode(data, parms)
}
