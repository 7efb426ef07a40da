//! # OxiPDF-LZW: Pure Rust LZWDecode
//!
//! This crate provides the `/LZWDecode` stream filter for PDF.
//!
//! ## Features
//!
//! - **Pure Rust**: No C dependencies, 100% safe Rust
//! - **Streaming**: codes may be split across any block boundary
//! - **EarlyChange**: both `/EarlyChange 1` (default) and `0`
//! - **Predictors**: PNG and TIFF predictors from `/DecodeParms`
//!
//! ## PDF LZW
//!
//! - **MSB-first bit order**: Bits are packed from most significant to least
//! - **9-12 bit codes**: Variable-length codes starting at 9 bits
//! - **Early code change**: width grows at table sizes 511, 1023 and 2047
//! - **Clear codes**: code 256 resets the table and the width to 9 bits
//! - **EOD termination**: code 257 ends the stream; trailing bytes are ignored
//!
//! ```text
//! code:  0 ..= 255 | 256   | 257 | 258 ..= 4095
//!        literals  | CLEAR | EOD | table strings
//! ```
//!
//! Encoding is not provided; every encode call fails with
//! `UnsupportedOperation`.
//!
//! ## Example
//!
//! ```rust
//! use oxipdf_lzw::decompress;
//!
//! // CLEAR, 'H', 'i', EOD as 9-bit codes.
//! let data = [0x80, 0x12, 0x0D, 0x30, 0x10];
//! assert_eq!(decompress(&data, None).unwrap(), b"Hi");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod bitstream_msb;
mod config;
mod decoder;
mod dictionary;
mod filter;

pub use bitstream_msb::CODE_MASKS;
pub use config::LzwConfig;
pub use decoder::LzwDecoder;
pub use filter::LzwFilter;

use oxipdf_core::error::Result;
use oxipdf_core::params::DecodeParms;
use oxipdf_core::traits::StreamFilter;

/// Decode a complete LZW stream.
///
/// # Parameters
///
/// - `data`: LZW-compressed input
/// - `parms`: the stream's `/DecodeParms` (`/EarlyChange`, predictor keys)
pub fn decompress(data: &[u8], parms: Option<&DecodeParms>) -> Result<Vec<u8>> {
    LzwFilter::new().decode(data, parms)
}
