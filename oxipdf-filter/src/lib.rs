//! # OxiPDF-Filter: PDF stream filter chains
//!
//! This crate ties the OxiPDF filters together: the ASCII and run-length
//! codecs live here, LZW and Flate come from their own crates, and
//! [`FilterChain`] runs them in `/Filter` order.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  FilterChain  (/Filter names + /DecodeParms list)   │
//! ├─────────────────────────────────────────────────────┤
//! │  FilterSession (begin → feed* → end, abort on drop) │
//! ├─────────────────────────────────────────────────────┤
//! │  Filter: AsciiHex │ Ascii85 │ Lzw │ Flate │         │
//! │          RunLength │ Unsupported                    │
//! ├─────────────────────────────────────────────────────┤
//! │  oxipdf-core: StreamFilter, DecodeParms, predictors │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! | Filter            | Encode | Decode |
//! |-------------------|--------|--------|
//! | `ASCIIHexDecode`  | yes    | yes    |
//! | `ASCII85Decode`   | yes    | yes    |
//! | `LZWDecode`       | no     | yes    |
//! | `FlateDecode`     | yes    | yes    |
//! | `RunLengthDecode` | no     | yes    |
//! | image codecs, `Crypt` | no | no     |
//!
//! ## Example
//!
//! ```rust
//! use oxipdf_filter::FilterChain;
//!
//! // /Filter [/ASCIIHexDecode /RunLengthDecode]
//! let mut chain = FilterChain::from_names(&["ASCIIHexDecode", "RunLengthDecode"], &[]);
//! let decoded = chain.decode(b"02 41 42 43 FE 58 80>").unwrap();
//! assert_eq!(decoded, b"ABCXXX");
//! ```
//!
//! ## Features
//!
//! - `parallel`: [`decode_streams_parallel`] decodes independent streams
//!   with rayon.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod ascii85;
pub mod chain;
pub mod error;
pub mod filter;
pub mod hex;
pub mod run_length;
pub mod session;

pub use ascii85::Ascii85Filter;
#[cfg(feature = "parallel")]
pub use chain::decode_streams_parallel;
pub use chain::{DecodeJob, FilterChain, Stage};
pub use error::ChainError;
pub use filter::{Filter, UnsupportedFilter};
pub use hex::HexFilter;
pub use run_length::RunLengthFilter;
pub use session::FilterSession;

pub use oxipdf_core::{
    CompressionLevel, DecodeParms, Direction, FilterError, FilterKind, PredictorParams,
    StreamFilter,
};
pub use oxipdf_flate::{FlateConfig, FlateFilter};
pub use oxipdf_lzw::{LzwConfig, LzwFilter};

/// Decode `data` through the filters named in a stream dictionary.
pub fn decode_stream<S: AsRef<str>>(
    filters: &[S],
    parms: &[Option<DecodeParms>],
    data: &[u8],
) -> error::Result<Vec<u8>> {
    FilterChain::from_names(filters, parms).decode(data)
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::chain::FilterChain;
    pub use crate::error::ChainError;
    pub use crate::filter::Filter;
    pub use crate::session::FilterSession;
    pub use oxipdf_core::prelude::*;
}
