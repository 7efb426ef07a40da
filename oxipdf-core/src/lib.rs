//! # OxiPDF Core
//!
//! Core components for the OxiPDF stream filter library.
//!
//! This crate provides the building blocks shared by every PDF stream filter:
//!
//! - [`traits`]: The [`StreamFilter`] begin/feed/end lifecycle
//! - [`kind`]: Filter names as they appear in a stream's `/Filter` entry
//! - [`params`]: `/DecodeParms` dictionaries (name to integer lookups)
//! - [`predictor`]: PNG and TIFF row prediction reversal
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! OxiPDF is layered the same way a PDF reader consumes stream data:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Chain                                               │
//! │     FilterChain, name lookup, per-stage DecodeParms     │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     ASCIIHex, ASCII85, RunLength, LZW, Flate            │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Core (this crate)                                   │
//! │     StreamFilter, DecodeParms, predictors, errors       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxipdf_core::params::DecodeParms;
//! use oxipdf_core::predictor::{PredictorParams, revert_predictor};
//!
//! let parms = DecodeParms::new().with("Predictor", 12).with("Columns", 2);
//! let params = PredictorParams::from_parms(Some(&parms));
//!
//! // Two rows, each tagged with PNG "Up".
//! let predicted = [2, 1, 2, 2, 1, 1];
//! let rows = revert_predictor(&params, &predicted).unwrap();
//! assert_eq!(rows, vec![1, 2, 2, 3]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod kind;
pub mod params;
pub mod predictor;
pub mod traits;

// Re-exports for convenience
pub use error::{FilterError, Result};
pub use kind::FilterKind;
pub use params::DecodeParms;
pub use predictor::{PredictorBuffer, PredictorParams, revert_predictor};
pub use traits::{CompressionLevel, Direction, StreamFilter};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{FilterError, Result};
    pub use crate::kind::FilterKind;
    pub use crate::params::DecodeParms;
    pub use crate::predictor::PredictorParams;
    pub use crate::traits::{Direction, StreamFilter};
}
