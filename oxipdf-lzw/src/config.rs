//! LZW configuration for PDF streams.

use oxipdf_core::error::{FilterError, Result};
use oxipdf_core::params::{DecodeParms, keys};
use oxipdf_core::predictor::PredictorParams;

/// LZW configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzwConfig {
    /// Minimum code size in bits (9 for 8-bit data).
    pub min_bits: u8,
    /// Maximum code size in bits (12).
    pub max_bits: u8,
    /// Whether to use early code change (`/EarlyChange 1`).
    ///
    /// With early change the code width grows one code before the table
    /// actually needs the extra bit.
    pub early_change: bool,
}

impl LzwConfig {
    /// PDF default: 9-12 bit codes, early change.
    pub const PDF: Self = Self {
        min_bits: 9,
        max_bits: 12,
        early_change: true,
    };

    /// `/EarlyChange 0`: the width grows only when the table needs it.
    pub const PDF_LATE_CHANGE: Self = Self {
        min_bits: 9,
        max_bits: 12,
        early_change: false,
    };

    /// Build a configuration from a stream's `/DecodeParms`.
    pub fn from_parms(parms: Option<&DecodeParms>) -> Result<Self> {
        Self::from_params(&PredictorParams::from_parms(parms))
    }

    /// Build a configuration from already parsed decode parameters.
    pub fn from_params(params: &PredictorParams) -> Result<Self> {
        match params.early_change {
            1 => Ok(Self::PDF),
            0 => Ok(Self::PDF_LATE_CHANGE),
            other => Err(FilterError::invalid_parameter(keys::EARLY_CHANGE, other)),
        }
    }

    /// Get the clear code value (256 for 8-bit initial code size).
    pub fn clear_code(&self) -> u16 {
        1 << (self.min_bits - 1)
    }

    /// Get the end-of-data code value (clear_code + 1).
    pub fn eod_code(&self) -> u16 {
        self.clear_code() + 1
    }

    /// Get the first available code for table entries.
    pub fn first_code(&self) -> u16 {
        self.eod_code() + 1
    }

    /// Maximum number of table entries.
    pub fn max_table_size(&self) -> usize {
        1 << self.max_bits
    }

    /// Table size at which a code width of `bits` grows by one bit.
    ///
    /// For 9-bit codes this is 511 with early change and 512 without.
    pub fn width_threshold(&self, bits: u8) -> usize {
        (1usize << bits) - usize::from(self.early_change)
    }
}

impl Default for LzwConfig {
    fn default() -> Self {
        Self::PDF
    }
}
