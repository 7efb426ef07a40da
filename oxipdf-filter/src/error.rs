//! Filter chain errors.

use oxipdf_core::error::FilterError;
use thiserror::Error;

/// A failure in one stage of a filter chain.
///
/// The chain stops at the first failing stage; no partial output is
/// returned.
#[derive(Debug, Error)]
#[error("filter stage {stage} ({filter}) failed: {source}")]
pub struct ChainError {
    /// Zero-based index of the stage in `/Filter` order.
    pub stage: usize,
    /// Name of the failing filter.
    pub filter: String,
    /// The underlying filter error.
    #[source]
    pub source: FilterError,
}

impl ChainError {
    /// Create a chain error for `stage`.
    pub fn new(stage: usize, filter: impl Into<String>, source: FilterError) -> Self {
        Self {
            stage,
            filter: filter.into(),
            source,
        }
    }

    /// Whether the stage failed because its filter or direction is not
    /// implemented, rather than because the data is corrupt.
    pub fn is_unsupported(&self) -> bool {
        self.source.is_unsupported()
    }

    /// Unwrap the underlying filter error.
    pub fn into_inner(self) -> FilterError {
        self.source
    }
}

/// Result type alias for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;
    use oxipdf_core::traits::Direction;

    #[test]
    fn test_display_and_source() {
        let err = ChainError::new(
            1,
            "JBIG2Decode",
            FilterError::unsupported("JBIG2Decode", Direction::Decode),
        );
        assert_eq!(
            err.to_string(),
            "filter stage 1 (JBIG2Decode) failed: JBIG2Decode does not support decoding"
        );
        assert!(err.is_unsupported());
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.into_inner().is_unsupported());
    }
}
