//! Flate filter configuration.

use oxipdf_core::traits::CompressionLevel;

/// Default size of the staging buffer between the engine and the sink.
pub const DEFAULT_BUFFER_SIZE: usize = 16 * 1024;

/// Configuration for [`FlateFilter`](crate::FlateFilter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlateConfig {
    /// Compression level used when encoding.
    pub level: CompressionLevel,
    /// Staging buffer size in bytes, reused for every block of a session.
    pub buffer_size: usize,
}

impl FlateConfig {
    /// Create the default configuration (level 6, 16 KiB staging buffer).
    pub fn new() -> Self {
        Self {
            level: CompressionLevel::DEFAULT,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Set the compression level.
    pub fn with_level(mut self, level: impl Into<CompressionLevel>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the staging buffer size. Zero is raised to one byte.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }
}

impl Default for FlateConfig {
    fn default() -> Self {
        Self::new()
    }
}
