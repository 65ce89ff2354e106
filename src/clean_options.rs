//! Options for batch cleaning.

use crate::error::Result;
use crate::record::FieldMapping;

/// Smallest chunk handed to a worker when cleaning in parallel.
const MIN_CHUNK_SIZE: usize = 64;

/// Options for controlling batch cleaning behavior.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Which fields hold the country code and name.
    pub mapping: FieldMapping,

    /// Whether to clean chunks on the rayon thread pool.
    pub parallel: bool,

    /// Records per chunk in parallel mode.
    pub chunk_size: usize,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            mapping: FieldMapping::default(),
            parallel: false,
            chunk_size: 1024,
        }
    }
}

impl CleanOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the country code and name field names.
    ///
    /// Fails with [`Error::SharedCountryField`](crate::Error::SharedCountryField)
    /// if both name the same field.
    pub fn with_fields(
        mut self,
        code_field: impl Into<String>,
        name_field: impl Into<String>,
    ) -> Result<Self> {
        self.mapping = FieldMapping::new(code_field, name_field)?;
        Ok(self)
    }

    /// Sets the field mapping.
    pub fn with_mapping(mut self, mapping: FieldMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Enables parallel chunked cleaning.
    ///
    /// Without the `parallel` feature this still cleans sequentially.
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    /// Disables parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Sets the chunk size for parallel mode (clamped to a minimum of 64).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(MIN_CHUNK_SIZE);
        self
    }
}
