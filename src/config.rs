//! Configuration for sigma-huffman

use serde::{Deserialize, Serialize};

use crate::error::CompressError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub max_input_size: usize,
    /// Upper bound on bytes produced when decoding untrusted buffers.
    pub max_output_size: usize,
    pub verify_roundtrip: bool,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            max_input_size: 100 * 1024 * 1024,  // 100 MB
            max_output_size: 100 * 1024 * 1024, // 100 MB
            verify_roundtrip: false,
        }
    }
}

impl CompressionConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CompressError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CompressError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CompressError> {
        if self.max_input_size == 0 {
            return Err(CompressError::Config("max_input_size must be non-zero".into()));
        }
        if self.max_output_size == 0 {
            return Err(CompressError::Config("max_output_size must be non-zero".into()));
        }
        Ok(())
    }
}
