//! sigma-huffman: Canonical Huffman byte codec for the Ryzanstein ecosystem.
//!
//! Turns a byte buffer into a self-describing compressed buffer and back,
//! bit for bit:
//! - Frequency counting over the single-byte alphabet
//! - Deterministic prefix tree construction (greedy minimum-weight merge)
//! - Pre-order tree serialization embedded in the output
//! - MSB-first payload packing with an exact bit count in the header
//!
//! The free functions [`compress`] and [`decompress`] are the codec itself.
//! [`Compressor`] wraps them with configured limits and reports statistics.
//!
//! [`compress`] returns a `Result`, but its only error is
//! [`CompressError::PayloadTooLarge`]: the exact payload bit count must fit the
//! 32-bit header field, which caps input at about 512 MiB (less when codes
//! are longer than 8 bits). Every smaller input, including empty input,
//! compresses successfully.

pub mod code_table;
pub mod config;
pub mod error;
pub mod format;
pub mod frequency;
pub mod huffman;
pub mod tree;

pub use crate::code_table::{Code, CodeTable};
pub use crate::config::CompressionConfig;
pub use crate::error::{CompressError, FormatError};
pub use crate::format::{Header, HEADER_LEN};
pub use crate::frequency::FrequencyTable;
pub use crate::huffman::{compress, decompress, decompress_with_limit};
pub use crate::tree::PrefixTree;

/// Compressed output container
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompressedOutput {
    pub original_size: usize,
    pub compressed_size: usize,
    pub data: Vec<u8>,
    pub ratio: f64,
    pub metadata: CompressionMetadata,
}

impl CompressedOutput {
    /// Encode the container for storage or transport.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CompressError> {
        bincode::serialize(self).map_err(|e| CompressError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CompressError> {
        bincode::deserialize(bytes).map_err(|e| CompressError::Serialization(e.to_string()))
    }
}

/// Metadata about the compression process
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompressionMetadata {
    /// Shannon entropy of the input, bits per byte
    pub entropy_bits: f64,
    pub distinct_symbols: usize,
    pub tree_bytes: usize,
    pub payload_bits: u64,
    pub max_code_len: usize,
}

/// The main compressor engine
pub struct Compressor {
    config: CompressionConfig,
}

impl Compressor {
    /// Create a new compressor with the given configuration
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    /// Create a compressor with default configuration
    pub fn default() -> Self {
        Self::new(CompressionConfig::default())
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Compress data, returning the encoded buffer together with statistics
    pub fn compress(&self, data: &[u8]) -> Result<CompressedOutput, CompressError> {
        if data.len() > self.config.max_input_size {
            return Err(CompressError::InputTooLarge {
                size: data.len(),
                limit: self.config.max_input_size,
            });
        }

        let compressed = huffman::compress(data)?;

        if self.config.verify_roundtrip {
            let restored = huffman::decompress(&compressed)?;
            if restored != data {
                tracing::warn!(input_len = data.len(), "round-trip verification failed");
                return Err(CompressError::RoundTripMismatch);
            }
        }

        let ratio = if data.is_empty() {
            1.0
        } else {
            compressed.len() as f64 / data.len() as f64
        };

        Ok(CompressedOutput {
            original_size: data.len(),
            compressed_size: compressed.len(),
            data: compressed,
            ratio,
            metadata: self.analyze(data),
        })
    }

    /// Decompress a container produced by [`Compressor::compress`]
    pub fn decompress(&self, output: &CompressedOutput) -> Result<Vec<u8>, CompressError> {
        let limit = self.config.max_output_size.min(output.original_size);
        let data = huffman::decompress_with_limit(&output.data, limit)?;
        if data.len() != output.original_size {
            return Err(CompressError::SizeMismatch {
                expected: output.original_size,
                actual: data.len(),
            });
        }
        Ok(data)
    }

    /// Decompress a raw buffer within the configured output limit
    pub fn decompress_bytes(&self, data: &[u8]) -> Result<Vec<u8>, CompressError> {
        huffman::decompress_with_limit(data, self.config.max_output_size)
    }

    /// Compute code statistics without producing the payload
    pub fn analyze(&self, data: &[u8]) -> CompressionMetadata {
        let freq = FrequencyTable::from_bytes(data);
        let tree = PrefixTree::build(&freq);
        let codes = CodeTable::from_tree(&tree);
        CompressionMetadata {
            entropy_bits: freq.entropy_bits(),
            distinct_symbols: freq.distinct(),
            tree_bytes: tree.serialize().len(),
            payload_bits: codes.payload_bits(&freq),
            max_code_len: codes.max_code_len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_huffman() {
        let compressor = Compressor::default();
        let data = b"hello world hello world hello world";
        let result = compressor.compress(data).unwrap();
        assert!(result.compressed_size > 0);
        assert_eq!(result.original_size, data.len());
        assert_eq!(result.compressed_size, result.data.len());
    }

    #[test]
    fn test_compress_empty() {
        let compressor = Compressor::default();
        let result = compressor.compress(b"").unwrap();
        assert_eq!(result.compressed_size, HEADER_LEN);
        assert_eq!(result.ratio, 1.0);
        assert!(compressor.decompress(&result).unwrap().is_empty());
    }

    #[test]
    fn test_roundtrip() {
        let compressor = Compressor::default();
        let data = b"the quick brown fox jumps over the lazy dog";
        let compressed = compressor.compress(data).unwrap();
        let decompressed = compressor.decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn test_input_limit() {
        let compressor = Compressor::new(CompressionConfig {
            max_input_size: 4,
            ..CompressionConfig::default()
        });
        assert!(matches!(
            compressor.compress(b"12345"),
            Err(CompressError::InputTooLarge { size: 5, limit: 4 })
        ));
    }

    #[test]
    fn test_verify_roundtrip() {
        let compressor = Compressor::new(CompressionConfig {
            verify_roundtrip: true,
            ..CompressionConfig::default()
        });
        let data: Vec<u8> = (0..=255).cycle().take(2000).collect();
        assert!(compressor.compress(&data).is_ok());
    }

    #[test]
    fn test_size_mismatch() {
        let compressor = Compressor::default();
        let mut output = compressor.compress(b"abcabc").unwrap();
        output.original_size = 7;
        assert!(matches!(
            compressor.decompress(&output),
            Err(CompressError::SizeMismatch { expected: 7, actual: 6 })
        ));
    }

    #[test]
    fn test_decompress_respects_original_size() {
        let compressor = Compressor::default();
        let mut output = compressor.compress(b"abcabc").unwrap();
        output.original_size = 3;
        assert!(matches!(
            compressor.decompress(&output),
            Err(CompressError::OutputTooLarge { limit: 3 })
        ));
    }

    #[test]
    fn test_analyze() {
        let compressor = Compressor::default();
        let meta = compressor.analyze(b"aaaaaabbbbcc");
        assert_eq!(meta.distinct_symbols, 3);
        assert_eq!(meta.tree_bytes, 8);
        assert_eq!(meta.payload_bits, 18);
        assert_eq!(meta.max_code_len, 2);
        assert!(meta.entropy_bits > 1.0 && meta.entropy_bits < 2.0);
    }

    #[test]
    fn test_entropy_of_uniform_data() {
        let compressor = Compressor::default();
        let meta = compressor.analyze(&[42u8; 100]);
        assert!(meta.entropy_bits < 0.01, "uniform data should have ~0 entropy");
        assert_eq!(meta.max_code_len, 1);
    }

    #[test]
    fn test_compression_ratio() {
        let compressor = Compressor::default();
        let data = "aaaaaaaaaa".repeat(100);
        let result = compressor.compress(data.as_bytes()).unwrap();
        assert!(result.ratio < 1.0, "repetitive data should compress well");
    }

    #[test]
    fn test_container_bytes() {
        let compressor = Compressor::default();
        let output = compressor.compress(b"container round trip").unwrap();
        let restored = CompressedOutput::from_bytes(&output.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, output);
        assert!(CompressedOutput::from_bytes(&[1, 2]).is_err());
    }
}
