//! Huffman compression and decompression
//!
//! Produces a self-describing buffer: an 8-byte header, the serialized prefix
//! tree, then the MSB-first packed payload. See [`crate::format`] for the
//! layout and [`crate::tree`] for the tie-break rule that makes the output
//! deterministic.

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::code_table::CodeTable;
use crate::error::{CompressError, FormatError};
use crate::format::{self, Header, HEADER_LEN};
use crate::frequency::FrequencyTable;
use crate::tree::{Node, PrefixTree};

/// Compress data using Huffman coding.
///
/// Empty input yields a header-only buffer. The only error is
/// [`CompressError::PayloadTooLarge`], when the encoded bit count cannot be
/// recorded in the 32-bit header field.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CompressError> {
    let freq = FrequencyTable::from_bytes(data);
    let tree = PrefixTree::build(&freq);
    let codes = CodeTable::from_tree(&tree);

    let bits = codes.payload_bits(&freq);
    let payload_bits = u32::try_from(bits).map_err(|_| CompressError::PayloadTooLarge { bits })?;
    let tree_bytes = tree.serialize();
    let header = Header {
        // at most 256 leaves and 255 internal nodes
        tree_len: tree_bytes.len() as u32,
        payload_bits,
    };

    let mut output = Vec::with_capacity(HEADER_LEN + tree_bytes.len() + header.payload_bytes());
    output.extend_from_slice(&header.encode());
    output.extend_from_slice(&tree_bytes);

    let mut writer = BitWriter::endian(output, BigEndian);
    for &b in data {
        if let Some(code) = codes.get(b) {
            for bit in code.iter() {
                writer.write_bit(bit)?;
            }
        }
    }
    writer.byte_align()?;
    let output = writer.into_writer();

    tracing::debug!(
        input_len = data.len(),
        distinct = freq.distinct(),
        tree_len = header.tree_len,
        payload_bits,
        output_len = output.len(),
        "huffman compress"
    );
    Ok(output)
}

/// Decompress a buffer produced by [`compress`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CompressError> {
    decompress_with_limit(data, usize::MAX)
}

/// Decompress, refusing to produce more than `max_output` bytes.
pub fn decompress_with_limit(data: &[u8], max_output: usize) -> Result<Vec<u8>, CompressError> {
    let result = decode(data, max_output);
    if let Err(ref e) = result {
        tracing::warn!(input_len = data.len(), error = %e, "huffman decompress failed");
    }
    result
}

fn decode(data: &[u8], max_output: usize) -> Result<Vec<u8>, CompressError> {
    // a zero-length buffer stands for empty input, like the header-only form
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let (header, tree_bytes, payload) = format::split(data)?;
    let tree = PrefixTree::deserialize(tree_bytes)?;

    let Some(root) = tree.root() else {
        if header.payload_bits > 0 {
            return Err(FormatError::MissingTree {
                bits: header.payload_bits,
            }
            .into());
        }
        return Ok(Vec::new());
    };

    let mut reader = BitReader::endian(payload, BigEndian);
    let mut output = Vec::with_capacity((header.payload_bits as usize).min(max_output));
    let mut current = root;

    for position in 0..header.payload_bits as u64 {
        let bit = reader
            .read_bit()
            .map_err(|_| FormatError::TruncatedStream)?;
        let next = match *tree.node(current) {
            Node::Internal { left, right, .. } => {
                if bit {
                    right
                } else {
                    left
                }
            }
            // only reachable when the root itself is the single leaf
            Node::Leaf { .. } => {
                if bit {
                    return Err(FormatError::InvalidCode { position }.into());
                }
                current
            }
        };

        match *tree.node(next) {
            Node::Leaf { symbol, .. } => {
                if output.len() >= max_output {
                    return Err(CompressError::OutputTooLarge { limit: max_output });
                }
                output.push(symbol);
                current = root;
            }
            Node::Internal { .. } => current = next,
        }
    }

    if current != root {
        return Err(FormatError::TruncatedStream.into());
    }

    tracing::debug!(
        input_len = data.len(),
        payload_bits = header.payload_bits,
        output_len = output.len(),
        "huffman decompress"
    );
    Ok(output)
}
