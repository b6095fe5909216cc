//! Compressed buffer layout
//!
//! ```text
//! [tree_len: u32 BE][payload_bits: u32 BE]
//! [serialized tree: tree_len bytes]
//! [payload: ceil(payload_bits / 8) bytes, MSB-first, zero padded]
//! ```

use crate::error::FormatError;

pub const HEADER_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub tree_len: u32,
    /// Exact number of meaningful payload bits; padding is not counted.
    pub payload_bits: u32,
}

impl Header {
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[..4].copy_from_slice(&self.tree_len.to_be_bytes());
        out[4..].copy_from_slice(&self.payload_bits.to_be_bytes());
        out
    }

    pub fn decode(buf: &[u8]) -> Result<Self, FormatError> {
        if buf.len() < HEADER_LEN {
            return Err(FormatError::TruncatedHeader {
                len: buf.len(),
                needed: HEADER_LEN,
            });
        }
        Ok(Self {
            tree_len: u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]),
            payload_bits: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
        })
    }

    pub fn payload_bytes(&self) -> usize {
        (self.payload_bits as usize).div_ceil(8)
    }
}

/// Read only the header of a compressed buffer.
pub fn inspect(buf: &[u8]) -> Result<Header, FormatError> {
    Header::decode(buf)
}

/// Split a compressed buffer into its header, serialized tree and payload.
pub fn split(buf: &[u8]) -> Result<(Header, &[u8], &[u8]), FormatError> {
    let header = Header::decode(buf)?;
    let body = &buf[HEADER_LEN..];

    let tree_len = header.tree_len as usize;
    if body.len() < tree_len {
        return Err(FormatError::TruncatedTree {
            needed: tree_len,
            available: body.len(),
        });
    }
    let (tree, payload) = body.split_at(tree_len);

    let available = payload.len() as u64 * 8;
    if header.payload_bits as u64 > available {
        return Err(FormatError::BitCountOverflow {
            declared: header.payload_bits as u64,
            available,
        });
    }
    if payload.len() > header.payload_bytes() {
        return Err(FormatError::TrailingBytes {
            extra: payload.len() - header.payload_bytes(),
        });
    }

    Ok((header, tree, payload))
}
