//! Error types for sigma-huffman

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("payload of {bits} bits does not fit the 32-bit header field")]
    PayloadTooLarge { bits: u64 },

    #[error("input of {size} bytes exceeds the configured limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error("decoded output exceeds the configured limit of {limit} bytes")]
    OutputTooLarge { limit: usize },

    #[error("decompression size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("round-trip verification failed")]
    RoundTripMismatch,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A compressed buffer that does not follow the header/tree/payload layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("buffer of {len} bytes is shorter than the {needed}-byte header")]
    TruncatedHeader { len: usize, needed: usize },

    #[error("tree needs {needed} bytes but only {available} remain")]
    TruncatedTree { needed: usize, available: usize },

    #[error("header declares {declared} payload bits but only {available} are present")]
    BitCountOverflow { declared: u64, available: u64 },

    #[error("{extra} unexpected bytes after the payload")]
    TrailingBytes { extra: usize },

    #[error("unknown tree marker {marker:#04x} at offset {offset}")]
    InvalidMarker { marker: u8, offset: usize },

    #[error("leaf marker at offset {offset} has no symbol byte")]
    MissingSymbol { offset: usize },

    #[error("serialized tree ends before the tree is complete")]
    IncompleteTree,

    #[error("{extra} bytes follow a complete tree")]
    TrailingTreeBytes { extra: usize },

    #[error("symbol {symbol:#04x} appears in more than one leaf")]
    DuplicateSymbol { symbol: u8 },

    #[error("payload of {bits} bits has no tree to decode against")]
    MissingTree { bits: u32 },

    #[error("bit at position {position} is not a valid code for a single-symbol tree")]
    InvalidCode { position: u64 },

    #[error("payload ends in the middle of a code")]
    TruncatedStream,
}
