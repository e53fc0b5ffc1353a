//! Error types for the H4R archive crate.

use thiserror::Error;

/// Errors that can occur when working with H4R archives.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] h4r_common::Error),

    /// The file does not start with a readable H4R header.
    #[error("bad header: {0}")]
    BadHeader(String),

    /// A file-table record ended before its declared fields did.
    #[error("malformed entry record #{index} at table offset {offset}: {source}")]
    MalformedEntry {
        index: usize,
        offset: usize,
        #[source]
        source: h4r_common::Error,
    },

    /// The entry name prefix is not a known resource category.
    #[error("unknown category {prefix:?} in entry name {name:?}")]
    UnknownCategory { prefix: String, name: String },

    /// Compression mode other than stored (1) or gzip (3).
    #[error("unsupported compression mode: {0}")]
    UnsupportedCompression(u32),

    /// Decompression error.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// The sound sub-header size field disagrees with the payload length.
    #[error("sound size mismatch: payload is {actual} bytes, sub-header declares {declared} (+{header_len})")]
    SoundSizeMismatch {
        actual: usize,
        declared: u32,
        header_len: usize,
    },

    /// The stored payload extends past the end of the archive.
    #[error("payload at offset {offset} with size {size} exceeds archive length {archive_len}")]
    PayloadOutOfBounds {
        offset: u32,
        size: u32,
        archive_len: usize,
    },

    /// The entry name would place its file outside its category directory.
    #[error("entry name {0:?} is not a plain file name")]
    UnsafeName(String),

    /// The external transcoder failed.
    #[error("transcode error: {0}")]
    Transcode(String),
}

/// Result type for H4R operations.
pub type Result<T> = std::result::Result<T, Error>;
