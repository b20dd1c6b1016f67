use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted data")]
    Corrupted,

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Unknown league: {id}")]
    UnknownLeague { id: i64 },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl StoreError {
    /// Failures a later commit can get past. Bad bytes or records stay bad.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StoreError::Io(_) | StoreError::UnknownLeague { .. })
    }
}
