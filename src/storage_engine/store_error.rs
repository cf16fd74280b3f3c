use bucket_store_layout::LayoutError;
use std::path::PathBuf;

/// Every way a hash-file operation can fail.
///
/// Errors are terminal for the operation that raised them. Whatever block
/// writes completed before the failure stay on disk; nothing is rolled back.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The block store could not create, open, close, allocate, read, or
    /// write.
    #[error("block store failure: {0}")]
    IoFailure(#[from] std::io::Error),

    #[error("{path:?} is a {found}, expected a {expected}")]
    WrongFileKind {
        path: PathBuf,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0:?} is already open")]
    AlreadyOpen(PathBuf),

    #[error("handle is not open")]
    NotOpen,

    #[error("key {0} already exists")]
    DuplicateKey(String),

    #[error("key {0} not found")]
    NotFound(String),

    /// The primary file behind a secondary index is missing or invalid, or a
    /// back-reference points at a block that no longer holds the record.
    #[error("invalid primary reference: {0}")]
    InvalidPrimaryReference(String),

    #[error("bucket count must be at least 1 (got {0})")]
    InvalidBucketCount(u32),

    #[error("invalid record: {0}")]
    InvalidRecord(#[source] LayoutError),

    #[error("corrupt block layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("corrupt hash file: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
