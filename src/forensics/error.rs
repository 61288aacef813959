//! Forensics error types.

use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur while persisting or reading a violation record.
#[derive(Debug, Error)]
pub enum ForensicsError {
    /// The configured region cannot hold one record.
    #[error("region of {size} bytes cannot hold a {needed}-byte record")]
    RegionTooSmall {
        /// Actual region size.
        size: usize,
        /// Bytes required by the record layout.
        needed: usize,
    },

    /// Record serialization or deserialization failed.
    #[error("record encoding failed: {0}")]
    Encoding(String),

    /// The underlying storage access failed.
    #[error("storage access failed: {0}")]
    Storage(#[from] StorageError),
}
