//! Storage error types.

use thiserror::Error;

/// Errors reported by a non-volatile region.
///
/// Media faults have no recovery path in this core; the control loop
/// answers them with the same fail-safe terminal behavior as a safety
/// violation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// A mutation was attempted while the region's write lock was engaged.
    #[error("write attempted while the region is locked")]
    Locked,

    /// The controller's busy flag did not clear within the bounded wait.
    #[error("storage controller stayed busy beyond the bounded wait")]
    Busy,

    /// The access falls outside the region.
    #[error("access at offset {offset} of length {len} exceeds region size {size}")]
    OutOfBounds {
        /// Start offset of the access.
        offset: usize,
        /// Length of the access.
        len: usize,
        /// Total region size.
        size: usize,
    },
}
