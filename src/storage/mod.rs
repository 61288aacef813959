//! Non-volatile region abstraction.
//!
//! The forensics store talks to persistent memory through the small
//! [`NvRegion`] seam so its logic is testable against the in-memory
//! [`MemoryRegion`] fake and portable across storage controllers. Writes
//! require the region's write-protect lock to be released; the [`Unlocked`]
//! RAII guard makes the documented unlock-write-lock sequence a scoped
//! critical section that cannot be left open by an early return.

pub mod error;
pub mod memory;

pub use error::StorageError;
pub use memory::MemoryRegion;

/// Total size of the persisted diagnostic region in bytes.
pub const REGION_LEN: usize = 512;

/// A byte-addressable non-volatile region with a write-protect lock.
///
/// Reads are always permitted. `write` and `erase` fail with
/// [`StorageError::Locked`] unless the lock has been released via
/// [`unlock`](NvRegion::unlock). Erasing sets bytes to the medium's
/// erased state (all ones).
pub trait NvRegion {
    /// Region size in bytes.
    fn size(&self) -> usize;

    /// Copy `buf.len()` bytes starting at `offset` into `buf`.
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Program `bytes` starting at `offset`. Requires the lock to be
    /// released; bytes are written in order, lowest offset first.
    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StorageError>;

    /// Restore `len` bytes starting at `offset` to the erased state
    /// (0xFF). Requires the lock to be released.
    fn erase(&mut self, offset: usize, len: usize) -> Result<(), StorageError>;

    /// Release the write-protect lock. May busy-wait on the controller
    /// within a bounded interval; returns [`StorageError::Busy`] if the
    /// controller never becomes ready.
    fn unlock(&mut self) -> Result<(), StorageError>;

    /// Re-engage the write-protect lock.
    fn lock(&mut self);
}

/// Scoped write access to a region.
///
/// Holds the lock released for exactly the guard's lifetime and re-engages
/// it on drop, so unlock-write-lock happens in one program interval with no
/// path that leaves the region writable.
///
/// # Example
///
/// ```rust
/// use ampel::storage::{MemoryRegion, NvRegion, Unlocked};
///
/// let mut region = MemoryRegion::new(64);
/// {
///     let mut guard = Unlocked::begin(&mut region).unwrap();
///     guard.write(0, &[0xAB]).unwrap();
/// }
/// // The guard re-locked the region on drop.
/// assert_eq!(region.write(0, &[0xCD]), Err(ampel::storage::StorageError::Locked));
/// ```
pub struct Unlocked<'a, R: NvRegion + ?Sized> {
    region: &'a mut R,
}

impl<'a, R: NvRegion + ?Sized> Unlocked<'a, R> {
    /// Release the region's lock and enter the critical section.
    pub fn begin(region: &'a mut R) -> Result<Self, StorageError> {
        region.unlock()?;
        Ok(Unlocked { region })
    }

    /// Program bytes within the critical section.
    pub fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StorageError> {
        self.region.write(offset, bytes)
    }

    /// Erase bytes within the critical section.
    pub fn erase(&mut self, offset: usize, len: usize) -> Result<(), StorageError> {
        self.region.erase(offset, len)
    }
}

impl<R: NvRegion + ?Sized> Drop for Unlocked<'_, R> {
    fn drop(&mut self) {
        self.region.lock();
    }
}
