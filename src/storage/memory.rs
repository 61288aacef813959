//! In-memory region fake for host-side testing.

use crate::storage::error::StorageError;
use crate::storage::NvRegion;

/// A [`NvRegion`] backed by a byte vector.
///
/// Fresh instances start in the erased state (all ones) with the write
/// lock engaged, matching a factory-new storage part. The backing bytes
/// survive as long as the value does, which lets tests simulate a power
/// cycle by rebuilding every in-memory component around the same region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryRegion {
    bytes: Vec<u8>,
    locked: bool,
}

impl MemoryRegion {
    /// Create an erased region of `size` bytes.
    pub fn new(size: usize) -> Self {
        MemoryRegion {
            bytes: vec![0xFF; size],
            locked: true,
        }
    }

    /// Direct view of the backing bytes, for assertions and reports.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn check_bounds(&self, offset: usize, len: usize) -> Result<(), StorageError> {
        if offset + len > self.bytes.len() {
            return Err(StorageError::OutOfBounds {
                offset,
                len,
                size: self.bytes.len(),
            });
        }
        Ok(())
    }
}

impl NvRegion for MemoryRegion {
    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        self.check_bounds(offset, buf.len())?;
        buf.copy_from_slice(&self.bytes[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StorageError> {
        if self.locked {
            return Err(StorageError::Locked);
        }
        self.check_bounds(offset, bytes.len())?;
        self.bytes[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    fn erase(&mut self, offset: usize, len: usize) -> Result<(), StorageError> {
        if self.locked {
            return Err(StorageError::Locked);
        }
        self.check_bounds(offset, len)?;
        self.bytes[offset..offset + len].fill(0xFF);
        Ok(())
    }

    fn unlock(&mut self) -> Result<(), StorageError> {
        self.locked = false;
        Ok(())
    }

    fn lock(&mut self) {
        self.locked = true;
    }
}
