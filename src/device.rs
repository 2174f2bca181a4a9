//! The block device abstraction this filesystem is built on top of.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::DeviceError;

/// Size, in bytes, of every block read from or written to a [`BlockDevice`].
pub const BLOCK_SIZE: usize = 4096;

/// A single on-disk block, always exactly [`BLOCK_SIZE`] bytes.
pub type Block = [u8; BLOCK_SIZE];

/// A fixed-size-block storage backend.
///
/// Implementors only need to move whole blocks; any partial-block access is built on top of
/// this trait by the filesystem layer via read-modify-write.
pub trait BlockDevice {
    /// Total number of addressable blocks.
    fn size(&self) -> u32;

    /// Reads block `block_no` into `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::OutOfRange`] if `block_no >= self.size()`, or
    /// [`DeviceError::Io`] if the backend itself failed.
    fn read(&self, block_no: u32, buf: &mut Block) -> Result<(), DeviceError>;

    /// Writes `buf` into block `block_no`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::OutOfRange`] if `block_no >= self.size()`, or
    /// [`DeviceError::Io`] if the backend itself failed.
    fn write(&mut self, block_no: u32, buf: &Block) -> Result<(), DeviceError>;
}

/// An in-memory [`BlockDevice`], backed by a flat `Vec` of blocks.
///
/// This is a complete, always-available implementation, not a test double: it is useful
/// directly whenever a caller wants a filesystem without real persistence (e.g. a scratch
/// area, or a unit test fixture).
#[derive(Debug, Clone)]
pub struct MemoryBlockDevice {
    blocks: Vec<Block>,
}

impl MemoryBlockDevice {
    /// Creates a zeroed device with `block_count` blocks.
    pub fn new(block_count: u32) -> Self {
        Self {
            blocks: vec![[0u8; BLOCK_SIZE]; block_count as usize],
        }
    }
}

impl BlockDevice for MemoryBlockDevice {
    fn size(&self) -> u32 {
        self.blocks.len() as u32
    }

    fn read(&self, block_no: u32, buf: &mut Block) -> Result<(), DeviceError> {
        let block = self
            .blocks
            .get(block_no as usize)
            .ok_or(DeviceError::OutOfRange)?;
        buf.copy_from_slice(block);
        Ok(())
    }

    fn write(&mut self, block_no: u32, buf: &Block) -> Result<(), DeviceError> {
        let block = self
            .blocks
            .get_mut(block_no as usize)
            .ok_or(DeviceError::OutOfRange)?;
        block.copy_from_slice(buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn read_back_what_was_written() {
        let mut dev = MemoryBlockDevice::new(4);
        let mut block = [0u8; BLOCK_SIZE];
        block[0] = 0xAB;
        dev.write(2, &block).unwrap();

        let mut out = [0u8; BLOCK_SIZE];
        dev.read(2, &mut out).unwrap();
        assert_eq!(out[0], 0xAB);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let dev = MemoryBlockDevice::new(2);
        let mut out = [0u8; BLOCK_SIZE];
        assert_eq!(dev.read(2, &mut out), Err(DeviceError::OutOfRange));
    }
}
