//! Inode records and the in-memory inode table.

use alloc::vec::Vec;
use bytemuck::{Pod, Zeroable};
use core::fmt::{self, Display, Formatter};

use crate::device::{BlockDevice, BLOCK_SIZE};
use crate::error::{DeviceError, FsError};
use crate::layout::{DIRECT_POINTERS, INODES_PER_BLOCK, INODE_SIZE};

/// An inode number. `0` is always the root directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct InodeNumber(pub u32);

impl Display for InodeNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<InodeNumber> for usize {
    fn from(value: InodeNumber) -> usize {
        value.0 as usize
    }
}

impl From<u32> for InodeNumber {
    fn from(value: u32) -> Self {
        InodeNumber(value)
    }
}

/// A physical block number. `0` means "unallocated" wherever it appears inside an
/// [`Inode`] or an indirect block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct BlockNumber(pub u32);

impl BlockNumber {
    pub const NONE: BlockNumber = BlockNumber(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl Display for BlockNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An on-disk inode record, 64 bytes, 8-byte aligned, zero-padded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Inode {
    pub size: u32,
    pub direct: [u32; DIRECT_POINTERS],
    pub indirect: u32,
    pub is_directory: u8,
    _pad: [u8; 3],
}

const _: () = assert!(core::mem::size_of::<Inode>() == INODE_SIZE);

impl Inode {
    /// A fresh, empty file inode.
    pub fn new_file() -> Self {
        Inode {
            size: 0,
            direct: [0; DIRECT_POINTERS],
            indirect: 0,
            is_directory: 0,
            _pad: [0; 3],
        }
    }

    /// A fresh directory inode with a single data block already attached.
    pub fn new_directory(first_block: BlockNumber) -> Self {
        let mut direct = [0; DIRECT_POINTERS];
        direct[0] = first_block.0;
        Inode {
            size: BLOCK_SIZE as u32,
            direct,
            indirect: 0,
            is_directory: 1,
            _pad: [0; 3],
        }
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory != 0
    }

    pub fn is_free(&self) -> bool {
        self.direct == [0; DIRECT_POINTERS] && self.indirect == 0 && self.size == 0
    }
}

/// The whole inode table, loaded flat into memory at mount and rewritten at unmount.
#[derive(Debug)]
pub struct InodeTable {
    inodes: Vec<Inode>,
}

impl InodeTable {
    /// Creates a table of `count` zeroed (free) inodes, used by `format`.
    pub fn blank(count: u32) -> Self {
        Self {
            inodes: alloc::vec![Inode::new_file(); count as usize],
        }
    }

    /// Loads `inode_table_blocks` blocks starting at `inode_table_start` into a flat array.
    pub fn load<D: BlockDevice>(
        dev: &D,
        inode_table_start: u32,
        inode_table_blocks: u32,
        inodes_count: u32,
    ) -> Result<Self, FsError> {
        let mut inodes = Vec::with_capacity(inodes_count as usize);
        let mut block = [0u8; BLOCK_SIZE];
        for b in 0..inode_table_blocks {
            dev.read(inode_table_start + b, &mut block)?;
            for i in 0..INODES_PER_BLOCK {
                if inodes.len() as u32 >= inodes_count {
                    break;
                }
                let start = i * INODE_SIZE;
                let raw: [u8; INODE_SIZE] = block[start..start + INODE_SIZE].try_into().unwrap();
                inodes.push(*bytemuck::from_bytes(&raw));
            }
        }
        Ok(Self { inodes })
    }

    /// Flushes the table back to disk, one block at a time.
    ///
    /// A failure on one block does not abort writing the rest: every block is attempted,
    /// and the first error encountered is returned once the pass completes.
    pub fn flush<D: BlockDevice>(
        &self,
        dev: &mut D,
        inode_table_start: u32,
    ) -> Result<(), FsError> {
        let mut first_err: Option<DeviceError> = None;
        for (b, chunk) in self.inodes.chunks(INODES_PER_BLOCK).enumerate() {
            let mut block = [0u8; BLOCK_SIZE];
            for (i, inode) in chunk.iter().enumerate() {
                let start = i * INODE_SIZE;
                block[start..start + INODE_SIZE].copy_from_slice(bytemuck::bytes_of(inode));
            }
            if let Err(e) = dev.write(inode_table_start + b as u32, &block) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    pub fn get(&self, n: InodeNumber) -> Result<&Inode, FsError> {
        self.inodes.get(usize::from(n)).ok_or(FsError::NotFound)
    }

    pub fn get_mut(&mut self, n: InodeNumber) -> Result<&mut Inode, FsError> {
        self.inodes.get_mut(usize::from(n)).ok_or(FsError::NotFound)
    }

    pub fn set(&mut self, n: InodeNumber, inode: Inode) {
        self.inodes[usize::from(n)] = inode;
    }

    pub fn len(&self) -> usize {
        self.inodes.len()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::device::MemoryBlockDevice;

    #[test]
    fn inode_record_is_64_bytes() {
        assert_eq!(core::mem::size_of::<Inode>(), 64);
    }

    #[test]
    fn round_trips_through_device_blocks() {
        let mut dev = MemoryBlockDevice::new(32);
        let mut table = InodeTable {
            inodes: alloc::vec![Inode::new_file(); 64 * 2],
        };
        let mut f = Inode::new_file();
        f.size = 42;
        f.direct[0] = 7;
        table.set(InodeNumber(5), f);
        table.flush(&mut dev, 3).unwrap();

        let reloaded = InodeTable::load(&dev, 3, 2, 128).unwrap();
        let back = reloaded.get(InodeNumber(5)).unwrap();
        assert_eq!(back.size, 42);
        assert_eq!(back.direct[0], 7);
    }
}
