//! On-disk layout constants and the superblock record.

use bytemuck::{Pod, Zeroable};

use crate::device::BLOCK_SIZE;

/// Number of direct block pointers carried by an inode.
pub const DIRECT_POINTERS: usize = 13;

/// Maximum length, in bytes, of a single path component (NUL-terminated, so 251 usable chars).
pub const MAX_NAME_LEN: usize = 252;

/// Size, in bytes, of an on-disk directory entry.
pub const DIR_ENTRY_SIZE: usize = 256;

/// Size, in bytes, of an on-disk inode record.
pub const INODE_SIZE: usize = 64;

/// Number of `u32` pointers held by one indirect block.
pub const POINTERS_PER_BLOCK: usize = BLOCK_SIZE / core::mem::size_of::<u32>();

/// Number of inode records held by one block of the inode table.
pub const INODES_PER_BLOCK: usize = BLOCK_SIZE / INODE_SIZE;

/// Number of directory entries held by one data block.
pub const ENTRIES_PER_BLOCK: usize = BLOCK_SIZE / DIR_ENTRY_SIZE;

/// The inode number of the filesystem root, always allocated first by `format`.
pub const ROOT_INODE: u32 = 0;

/// Maximum logical file size representable by direct + single-indirect addressing.
pub const MAX_FILE_SIZE: u64 =
    (DIRECT_POINTERS as u64) * (BLOCK_SIZE as u64) + (POINTERS_PER_BLOCK as u64) * (BLOCK_SIZE as u64);

/// Fixed block layout, read from block 0 on mount and rewritten on format.
///
/// Every field is a plain little-endian `u32`; the record is zero-padded to a full block
/// by the caller, never by this type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Superblock {
    pub blocks_count: u32,
    pub inodes_count: u32,
    pub block_bitmap_block: u32,
    pub inode_bitmap_block: u32,
    pub inode_table_start: u32,
    pub data_blocks_start: u32,
}

impl Superblock {
    /// Fixed block numbers that never move, independent of device size.
    pub const SELF_BLOCK: u32 = 0;
    pub const BLOCK_BITMAP_BLOCK: u32 = 1;
    pub const INODE_BITMAP_BLOCK: u32 = 2;
    pub const INODE_TABLE_START: u32 = 3;

    /// Computes the layout for a device with `total_blocks` blocks.
    ///
    /// One inode is provisioned per block of total device capacity, deliberately
    /// over-provisioning the inode table so callers never run out of inodes before
    /// running out of blocks.
    ///
    /// Returns `None` if the device is too small to hold the fixed header blocks and at
    /// least one data block.
    pub fn layout_for(total_blocks: u32) -> Option<Superblock> {
        if total_blocks < 8 {
            return None;
        }

        let inodes_count = total_blocks;
        let inode_table_blocks =
            (inodes_count as usize).div_ceil(INODES_PER_BLOCK) as u32;
        let data_blocks_start = Self::INODE_TABLE_START + inode_table_blocks;

        if data_blocks_start >= total_blocks {
            return None;
        }

        Some(Superblock {
            blocks_count: total_blocks,
            inodes_count,
            block_bitmap_block: Self::BLOCK_BITMAP_BLOCK,
            inode_bitmap_block: Self::INODE_BITMAP_BLOCK,
            inode_table_start: Self::INODE_TABLE_START,
            data_blocks_start,
        })
    }

    /// Number of blocks occupied by the inode table.
    pub fn inode_table_blocks(&self) -> u32 {
        self.data_blocks_start - self.inode_table_start
    }
}
