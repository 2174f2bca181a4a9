//! A small block-structured filesystem living on top of a fixed-size-block device.
//!
//! The on-disk layout is a superblock, a block bitmap, an inode bitmap, a fixed inode
//! table and a data area, in that order. Files address their data through direct and
//! single-indirect block pointers, much like classic ext2. [`Filesystem`] is the entry
//! point: [`Filesystem::format`] lays out a fresh device, [`Filesystem::mount`] loads an
//! existing one, and [`Filesystem::unmount`] flushes the in-memory inode table and
//! bitmaps back to the device.

#![no_std]

extern crate alloc;

pub mod bitmap;
pub mod device;
pub mod dir;
pub mod error;
pub mod file;
pub mod fs;
pub mod inode;
pub mod layout;
pub mod path;

pub use crate::device::{BlockDevice, MemoryBlockDevice, BLOCK_SIZE};
pub use crate::error::{DeviceError, FsError};
pub use crate::fs::{DirListingEntry, Filesystem, FsStat};
