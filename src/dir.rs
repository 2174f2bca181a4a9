//! Directory entries and iteration over a directory's data blocks.

use alloc::string::String;
use alloc::vec::Vec;
use bytemuck::{Pod, Zeroable};

use crate::device::{Block, BlockDevice, BLOCK_SIZE};
use crate::error::FsError;
use crate::inode::{BlockNumber, Inode, InodeNumber};
use crate::layout::{DIRECT_POINTERS, DIR_ENTRY_SIZE, ENTRIES_PER_BLOCK, MAX_NAME_LEN};

pub const DOT: &str = ".";
pub const DOT_DOT: &str = "..";

/// The raw on-disk directory entry: 256 bytes, inode number plus a NUL-terminated name.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct RawDirEntry {
    pub inode: u32,
    pub name: [u8; MAX_NAME_LEN],
}

const _: () = assert!(core::mem::size_of::<RawDirEntry>() == DIR_ENTRY_SIZE);

impl RawDirEntry {
    pub fn free() -> Self {
        RawDirEntry {
            inode: 0,
            name: [0; MAX_NAME_LEN],
        }
    }

    pub fn named(inode: InodeNumber, name: &str) -> Result<Self, FsError> {
        if name.is_empty() || name.len() >= MAX_NAME_LEN {
            return Err(FsError::BadPath);
        }
        let mut raw = [0u8; MAX_NAME_LEN];
        raw[..name.len()].copy_from_slice(name.as_bytes());
        Ok(RawDirEntry {
            inode: inode.0,
            name: raw,
        })
    }

    pub fn is_free(&self) -> bool {
        self.inode == 0
    }

    pub fn name_str(&self) -> &str {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(self.name.len());
        core::str::from_utf8(&self.name[..end]).unwrap_or("")
    }
}

/// One slot visited while walking a directory's data blocks, free or not.
#[derive(Clone, Debug)]
pub struct DirSlot {
    pub block_index: usize,
    pub slot_index: usize,
    pub inode: InodeNumber,
    pub name: String,
}

impl DirSlot {
    pub fn is_free(&self) -> bool {
        self.inode.0 == 0
    }

    pub fn is_dot_or_dotdot(&self) -> bool {
        self.name == DOT || self.name == DOT_DOT
    }
}

/// A restartable, lazy walk over every slot (free or occupied, including `.`/`..`) of a
/// directory's allocated direct blocks.
///
/// Directories never use the indirect pointer (see the doc comment on
/// [`crate::layout::DIRECT_POINTERS`] for the resulting child-count ceiling), so only the
/// direct pointer array needs to be consulted.
pub struct DirEntryIter<'a, D: BlockDevice> {
    dev: &'a D,
    direct: [u32; DIRECT_POINTERS],
    block_idx: usize,
    slot_idx: usize,
    current: Option<Block>,
    err: Option<FsError>,
}

impl<'a, D: BlockDevice> DirEntryIter<'a, D> {
    pub fn new(dev: &'a D, inode: &Inode) -> Self {
        Self {
            dev,
            direct: inode.direct,
            block_idx: 0,
            slot_idx: 0,
            current: None,
            err: None,
        }
    }

    /// Drains any I/O error observed mid-iteration.
    pub fn take_error(&mut self) -> Option<FsError> {
        self.err.take()
    }
}

impl<'a, D: BlockDevice> Iterator for DirEntryIter<'a, D> {
    type Item = DirSlot;

    fn next(&mut self) -> Option<DirSlot> {
        if self.err.is_some() {
            return None;
        }
        loop {
            if self.block_idx >= DIRECT_POINTERS {
                return None;
            }
            let block_no = self.direct[self.block_idx];
            if block_no == 0 {
                self.block_idx += 1;
                self.slot_idx = 0;
                self.current = None;
                continue;
            }
            if self.current.is_none() {
                let mut buf = [0u8; BLOCK_SIZE];
                if let Err(e) = self.dev.read(block_no, &mut buf) {
                    self.err = Some(e.into());
                    return None;
                }
                self.current = Some(buf);
            }
            if self.slot_idx >= ENTRIES_PER_BLOCK {
                self.block_idx += 1;
                self.slot_idx = 0;
                self.current = None;
                continue;
            }

            let buf = self.current.as_ref().unwrap();
            let start = self.slot_idx * DIR_ENTRY_SIZE;
            let raw: [u8; DIR_ENTRY_SIZE] = buf[start..start + DIR_ENTRY_SIZE].try_into().unwrap();
            let entry: RawDirEntry = *bytemuck::from_bytes(&raw);

            let slot = DirSlot {
                block_index: self.block_idx,
                slot_index: self.slot_idx,
                inode: InodeNumber(entry.inode),
                name: String::from(entry.name_str()),
            };
            self.slot_idx += 1;
            return Some(slot);
        }
    }
}

/// Collects every occupied, non-`.`/`..` slot of a directory, useful for `list`.
pub fn children<D: BlockDevice>(dev: &D, inode: &Inode) -> Result<Vec<DirSlot>, FsError> {
    let mut iter = DirEntryIter::new(dev, inode);
    let out: Vec<DirSlot> = (&mut iter)
        .filter(|s| !s.is_free() && !s.is_dot_or_dotdot())
        .collect();
    if let Some(e) = iter.take_error() {
        return Err(e);
    }
    Ok(out)
}

/// Looks up `name` among a directory's occupied slots.
pub fn find<D: BlockDevice>(
    dev: &D,
    inode: &Inode,
    name: &str,
) -> Result<Option<DirSlot>, FsError> {
    let mut iter = DirEntryIter::new(dev, inode);
    let found = (&mut iter).find(|s| !s.is_free() && s.name == name);
    if let Some(e) = iter.take_error() {
        return Err(e);
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::device::MemoryBlockDevice;

    fn write_entries(dev: &mut MemoryBlockDevice, block_no: u32, entries: &[(u32, &str)]) {
        let mut buf = [0u8; BLOCK_SIZE];
        for (i, (ino, name)) in entries.iter().enumerate() {
            let e = RawDirEntry::named(InodeNumber(*ino), name).unwrap();
            let start = i * DIR_ENTRY_SIZE;
            buf[start..start + DIR_ENTRY_SIZE].copy_from_slice(bytemuck::bytes_of(&e));
        }
        dev.write(block_no, &buf).unwrap();
    }

    #[test]
    fn iterates_all_slots_including_free_and_dot_entries() {
        let mut dev = MemoryBlockDevice::new(8);
        write_entries(&mut dev, 5, &[(0, "."), (0, ".."), (3, "a")]);
        let mut inode = Inode::new_directory(BlockNumber(5));
        inode.direct[0] = 5;

        let slots: Vec<_> = DirEntryIter::new(&dev, &inode).collect();
        assert_eq!(slots.len(), crate::layout::ENTRIES_PER_BLOCK);
        assert_eq!(slots[2].name, "a");
        assert_eq!(slots[2].inode, InodeNumber(3));
        assert!(slots[3].is_free());
    }

    #[test]
    fn children_excludes_dot_entries_and_free_slots() {
        let mut dev = MemoryBlockDevice::new(8);
        write_entries(&mut dev, 5, &[(1, "."), (1, ".."), (3, "a"), (4, "b")]);
        let mut inode = Inode::new_directory(BlockNumber(5));
        inode.direct[0] = 5;

        let kids = children(&dev, &inode).unwrap();
        assert_eq!(kids.len(), 2);
        assert_eq!(kids[0].name, "a");
        assert_eq!(kids[1].name, "b");
    }

    #[test]
    fn find_locates_by_name() {
        let mut dev = MemoryBlockDevice::new(8);
        write_entries(&mut dev, 5, &[(1, "."), (1, ".."), (7, "target")]);
        let mut inode = Inode::new_directory(BlockNumber(5));
        inode.direct[0] = 5;

        let found = find(&dev, &inode, "target").unwrap().unwrap();
        assert_eq!(found.inode, InodeNumber(7));
        assert!(find(&dev, &inode, "missing").unwrap().is_none());
    }
}
