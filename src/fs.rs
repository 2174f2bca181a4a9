//! Ties the block device, layout, bitmaps, inode table and directory/file logic together
//! into a single owned [`Filesystem`] value.
//!
//! There is no global mutable mount state: `format`/`mount` produce a `Filesystem`, and
//! `unmount` consumes it. Dropping a `Filesystem` without calling `unmount` loses any
//! inode or bitmap mutations made since mount, exactly as an unclean shutdown would.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};

use crate::bitmap::Bitmap;
use crate::device::{BlockDevice, BLOCK_SIZE};
use crate::dir::{self, RawDirEntry};
use crate::error::FsError;
use crate::inode::{BlockNumber, Inode, InodeNumber, InodeTable};
use crate::layout::{Superblock, DIRECT_POINTERS, DIR_ENTRY_SIZE, ENTRIES_PER_BLOCK, ROOT_INODE};
use crate::{file, path};

/// A name and size pair returned by [`Filesystem::list`].
///
/// A directory's `size` is a synthetic value: its own allocated block bytes plus the
/// recursive sum of its children (see [`Filesystem::list`]'s doc comment for the caveat
/// this implies).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirListingEntry {
    pub name: String,
    pub size: u64,
}

/// Renders as `"<name> <size>\n"`, matching the reference CLI's `list` output. A caller
/// that wants the raw data instead of text should use the fields directly.
impl Display for DirListingEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.name, self.size)
    }
}

/// Aggregate counters returned by [`Filesystem::stat`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FsStat {
    pub blocks_count: u32,
    pub inodes_count: u32,
    pub free_blocks: u32,
    pub free_inodes: u32,
}

/// A mounted (or freshly formatted) filesystem.
pub struct Filesystem<D: BlockDevice> {
    device: D,
    superblock: Superblock,
    block_bitmap: Bitmap,
    inode_bitmap: Bitmap,
    inodes: InodeTable,
}

impl<D: BlockDevice> Filesystem<D> {
    /// Lays out a brand-new filesystem across the entire device and persists it.
    ///
    /// Fails if the device has fewer than 8 blocks, or isn't large enough to hold its own
    /// header blocks plus at least one data block.
    pub fn format(mut device: D) -> Result<Self, FsError> {
        let total = device.size();
        let superblock = Superblock::layout_for(total).ok_or(FsError::NoSpace)?;

        let mut block_bitmap = Bitmap::new(superblock.blocks_count as usize);
        for b in 0..superblock.data_blocks_start {
            block_bitmap.set(b as usize);
        }

        let mut inode_bitmap = Bitmap::new(superblock.inodes_count as usize);
        inode_bitmap.set(ROOT_INODE as usize);

        let root_block = superblock.data_blocks_start;
        block_bitmap.set(root_block as usize);

        let mut inodes = InodeTable::blank(superblock.inodes_count);
        let root = InodeNumber(ROOT_INODE);
        inodes.set(root, Inode::new_directory(BlockNumber(root_block)));

        write_dir_block(&mut device, root_block, root, root)?;

        let mut fs = Filesystem {
            device,
            superblock,
            block_bitmap,
            inode_bitmap,
            inodes,
        };
        fs.flush()?;
        Ok(fs)
    }

    /// Loads the superblock, both bitmaps and the whole inode table from `device`.
    pub fn mount(device: D) -> Result<Self, FsError> {
        let mut raw = [0u8; BLOCK_SIZE];
        device.read(Superblock::SELF_BLOCK, &mut raw)?;
        let sb_bytes: [u8; core::mem::size_of::<Superblock>()] = raw
            [..core::mem::size_of::<Superblock>()]
            .try_into()
            .unwrap();
        let superblock: Superblock = *bytemuck::from_bytes(&sb_bytes);
        if superblock.blocks_count == 0 || superblock.blocks_count > device.size() {
            return Err(FsError::NotMounted);
        }

        let mut bb_raw = [0u8; BLOCK_SIZE];
        device.read(superblock.block_bitmap_block, &mut bb_raw)?;
        let block_bitmap = Bitmap::from_bytes(&bb_raw, superblock.blocks_count as usize);

        let mut ib_raw = [0u8; BLOCK_SIZE];
        device.read(superblock.inode_bitmap_block, &mut ib_raw)?;
        let inode_bitmap = Bitmap::from_bytes(&ib_raw, superblock.inodes_count as usize);

        let inodes = InodeTable::load(
            &device,
            superblock.inode_table_start,
            superblock.inode_table_blocks(),
            superblock.inodes_count,
        )?;

        Ok(Filesystem {
            device,
            superblock,
            block_bitmap,
            inode_bitmap,
            inodes,
        })
    }

    /// Flushes the inode table and both bitmaps, consuming the filesystem and handing
    /// the backing device back to the caller (who owned it before `format`/`mount` took
    /// it, and is free to drop it, reopen it, or hand it to `mount` again).
    pub fn unmount(mut self) -> Result<D, FsError> {
        self.flush()?;
        Ok(self.device)
    }

    /// Reports block/inode capacity and usage without touching the device.
    pub fn stat(&self) -> FsStat {
        FsStat {
            blocks_count: self.superblock.blocks_count,
            inodes_count: self.superblock.inodes_count,
            free_blocks: self.superblock.blocks_count - self.block_bitmap.count_set() as u32,
            free_inodes: self.superblock.inodes_count - self.inode_bitmap.count_set() as u32,
        }
    }

    /// Creates a file or directory at `path`, creating any missing intermediate
    /// directories along the way.
    ///
    /// Unlike a re-entrant path-based recursion, intermediate directories are created by
    /// walking the path once, carrying the true parent inode forward at every step.
    pub fn create(&mut self, path: &str, is_directory: bool) -> Result<(), FsError> {
        let (parents, name) = path::split_parent(path)?;
        let parent = self.walk_creating_intermediate(&parents)?;

        if self.find_child(parent, name)?.is_some() {
            return Err(FsError::AlreadyExists);
        }
        let parent_inode = *self.inodes.get(parent)?;
        if !parent_inode.is_directory() {
            return Err(FsError::NotADirectory);
        }
        self.make_child(parent, name, is_directory)?;
        Ok(())
    }

    /// Lists a directory's immediate children, with file sizes as recorded and directory
    /// sizes as a recursive sum of each descendant's own allocated-block bytes.
    ///
    /// Computing a directory's size mutates the in-memory `size` field of every
    /// descendant directory visited; this is an inherited, deliberate side effect rather
    /// than a true on-disk size, and callers that only want a final byte count can ignore
    /// the mutation entirely.
    pub fn list(&mut self, path: &str) -> Result<Vec<DirListingEntry>, FsError> {
        let target = self.resolve(path)?;
        let inode = *self.inodes.get(target)?;
        if !inode.is_directory() {
            return Err(FsError::NotADirectory);
        }

        let kids = dir::children(&self.device, &inode)?;
        let mut out = Vec::with_capacity(kids.len());
        for slot in kids {
            let size = self.directory_size(slot.inode)?;
            out.push(DirListingEntry {
                name: slot.name,
                size,
            });
        }
        Ok(out)
    }

    /// Removes `path`. If it names a directory, every descendant is removed first and
    /// every data block (including, for files, the indirect block and everything it
    /// points to) is returned to the block bitmap.
    pub fn remove(&mut self, path: &str) -> Result<(), FsError> {
        let (parents, name) = path::split_parent(path)?;
        let mut parent = InodeNumber(ROOT_INODE);
        for comp in &parents {
            parent = self
                .find_child(parent, comp)?
                .ok_or(FsError::NotFound)?
                .inode;
        }
        let slot = self.find_child(parent, name)?.ok_or(FsError::NotFound)?;

        self.free_inode_tree(slot.inode)?;
        self.clear_entry(parent, slot.block_index, slot.slot_index)?;
        Ok(())
    }

    /// Writes `count` bytes of `buf` into `path`, creating the file (and any missing
    /// intermediate directories) if it does not already exist.
    pub fn write(&mut self, path: &str, buf: &[u8], count: usize, append: bool) -> Result<(), FsError> {
        if count == 0 || count > buf.len() {
            return Err(FsError::InvalidArg);
        }
        let (parents, name) = path::split_parent(path)?;
        let parent = self.walk_creating_intermediate(&parents)?;

        let target = match self.find_child(parent, name)? {
            Some(slot) => {
                let inode = self.inodes.get(slot.inode)?;
                if inode.is_directory() {
                    return Err(FsError::IsADirectory);
                }
                slot.inode
            }
            None => self.make_child(parent, name, false)?,
        };

        let offset = if append {
            self.inodes.get(target)?.size as u64
        } else {
            0
        };

        let device = &mut self.device;
        let block_bitmap = &mut self.block_bitmap;
        let data_blocks_start = self.superblock.data_blocks_start;
        let blocks_count = self.superblock.blocks_count;
        let inode_mut = self.inodes.get_mut(target)?;
        let mut alloc = || -> Result<u32, FsError> {
            block_bitmap
                .first_clear_in(data_blocks_start as usize..blocks_count as usize)
                .map(|b| {
                    block_bitmap.set(b);
                    b as u32
                })
                .ok_or(FsError::NoSpace)
        };
        file::write_file(device, inode_mut, buf, count, offset, &mut alloc)
    }

    /// Reads up to `count` bytes from `path` starting at `offset` into `buf`, returning
    /// the number of bytes actually read.
    pub fn read(&self, path: &str, buf: &mut [u8], count: usize, offset: u64) -> Result<usize, FsError> {
        if count > buf.len() {
            return Err(FsError::InvalidArg);
        }
        let target = self.resolve(path)?;
        let inode = self.inodes.get(target)?;
        if inode.is_directory() {
            return Err(FsError::IsADirectory);
        }
        file::read_file(&self.device, inode, buf, count, offset)
    }

    // --- internal helpers ---

    fn resolve(&self, path: &str) -> Result<InodeNumber, FsError> {
        let components = path::split(path)?;
        let mut current = InodeNumber(ROOT_INODE);
        for comp in components {
            let inode = self.inodes.get(current)?;
            if !inode.is_directory() {
                return Err(FsError::NotADirectory);
            }
            current = self
                .find_child(current, comp)?
                .ok_or(FsError::NotFound)?
                .inode;
        }
        Ok(current)
    }

    /// Walks `components` from root, creating any directory that is missing, and
    /// carrying the real parent inode number forward the whole time (no re-resolution
    /// from root on each step).
    fn walk_creating_intermediate(&mut self, components: &[&str]) -> Result<InodeNumber, FsError> {
        let mut current = InodeNumber(ROOT_INODE);
        for comp in components {
            current = match self.find_child(current, comp)? {
                Some(slot) => {
                    let inode = self.inodes.get(slot.inode)?;
                    if !inode.is_directory() {
                        return Err(FsError::NotADirectory);
                    }
                    slot.inode
                }
                None => self.make_child(current, comp, true)?,
            };
        }
        Ok(current)
    }

    fn find_child(&self, parent: InodeNumber, name: &str) -> Result<Option<dir::DirSlot>, FsError> {
        let inode = self.inodes.get(parent)?;
        dir::find(&self.device, inode, name)
    }

    fn allocate_block(&mut self) -> Result<u32, FsError> {
        self.block_bitmap
            .first_clear_in(self.superblock.data_blocks_start as usize..self.superblock.blocks_count as usize)
            .map(|b| {
                self.block_bitmap.set(b);
                b as u32
            })
            .ok_or(FsError::NoSpace)
    }

    fn allocate_inode(&mut self) -> Result<InodeNumber, FsError> {
        self.inode_bitmap
            .allocate_first_clear()
            .map(|n| InodeNumber(n as u32))
            .ok_or(FsError::NoSpace)
    }

    fn free_block(&mut self, b: u32) {
        self.block_bitmap.clear(b as usize);
    }

    fn free_inode(&mut self, n: InodeNumber) {
        self.inode_bitmap.clear(n.0 as usize);
    }

    /// Allocates an inode for `name` under `parent`, initializes it and links it in.
    fn make_child(&mut self, parent: InodeNumber, name: &str, is_directory: bool) -> Result<InodeNumber, FsError> {
        let new_inode_no = self.allocate_inode()?;

        let record = if is_directory {
            let block = self.allocate_block()?;
            write_dir_block(&mut self.device, block, new_inode_no, parent)?;
            Inode::new_directory(BlockNumber(block))
        } else {
            Inode::new_file()
        };
        self.inodes.set(new_inode_no, record);

        self.link_entry(parent, name, new_inode_no)?;
        Ok(new_inode_no)
    }

    /// Inserts a `{name -> child}` entry into `parent`'s first free slot, allocating a
    /// new directory data block if every existing block is full.
    fn link_entry(&mut self, parent: InodeNumber, name: &str, child: InodeNumber) -> Result<(), FsError> {
        let parent_inode = *self.inodes.get(parent)?;

        for block_idx in 0..DIRECT_POINTERS {
            let block_no = parent_inode.direct[block_idx];
            if block_no == 0 {
                continue;
            }
            let mut buf = [0u8; BLOCK_SIZE];
            self.device.read(block_no, &mut buf)?;
            for slot_idx in 0..ENTRIES_PER_BLOCK {
                let start = slot_idx * DIR_ENTRY_SIZE;
                let raw: [u8; DIR_ENTRY_SIZE] = buf[start..start + DIR_ENTRY_SIZE].try_into().unwrap();
                let entry: RawDirEntry = *bytemuck::from_bytes(&raw);
                if entry.is_free() {
                    let new_entry = RawDirEntry::named(child, name)?;
                    buf[start..start + DIR_ENTRY_SIZE].copy_from_slice(bytemuck::bytes_of(&new_entry));
                    self.device.write(block_no, &buf)?;
                    return Ok(());
                }
            }
        }

        let free_slot = parent_inode
            .direct
            .iter()
            .position(|&b| b == 0)
            .ok_or(FsError::NoSpace)?;
        let new_block = self.allocate_block()?;
        let mut buf = [0u8; BLOCK_SIZE];
        let new_entry = RawDirEntry::named(child, name)?;
        buf[0..DIR_ENTRY_SIZE].copy_from_slice(bytemuck::bytes_of(&new_entry));
        self.device.write(new_block, &buf)?;

        let parent_mut = self.inodes.get_mut(parent)?;
        parent_mut.direct[free_slot] = new_block;
        parent_mut.size += BLOCK_SIZE as u32;
        Ok(())
    }

    /// Clears the directory-entry slot identified by `(block_index, slot_index)` inside
    /// `parent`. The data block itself is left allocated: this filesystem never
    /// compacts a directory's blocks after a removal.
    fn clear_entry(&mut self, parent: InodeNumber, block_index: usize, slot_index: usize) -> Result<(), FsError> {
        let parent_inode = *self.inodes.get(parent)?;
        let block_no = parent_inode.direct[block_index];
        let mut buf = [0u8; BLOCK_SIZE];
        self.device.read(block_no, &mut buf)?;
        let start = slot_index * DIR_ENTRY_SIZE;
        buf[start..start + DIR_ENTRY_SIZE].copy_from_slice(bytemuck::bytes_of(&RawDirEntry::free()));
        self.device.write(block_no, &buf)?;
        Ok(())
    }

    /// Recursively frees `ino` and, for a directory, every descendant; for a file, its
    /// direct blocks, its indirect block and every block the indirect block references.
    fn free_inode_tree(&mut self, ino: InodeNumber) -> Result<(), FsError> {
        let inode = *self.inodes.get(ino)?;

        if inode.is_directory() {
            let children = dir::children(&self.device, &inode)?;
            for child in children {
                self.free_inode_tree(child.inode)?;
            }
            for &b in inode.direct.iter() {
                if b != 0 {
                    self.free_block(b);
                }
            }
        } else {
            for b in file::all_data_blocks(&self.device, &inode)? {
                self.free_block(b);
            }
        }

        self.free_inode(ino);
        self.inodes.set(ino, Inode::new_file());
        Ok(())
    }

    /// Recursively computes `own_allocated_bytes + sum(child sizes)`, mutating `size` on
    /// every directory visited (see [`Filesystem::list`]'s doc comment).
    ///
    /// The own-contribution is derived from the directory's allocated block count, not
    /// from its current `size` field: `size` is itself the output of the previous call, so
    /// seeding the accumulator from it would compound on every repeated `list`.
    fn directory_size(&mut self, ino: InodeNumber) -> Result<u64, FsError> {
        let inode = *self.inodes.get(ino)?;
        if !inode.is_directory() {
            return Ok(inode.size as u64);
        }

        let own_blocks = inode.direct.iter().filter(|&&b| b != 0).count() as u64;
        let children = dir::children(&self.device, &inode)?;
        let mut total = own_blocks * BLOCK_SIZE as u64;
        for child in children {
            total += self.directory_size(child.inode)?;
        }

        let inode_mut = self.inodes.get_mut(ino)?;
        inode_mut.size = total as u32;
        Ok(total)
    }

    fn flush(&mut self) -> Result<(), FsError> {
        self.inodes.flush(&mut self.device, self.superblock.inode_table_start)?;
        self.device
            .write(self.superblock.block_bitmap_block, &self.block_bitmap.to_bytes())?;
        self.device
            .write(self.superblock.inode_bitmap_block, &self.inode_bitmap.to_bytes())?;

        let mut sb_block = [0u8; BLOCK_SIZE];
        sb_block[..core::mem::size_of::<Superblock>()].copy_from_slice(bytemuck::bytes_of(&self.superblock));
        self.device.write(Superblock::SELF_BLOCK, &sb_block)?;
        Ok(())
    }
}

fn write_dir_block<D: BlockDevice>(
    device: &mut D,
    block: u32,
    self_inode: InodeNumber,
    parent_inode: InodeNumber,
) -> Result<(), FsError> {
    let mut buf = [0u8; BLOCK_SIZE];
    let dot = RawDirEntry::named(self_inode, dir::DOT)?;
    let dotdot = RawDirEntry::named(parent_inode, dir::DOT_DOT)?;
    buf[0..DIR_ENTRY_SIZE].copy_from_slice(bytemuck::bytes_of(&dot));
    buf[DIR_ENTRY_SIZE..2 * DIR_ENTRY_SIZE].copy_from_slice(bytemuck::bytes_of(&dotdot));
    device.write(block, &buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::device::MemoryBlockDevice;
    use crate::layout::MAX_FILE_SIZE;

    fn formatted(blocks: u32) -> Filesystem<MemoryBlockDevice> {
        Filesystem::format(MemoryBlockDevice::new(blocks)).unwrap()
    }

    #[test]
    fn format_lays_out_expected_geometry() {
        let fs = formatted(1024);
        let stat = fs.stat();
        assert_eq!(stat.blocks_count, 1024);
        assert_eq!(stat.inodes_count, 1024);
        assert_eq!(stat.free_inodes, stat.inodes_count - 1);
    }

    #[test]
    fn format_then_mount_sees_empty_root() {
        let mut fs2 = formatted(256);
        assert!(fs2.list("/").unwrap().is_empty());
    }

    #[test]
    fn create_nested_directories_and_list() {
        let mut fs = formatted(256);
        fs.create("/a/b/c", true).unwrap();
        let listing = fs.list("/a").unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "b");
        // "b" owns one block (its own dir block) plus "c"'s one block.
        assert_eq!(listing[0].size, (BLOCK_SIZE as u64) * 2);
        assert_eq!(alloc::format!("{}", listing[0]), "b 8192\n");
    }

    #[test]
    fn repeated_list_does_not_inflate_directory_size() {
        let mut fs = formatted(256);
        fs.create("/a/b/c", true).unwrap();
        let first = fs.list("/a").unwrap();
        let second = fs.list("/a").unwrap();
        assert_eq!(first[0].size, second[0].size);
        assert_eq!(second[0].size, (BLOCK_SIZE as u64) * 2);
    }

    #[test]
    fn create_rejects_duplicate() {
        let mut fs = formatted(64);
        fs.create("/x", false).unwrap();
        assert_eq!(fs.create("/x", false), Err(FsError::AlreadyExists));
    }

    #[test]
    fn write_then_read_file() {
        let mut fs = formatted(64);
        fs.write("/f", b"hello", 5, false).unwrap();
        let mut out = [0u8; 5];
        assert_eq!(fs.read("/f", &mut out, 5, 0).unwrap(), 5);
        assert_eq!(&out, b"hello");
    }

    #[test]
    fn append_extends_past_prior_contents() {
        let mut fs = formatted(64);
        fs.write("/f", b"abc", 3, false).unwrap();
        fs.write("/f", b"def", 3, true).unwrap();
        let mut out = [0u8; 6];
        assert_eq!(fs.read("/f", &mut out, 6, 0).unwrap(), 6);
        assert_eq!(&out, b"abcdef");
    }

    #[test]
    fn write_crossing_indirect_boundary() {
        let mut fs = formatted(4096);
        let len = DIRECT_POINTERS * BLOCK_SIZE + 10;
        let data = alloc::vec![0x42u8; len];
        fs.write("/big", &data, len, false).unwrap();

        let mut out = alloc::vec![0u8; len];
        assert_eq!(fs.read("/big", &mut out, len, 0).unwrap(), len);
        assert_eq!(out, data);
    }

    #[test]
    fn writing_past_max_size_is_rejected() {
        let mut fs = formatted(4096);
        let data = alloc::vec![0u8; MAX_FILE_SIZE as usize];
        fs.write("/huge", &data, data.len(), false).unwrap();
        assert_eq!(fs.write("/huge", b"x", 1, true), Err(FsError::FileTooLarge));
    }

    #[test]
    fn recursive_remove_frees_everything() {
        let mut fs = formatted(64);
        fs.create("/d", true).unwrap();
        fs.write("/d/x", b"hi", 2, false).unwrap();
        let before = fs.stat();

        fs.remove("/d").unwrap();

        assert!(fs.list("/").unwrap().is_empty());
        let after = fs.stat();
        assert!(after.free_blocks > before.free_blocks);
        assert!(after.free_inodes > before.free_inodes);
    }

    #[test]
    fn remove_of_file_frees_indirect_chain() {
        let mut fs = formatted(4096);
        let len = DIRECT_POINTERS * BLOCK_SIZE + 10;
        let data = alloc::vec![1u8; len];
        fs.write("/big", &data, len, false).unwrap();
        let before = fs.stat();

        fs.remove("/big").unwrap();

        let after = fs.stat();
        // every direct block, the indirect block itself, and its one populated slot.
        assert_eq!(after.free_blocks, before.free_blocks + DIRECT_POINTERS as u32 + 2);
    }

    #[test]
    fn read_rejects_count_larger_than_buffer() {
        let mut fs = formatted(64);
        let data = alloc::vec![0x7Au8; 100];
        fs.write("/big", &data, 100, false).unwrap();

        let mut out = [0u8; 5];
        assert_eq!(fs.read("/big", &mut out, 100, 0), Err(FsError::InvalidArg));
    }

    #[test]
    fn read_missing_path_fails() {
        let fs = formatted(64);
        let mut out = [0u8; 1];
        assert_eq!(fs.read("/nope", &mut out, 1, 0), Err(FsError::NotFound));
    }

    #[test]
    fn persists_across_unmount_and_remount() {
        let dev = MemoryBlockDevice::new(64);
        let mut fs = Filesystem::format(dev).unwrap();
        fs.write("/f", b"persisted", 9, false).unwrap();
        fs.create("/dir", true).unwrap();

        let stat_before = fs.stat();
        let dev = fs.unmount().unwrap();

        let mut fs2 = Filesystem::mount(dev).unwrap();
        assert_eq!(fs2.stat(), stat_before);

        let mut out = [0u8; 9];
        assert_eq!(fs2.read("/f", &mut out, 9, 0).unwrap(), 9);
        assert_eq!(&out, b"persisted");

        let listing = fs2.list("/").unwrap();
        assert_eq!(listing.len(), 2);
    }

    #[test]
    fn bitmap_state_survives_unmount_unlike_the_allocate_then_never_persist_bug() {
        let dev = MemoryBlockDevice::new(64);
        let mut fs = Filesystem::format(dev).unwrap();
        fs.create("/a", false).unwrap();
        let dev = fs.unmount().unwrap();

        let mut fs2 = Filesystem::mount(dev).unwrap();
        assert_eq!(fs2.create("/a", false), Err(FsError::AlreadyExists));
        fs2.create("/b", false).unwrap();
        let dev2 = fs2.unmount().unwrap();

        let fs3 = Filesystem::mount(dev2).unwrap();
        let stat = fs3.stat();
        // root + "a" + "b" inodes in use, plus "a" and "b" each own zero extra blocks
        // (files start with size 0, no allocated data blocks).
        assert_eq!(stat.inodes_count - stat.free_inodes, 3);
    }
}
