//! Block-pointer addressing and positional file I/O.
//!
//! Offsets are mapped to physical blocks through direct pointers first, then a single
//! indirect block. Allocation of new pointers happens lazily, during `write`, through an
//! injected allocator closure so this module never needs to know about the block bitmap.

use crate::device::{Block, BlockDevice, BLOCK_SIZE};
use crate::error::FsError;
use crate::inode::{BlockNumber, Inode};
use crate::layout::{DIRECT_POINTERS, MAX_FILE_SIZE, POINTERS_PER_BLOCK};

fn logical_block_count(offset: u64, count: u64) -> Result<(u64, u64), FsError> {
    let end = offset.checked_add(count).ok_or(FsError::FileTooLarge)?;
    if end > MAX_FILE_SIZE {
        return Err(FsError::FileTooLarge);
    }
    Ok((offset / BLOCK_SIZE as u64, end.div_ceil(BLOCK_SIZE as u64)))
}

fn read_indirect<D: BlockDevice>(dev: &D, indirect: u32) -> Result<[u32; POINTERS_PER_BLOCK], FsError> {
    let mut buf = [0u8; BLOCK_SIZE];
    dev.read(indirect, &mut buf)?;
    let mut out = [0u32; POINTERS_PER_BLOCK];
    for (i, chunk) in buf.chunks_exact(4).enumerate() {
        out[i] = u32::from_le_bytes(chunk.try_into().unwrap());
    }
    Ok(out)
}

fn write_indirect<D: BlockDevice>(
    dev: &mut D,
    indirect: u32,
    pointers: &[u32; POINTERS_PER_BLOCK],
) -> Result<(), FsError> {
    let mut buf = [0u8; BLOCK_SIZE];
    for (i, p) in pointers.iter().enumerate() {
        buf[i * 4..i * 4 + 4].copy_from_slice(&p.to_le_bytes());
    }
    dev.write(indirect, &buf)?;
    Ok(())
}

/// Maps a logical block index to its physical block number for reading.
///
/// A pointer that was never allocated is a hard error, not a sparse-file zero.
pub fn block_for_read<D: BlockDevice>(
    dev: &D,
    inode: &Inode,
    logical_index: u64,
) -> Result<BlockNumber, FsError> {
    let idx = logical_index as usize;
    if idx < DIRECT_POINTERS {
        let b = inode.direct[idx];
        return if b == 0 {
            Err(FsError::HoleRead)
        } else {
            Ok(BlockNumber(b))
        };
    }
    let j = idx - DIRECT_POINTERS;
    if j >= POINTERS_PER_BLOCK {
        return Err(FsError::FileTooLarge);
    }
    if inode.indirect == 0 {
        return Err(FsError::HoleRead);
    }
    let pointers = read_indirect(dev, inode.indirect)?;
    if pointers[j] == 0 {
        return Err(FsError::HoleRead);
    }
    Ok(BlockNumber(pointers[j]))
}

/// Maps a logical block index to its physical block number for writing, allocating any
/// missing direct pointer, indirect block, or indirect slot along the way via `alloc`.
pub fn block_for_write<D: BlockDevice>(
    dev: &mut D,
    inode: &mut Inode,
    logical_index: u64,
    alloc: &mut impl FnMut() -> Result<u32, FsError>,
) -> Result<BlockNumber, FsError> {
    let idx = logical_index as usize;
    if idx < DIRECT_POINTERS {
        if inode.direct[idx] == 0 {
            inode.direct[idx] = alloc()?;
        }
        return Ok(BlockNumber(inode.direct[idx]));
    }
    let j = idx - DIRECT_POINTERS;
    if j >= POINTERS_PER_BLOCK {
        return Err(FsError::FileTooLarge);
    }
    if inode.indirect == 0 {
        inode.indirect = alloc()?;
        write_indirect(dev, inode.indirect, &[0u32; POINTERS_PER_BLOCK])?;
    }
    let mut pointers = read_indirect(dev, inode.indirect)?;
    if pointers[j] == 0 {
        pointers[j] = alloc()?;
        write_indirect(dev, inode.indirect, &pointers)?;
    }
    Ok(BlockNumber(pointers[j]))
}

/// Every physical block referenced by `inode`'s direct and indirect pointers, plus the
/// indirect block itself, in no particular order. Used when freeing a file on removal.
pub fn all_data_blocks<D: BlockDevice>(dev: &D, inode: &Inode) -> Result<alloc::vec::Vec<u32>, FsError> {
    let mut out = alloc::vec::Vec::new();
    for &b in inode.direct.iter() {
        if b != 0 {
            out.push(b);
        }
    }
    if inode.indirect != 0 {
        let pointers = read_indirect(dev, inode.indirect)?;
        out.extend(pointers.into_iter().filter(|&b| b != 0));
        out.push(inode.indirect);
    }
    Ok(out)
}

/// Reads up to `count` bytes starting at `offset`, clamped to the inode's recorded size.
///
/// Returns the number of bytes actually read.
pub fn read_file<D: BlockDevice>(
    dev: &D,
    inode: &Inode,
    buf: &mut [u8],
    count: usize,
    offset: u64,
) -> Result<usize, FsError> {
    let size = inode.size as u64;
    if offset >= size {
        return Ok(0);
    }
    let count = (count as u64).min(size - offset) as usize;
    if count == 0 {
        return Ok(0);
    }

    let mut read_total = 0usize;
    let mut pos = offset;
    let mut block_buf: Block = [0u8; BLOCK_SIZE];
    while read_total < count {
        let logical = pos / BLOCK_SIZE as u64;
        let in_block = (pos % BLOCK_SIZE as u64) as usize;
        let phys = block_for_read(dev, inode, logical)?;
        dev.read(phys.0, &mut block_buf)?;

        let take = (BLOCK_SIZE - in_block).min(count - read_total);
        buf[read_total..read_total + take].copy_from_slice(&block_buf[in_block..in_block + take]);

        read_total += take;
        pos += take as u64;
    }
    Ok(read_total)
}

/// Writes `count` bytes from `buf` starting at `offset`, allocating blocks as needed and
/// advancing `inode.size` to `max(inode.size, offset + count)`.
///
/// Data blocks are written before `inode.size` is advanced; a mid-stream device failure
/// leaves whatever prefix was already persisted, with no rollback.
pub fn write_file<D: BlockDevice>(
    dev: &mut D,
    inode: &mut Inode,
    buf: &[u8],
    count: usize,
    offset: u64,
    alloc: &mut impl FnMut() -> Result<u32, FsError>,
) -> Result<(), FsError> {
    if count == 0 {
        return Ok(());
    }
    let (_, _) = logical_block_count(offset, count as u64)?;

    let mut written = 0usize;
    let mut pos = offset;
    let mut block_buf: Block = [0u8; BLOCK_SIZE];
    while written < count {
        let logical = pos / BLOCK_SIZE as u64;
        let in_block = (pos % BLOCK_SIZE as u64) as usize;
        let phys = block_for_write(dev, inode, logical, alloc)?;

        let take = (BLOCK_SIZE - in_block).min(count - written);
        if in_block != 0 || take != BLOCK_SIZE {
            dev.read(phys.0, &mut block_buf)?;
        }
        block_buf[in_block..in_block + take].copy_from_slice(&buf[written..written + take]);
        dev.write(phys.0, &block_buf)?;

        written += take;
        pos += take as u64;
    }

    inode.size = inode.size.max((offset + count as u64) as u32);
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::device::MemoryBlockDevice;

    fn allocator(next: &mut u32) -> impl FnMut() -> Result<u32, FsError> + '_ {
        move || {
            let b = *next;
            *next += 1;
            Ok(b)
        }
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut dev = MemoryBlockDevice::new(64);
        let mut inode = Inode::new_file();
        let mut next_block = 20u32;
        write_file(&mut dev, &mut inode, b"hello", 5, 0, &mut allocator(&mut next_block)).unwrap();

        let mut out = [0u8; 5];
        let n = read_file(&dev, &inode, &mut out, 5, 0).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&out, b"hello");
    }

    #[test]
    fn write_crossing_into_indirect_block_allocates_it() {
        let mut dev = MemoryBlockDevice::new(4096);
        let mut inode = Inode::new_file();
        let mut next_block = 50u32;
        let len = DIRECT_POINTERS * BLOCK_SIZE + 10;
        let data = alloc::vec![0xABu8; len];
        write_file(&mut dev, &mut inode, &data, len, 0, &mut allocator(&mut next_block)).unwrap();

        assert_eq!(inode.size as usize, len);
        assert_ne!(inode.indirect, 0);

        let mut out = alloc::vec![0u8; len];
        let n = read_file(&dev, &inode, &mut out, len, 0).unwrap();
        assert_eq!(n, len);
        assert_eq!(out, data);
    }

    #[test]
    fn read_past_size_returns_zero() {
        let dev = MemoryBlockDevice::new(8);
        let inode = Inode::new_file();
        let mut out = [0u8; 4];
        assert_eq!(read_file(&dev, &inode, &mut out, 4, 0).unwrap(), 0);
    }

    #[test]
    fn read_of_unallocated_hole_fails() {
        let dev = MemoryBlockDevice::new(8);
        let mut inode = Inode::new_file();
        inode.size = BLOCK_SIZE as u32;
        let mut out = [0u8; 4];
        assert_eq!(read_file(&dev, &inode, &mut out, 4, 0), Err(FsError::HoleRead));
    }

    #[test]
    fn write_past_max_file_size_fails() {
        let mut dev = MemoryBlockDevice::new(8);
        let mut inode = Inode::new_file();
        let mut next_block = 1u32;
        let err = write_file(
            &mut dev,
            &mut inode,
            b"x",
            1,
            MAX_FILE_SIZE,
            &mut allocator(&mut next_block),
        )
        .unwrap_err();
        assert_eq!(err, FsError::FileTooLarge);
    }
}
