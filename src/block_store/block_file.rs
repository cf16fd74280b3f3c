use crate::block_store::BLOCK_SIZE;
use memmap2::{Mmap, MmapMut};
use std::fs::{File, OpenOptions};
use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Highest block index a link can encode; links are stored as `i32`.
pub const MAX_BLOCK_INDEX: u32 = i32::MAX as u32;

/// The mapping behind a [`BlockFile`], matching how the file was opened.
enum Mapping {
    ReadWrite(MmapMut),
    ReadOnly(Mmap),
}

impl Mapping {
    fn bytes(&self) -> &[u8] {
        match self {
            Mapping::ReadWrite(mmap) => mmap,
            Mapping::ReadOnly(mmap) => mmap,
        }
    }
}

/// A file of fixed-size blocks, memory-mapped.
///
/// Opened with [`BlockFile::open`], `read_block` hands out a mutable view
/// straight into the mapping; edits are visible to later reads immediately and
/// are persisted by `write_block`, which flushes that block's byte range.
/// Opened with [`BlockFile::open_read_only`], only [`BlockFile::block`] works;
/// every mutating call fails with `PermissionDenied`.
pub struct BlockFile {
    file: File,
    mmap: Option<Mapping>,
    block_count: u32,
    path: PathBuf,
    writable: bool,
}

impl BlockFile {
    /// Creates an empty block file. Fails if `path` already exists.
    pub fn create(path: &Path) -> Result<()> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;
        file.sync_all()?;

        debug!("Created block file {}", path.display());
        Ok(())
    }

    /// Opens an existing block file read/write and maps it.
    ///
    /// # Returns:
    /// - `Ok(BlockFile)` on success.
    /// - `Err(std::io::Error)` if the file is missing, unreadable, or its
    ///   length is not a whole number of blocks.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::from_file(file, path, true)
    }

    /// Opens an existing block file for reading only. Works on files the
    /// process may not write.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().read(true).open(path)?;
        Self::from_file(file, path, false)
    }

    fn from_file(file: File, path: &Path, writable: bool) -> Result<Self> {
        let file_len = file.metadata()?.len();

        if file_len % BLOCK_SIZE as u64 != 0 {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "{} is {} bytes, not a multiple of the {}-byte block size",
                    path.display(),
                    file_len,
                    BLOCK_SIZE
                ),
            ));
        }

        let block_count = u32::try_from(file_len / BLOCK_SIZE as u64)
            .ok()
            .filter(|&count| count <= MAX_BLOCK_INDEX)
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, "too many blocks"))?;
        let mmap = Self::init_mmap(&file, block_count, writable)?;

        debug!(
            "Opened {} ({} blocks{})",
            path.display(),
            block_count,
            if writable { "" } else { ", read-only" }
        );

        Ok(Self {
            file,
            mmap,
            block_count,
            path: path.to_path_buf(),
            writable,
        })
    }

    /// Flushes the mapping (when writable) and releases the file.
    pub fn close(mut self) -> Result<()> {
        if self.writable {
            if let Some(Mapping::ReadWrite(mmap)) = self.mmap.take() {
                mmap.flush()?;
            }
            self.file.sync_all()?;
        }
        debug!("Closed {}", self.path.display());
        Ok(())
    }

    /// Appends one zeroed block and returns its index.
    ///
    /// Fails once the file holds `MAX_BLOCK_INDEX + 1` blocks, so every index
    /// handed out fits in an on-disk link.
    pub fn allocate_block(&mut self) -> Result<u32> {
        self.ensure_writable()?;
        let index = next_block_index(self.block_count)?;
        let new_count = index + 1;

        // Unmap before growing; the shared mapping keeps no dirty state of its own.
        if let Some(Mapping::ReadWrite(mmap)) = self.mmap.take() {
            mmap.flush()?;
        }
        self.file.set_len(new_count as u64 * BLOCK_SIZE as u64)?;
        self.mmap = Self::init_mmap(&self.file, new_count, true)?;
        self.block_count = new_count;

        trace!("Allocated block {} in {}", index, self.path.display());
        Ok(index)
    }

    /// Returns a mutable view of block `index`.
    pub fn read_block(&mut self, index: u32) -> Result<&mut [u8]> {
        self.ensure_writable()?;
        let range = self.block_range(index)?;
        match self.mmap.as_mut() {
            Some(Mapping::ReadWrite(mmap)) => Ok(&mut mmap[range]),
            _ => Err(Self::out_of_range(index, 0)),
        }
    }

    /// Returns a shared view of block `index`. Works in either open mode.
    pub fn block(&self, index: u32) -> Result<&[u8]> {
        let range = self.block_range(index)?;
        match self.mmap.as_ref() {
            Some(mapping) => Ok(&mapping.bytes()[range]),
            None => Err(Self::out_of_range(index, 0)),
        }
    }

    /// Persists block `index`.
    pub fn write_block(&mut self, index: u32) -> Result<()> {
        self.ensure_writable()?;
        let range = self.block_range(index)?;
        match self.mmap.as_ref() {
            Some(Mapping::ReadWrite(mmap)) => mmap.flush_range(range.start, BLOCK_SIZE),
            _ => Err(Self::out_of_range(index, 0)),
        }
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    #[inline]
    pub fn block_count(&self) -> u32 {
        self.block_count
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn block_range(&self, index: u32) -> Result<std::ops::Range<usize>> {
        if index >= self.block_count {
            return Err(Self::out_of_range(index, self.block_count));
        }
        let start = index as usize * BLOCK_SIZE;
        Ok(start..start + BLOCK_SIZE)
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.writable {
            return Ok(());
        }
        Err(Error::new(
            ErrorKind::PermissionDenied,
            format!("{} is open read-only", self.path.display()),
        ))
    }

    fn out_of_range(index: u32, block_count: u32) -> Error {
        Error::new(
            ErrorKind::InvalidInput,
            format!("block {} out of range (file has {} blocks)", index, block_count),
        )
    }

    /// Maps the file. An empty file has no mapping.
    ///
    /// # Safety:
    /// - Uses `memmap2::MmapOptions::map_mut` / `map`. The file must not be
    ///   truncated by anyone else while mapped; `BlockFile` itself only ever
    ///   grows it after dropping the old mapping.
    fn init_mmap(file: &File, block_count: u32, writable: bool) -> Result<Option<Mapping>> {
        if block_count == 0 {
            return Ok(None);
        }
        let options = memmap2::MmapOptions::new();
        let mapping = if writable {
            Mapping::ReadWrite(unsafe { options.map_mut(file)? })
        } else {
            Mapping::ReadOnly(unsafe { options.map(file)? })
        };
        Ok(Some(mapping))
    }
}

/// The index the next allocated block gets, given the current block count.
fn next_block_index(block_count: u32) -> Result<u32> {
    if block_count > MAX_BLOCK_INDEX {
        return Err(Error::new(
            ErrorKind::OutOfMemory,
            format!("block index space exhausted ({} blocks)", block_count),
        ));
    }
    Ok(block_count)
}
