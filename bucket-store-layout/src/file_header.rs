use crate::constants::*;
use crate::layout_error::ensure_len;
use crate::{LayoutError, read_i32, read_link, read_u32, write_link};
use std::fmt;

/// Kind tag stored at the start of every file.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    None = 0,
    Heap = 1,
    PrimaryHash = 2,
    SecondaryHash = 3,
}

impl FileKind {
    pub fn label(self) -> &'static str {
        match self {
            FileKind::None => "untagged file",
            FileKind::Heap => "heap file",
            FileKind::PrimaryHash => "primary hash file",
            FileKind::SecondaryHash => "secondary hash file",
        }
    }

    #[inline]
    pub fn is_hash_file(self) -> bool {
        matches!(self, FileKind::PrimaryHash | FileKind::SecondaryHash)
    }
}

impl TryFrom<i32> for FileKind {
    type Error = LayoutError;

    fn try_from(tag: i32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(FileKind::None),
            1 => Ok(FileKind::Heap),
            2 => Ok(FileKind::PrimaryHash),
            3 => Ok(FileKind::SecondaryHash),
            other => Err(LayoutError::UnknownFileKind(other)),
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Header stored in block 0 of a hash file.
///
/// ## Layout
///
/// - **Offset `0` → `4`**: kind tag (`i32`)
/// - **Offset `4` → `8`**: bucket count (`u32`), fixed at creation
/// - **Offset `8` → `12`**: index of the first directory block (`i32`, `-1` = none)
///
/// The rest of the block is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub kind: FileKind,
    pub bucket_count: u32,
    pub first_directory_block: Option<u32>,
}

impl FileHeader {
    pub fn new(kind: FileKind, bucket_count: u32) -> Self {
        Self {
            kind,
            bucket_count,
            first_directory_block: None,
        }
    }

    #[inline]
    pub fn serialize(&self) -> [u8; FILE_HEADER_SIZE] {
        let mut buf = [0u8; FILE_HEADER_SIZE];

        buf[FILE_KIND_RANGE].copy_from_slice(&(self.kind as i32).to_le_bytes());
        buf[BUCKET_COUNT_RANGE].copy_from_slice(&self.bucket_count.to_le_bytes());
        write_link(&mut buf, FIRST_DIRECTORY_BLOCK_RANGE, self.first_directory_block);

        buf
    }

    /// Decodes the header at the start of `data`.
    ///
    /// Only the kind tag is trusted unconditionally; callers that need a hash
    /// file must check [`FileHeader::kind`] themselves.
    #[inline]
    pub fn deserialize(data: &[u8]) -> Result<Self, LayoutError> {
        ensure_len(data, FILE_HEADER_SIZE)?;

        Ok(Self {
            kind: FileKind::try_from(read_i32(data, FILE_KIND_RANGE))?,
            bucket_count: read_u32(data, BUCKET_COUNT_RANGE),
            first_directory_block: read_link(data, FIRST_DIRECTORY_BLOCK_RANGE)?,
        })
    }
}
