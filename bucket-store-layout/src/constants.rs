use std::ops::Range;

/// Size of every block in a bucket-store file.
pub const BLOCK_SIZE: usize = 512;

/// Block 0 always holds the file header.
pub const HEADER_BLOCK_INDEX: u32 = 0;

/// On-disk sentinel for "no block" (empty bucket, end of chain).
pub const NO_BLOCK: i32 = -1;

// File header (block 0)
pub const FILE_KIND_RANGE: Range<usize> = 0..4;
pub const BUCKET_COUNT_RANGE: Range<usize> = 4..8;
pub const FIRST_DIRECTORY_BLOCK_RANGE: Range<usize> = 8..12;
pub const FILE_HEADER_SIZE: usize = 12;

// Bucket directory blocks
pub const DIRECTORY_NEXT_RANGE: Range<usize> = 0..4;
pub const DIRECTORY_HEADER_SIZE: usize = 4;
pub const DIRECTORY_SLOT_SIZE: usize = 4;
pub const SLOTS_PER_DIRECTORY_BLOCK: usize =
    (BLOCK_SIZE - DIRECTORY_HEADER_SIZE) / DIRECTORY_SLOT_SIZE;

// Data blocks
pub const ELEMENT_COUNT_RANGE: Range<usize> = 0..4;
pub const DATA_NEXT_RANGE: Range<usize> = 4..8;
pub const DATA_HEADER_SIZE: usize = 8;

// Record
pub const NAME_LEN: usize = 15;
pub const SURNAME_LEN: usize = 25;
pub const ADDRESS_LEN: usize = 50;

pub const RECORD_ID_RANGE: Range<usize> = 0..4;
pub const RECORD_NAME_RANGE: Range<usize> = 4..4 + NAME_LEN;
pub const RECORD_SURNAME_RANGE: Range<usize> =
    RECORD_NAME_RANGE.end..RECORD_NAME_RANGE.end + SURNAME_LEN;
pub const RECORD_ADDRESS_RANGE: Range<usize> =
    RECORD_SURNAME_RANGE.end..RECORD_SURNAME_RANGE.end + ADDRESS_LEN;
pub const RECORD_SIZE: usize = RECORD_ADDRESS_RANGE.end; // 94 bytes, packed

// Secondary index entry
pub const ENTRY_SURNAME_RANGE: Range<usize> = 0..SURNAME_LEN;
pub const ENTRY_BLOCK_REF_RANGE: Range<usize> = SURNAME_LEN..SURNAME_LEN + 4;
pub const SECONDARY_ENTRY_SIZE: usize = ENTRY_BLOCK_REF_RANGE.end; // 29 bytes, packed

/// Number of `element_size`-byte elements that fit in one data block.
#[inline]
pub const fn elements_per_data_block(element_size: usize) -> usize {
    (BLOCK_SIZE - DATA_HEADER_SIZE) / element_size
}

/// Number of directory blocks needed to hold `bucket_count` chain heads.
#[inline]
pub const fn directory_blocks_for(bucket_count: u32) -> u32 {
    (bucket_count as usize).div_ceil(SLOTS_PER_DIRECTORY_BLOCK) as u32
}
