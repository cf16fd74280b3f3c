use crate::constants::*;
use crate::{LayoutError, read_link, write_link};
use std::ops::Range;

/// Byte range of chain-head slot `slot` inside a directory block.
#[inline]
pub fn directory_slot_range(slot: usize) -> Range<usize> {
    debug_assert!(slot < SLOTS_PER_DIRECTORY_BLOCK, "directory slot out of range");
    let start = DIRECTORY_HEADER_SIZE + slot * DIRECTORY_SLOT_SIZE;
    start..start + DIRECTORY_SLOT_SIZE
}

/// Link to the following directory block.
#[inline]
pub fn read_directory_next(block: &[u8]) -> Result<Option<u32>, LayoutError> {
    read_link(block, DIRECTORY_NEXT_RANGE)
}

#[inline]
pub fn write_directory_next(block: &mut [u8], next: Option<u32>) {
    write_link(block, DIRECTORY_NEXT_RANGE, next);
}

/// Head of the chain for `slot`, or `None` for an empty bucket.
#[inline]
pub fn read_chain_head(block: &[u8], slot: usize) -> Result<Option<u32>, LayoutError> {
    read_link(block, directory_slot_range(slot))
}

#[inline]
pub fn write_chain_head(block: &mut [u8], slot: usize, head: Option<u32>) {
    write_link(block, directory_slot_range(slot), head);
}

/// Number of live slots in directory block `ordinal` (0-based) of a file
/// with `bucket_count` buckets. Every block is full except possibly the last.
#[inline]
pub fn live_directory_slots(ordinal: u32, bucket_count: u32) -> usize {
    let before = ordinal as usize * SLOTS_PER_DIRECTORY_BLOCK;
    (bucket_count as usize)
        .saturating_sub(before)
        .min(SLOTS_PER_DIRECTORY_BLOCK)
}

/// Fills a freshly allocated directory block: no successor and the first
/// `live_slots` slots empty. Slots past `live_slots` are left untouched.
pub fn init_directory_block(block: &mut [u8], live_slots: usize) {
    write_directory_next(block, None);
    for slot in 0..live_slots.min(SLOTS_PER_DIRECTORY_BLOCK) {
        write_chain_head(block, slot, None);
    }
}
