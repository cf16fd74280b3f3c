use crate::constants::*;
use crate::layout_error::ensure_len;
use crate::{LayoutError, read_link, read_u32, write_link};
use std::ops::Range;

/// Header at the start of every data block.
///
/// - **Offset `0` → `4`**: number of live elements (`u32`)
/// - **Offset `4` → `8`**: next block in the bucket's chain (`i32`, `-1` = tail)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataBlockHeader {
    pub element_count: u32,
    pub next_block: Option<u32>,
}

impl DataBlockHeader {
    #[inline]
    pub fn serialize_into(&self, block: &mut [u8]) {
        block[ELEMENT_COUNT_RANGE].copy_from_slice(&self.element_count.to_le_bytes());
        write_link(block, DATA_NEXT_RANGE, self.next_block);
    }

    #[inline]
    pub fn deserialize(block: &[u8]) -> Result<Self, LayoutError> {
        ensure_len(block, DATA_HEADER_SIZE)?;
        Ok(Self {
            element_count: read_u32(block, ELEMENT_COUNT_RANGE),
            next_block: read_link(block, DATA_NEXT_RANGE)?,
        })
    }
}

/// Byte range of element `index` in a data block of `element_size`-byte
/// elements.
#[inline]
pub fn data_element_range(index: usize, element_size: usize) -> Range<usize> {
    let start = DATA_HEADER_SIZE + index * element_size;
    start..start + element_size
}
