use crate::LayoutError;
use crate::constants::NO_BLOCK;
use std::ops::Range;

/// Encodes an optional block index as the on-disk `i32` link.
///
/// Block indices never exceed `i32::MAX`; the block store refuses to
/// allocate past it.
#[inline]
pub fn encode_link(link: Option<u32>) -> i32 {
    match link {
        Some(index) => {
            debug_assert!(index <= i32::MAX as u32, "block {} has no i32 link", index);
            index as i32
        }
        None => NO_BLOCK,
    }
}

/// Decodes an on-disk `i32` link. `-1` is "no block"; any other negative
/// value is corrupt.
#[inline]
pub fn decode_link(raw: i32) -> Result<Option<u32>, LayoutError> {
    match raw {
        NO_BLOCK => Ok(None),
        index if index >= 0 => Ok(Some(index as u32)),
        other => Err(LayoutError::InvalidBlockLink(other)),
    }
}

#[inline]
pub fn read_i32(buf: &[u8], range: Range<usize>) -> i32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[range]);
    i32::from_le_bytes(bytes)
}

#[inline]
pub fn read_u32(buf: &[u8], range: Range<usize>) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[range]);
    u32::from_le_bytes(bytes)
}

#[inline]
pub fn read_link(buf: &[u8], range: Range<usize>) -> Result<Option<u32>, LayoutError> {
    decode_link(read_i32(buf, range))
}

#[inline]
pub fn write_link(buf: &mut [u8], range: Range<usize>, link: Option<u32>) {
    buf[range].copy_from_slice(&encode_link(link).to_le_bytes());
}
