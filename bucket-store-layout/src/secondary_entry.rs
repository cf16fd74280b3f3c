use crate::constants::*;
use crate::layout_error::ensure_len;
use crate::{
    BlockElement, LayoutError, decode_fixed_str, encode_fixed_str, fixed_str_bytes, read_i32,
    validate_fixed_str,
};

/// An element of a secondary hash file: a surname and the primary data block
/// expected to hold the record with that surname.
///
/// ## Layout (29 bytes, packed)
///
/// - **Offset `0` → `25`**: `surname`
/// - **Offset `25` → `29`**: primary block index (`i32`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecondaryEntry {
    surname: String,
    primary_block: u32,
}

impl SecondaryEntry {
    pub fn new(surname: impl Into<String>, primary_block: u32) -> Result<Self, LayoutError> {
        let surname = surname.into();
        validate_fixed_str("surname", &surname, SURNAME_LEN)?;
        if primary_block > i32::MAX as u32 {
            return Err(LayoutError::InvalidBlockLink(primary_block as i32));
        }
        Ok(Self {
            surname,
            primary_block,
        })
    }

    #[inline]
    pub fn surname(&self) -> &str {
        &self.surname
    }

    #[inline]
    pub fn primary_block(&self) -> u32 {
        self.primary_block
    }

    /// The raw surname field of an encoded entry, without its NUL padding.
    #[inline]
    pub fn surname_of(encoded: &[u8]) -> &[u8] {
        fixed_str_bytes(&encoded[ENTRY_SURNAME_RANGE])
    }
}

impl BlockElement for SecondaryEntry {
    const SIZE: usize = SECONDARY_ENTRY_SIZE;

    fn serialize_into(&self, buf: &mut [u8]) {
        encode_fixed_str(&mut buf[ENTRY_SURNAME_RANGE], &self.surname);
        buf[ENTRY_BLOCK_REF_RANGE].copy_from_slice(&(self.primary_block as i32).to_le_bytes());
    }

    fn deserialize(buf: &[u8]) -> Result<Self, LayoutError> {
        ensure_len(buf, SECONDARY_ENTRY_SIZE)?;
        let raw_block = read_i32(buf, ENTRY_BLOCK_REF_RANGE);
        if raw_block < 0 {
            return Err(LayoutError::InvalidBlockLink(raw_block));
        }
        Ok(Self {
            surname: decode_fixed_str(&buf[ENTRY_SURNAME_RANGE]),
            primary_block: raw_block as u32,
        })
    }
}
