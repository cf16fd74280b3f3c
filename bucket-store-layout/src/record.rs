use crate::constants::*;
use crate::layout_error::ensure_len;
use crate::{
    BlockElement, LayoutError, decode_fixed_str, encode_fixed_str, read_i32, validate_fixed_str,
};
use std::fmt;

/// The fixed-width record stored in primary hash files.
///
/// ## Layout (94 bytes, packed)
///
/// - **Offset `0` → `4`**: `id` (`i32`), the primary key
/// - **Offset `4` → `19`**: `name`
/// - **Offset `19` → `44`**: `surname`, the secondary key
/// - **Offset `44` → `94`**: `address`
///
/// Text fields are NUL-padded and always NUL-terminated, so each holds at
/// most its width minus one byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    id: i32,
    name: String,
    surname: String,
    address: String,
}

impl Record {
    pub fn new(
        id: i32,
        name: impl Into<String>,
        surname: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self, LayoutError> {
        let (name, surname, address) = (name.into(), surname.into(), address.into());

        validate_fixed_str("name", &name, NAME_LEN)?;
        validate_fixed_str("surname", &surname, SURNAME_LEN)?;
        validate_fixed_str("address", &address, ADDRESS_LEN)?;

        Ok(Self {
            id,
            name,
            surname,
            address,
        })
    }

    #[inline]
    pub fn id(&self) -> i32 {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn surname(&self) -> &str {
        &self.surname
    }

    #[inline]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Reads only the key out of an encoded record.
    #[inline]
    pub fn id_of(encoded: &[u8]) -> i32 {
        read_i32(encoded, RECORD_ID_RANGE)
    }

    /// The raw surname field of an encoded record, without its NUL padding.
    #[inline]
    pub fn surname_of(encoded: &[u8]) -> &[u8] {
        crate::fixed_str_bytes(&encoded[RECORD_SURNAME_RANGE])
    }
}

impl BlockElement for Record {
    const SIZE: usize = RECORD_SIZE;

    fn serialize_into(&self, buf: &mut [u8]) {
        buf[RECORD_ID_RANGE].copy_from_slice(&self.id.to_le_bytes());
        encode_fixed_str(&mut buf[RECORD_NAME_RANGE], &self.name);
        encode_fixed_str(&mut buf[RECORD_SURNAME_RANGE], &self.surname);
        encode_fixed_str(&mut buf[RECORD_ADDRESS_RANGE], &self.address);
    }

    fn deserialize(buf: &[u8]) -> Result<Self, LayoutError> {
        ensure_len(buf, RECORD_SIZE)?;
        Ok(Self {
            id: read_i32(buf, RECORD_ID_RANGE),
            name: decode_fixed_str(&buf[RECORD_NAME_RANGE]),
            surname: decode_fixed_str(&buf[RECORD_SURNAME_RANGE]),
            address: decode_fixed_str(&buf[RECORD_ADDRESS_RANGE]),
        })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Surname: {}, Address: {}",
            self.id, self.name, self.surname, self.address
        )
    }
}
