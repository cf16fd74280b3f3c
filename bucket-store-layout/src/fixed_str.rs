use crate::LayoutError;

/// Checks that `value` fits a NUL-terminated field of `width` bytes.
///
/// At most `width - 1` bytes of text are allowed so the stored field always
/// ends with a NUL, and the text itself may not contain one.
pub fn validate_fixed_str(
    field: &'static str,
    value: &str,
    width: usize,
) -> Result<(), LayoutError> {
    if value.as_bytes().contains(&0) {
        return Err(LayoutError::InteriorNul { field });
    }
    if value.len() >= width {
        return Err(LayoutError::FieldTooLong {
            field,
            len: value.len(),
            max: width - 1,
        });
    }
    Ok(())
}

/// Writes `value` into `dst`, NUL-padding the remainder.
///
/// The caller is expected to have validated `value` with
/// [`validate_fixed_str`]; overlong input is truncated to `dst.len() - 1`.
pub fn encode_fixed_str(dst: &mut [u8], value: &str) {
    dst.fill(0);
    let len = value.len().min(dst.len().saturating_sub(1));
    dst[..len].copy_from_slice(&value.as_bytes()[..len]);
}

/// Returns the bytes of a fixed field up to (not including) the first NUL.
#[inline]
pub fn fixed_str_bytes(src: &[u8]) -> &[u8] {
    let end = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    &src[..end]
}

/// Reads a NUL-padded field back into a `String`.
pub fn decode_fixed_str(src: &[u8]) -> String {
    String::from_utf8_lossy(fixed_str_bytes(src)).into_owned()
}
