/// Failures while decoding or encoding a block structure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("unknown file kind tag: {0}")]
    UnknownFileKind(i32),

    #[error("invalid block link: {0}")]
    InvalidBlockLink(i32),

    #[error("field `{field}` is {len} bytes; at most {max} fit")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("field `{field}` contains a NUL byte")]
    InteriorNul { field: &'static str },

    #[error("buffer too short: need {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// Fails with [`LayoutError::Truncated`] when `buf` is shorter than `expected`.
#[inline]
pub(crate) fn ensure_len(buf: &[u8], expected: usize) -> Result<(), LayoutError> {
    if buf.len() < expected {
        return Err(LayoutError::Truncated {
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}
