/// Maps a string key to a bucket in `0..bucket_count`.
///
/// djb2: `hash = hash * 33 + byte`, seeded with 5381, in wrapping `u64`.
/// Hashing stops at the first NUL so a padded on-disk field and the bare key
/// hash alike. Bytes are added as signed values, which only matters for
/// non-ASCII input.
///
/// # Panics
/// - If `bucket_count` is zero.
#[inline]
pub fn hash_str_key(key: &[u8], bucket_count: u32) -> u32 {
    let hash = key
        .iter()
        .take_while(|&&b| b != 0)
        .fold(5381u64, |hash, &b| {
            hash.wrapping_shl(5)
                .wrapping_add(hash)
                .wrapping_add(b as i8 as i64 as u64)
        });

    (hash % bucket_count as u64) as u32
}
