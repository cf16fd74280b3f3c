/// Maps an integer key to a bucket in `0..bucket_count`.
///
/// Bob Jenkins' 32-bit shift cascade (6/17/9/4/3/10/15) in wrapping `i32`
/// arithmetic with arithmetic right shifts. The mixed value is taken as
/// unsigned before the modulo, so negative keys land in range too.
///
/// The exact bit pattern is part of the on-disk format: changing it strands
/// every record written by earlier builds in the wrong bucket.
///
/// # Panics
/// - If `bucket_count` is zero. Hash files reject that at creation.
#[inline]
pub fn hash_int_key(key: i32, bucket_count: u32) -> u32 {
    let mut k = key;
    k = k.wrapping_sub(k << 6);
    k ^= k >> 17;
    k = k.wrapping_sub(k << 9);
    k ^= k << 4;
    k = k.wrapping_sub(k << 3);
    k ^= k << 10;
    k ^= k >> 15;

    (k as u32) % bucket_count
}
