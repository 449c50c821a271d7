//! Polymorphic variant tag hashing.

/// The 31-bit hash the origin compiler assigns to a polymorphic variant tag.
///
/// Bytes are folded with `accu * 223 + byte` in 32-bit wrapping arithmetic,
/// truncated to 31 bits, then read as a signed 31-bit integer.
pub fn variant_hash(tag: &str) -> i32 {
    let mut accu: u32 = 0;
    for byte in tag.bytes() {
        accu = accu.wrapping_mul(223).wrapping_add(u32::from(byte));
    }
    accu &= (1 << 31) - 1;
    if accu > 0x3FFF_FFFF {
        (i64::from(accu) - (1_i64 << 31)) as i32
    } else {
        accu as i32
    }
}
