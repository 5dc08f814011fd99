//! Lane vectors and the stateless primitives operating on them.
//!
//! A lane vector is four 64-bit words. Lane `i` is read from (and written to) byte offset `8 * i`
//! of a packet, in little-endian.

use byteorder::{ByteOrder, LittleEndian};

/// The number of lanes in a lane vector.
pub const NUM_LANES: usize = 4;
/// The number of bytes absorbed by a single update.
pub const PACKET_SIZE: usize = 8 * NUM_LANES;

/// A lane vector.
pub type Lanes = [u64; NUM_LANES];

/// The first initialization vector.
pub const INIT0: Lanes = [0xdbe6d5d5fe4cce2f, 0xa4093822299f31d0, 0x13198a2e03707344, 0x243f6a8885a308d3];
/// The second initialization vector.
pub const INIT1: Lanes = [0x3bd39e10cb0ef593, 0xc0acf169b5f18a8c, 0xbe5466cf34e90c6c, 0x452821e638d01377];

/// Swap the two 32-bit halves of a word.
#[inline(always)]
pub fn rot32(x: u64) -> u64 {
    x.rotate_left(32)
}

/// Swap the halves of every lane, keeping the lane order.
#[inline]
pub fn rotate_64_by_32(v: &Lanes) -> Lanes {
    [rot32(v[0]), rot32(v[1]), rot32(v[2]), rot32(v[3])]
}

/// Exchange the lower and upper lane pairs and swap the halves of every lane.
#[inline]
pub fn permute(v: &Lanes) -> Lanes {
    [rot32(v[2]), rot32(v[3]), rot32(v[0]), rot32(v[1])]
}

/// Rotate both 32-bit halves of every lane left by `count` bits.
///
/// The halves are rotated independently, so no bits cross from one half to the other.
#[inline]
pub fn rotate_32_by(count: u32, lanes: &mut Lanes) {
    for lane in lanes.iter_mut() {
        let half0 = *lane as u32;
        let half1 = (*lane >> 32) as u32;

        *lane = half0.rotate_left(count) as u64 | (half1.rotate_left(count) as u64) << 32;
    }
}

/// Shuffle the bytes of a lane pair.
///
/// `v0` is the lower lane and `v1` the upper one. Returns `(merged1, merged0)`, in the same
/// order. The byte mapping is fixed, and is the scalar form of the byte shuffle
///
/// ```text
/// 03 0c 02 05 0e 01 0f 00 | 0b 04 0a 0d 09 06 08 07
/// ```
///
/// over the 16 bytes of the pair.
#[inline(always)]
pub fn zipper_merge(v1: u64, v0: u64) -> (u64, u64) {
    let merged0 = (((v0 & 0xff000000) | (v1 & 0xff00000000)) >> 24)
        | (((v0 & 0xff0000000000) | (v1 & 0xff000000000000)) >> 16)
        | (v0 & 0xff0000)
        | ((v0 & 0xff00) << 32)
        | ((v1 & 0xff00000000000000) >> 8)
        | (v0 << 56);
    let merged1 = (((v1 & 0xff000000) | (v0 & 0xff00000000)) >> 24)
        | (v1 & 0xff0000)
        | ((v1 & 0xff0000000000) >> 16)
        | ((v1 & 0xff00) << 24)
        | ((v0 & 0xff000000000000) >> 8)
        | ((v1 & 0xff) << 48)
        | (v0 & 0xff00000000000000);

    (merged1, merged0)
}

/// Zipper-merge a lane pair and add the result into another pair.
#[inline(always)]
pub fn zipper_merge_and_add(v1: u64, v0: u64, add1: &mut u64, add0: &mut u64) {
    let (merged1, merged0) = zipper_merge(v1, v0);

    *add0 = add0.wrapping_add(merged0);
    *add1 = add1.wrapping_add(merged1);
}

/// Zipper-merge both lane pairs of a vector.
#[cfg(test)]
pub fn zipper_merge_lanes(v: &Lanes) -> Lanes {
    let (a1, a0) = zipper_merge(v[1], v[0]);
    let (b1, b0) = zipper_merge(v[3], v[2]);

    [a0, a1, b0, b1]
}

/// Decode a packet into lanes.
///
/// # Panics
///
/// This panics if `packet` is shorter than `PACKET_SIZE`.
#[inline]
pub fn load(packet: &[u8]) -> Lanes {
    let mut lanes = [0; NUM_LANES];
    LittleEndian::read_u64_into(&packet[..PACKET_SIZE], &mut lanes);

    lanes
}

/// Encode lanes into a packet.
#[cfg(test)]
pub fn store(lanes: &Lanes) -> [u8; PACKET_SIZE] {
    let mut packet = [0; PACKET_SIZE];
    LittleEndian::write_u64_into(lanes, &mut packet);

    packet
}
