//! Construction of the final, partial packet.
//!
//! When the input length is not a multiple of `PACKET_SIZE`, the excessive bytes are padded into
//! one last packet. The layout of this packet is fixed; both backends build it through this
//! module.

use lanes::PACKET_SIZE;

/// The value added to every lane of `v0` before the final packet is absorbed.
///
/// Both 32-bit halves hold the number of excessive bytes.
#[inline]
pub fn length_tag(size_mod32: usize) -> u64 {
    ((size_mod32 as u64) << 32) + size_mod32 as u64
}

/// Pad the excessive bytes into a packet.
///
/// The bytes up to the last multiple of four are copied verbatim. The remaining (at most three)
/// bytes are placed depending on whether the upper half of the packet is in use: if so, the last
/// four input bytes are copied to the end of the packet, otherwise the first, middle and last of
/// the remaining bytes are written to offset 16, 17 and 18.
///
/// This assumes that `tail.len() < PACKET_SIZE`.
pub fn final_packet(tail: &[u8]) -> [u8; PACKET_SIZE] {
    let size_mod32 = tail.len();
    debug_assert!(size_mod32 < PACKET_SIZE, "The tail must be shorter than a packet.");

    let size_mod4 = size_mod32 & 3;
    let (aligned, remainder) = tail.split_at(size_mod32 - size_mod4);

    let mut packet = [0; PACKET_SIZE];
    packet[..aligned.len()].copy_from_slice(aligned);

    if size_mod32 & 16 != 0 {
        packet[28..].copy_from_slice(&tail[size_mod32 - 4..]);
    } else if size_mod4 != 0 {
        packet[16] = remainder[0];
        packet[16 + 1] = remainder[size_mod4 >> 1];
        packet[16 + 2] = remainder[size_mod4 - 1];
    }

    packet
}
