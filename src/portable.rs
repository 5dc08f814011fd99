//! The portable implementation.
//!
//! This processes one lane at a time and runs on any target. Every other backend must produce
//! exactly the same output.

use key::Key;
use lanes::{self, Lanes, INIT0, INIT1, PACKET_SIZE};
use remainder;

/// The hash state.
///
/// This is created from the key, mutated by every packet, and finally consumed by `finalize`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct State {
    v0: Lanes,
    v1: Lanes,
    mul0: Lanes,
    mul1: Lanes,
}

impl State {
    /// Create the initial state for some key.
    pub fn new(key: &Lanes) -> State {
        let permuted_key = lanes::rotate_64_by_32(key);

        let mut state = State {
            v0: [0; 4],
            v1: [0; 4],
            mul0: INIT0,
            mul1: INIT1,
        };

        for lane in 0..4 {
            state.v0[lane] = INIT0[lane] ^ key[lane];
            state.v1[lane] = INIT1[lane] ^ permuted_key[lane];
        }

        state
    }

    /// Absorb a 32-byte packet.
    #[inline]
    pub fn update(&mut self, packet: &[u8]) {
        self.update_lanes(&lanes::load(packet));
    }

    /// Absorb a packet which has already been decoded into lanes.
    pub fn update_lanes(&mut self, packet: &Lanes) {
        for lane in 0..4 {
            self.v1[lane] = self.v1[lane].wrapping_add(packet[lane]).wrapping_add(self.mul0[lane]);
            self.mul0[lane] ^= (self.v1[lane] & 0xffffffff).wrapping_mul(self.v0[lane] >> 32);
            self.v0[lane] = self.v0[lane].wrapping_add(self.mul1[lane]);
            self.mul1[lane] ^= (self.v0[lane] & 0xffffffff).wrapping_mul(self.v1[lane] >> 32);
        }

        // `v1` is folded into `v0` first, and the updated `v0` is then folded back into `v1`.
        {
            let [ref mut v0_0, ref mut v0_1, ref mut v0_2, ref mut v0_3] = self.v0;
            lanes::zipper_merge_and_add(self.v1[1], self.v1[0], v0_1, v0_0);
            lanes::zipper_merge_and_add(self.v1[3], self.v1[2], v0_3, v0_2);
        }
        {
            let [ref mut v1_0, ref mut v1_1, ref mut v1_2, ref mut v1_3] = self.v1;
            lanes::zipper_merge_and_add(self.v0[1], self.v0[0], v1_1, v1_0);
            lanes::zipper_merge_and_add(self.v0[3], self.v0[2], v1_3, v1_2);
        }
    }

    /// Absorb the permuted `v0` as a packet.
    pub fn permute_and_update(&mut self) {
        let permuted = lanes::permute(&self.v0);
        self.update_lanes(&permuted);
    }

    /// Absorb the excessive bytes which do not fill a whole packet.
    ///
    /// This assumes that `0 < tail.len() < PACKET_SIZE`.
    pub fn update_remainder(&mut self, tail: &[u8]) {
        let size_mod32 = tail.len();
        debug_assert!(size_mod32 != 0 && size_mod32 < PACKET_SIZE, "Invalid remainder length.");

        let tag = remainder::length_tag(size_mod32);
        for lane in self.v0.iter_mut() {
            *lane = lane.wrapping_add(tag);
        }
        lanes::rotate_32_by(size_mod32 as u32, &mut self.v1);

        self.update(&remainder::final_packet(tail));
    }

    /// Run the finalization rounds and compute the digest.
    pub fn finalize(mut self) -> u64 {
        for _ in 0..4 {
            self.permute_and_update();
        }

        self.v0[0]
            .wrapping_add(self.v1[0])
            .wrapping_add(self.mul0[0])
            .wrapping_add(self.mul1[0])
    }

    /// Get the vectors `v0`, `v1`, `mul0` and `mul1`.
    #[cfg(test)]
    pub fn vectors(&self) -> [Lanes; 4] {
        [self.v0, self.v1, self.mul0, self.mul1]
    }
}

/// Hash a buffer with the portable implementation.
pub fn hash(key: &Key, buf: &[u8]) -> u64 {
    let mut state = State::new(key.lanes());

    let mut packets = buf.chunks_exact(PACKET_SIZE);
    for packet in &mut packets {
        state.update(packet);
    }

    let tail = packets.remainder();
    if !tail.is_empty() {
        state.update_remainder(tail);
    }

    state.finalize()
}
