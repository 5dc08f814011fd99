//! The SSE4.1 backend.
//!
//! Every lane vector is held in two 128-bit registers: `lo` with lanes 0 and 1, and `hi` with lanes
//! 2 and 3. The zipper merge then becomes a single byte shuffle per register.
//!
//! All functions in here assume that the host supports SSE4.1.

use std::arch::x86_64::*;

use lanes::{Lanes, INIT0, INIT1, PACKET_SIZE};
use remainder;

/// `_MM_SHUFFLE(2, 3, 0, 1)`: swap the 32-bit halves of both 64-bit lanes.
const SWAP_HALVES: i32 = 0b10_11_00_01;

/// Unaligned load of 16 bytes.
#[inline(always)]
unsafe fn loadu(src: *const u8) -> __m128i {
    _mm_loadu_si128(src as *const __m128i)
}

/// Unaligned store of 16 bytes.
#[inline(always)]
unsafe fn storeu(src: __m128i, dest: *mut u8) {
    _mm_storeu_si128(dest as *mut __m128i, src)
}

/// Lanes 0 and 1 of a vector.
#[inline(always)]
unsafe fn lo(v: &Lanes) -> __m128i {
    _mm_set_epi64x(v[1] as i64, v[0] as i64)
}

/// Lanes 2 and 3 of a vector.
#[inline(always)]
unsafe fn hi(v: &Lanes) -> __m128i {
    _mm_set_epi64x(v[3] as i64, v[2] as i64)
}

#[cfg(test)]
#[inline(always)]
unsafe fn unpack(low: __m128i, high: __m128i) -> Lanes {
    let mut lanes = [0; 4];
    storeu(low, lanes.as_mut_ptr() as *mut u8);
    storeu(high, lanes[2..].as_mut_ptr() as *mut u8);

    lanes
}

#[inline(always)]
unsafe fn add(a: __m128i, b: __m128i) -> __m128i {
    _mm_add_epi64(a, b)
}

#[inline(always)]
unsafe fn xor(a: __m128i, b: __m128i) -> __m128i {
    _mm_xor_si128(a, b)
}

#[inline(always)]
unsafe fn swap_halves(v: __m128i) -> __m128i {
    _mm_shuffle_epi32(v, SWAP_HALVES)
}

/// The zipper merge of a lane pair, as a byte shuffle.
#[inline(always)]
unsafe fn zipper(v: __m128i) -> __m128i {
    _mm_shuffle_epi8(v, _mm_set_epi64x(0x070806090D0A040B, 0x000F010E05020C03))
}

/// Low 32 bits of `a` times high 32 bits of `b`, per lane.
#[inline(always)]
unsafe fn mul_lo_hi(a: __m128i, b: __m128i) -> __m128i {
    _mm_mul_epu32(a, _mm_srli_epi64(b, 32))
}

/// Rotate every 32-bit half left by `count` bits.
#[inline(always)]
unsafe fn rotate_32_by(v: __m128i, count: i32) -> __m128i {
    let left = _mm_sll_epi32(v, _mm_cvtsi32_si128(count));
    let right = _mm_srl_epi32(v, _mm_cvtsi32_si128(32 - count));

    _mm_or_si128(left, right)
}

/// The hash state, held in registers.
#[derive(Clone, Copy)]
struct State {
    v0lo: __m128i,
    v0hi: __m128i,
    v1lo: __m128i,
    v1hi: __m128i,
    mul0lo: __m128i,
    mul0hi: __m128i,
    mul1lo: __m128i,
    mul1hi: __m128i,
}

impl State {
    #[inline(always)]
    unsafe fn new(key: &Lanes) -> State {
        let keylo = lo(key);
        let keyhi = hi(key);
        let mul0lo = lo(&INIT0);
        let mul0hi = hi(&INIT0);
        let mul1lo = lo(&INIT1);
        let mul1hi = hi(&INIT1);

        State {
            v0lo: xor(keylo, mul0lo),
            v0hi: xor(keyhi, mul0hi),
            v1lo: xor(swap_halves(keylo), mul1lo),
            v1hi: xor(swap_halves(keyhi), mul1hi),
            mul0lo: mul0lo,
            mul0hi: mul0hi,
            mul1lo: mul1lo,
            mul1hi: mul1hi,
        }
    }

    #[inline(always)]
    unsafe fn update(&mut self, plo: __m128i, phi: __m128i) {
        self.v1lo = add(add(self.v1lo, plo), self.mul0lo);
        self.v1hi = add(add(self.v1hi, phi), self.mul0hi);
        self.mul0lo = xor(self.mul0lo, mul_lo_hi(self.v1lo, self.v0lo));
        self.mul0hi = xor(self.mul0hi, mul_lo_hi(self.v1hi, self.v0hi));

        self.v0lo = add(self.v0lo, self.mul1lo);
        self.v0hi = add(self.v0hi, self.mul1hi);
        self.mul1lo = xor(self.mul1lo, mul_lo_hi(self.v0lo, self.v1lo));
        self.mul1hi = xor(self.mul1hi, mul_lo_hi(self.v0hi, self.v1hi));

        self.v0lo = add(self.v0lo, zipper(self.v1lo));
        self.v0hi = add(self.v0hi, zipper(self.v1hi));
        self.v1lo = add(self.v1lo, zipper(self.v0lo));
        self.v1hi = add(self.v1hi, zipper(self.v0hi));
    }

    /// Absorb a packet.
    ///
    /// # Panics
    ///
    /// This panics if `packet` is shorter than `PACKET_SIZE`.
    #[inline(always)]
    unsafe fn update_packet(&mut self, packet: &[u8]) {
        let packet = &packet[..PACKET_SIZE];
        let plo = loadu(packet.as_ptr());
        let phi = loadu(packet[16..].as_ptr());

        self.update(plo, phi);
    }

    #[inline(always)]
    unsafe fn permute_and_update(&mut self) {
        let plo = swap_halves(self.v0hi);
        let phi = swap_halves(self.v0lo);

        self.update(plo, phi);
    }

    #[inline(always)]
    unsafe fn update_remainder(&mut self, tail: &[u8]) {
        let size_mod32 = tail.len();

        let tag = _mm_set1_epi64x(remainder::length_tag(size_mod32) as i64);
        self.v0lo = add(self.v0lo, tag);
        self.v0hi = add(self.v0hi, tag);
        self.v1lo = rotate_32_by(self.v1lo, size_mod32 as i32);
        self.v1hi = rotate_32_by(self.v1hi, size_mod32 as i32);

        self.update_packet(&remainder::final_packet(tail));
    }

    #[inline(always)]
    unsafe fn finalize(mut self) -> u64 {
        for _ in 0..4 {
            self.permute_and_update();
        }

        let sum = add(add(self.v0lo, self.v1lo), add(self.mul0lo, self.mul1lo));

        _mm_cvtsi128_si64(sum) as u64
    }

    #[cfg(test)]
    unsafe fn vectors(&self) -> [Lanes; 4] {
        [
            unpack(self.v0lo, self.v0hi),
            unpack(self.v1lo, self.v1hi),
            unpack(self.mul0lo, self.mul0hi),
            unpack(self.mul1lo, self.mul1hi),
        ]
    }
}

/// Hash a buffer.
///
/// # Unsafety
///
/// The host must support SSE4.1.
#[target_feature(enable = "sse4.1")]
pub unsafe fn hash(key: &Lanes, buf: &[u8]) -> u64 {
    let mut state = State::new(key);

    let mut packets = buf.chunks_exact(PACKET_SIZE);
    for packet in &mut packets {
        state.update_packet(packet);
    }

    let tail = packets.remainder();
    if !tail.is_empty() {
        state.update_remainder(tail);
    }

    state.finalize()
}

/// The lane permutation of the finalization rounds.
#[cfg(test)]
#[target_feature(enable = "sse4.1")]
unsafe fn permute(v: &Lanes) -> Lanes {
    unpack(swap_halves(hi(v)), swap_halves(lo(v)))
}

/// The zipper merge of both lane pairs.
#[cfg(test)]
#[target_feature(enable = "sse4.1")]
unsafe fn zipper_merge(v: &Lanes) -> Lanes {
    unpack(zipper(lo(v)), zipper(hi(v)))
}

#[cfg(test)]
#[target_feature(enable = "sse4.1")]
unsafe fn updated(key: &Lanes, packet: &[u8]) -> [Lanes; 4] {
    let mut state = State::new(key);
    state.update_packet(packet);

    state.vectors()
}

#[cfg(test)]
#[target_feature(enable = "sse4.1")]
unsafe fn initial(key: &Lanes) -> [Lanes; 4] {
    State::new(key).vectors()
}
