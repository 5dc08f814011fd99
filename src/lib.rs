//! HighwayHash: a fast, keyed, SIMD-friendly hash function.
//!
//! HighwayHash hashes a byte buffer under a 256-bit key into a 64-bit digest. The state consists of
//! four lane vectors (four 64-bit integers each), which absorb the input 32 bytes at a time through
//! multiplications, additions and a fixed byte shuffle (the "zipper merge").
//!
//! The digest is portable: it does not depend on the host architecture or endianness, and every
//! backend gives the exact same output.
//!
//! This is not a MAC. The key makes it infeasible to produce collisions without knowing the key,
//! but no stronger claims than those of the HighwayHash design are made.
//!
//! # Backends
//!
//! - `Portable`: runs on any target, processing one lane at a time.
//! - `Sse41`: runs on `x86_64` with SSE4.1, processing all four lanes at once. Compiled with the
//!   `sse41` feature (on by default).
//!
//! The backend is selected on first use, by probing the host. This can be overridden by setting
//! the environment variable `HIGHWAY_BACKEND` to `portable` or `sse41`, or by calling
//! `backend::init` before the first hash.
//!
//! # Example
//!
//! ```rust
//! let key = highway::Key::new([1, 2, 3, 4]);
//! let digest = highway::hash(&key, b"to be or not to be");
//!
//! assert_eq!(digest, highway::portable::hash(&key, b"to be or not to be"));
//! ```

#![warn(missing_docs)]

extern crate byteorder;
#[macro_use]
extern crate quick_error;
#[macro_use]
extern crate slog;

#[cfg(test)]
extern crate rand;

mod error;
mod hasher;
mod key;
mod lanes;
mod remainder;
#[cfg(all(feature = "sse41", target_arch = "x86_64"))]
mod sse41;
#[cfg(test)]
mod vectors;

pub mod backend;
pub mod portable;
pub mod settings;

pub use backend::Backend;
pub use error::Error;
pub use hasher::{HighwayBuildHasher, HighwayHasher};
pub use key::{Key, KEY_SIZE};
pub use lanes::{Lanes, NUM_LANES, PACKET_SIZE};
pub use settings::{Preference, Settings};

/// Hash a buffer.
///
/// This uses the backend of this process (see `Backend::current`).
pub fn hash(key: &Key, buf: &[u8]) -> u64 {
    Backend::current().hash(key, buf)
}

/// Hash a buffer under a key given as lanes.
pub fn hash_lanes(key: Lanes, buf: &[u8]) -> u64 {
    hash(&Key::new(key), buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectors::{self, KEY, EXPECTED};

    #[test]
    fn test_vectors() {
        for (len, &expected) in EXPECTED.iter().enumerate() {
            assert_eq!(hash(&KEY, &vectors::message(len)), expected, "length {}", len);
        }
    }

    #[test]
    fn boundaries() {
        assert_eq!(hash(&KEY, &[]), 0x907A56DE22C26E53);
        assert_eq!(hash(&KEY, &vectors::message(63)), 0xAB8EEBE9BF2139A0);
        assert_eq!(hash_lanes(*KEY.lanes(), &vectors::message(64)), 0x75542C5D4CD2A6FF);
    }

    #[test]
    fn deterministic() {
        let buf = vectors::message(200);
        for len in 0..buf.len() {
            assert_eq!(hash(&KEY, &buf[..len]), hash(&KEY, &buf[..len]));
        }
    }

    #[test]
    fn keyed() {
        let buf = vectors::message(50);
        let other = Key::new([0x0706050403020100, 0x0F0E0D0C0B0A0908, 0x1716151413121110, 0x1F1E1D1C1B1A1919]);

        assert_ne!(hash(&KEY, &buf), hash(&other, &buf));
        assert_ne!(hash(&KEY, &buf), hash(&Key::default(), &buf));
    }

    #[test]
    fn position_dependent() {
        let buf1 = vectors::message(4098);
        let buf2: Vec<u8> = buf1.iter().map(|x| x ^ 1).collect();

        assert_ne!(hash(&KEY, &buf1), hash(&KEY, &buf2));
    }

    #[test]
    fn tail_branches() {
        // No padding, low-half scatter, and high-half copy.
        let buf = vectors::message(96);
        let aligned = hash(&KEY, &buf[..64]);
        let low = hash(&KEY, &buf[..64 + 7]);
        let high = hash(&KEY, &buf[..64 + 23]);

        assert_eq!(aligned, EXPECTED[64]);
        assert_ne!(aligned, low);
        assert_ne!(low, high);
        assert_eq!(low, portable::hash(&KEY, &buf[..71]));
        assert_eq!(high, portable::hash(&KEY, &buf[..87]));
    }

    #[test]
    fn streaming_matches_one_shot() {
        use std::hash::Hasher;

        let buf = vectors::message(300);
        let mut hasher = HighwayHasher::new(&KEY);
        for chunk in buf.chunks(7) {
            hasher.write(chunk);
        }

        assert_eq!(hasher.finish(), hash(&KEY, &buf));
    }
}
