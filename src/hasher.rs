//! The streaming version of the algorithm.

use std::cmp;
use std::hash::{BuildHasher, Hasher};

use key::Key;
use lanes::PACKET_SIZE;
use portable::State;

/// A streaming hasher.
///
/// Input can be written in pieces of any size; the digest only depends on the concatenation of
/// the pieces, and equals `highway::hash` of it under the same key.
#[derive(Clone)]
pub struct HighwayHasher {
    /// The hash state.
    state: State,
    /// The bytes not yet filling a whole packet.
    buffer: [u8; PACKET_SIZE],
    /// The number of bytes in `buffer`.
    buffered: usize,
}

impl Default for HighwayHasher {
    fn default() -> HighwayHasher {
        HighwayHasher::new(&Key::default())
    }
}

impl HighwayHasher {
    /// Create a new hasher with some key.
    pub fn new(key: &Key) -> HighwayHasher {
        HighwayHasher {
            state: State::new(key.lanes()),
            buffer: [0; PACKET_SIZE],
            buffered: 0,
        }
    }

    /// Write some bytes into the hasher.
    pub fn push(&mut self, mut buf: &[u8]) {
        if self.buffered != 0 {
            // Top up the partial packet first.
            let take = cmp::min(PACKET_SIZE - self.buffered, buf.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&buf[..take]);
            self.buffered += take;
            buf = &buf[take..];

            if self.buffered < PACKET_SIZE {
                return;
            }

            self.state.update(&self.buffer);
            self.buffered = 0;
        }

        let mut packets = buf.chunks_exact(PACKET_SIZE);
        for packet in &mut packets {
            self.state.update(packet);
        }

        let tail = packets.remainder();
        self.buffer[..tail.len()].copy_from_slice(tail);
        self.buffered = tail.len();
    }

    /// Compute the digest of the bytes written so far.
    ///
    /// This does not consume or modify the hasher, so more bytes can be written afterwards.
    pub fn digest(&self) -> u64 {
        let mut state = self.state.clone();
        if self.buffered != 0 {
            state.update_remainder(&self.buffer[..self.buffered]);
        }

        state.finalize()
    }
}

impl Hasher for HighwayHasher {
    fn finish(&self) -> u64 {
        self.digest()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.push(bytes);
    }
}

/// A `BuildHasher` creating keyed `HighwayHasher`s.
///
/// This allows using HighwayHash in `HashMap` and `HashSet`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HighwayBuildHasher {
    key: Key,
}

impl HighwayBuildHasher {
    /// Create a new builder with some key.
    pub fn new(key: Key) -> HighwayBuildHasher {
        HighwayBuildHasher {
            key: key,
        }
    }
}

impl BuildHasher for HighwayBuildHasher {
    type Hasher = HighwayHasher;

    fn build_hasher(&self) -> HighwayHasher {
        HighwayHasher::new(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::{self, Rng};

    use super::*;
    use portable;
    use vectors::{self, KEY, EXPECTED};

    #[test]
    fn test_vectors() {
        for (len, &expected) in EXPECTED.iter().enumerate() {
            let mut hasher = HighwayHasher::new(&KEY);
            hasher.write(&vectors::message(len));
            assert_eq!(hasher.finish(), expected, "length {}", len);
        }
    }

    #[test]
    fn empty() {
        assert_eq!(HighwayHasher::new(&KEY).finish(), EXPECTED[0]);
        assert_eq!(HighwayHasher::default().finish(), portable::hash(&Key::default(), &[]));
    }

    #[test]
    fn every_split() {
        let buf = vectors::message(100);

        for len in 0..buf.len() + 1 {
            let expected = portable::hash(&KEY, &buf[..len]);

            for split in 0..len + 1 {
                let mut hasher = HighwayHasher::new(&KEY);
                hasher.write(&buf[..split]);
                hasher.write(&buf[split..len]);

                assert_eq!(hasher.finish(), expected, "length {}, split {}", len, split);
            }
        }
    }

    #[test]
    fn byte_by_byte() {
        let buf = vectors::message(EXPECTED.len() - 1);
        let mut hasher = HighwayHasher::new(&KEY);

        for (len, &byte) in buf.iter().enumerate() {
            assert_eq!(hasher.finish(), EXPECTED[len]);
            hasher.write(&[byte]);
        }

        assert_eq!(hasher.finish(), EXPECTED[buf.len()]);
    }

    #[test]
    fn random_chunks() {
        let mut rng = rand::thread_rng();

        for _ in 0..100 {
            let key = Key::new(rng.gen());
            let mut buf = vec![0u8; rng.gen_range(0..500)];
            rng.fill(&mut buf[..]);

            let mut hasher = HighwayHasher::new(&key);
            let mut rest = &buf[..];
            while !rest.is_empty() {
                let n = rng.gen_range(0..rest.len() + 1);
                hasher.write(&rest[..n]);
                rest = &rest[n..];
            }

            assert_eq!(hasher.finish(), portable::hash(&key, &buf));
        }
    }

    #[test]
    fn finish_is_repeatable() {
        let mut hasher = HighwayHasher::new(&KEY);
        hasher.write(&vectors::message(40));

        let first = hasher.finish();
        assert_eq!(hasher.finish(), first);
        assert_eq!(hasher.clone().finish(), first);
    }

    #[test]
    fn hash_map() {
        let mut map = HashMap::with_hasher(HighwayBuildHasher::new(KEY));
        map.insert("to be", 1);
        map.insert("or not to be", 2);

        assert_eq!(map.get("to be"), Some(&1));
        assert_eq!(map.get("or not to be"), Some(&2));
        assert_eq!(map.get("that is the question"), None);

        let builder = HighwayBuildHasher::new(KEY);
        let mut a = builder.build_hasher();
        let mut b = builder.build_hasher();
        a.write_u64(42);
        b.write_u64(42);
        assert_eq!(a.finish(), b.finish());
    }
}
