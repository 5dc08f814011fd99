//! Hash keys.

use byteorder::{ByteOrder, LittleEndian};

use error::Error;
use lanes::{Lanes, NUM_LANES};

/// The size of a serialized key in bytes.
pub const KEY_SIZE: usize = 8 * NUM_LANES;

/// A 256-bit hash key.
///
/// Any value is a valid key, including all zeros (which is the `Default`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Key(Lanes);

impl Key {
    /// Create a key from its lanes.
    pub const fn new(lanes: Lanes) -> Key {
        Key(lanes)
    }

    /// Read a key from 32 bytes, as four little-endian lanes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Key, Error> {
        if bytes.len() != KEY_SIZE {
            return Err(Error::InvalidKeyLength {
                len: bytes.len(),
            });
        }

        let mut lanes = [0; NUM_LANES];
        LittleEndian::read_u64_into(bytes, &mut lanes);

        Ok(Key(lanes))
    }

    /// Get the lanes of this key.
    pub fn lanes(&self) -> &Lanes {
        &self.0
    }
}

impl From<Lanes> for Key {
    fn from(lanes: Lanes) -> Key {
        Key(lanes)
    }
}
