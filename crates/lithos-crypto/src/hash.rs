//! Sponge-mode hashing with variable output length.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::sponge::Sponge;

/// Default digest length in bytes.
pub const HASH_DEFAULT_LEN: usize = 32;

/// Streaming hash state.
///
/// `update` may be called any number of times with any chunking; the digest
/// depends only on the concatenated input. Any output length of at least one
/// byte is supported, and a longer output begins with the shorter one.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct GimliHash {
    sponge: Sponge,
}

impl GimliHash {
    pub fn new() -> GimliHash {
        GimliHash {
            sponge: Sponge::new(),
        }
    }

    /// Absorb message bytes. In-place use of the input is fine; the sponge
    /// never writes through `m`.
    pub fn update(&mut self, m: &[u8]) {
        self.sponge.absorb(m);
    }

    /// Pad and squeeze `out.len()` digest bytes, consuming the state.
    pub fn finalize(mut self, out: &mut [u8]) {
        self.sponge.pad();
        self.sponge.squeeze(out);
    }
}

impl Default for GimliHash {
    fn default() -> GimliHash {
        GimliHash::new()
    }
}

/// One-shot hash of `m` into `out.len()` bytes.
pub fn gimli_hash(out: &mut [u8], m: &[u8]) {
    let mut h = GimliHash::new();
    h.update(m);
    h.finalize(out);
}
