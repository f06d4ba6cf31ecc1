//! Authenticated encryption with associated data as a duplex sponge.
//!
//! Lifecycle: [`GimliAead::new`] → `update_ad`* → `final_ad` →
//! (`encrypt_update`* → `encrypt_final` | `decrypt_update`* →
//! `decrypt_final`). The finalizers consume the state; a state is never
//! reused across messages.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::gimli::gimli;
use crate::sponge::{Sponge, RATE};

/// Key length in bytes.
pub const AEAD_KEY_LEN: usize = 32;
/// Nonce length in bytes.
pub const AEAD_NONCE_LEN: usize = 16;
/// Recommended minimum tag length in bytes.
pub const AEAD_TAG_LEN: usize = 16;

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct GimliAead {
    sponge: Sponge,
}

impl GimliAead {
    /// Load the nonce into the rate words and the key into the capacity
    /// words, then permute.
    pub fn new(key: &[u8; AEAD_KEY_LEN], nonce: &[u8; AEAD_NONCE_LEN]) -> GimliAead {
        let mut sponge = Sponge::new();
        for (word, chunk) in sponge.state[..4].iter_mut().zip(nonce.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        for (word, chunk) in sponge.state[4..].iter_mut().zip(key.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        gimli(&mut sponge.state);
        GimliAead { sponge }
    }

    /// Absorb associated data. Any chunking is equivalent.
    pub fn update_ad(&mut self, ad: &[u8]) {
        self.sponge.absorb(ad);
    }

    /// Close the associated-data phase: pad and force a permutation so the
    /// payload is domain-separated from the AD.
    pub fn final_ad(&mut self) {
        self.sponge.pad();
        self.sponge.offset = RATE - 1;
        self.sponge.advance();
    }

    fn encrypt_bytes(&mut self, c: &mut [u8], m: &[u8]) {
        for (cb, &mb) in c.iter_mut().zip(m) {
            self.sponge.absorb_byte(mb);
            *cb = self.sponge.squeeze_byte();
            self.sponge.advance();
        }
    }

    /// Encrypt `m` into `c` (same length, distinct buffers). Each plaintext
    /// byte is absorbed, then the ciphertext byte is read from the same
    /// position.
    pub fn encrypt_update(&mut self, c: &mut [u8], m: &[u8]) {
        debug_assert_eq!(c.len(), m.len());
        #[allow(unused_mut)]
        let mut i = 0;
        #[cfg(feature = "sponge-words")]
        {
            let first = (RATE - self.sponge.offset) % RATE;
            if m.len() >= RATE + first {
                self.encrypt_bytes(&mut c[..first], &m[..first]);
                i = first;
                while m.len() - i >= RATE {
                    for w in 0..RATE / 4 {
                        let at = i + 4 * w;
                        let mw = u32::from_le_bytes([m[at], m[at + 1], m[at + 2], m[at + 3]]);
                        self.sponge.state[w] ^= mw;
                        c[at..at + 4].copy_from_slice(&self.sponge.state[w].to_le_bytes());
                    }
                    gimli(&mut self.sponge.state);
                    i += RATE;
                }
            }
        }
        self.encrypt_bytes(&mut c[i..], &m[i..]);
    }

    /// Pad and squeeze the tag, consuming the state.
    pub fn encrypt_final(mut self, tag: &mut [u8]) {
        self.sponge.pad();
        self.sponge.squeeze(tag);
    }

    fn decrypt_bytes(&mut self, m: &mut [u8], c: &[u8]) {
        for (mb, &cb) in m.iter_mut().zip(c) {
            let x = cb ^ self.sponge.squeeze_byte();
            *mb = x;
            self.sponge.absorb_byte(x);
            self.sponge.advance();
        }
    }

    /// Decrypt `c` into `m` (same length, distinct buffers).
    pub fn decrypt_update(&mut self, m: &mut [u8], c: &[u8]) {
        debug_assert_eq!(m.len(), c.len());
        #[allow(unused_mut)]
        let mut i = 0;
        #[cfg(feature = "sponge-words")]
        {
            let first = (RATE - self.sponge.offset) % RATE;
            if c.len() >= RATE + first {
                self.decrypt_bytes(&mut m[..first], &c[..first]);
                i = first;
                while c.len() - i >= RATE {
                    // Re-absorbing the plaintext XORs the rate to exactly the
                    // ciphertext words, so the block rewrite is state := c.
                    for w in 0..RATE / 4 {
                        let at = i + 4 * w;
                        let cw = u32::from_le_bytes([c[at], c[at + 1], c[at + 2], c[at + 3]]);
                        m[at..at + 4].copy_from_slice(&(self.sponge.state[w] ^ cw).to_le_bytes());
                        self.sponge.state[w] = cw;
                    }
                    gimli(&mut self.sponge.state);
                    i += RATE;
                }
            }
        }
        self.decrypt_bytes(&mut m[i..], &c[i..]);
    }

    /// Pad, squeeze the expected tag, and compare against `tag` in constant
    /// time. Consumes the state.
    #[must_use = "an unchecked tag authenticates nothing"]
    pub fn decrypt_final(mut self, tag: &[u8]) -> bool {
        self.sponge.pad();
        self.sponge.offset = RATE - 1;
        let mut mismatch = 0u8;
        for &t in tag {
            self.sponge.advance();
            mismatch |= t ^ self.sponge.squeeze_byte();
        }
        mismatch == 0
    }
}

/// One-shot encryption: `c` and `tag` are filled from `m` under `ad`,
/// `nonce`, `key`. `c` must be the length of `m`.
pub fn aead_encrypt(
    c: &mut [u8],
    tag: &mut [u8],
    m: &[u8],
    ad: &[u8],
    nonce: &[u8; AEAD_NONCE_LEN],
    key: &[u8; AEAD_KEY_LEN],
) {
    let mut g = GimliAead::new(key, nonce);
    g.update_ad(ad);
    g.final_ad();
    g.encrypt_update(c, m);
    g.encrypt_final(tag);
}

/// One-shot decryption. On tag mismatch returns false and zeroes `m`, so an
/// ignored result cannot leak unauthenticated plaintext.
#[must_use = "an unchecked tag authenticates nothing"]
pub fn aead_decrypt(
    m: &mut [u8],
    c: &[u8],
    tag: &[u8],
    ad: &[u8],
    nonce: &[u8; AEAD_NONCE_LEN],
    key: &[u8; AEAD_KEY_LEN],
) -> bool {
    let mut g = GimliAead::new(key, nonce);
    g.update_ad(ad);
    g.final_ad();
    g.decrypt_update(m, c);
    let ok = g.decrypt_final(tag);
    let mask = (ok as u8).wrapping_neg();
    for b in m.iter_mut() {
        *b &= mask;
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0; 32];
    const NONCE: [u8; 16] = [0; 16];

    fn key_pattern() -> [u8; 32] {
        let mut k = [0x01; 32];
        k[31] = 0;
        k
    }

    #[test]
    fn empty_message_vector() {
        let mut tag = [0u8; 16];
        aead_encrypt(&mut [], &mut tag, b"", b"", &NONCE, &KEY);
        assert_eq!(hex::encode(tag), "b53d0cf3d80213b1c5ede7f3139f5279");
    }

    #[test]
    fn header_payload_vector() {
        let k = key_pattern();
        let n = [0x0f; 16];
        let m = b"payload bytes";
        let mut c = [0u8; 13];
        let mut tag = [0u8; 16];
        aead_encrypt(&mut c, &mut tag, m, b"header", &n, &k);
        assert_eq!(hex::encode(c), "3b4014f15e607839b72d4ef929");
        assert_eq!(hex::encode(tag), "236d645551f955ded47befaa0ba5b636");

        let mut back = [0u8; 13];
        assert!(aead_decrypt(&mut back, &c, &tag, b"header", &n, &k));
        assert_eq!(&back, m);
    }

    #[test]
    fn multi_block_vector() {
        let m: Vec<u8> = (0u8..64).collect();
        let ad: Vec<u8> = (250u8..=255).collect();
        let k: [u8; 32] = core::array::from_fn(|i| i as u8);
        let n: [u8; 16] = core::array::from_fn(|i| 16 + i as u8);
        let mut c = vec![0u8; 64];
        let mut tag = [0u8; 16];
        aead_encrypt(&mut c, &mut tag, &m, &ad, &n, &k);
        assert_eq!(
            hex::encode(&c),
            "c16d5769f3fc58ff0db8b79ead176e5be75eb324ada0fa260c16b48dff0957b9\
             3cb8323ed1096667dfefaa7b8fe39de1aecc7ffda7b5da55b83599874a2110e8"
        );
        assert_eq!(hex::encode(tag), "497c3119d5524f90921123042950bb18");
    }

    #[test]
    fn round_trip_various_lengths() {
        let k = key_pattern();
        let n = [0x0f; 16];
        for len in [0usize, 1, 15, 16, 17, 31, 32, 33, 100] {
            let m: Vec<u8> = (0..len).map(|i| (i * 13 + 7) as u8).collect();
            let mut c = vec![0u8; len];
            let mut tag = [0u8; 16];
            aead_encrypt(&mut c, &mut tag, &m, b"ad", &n, &k);
            let mut back = vec![0u8; len];
            assert!(aead_decrypt(&mut back, &c, &tag, b"ad", &n, &k));
            assert_eq!(back, m, "length {len}");
        }
    }

    #[test]
    fn tamper_zeroes_plaintext() {
        let k = key_pattern();
        let n = [0x0f; 16];
        let m = b"attack at dawn, or maybe later";
        let mut c = vec![0u8; m.len()];
        let mut tag = [0u8; 16];
        aead_encrypt(&mut c, &mut tag, m, b"hdr", &n, &k);

        // ciphertext bit
        let mut cc = c.clone();
        cc[3] ^= 0x10;
        let mut out = vec![0xffu8; m.len()];
        assert!(!aead_decrypt(&mut out, &cc, &tag, b"hdr", &n, &k));
        assert!(out.iter().all(|&b| b == 0));

        // tag bit
        let mut tt = tag;
        tt[0] ^= 1;
        let mut out = vec![0xffu8; m.len()];
        assert!(!aead_decrypt(&mut out, &c, &tt, b"hdr", &n, &k));
        assert!(out.iter().all(|&b| b == 0));

        // associated data
        let mut out = vec![0xffu8; m.len()];
        assert!(!aead_decrypt(&mut out, &c, &tag, b"hdx", &n, &k));
        assert!(out.iter().all(|&b| b == 0));

        // nonce and key
        let mut n2 = n;
        n2[15] ^= 0x80;
        let mut out = vec![0u8; m.len()];
        assert!(!aead_decrypt(&mut out, &c, &tag, b"hdr", &n2, &k));
        let mut k2 = k;
        k2[0] ^= 1;
        let mut out = vec![0u8; m.len()];
        assert!(!aead_decrypt(&mut out, &c, &tag, b"hdr", &n, &k2));
    }

    #[test]
    fn streaming_matches_one_shot() {
        let k = key_pattern();
        let n = [0x0f; 16];
        let m: Vec<u8> = (0..200u32).map(|i| (i * 31) as u8).collect();
        let ad: Vec<u8> = (0..50u32).map(|i| (i * 3 + 1) as u8).collect();
        let mut expect_c = vec![0u8; m.len()];
        let mut expect_t = [0u8; 16];
        aead_encrypt(&mut expect_c, &mut expect_t, &m, &ad, &n, &k);

        for chunk_len in [1usize, 7, 16, 33] {
            let mut g = GimliAead::new(&k, &n);
            for chunk in ad.chunks(chunk_len) {
                g.update_ad(chunk);
            }
            g.final_ad();
            let mut c = vec![0u8; m.len()];
            for (mc, mm) in c.chunks_mut(chunk_len).zip(m.chunks(chunk_len)) {
                g.encrypt_update(mc, mm);
            }
            let mut t = [0u8; 16];
            g.encrypt_final(&mut t);
            assert_eq!(c, expect_c, "chunk length {chunk_len}");
            assert_eq!(t, expect_t, "chunk length {chunk_len}");

            let mut g = GimliAead::new(&k, &n);
            for chunk in ad.chunks(chunk_len) {
                g.update_ad(chunk);
            }
            g.final_ad();
            let mut back = vec![0u8; m.len()];
            for (mb, mc) in back.chunks_mut(chunk_len).zip(c.chunks(chunk_len)) {
                g.decrypt_update(mb, mc);
            }
            assert!(g.decrypt_final(&t));
            assert_eq!(back, m, "chunk length {chunk_len}");
        }
    }

    #[test]
    fn longer_and_shorter_tags() {
        let k = key_pattern();
        let n = [0x0f; 16];
        let mut c = [0u8; 5];
        let mut tag32 = [0u8; 32];
        aead_encrypt(&mut c, &mut tag32, b"hello", b"", &n, &k);
        let mut c8 = [0u8; 5];
        let mut tag8 = [0u8; 8];
        aead_encrypt(&mut c8, &mut tag8, b"hello", b"", &n, &k);
        assert_eq!(c, c8);
        // tag squeeze is prefix-consistent like the hash squeeze
        assert_eq!(tag32[..8], tag8);
        let mut m = [0u8; 5];
        assert!(aead_decrypt(&mut m, &c, &tag8, b"", &n, &k));
    }
}
