//! Schnorr-style signatures over X25519, with the sponge hash providing key
//! expansion, nonce derivation, and the challenge.
//!
//! The message is first reduced to a 64-byte prehash, so signing and
//! verification stream arbitrarily long messages without buffering them. The
//! secret nonce is derived by hashing, never drawn from randomness, so a
//! given (secret key, message) pair always produces the same signature.

use zeroize::Zeroize;

use crate::hash::GimliHash;
use crate::random::random_bytes;
use crate::x25519::{x25519_base_uniform, x25519_scalar_reduce, x25519_sign, x25519_verify};
use crate::x25519::X25519_LEN;

/// Prehash length in bytes.
pub const SIGN_PREHASH_LEN: usize = 64;
/// Signature length in bytes: public nonce followed by response.
pub const SIGN_LEN: usize = 64;
/// Public key length in bytes.
pub const SIGN_PUBLIC_KEY_LEN: usize = 32;
/// Secret key length in bytes: seed followed by the public key.
pub const SIGN_SECRET_KEY_LEN: usize = 64;

/// Generate a keypair. The secret key stores the random seed and a copy of
/// the public key; the signing scalar is re-derived from the seed on demand.
pub fn sign_keygen(
    public_key: &mut [u8; SIGN_PUBLIC_KEY_LEN],
    secret_key: &mut [u8; SIGN_SECRET_KEY_LEN],
) {
    let mut seed = [0u8; X25519_LEN];
    random_bytes(&mut seed);
    let mut scalar = [0u8; X25519_LEN];
    crate::hash::gimli_hash(&mut scalar, &seed);
    *public_key = x25519_base_uniform(&scalar);
    secret_key[..X25519_LEN].copy_from_slice(&seed);
    secret_key[X25519_LEN..].copy_from_slice(public_key);
    scalar.zeroize();
    seed.zeroize();
    log::debug!("generated signing keypair");
}

fn gen_challenge(
    public_nonce: &[u8; X25519_LEN],
    public_key: &[u8],
    prehash: &[u8; SIGN_PREHASH_LEN],
) -> [u8; X25519_LEN] {
    let mut h = GimliHash::new();
    h.update(public_nonce);
    h.update(public_key);
    h.update(prehash);
    let mut challenge = [0u8; X25519_LEN];
    h.finalize(&mut challenge);
    challenge
}

fn create(
    sig: &mut [u8; SIGN_LEN],
    prehash: &[u8; SIGN_PREHASH_LEN],
    secret_key: &[u8; SIGN_SECRET_KEY_LEN],
) {
    // Expand the seed into the signing scalar and the nonce-derivation key z.
    let mut az = [0u8; 2 * X25519_LEN];
    crate::hash::gimli_hash(&mut az, &secret_key[..X25519_LEN]);
    let mut secret_scalar = [0u8; X25519_LEN];
    secret_scalar.copy_from_slice(&az[..X25519_LEN]);

    let mut nonce_wide = [0u8; 2 * X25519_LEN];
    let mut h = GimliHash::new();
    h.update(&az[X25519_LEN..]);
    h.update(prehash);
    h.finalize(&mut nonce_wide);
    let mut secret_nonce = x25519_scalar_reduce(&nonce_wide);

    let public_nonce = x25519_base_uniform(&secret_nonce);
    let challenge = gen_challenge(&public_nonce, &secret_key[X25519_LEN..], prehash);
    let response = x25519_sign(&challenge, &secret_nonce, &secret_scalar);

    sig[..X25519_LEN].copy_from_slice(&public_nonce);
    sig[X25519_LEN..].copy_from_slice(&response);

    az.zeroize();
    secret_scalar.zeroize();
    secret_nonce.zeroize();
    nonce_wide.zeroize();
}

fn verify(
    sig: &[u8; SIGN_LEN],
    prehash: &[u8; SIGN_PREHASH_LEN],
    public_key: &[u8; SIGN_PUBLIC_KEY_LEN],
) -> bool {
    let mut public_nonce = [0u8; X25519_LEN];
    public_nonce.copy_from_slice(&sig[..X25519_LEN]);
    let mut response = [0u8; X25519_LEN];
    response.copy_from_slice(&sig[X25519_LEN..]);
    let challenge = gen_challenge(&public_nonce, public_key, prehash);
    x25519_verify(&response, &challenge, &public_nonce, public_key)
}

/// Streaming signature state: a hash over the message producing the prehash.
#[derive(Clone, Default)]
pub struct SignState {
    hash: GimliHash,
}

impl SignState {
    pub fn new() -> SignState {
        SignState {
            hash: GimliHash::new(),
        }
    }

    /// Absorb message bytes; any chunking is equivalent.
    pub fn update(&mut self, msg: &[u8]) {
        self.hash.update(msg);
    }

    /// Finish the message hash into a prehash that can be signed or verified
    /// later, possibly elsewhere.
    pub fn final_prehash(self, prehash: &mut [u8; SIGN_PREHASH_LEN]) {
        self.hash.finalize(prehash);
    }

    /// Finish and sign the streamed message.
    pub fn final_create(
        self,
        sig: &mut [u8; SIGN_LEN],
        secret_key: &[u8; SIGN_SECRET_KEY_LEN],
    ) {
        let mut prehash = [0u8; SIGN_PREHASH_LEN];
        self.final_prehash(&mut prehash);
        create(sig, &prehash, secret_key);
    }

    /// Finish and verify a signature over the streamed message.
    #[must_use = "an unchecked signature authenticates nothing"]
    pub fn final_verify(
        self,
        sig: &[u8; SIGN_LEN],
        public_key: &[u8; SIGN_PUBLIC_KEY_LEN],
    ) -> bool {
        let mut prehash = [0u8; SIGN_PREHASH_LEN];
        self.final_prehash(&mut prehash);
        verify(sig, &prehash, public_key)
    }
}

/// Sign a precomputed prehash.
pub fn sign_create_from_prehash(
    sig: &mut [u8; SIGN_LEN],
    prehash: &[u8; SIGN_PREHASH_LEN],
    secret_key: &[u8; SIGN_SECRET_KEY_LEN],
) {
    create(sig, prehash, secret_key);
}

/// Verify a signature against a precomputed prehash.
#[must_use = "an unchecked signature authenticates nothing"]
pub fn sign_verify_prehash(
    sig: &[u8; SIGN_LEN],
    prehash: &[u8; SIGN_PREHASH_LEN],
    public_key: &[u8; SIGN_PUBLIC_KEY_LEN],
) -> bool {
    verify(sig, prehash, public_key)
}

/// One-shot signing.
pub fn sign_create(
    sig: &mut [u8; SIGN_LEN],
    msg: &[u8],
    secret_key: &[u8; SIGN_SECRET_KEY_LEN],
) {
    let mut state = SignState::new();
    state.update(msg);
    state.final_create(sig, secret_key);
}

/// One-shot verification.
#[must_use = "an unchecked signature authenticates nothing"]
pub fn sign_verify(
    sig: &[u8; SIGN_LEN],
    msg: &[u8],
    public_key: &[u8; SIGN_PUBLIC_KEY_LEN],
) -> bool {
    let mut state = SignState::new();
    state.update(msg);
    state.final_verify(sig, public_key)
}
