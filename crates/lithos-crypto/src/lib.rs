//! Portable cryptography built on a single 384-bit permutation: sponge
//! hashing, duplex-sponge AEAD, and Schnorr-style signatures over X25519.
//!
//! Three layers share the machinery:
//!
//! - [`hash`]: variable-output-length sponge hashing ([`GimliHash`]).
//! - [`aead`]: authenticated encryption with associated data as a duplex
//!   sponge ([`GimliAead`]), 32-byte keys and 16-byte nonces.
//! - [`sign`]: streaming signatures composing the hash (key expansion, nonce
//!   derivation, challenge) with X25519 (public nonce, response,
//!   verification).
//!
//! The X25519 field arithmetic runs on 16-, 32-, or 64-bit limbs selected by
//! the `limb16`/`limb64` features (32 by default); every configuration
//! produces identical outputs. All states and buffers are caller-owned, the
//! core never allocates, and secret-bearing state is wiped on drop.
//!
//! Field arithmetic, scalar multiplication, and tag comparison avoid
//! secret-dependent branches and memory indexing. Each state is single-
//! threaded; distinct states need no synchronization.

mod fe;
mod limb;
mod sponge;

pub mod aead;
pub mod gimli;
pub mod hash;
pub mod random;
pub mod sign;
#[cfg(feature = "watchdog")]
pub mod watchdog;
pub mod x25519;

pub use aead::{aead_decrypt, aead_encrypt, GimliAead};
pub use aead::{AEAD_KEY_LEN, AEAD_NONCE_LEN, AEAD_TAG_LEN};
pub use hash::{gimli_hash, GimliHash, HASH_DEFAULT_LEN};
pub use sign::{sign_create, sign_keygen, sign_verify, SignState};
pub use sign::{SIGN_LEN, SIGN_PREHASH_LEN, SIGN_PUBLIC_KEY_LEN, SIGN_SECRET_KEY_LEN};
pub use sponge::RATE;
#[cfg(feature = "watchdog")]
pub use watchdog::set_watchdog;
pub use x25519::X25519_LEN;
