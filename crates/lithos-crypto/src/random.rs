//! Operating-system randomness, used only by key generation.

/// Fill `out` with cryptographic-quality random bytes.
///
/// Aborts the process if the platform source is unavailable; there is no
/// meaningful fallback for key generation.
pub fn random_bytes(out: &mut [u8]) {
    getrandom::getrandom(out).expect("system randomness unavailable");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_the_buffer() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        random_bytes(&mut a);
        random_bytes(&mut b);
        // 2^-256 false-failure probability is acceptable here
        assert_ne!(a, b);
    }
}
