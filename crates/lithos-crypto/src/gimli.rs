//! The Gimli permutation: 24 rounds over a 384-bit state of twelve 32-bit
//! words, applied in place.

/// State words.
pub const GIMLI_WORDS: usize = 12;

/// Apply the permutation in place.
pub fn gimli(state: &mut [u32; GIMLI_WORDS]) {
    #[cfg(feature = "watchdog")]
    crate::watchdog::pet();

    for round in (1..=24u32).rev() {
        // SP-box on each column.
        for col in 0..4 {
            let x = state[col].rotate_left(24);
            let y = state[4 + col].rotate_left(9);
            let z = state[8 + col];
            state[8 + col] = x ^ (z << 1) ^ ((y & z) << 2);
            state[4 + col] = y ^ x ^ ((x | z) << 1);
            state[col] = z ^ y ^ ((x & y) << 3);
        }
        if round % 4 == 0 {
            // small swap, then the round constant
            state.swap(0, 1);
            state.swap(2, 3);
            state[0] ^= 0x9e37_7900 ^ round;
        } else if round % 4 == 2 {
            // big swap
            state.swap(0, 2);
            state.swap(1, 3);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutation_of_zero_state() {
        let mut state = [0u32; GIMLI_WORDS];
        gimli(&mut state);
        assert_eq!(
            state,
            [
                0x6467d8c4, 0x07dcf83b, 0x3b0bb0d4, 0x1b21364c, 0x083431dc, 0x0efbbe8e,
                0x0054e884, 0x648bd955, 0x4a5db42e, 0xca0641cb, 0x8673d2c2, 0x2e30d809,
            ]
        );
    }

    #[test]
    fn permutation_reference_vector() {
        // The published permutation test vector: words seeded from
        // i*i*i + i*0x9e3779b9.
        let mut state = [0u32; GIMLI_WORDS];
        for (i, word) in state.iter_mut().enumerate() {
            let i = i as u32;
            *word = i.wrapping_mul(i).wrapping_mul(i).wrapping_add(i.wrapping_mul(0x9e3779b9));
        }
        gimli(&mut state);
        assert_eq!(
            state,
            [
                0xba11c85a, 0x91bad119, 0x380ce880, 0xd24c2c68, 0x3eceffea, 0x277a921c,
                0x4f73a0bd, 0xda5a9cd8, 0x84b673f0, 0x34e52ff7, 0x9e2bef49, 0xf41bb8d6,
            ]
        );
    }
}
