//! Field arithmetic over GF(2^255 - 19).
//!
//! Elements are `NLIMBS` little-endian limbs holding a value kept lazily
//! reduced: every public operation leaves its result below 2^255 plus one
//! limb of slack, so always below 2p. Full reduction to [0, p) happens only
//! in [`Fe::canon`] (and therefore in [`Fe::to_bytes`]). Bytes are read raw,
//! without masking bit 255, so inputs at or above 2^255 alias their residue
//! mod p.
//!
//! Every operation runs without data-dependent branches or indexing.

use zeroize::Zeroize;

use crate::limb::{adc, asr, mac, read_limbs, write_limbs};
use crate::limb::{DLimb, Limb, SDLimb, HIGH_BIT, NLIMBS, WBITS};

// Limbs needed to hold a u32 constant at any limb width.
const CONST_LIMBS: usize = if WBITS >= 32 { 1 } else { 32 / WBITS };

#[derive(Clone, Copy, Zeroize)]
pub(crate) struct Fe([Limb; NLIMBS]);

impl Fe {
    pub(crate) const ZERO: Fe = Fe([0; NLIMBS]);

    pub(crate) const ONE: Fe = {
        let mut limbs = [0; NLIMBS];
        limbs[0] = 1;
        Fe(limbs)
    };

    pub(crate) fn from_bytes(bytes: &[u8; 32]) -> Fe {
        let mut limbs = [0; NLIMBS];
        read_limbs(&mut limbs, bytes);
        Fe(limbs)
    }

    /// Canonicalize and serialize to 32 little-endian bytes.
    pub(crate) fn to_bytes(mut self) -> [u8; 32] {
        let mut out = [0u8; 32];
        self.canon();
        write_limbs(&mut out, &self.0);
        out
    }

    /// Fold the carry out of 2^255 back in as +19.
    ///
    /// Precondition: carry is small. The result is < 2^255 + one limb, so in
    /// particular always < 2p, and the value never decreases below min(x, 19).
    fn propagate(&mut self, carry: Limb) {
        let x = &mut self.0;
        let mut carry = ((carry << 1) | (x[NLIMBS - 1] >> (WBITS - 1))).wrapping_mul(19);
        x[NLIMBS - 1] &= !HIGH_BIT;
        for limb in x.iter_mut() {
            *limb = adc(&mut carry, *limb, 0);
        }
    }

    pub(crate) fn add(a: &Fe, b: &Fe) -> Fe {
        let mut out = [0; NLIMBS];
        let mut carry: Limb = 0;
        for i in 0..NLIMBS {
            out[i] = adc(&mut carry, a.0[i], b.0[i]);
        }
        let mut r = Fe(out);
        r.propagate(carry);
        r
    }

    pub(crate) fn sub(a: &Fe, b: &Fe) -> Fe {
        let mut out = [0; NLIMBS];
        // Bias the running carry by -4*19 so it never goes below -1 per limb;
        // the +2 at the end cancels the bias through propagate.
        let mut carry: SDLimb = -76;
        for i in 0..NLIMBS {
            carry += a.0[i] as SDLimb - b.0[i] as SDLimb;
            out[i] = carry as Limb;
            carry = asr(carry, WBITS);
        }
        let mut r = Fe(out);
        r.propagate((carry + 2) as Limb);
        r
    }

    fn mul_n(a: &Fe, b: &[Limb]) -> Fe {
        let mut accum = [0 as Limb; NLIMBS * 2];
        for (i, &mand) in b.iter().enumerate() {
            let mut carry: Limb = 0;
            for j in 0..NLIMBS {
                accum[i + j] = mac(&mut carry, accum[i + j], mand, a.0[j]);
            }
            accum[i + NLIMBS] = carry;
        }
        // 2^256 = 38 mod p folds the high half in one pass.
        let mut out = [0; NLIMBS];
        let mut carry: Limb = 0;
        for i in 0..NLIMBS {
            out[i] = mac(&mut carry, accum[i], 38, accum[i + NLIMBS]);
        }
        let mut r = Fe(out);
        r.propagate(carry);
        r
    }

    pub(crate) fn mul(a: &Fe, b: &Fe) -> Fe {
        Fe::mul_n(a, &b.0)
    }

    pub(crate) fn sqr(a: &Fe) -> Fe {
        Fe::mul(a, a)
    }

    /// Multiply by a small constant (fits u32 regardless of limb width).
    pub(crate) fn mul_const(a: &Fe, c: u32) -> Fe {
        let mut b = [0 as Limb; CONST_LIMBS];
        let mut v = c;
        for limb in b.iter_mut() {
            *limb = v as Limb;
            v = v.checked_shr(WBITS as u32).unwrap_or(0);
        }
        Fe::mul_n(a, &b)
    }

    /// Invert by raising to p - 2 = 2^255 - 21, as a fixed square/multiply
    /// ladder over the constant exponent bits.
    pub(crate) fn inv(a: &Fe) -> Fe {
        let b = *a;
        let mut x = *a;
        for i in (0..=253).rev() {
            x = Fe::sqr(&x);
            if i >= 8 || ((0xeb >> i) & 1) != 0 {
                x = Fe::mul(&x, &b);
            }
        }
        x
    }

    /// Reduce in place to the least residue mod p. Returns an all-ones limb
    /// iff the residue is zero, all-zeros otherwise.
    ///
    /// Precondition: value < 2^255 + one limb.
    pub(crate) fn canon(&mut self) -> Limb {
        // Add 19, propagate: now 19 <= value < 2^255, so subtracting 19
        // lands in [0, 2^255 - 19) without underflow overall.
        let mut carry: Limb = 19;
        for i in 0..NLIMBS {
            self.0[i] = adc(&mut carry, self.0[i], 0);
        }
        self.propagate(carry);
        let mut carry_sub: SDLimb = -19;
        let mut res: Limb = 0;
        for i in 0..NLIMBS {
            carry_sub += self.0[i] as SDLimb;
            self.0[i] = carry_sub as Limb;
            res |= self.0[i];
            carry_sub = asr(carry_sub, WBITS);
        }
        ((res as DLimb).wrapping_sub(1) >> WBITS) as Limb
    }

    /// Constant-time swap of `a` and `b` when `mask` is all-ones.
    pub(crate) fn cswap(mask: Limb, a: &mut Fe, b: &mut Fe) {
        for i in 0..NLIMBS {
            let t = mask & (a.0[i] ^ b.0[i]);
            a.0[i] ^= t;
            b.0[i] ^= t;
        }
    }
}
