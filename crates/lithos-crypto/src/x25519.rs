//! X25519 scalar multiplication and the scalar-side signature equations.
//!
//! The Montgomery ladder follows RFC 7748 over the field in [`crate::fe`],
//! processing all 256 scalar bits with a constant-time conditional swap. The
//! `_uniform` entry points feed the scalar to the ladder unmodified, which
//! the signature scheme relies on; the Diffie-Hellman entry points clamp
//! first.
//!
//! Scalar arithmetic modulo the base-point order ℓ uses Montgomery
//! multiplication with R = 2^256 and a multiply-accumulate inner loop, so
//! reduction of a 64-byte value and the signature response each cost two
//! multiplications.

use zeroize::Zeroize;

use crate::fe::Fe;
use crate::limb::{adc, asr, mac, read_limbs, write_limbs};
use crate::limb::{Limb, SDLimb, NLIMBS, WBITS};

/// Length of scalars and point encodings in bytes.
pub const X25519_LEN: usize = 32;

const BASE_POINT: [u8; X25519_LEN] = {
    let mut p = [0; X25519_LEN];
    p[0] = 9;
    p
};

// Curve constants: v^2 = u^3 + A u^2 + u with A = 486662, a24 = (A - 2) / 4.
const CURVE_A: u32 = 486662;
const A24: u32 = 121665;

/// Ladder state after processing every scalar bit: the projective
/// u-coordinate (x2 : z2) of scalar * point.
fn ladder(scalar: &[u8; X25519_LEN], point: &[u8; X25519_LEN]) -> (Fe, Fe) {
    let x1 = Fe::from_bytes(point);
    let mut x2 = Fe::ONE;
    let mut z2 = Fe::ZERO;
    let mut x3 = x1;
    let mut z3 = Fe::ONE;
    let mut swap: Limb = 0;

    for t in (0..256usize).rev() {
        let bit = ((scalar[t / 8] >> (t % 8)) & 1) as Limb;
        let doswap = bit.wrapping_neg();
        Fe::cswap(swap ^ doswap, &mut x2, &mut x3);
        Fe::cswap(swap ^ doswap, &mut z2, &mut z3);
        swap = doswap;

        let a = Fe::add(&x2, &z2);
        let aa = Fe::sqr(&a);
        let b = Fe::sub(&x2, &z2);
        let bb = Fe::sqr(&b);
        let e = Fe::sub(&aa, &bb);
        let c = Fe::add(&x3, &z3);
        let d = Fe::sub(&x3, &z3);
        let da = Fe::mul(&d, &a);
        let cb = Fe::mul(&c, &b);
        x3 = Fe::sqr(&Fe::add(&da, &cb));
        z3 = Fe::mul(&x1, &Fe::sqr(&Fe::sub(&da, &cb)));
        x2 = Fe::mul(&aa, &bb);
        z2 = Fe::mul(&e, &Fe::add(&aa, &Fe::mul_const(&e, A24)));
    }
    Fe::cswap(swap, &mut x2, &mut x3);
    Fe::cswap(swap, &mut z2, &mut z3);
    (x2, z2)
}

fn scalarmult(scalar: &[u8; X25519_LEN], point: &[u8; X25519_LEN]) -> [u8; X25519_LEN] {
    let (x2, z2) = ladder(scalar, point);
    Fe::mul(&x2, &Fe::inv(&z2)).to_bytes()
}

/// Multiply the base point by an unclamped scalar.
pub fn x25519_base_uniform(scalar: &[u8; X25519_LEN]) -> [u8; X25519_LEN] {
    scalarmult(scalar, &BASE_POINT)
}

fn clamp(scalar: &[u8; X25519_LEN]) -> [u8; X25519_LEN] {
    let mut s = *scalar;
    s[0] &= 0xf8;
    s[31] &= 0x7f;
    s[31] |= 0x40;
    s
}

/// Diffie-Hellman: multiply `point` by the clamped scalar.
pub fn x25519(scalar: &[u8; X25519_LEN], point: &[u8; X25519_LEN]) -> [u8; X25519_LEN] {
    let mut s = clamp(scalar);
    let out = scalarmult(&s, point);
    s.zeroize();
    out
}

/// Diffie-Hellman public key: multiply the base point by the clamped scalar.
pub fn x25519_base(scalar: &[u8; X25519_LEN]) -> [u8; X25519_LEN] {
    x25519(scalar, &BASE_POINT)
}

// ─── Scalar arithmetic mod ℓ ────────────────────────────────────────────────

// ℓ = 2^252 + 27742317777372353535851937790883648493, little-endian.
const GROUP_ORDER: [u8; 32] = [
    0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde,
    0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x10,
];

// R^2 mod ℓ for R = 2^256, little-endian.
const SC_R2: [u8; 32] = [
    0x01, 0x0f, 0x9c, 0x44, 0xe3, 0x11, 0x06, 0xa4, 0x47, 0x93, 0x85, 0x68, 0xa7, 0x1b, 0x0e,
    0xd0, 0x65, 0xbe, 0xf5, 0x17, 0xd2, 0x73, 0xec, 0xce, 0x3d, 0x9a, 0x30, 0x7c, 0x1b, 0x41,
    0x99, 0x03,
];

// -ℓ^-1 mod 2^WBITS; the low limb of the 64-bit constant works at any width.
const MONTGOMERY_FACTOR: Limb = 0xd2b51da312547e1bu64 as Limb;

#[derive(Clone, Zeroize)]
struct Scalar([Limb; NLIMBS]);

impl Scalar {
    const ZERO: Scalar = Scalar([0; NLIMBS]);

    fn from_bytes(bytes: &[u8; 32]) -> Scalar {
        let mut limbs = [0; NLIMBS];
        read_limbs(&mut limbs, bytes);
        Scalar(limbs)
    }

    fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        write_limbs(&mut out, &self.0);
        out
    }
}

/// Montgomery multiply-accumulate: out := (out + a*b) / R mod ℓ.
///
/// The result is fully reduced whenever out + a*b < R*ℓ, which holds for
/// every use below; otherwise it is reduced up to one multiple of ℓ, which
/// the second pass of each caller absorbs.
fn sc_montmul(out: &mut Scalar, a: &Scalar, b: &Scalar) {
    let order = Scalar::from_bytes(&GROUP_ORDER);
    let mut hic: Limb = 0;
    for i in 0..NLIMBS {
        let mut carry: Limb = 0;
        let mut carry2: Limb = 0;
        let mand = a.0[i];
        let mut mand2 = MONTGOMERY_FACTOR;
        for j in 0..NLIMBS {
            let mut acc = out.0[j];
            acc = mac(&mut carry, acc, mand, b.0[j]);
            if j == 0 {
                mand2 = mand2.wrapping_mul(acc);
            }
            acc = mac(&mut carry2, acc, mand2, order.0[j]);
            if j > 0 {
                out.0[j - 1] = acc;
            }
        }
        out.0[NLIMBS - 1] = adc(&mut hic, carry, carry2);
    }
    // Subtract ℓ once; the signed carry plus the high carry decide whether
    // to add it back.
    let mut scarry: SDLimb = 0;
    for i in 0..NLIMBS {
        scarry += out.0[i] as SDLimb - order.0[i] as SDLimb;
        out.0[i] = scarry as Limb;
        scarry = asr(scarry, WBITS);
    }
    let need_add = (-(scarry + hic as SDLimb)) as Limb;
    let mut carry: Limb = 0;
    for i in 0..NLIMBS {
        out.0[i] = mac(&mut carry, out.0[i], need_add, order.0[i]);
    }
}

/// Reduce a 64-byte little-endian value mod ℓ.
pub fn x25519_scalar_reduce(wide: &[u8; 64]) -> [u8; X25519_LEN] {
    let mut low = [0u8; 32];
    let mut high = [0u8; 32];
    low.copy_from_slice(&wide[..32]);
    high.copy_from_slice(&wide[32..]);
    let r2 = Scalar::from_bytes(&SC_R2);
    let mut t = Scalar::ZERO;
    // t = low * R, then t = (low * R + high * R^2) / R = low + high * 2^256.
    sc_montmul(&mut t, &Scalar::from_bytes(&low), &r2);
    sc_montmul(&mut t, &Scalar::from_bytes(&high), &r2);
    let out = t.to_bytes();
    low.zeroize();
    high.zeroize();
    t.zeroize();
    out
}

/// Signature response: secret_nonce + challenge * secret_scalar mod ℓ.
pub fn x25519_sign(
    challenge: &[u8; X25519_LEN],
    secret_nonce: &[u8; X25519_LEN],
    secret_scalar: &[u8; X25519_LEN],
) -> [u8; X25519_LEN] {
    let mut acc = Scalar::from_bytes(secret_nonce);
    let mut scalar = Scalar::from_bytes(secret_scalar);
    sc_montmul(&mut acc, &scalar, &Scalar::from_bytes(challenge));
    let mut out = Scalar::ZERO;
    sc_montmul(&mut out, &acc, &Scalar::from_bytes(&SC_R2));
    let response = out.to_bytes();
    acc.zeroize();
    scalar.zeroize();
    response
}

/// Check that `public_nonce` is the u-coordinate of response*B ±
/// challenge*public_key, using only x-coordinates.
///
/// With P = challenge*public_key = (x1 : z1) and Q = response*B = (x2 : z2),
/// the u-coordinates of Q ± P are the roots of
///   (x2 z1 - x1 z2)^2 t^2
///     - 2 ((x1 x2 + z1 z2)(x2 z1 + x1 z2) + 2A x1 x2 z1 z2) t
///     + (x1 x2 - z1 z2)^2,
/// so the nonce passes iff it satisfies that quadratic. No branch depends on
/// the signature contents.
pub fn x25519_verify(
    response: &[u8; X25519_LEN],
    challenge: &[u8; X25519_LEN],
    public_nonce: &[u8; X25519_LEN],
    public_key: &[u8; X25519_LEN],
) -> bool {
    let (x1, z1) = ladder(challenge, public_key);
    let (x2, z2) = ladder(response, &BASE_POINT);
    let r = Fe::from_bytes(public_nonce);

    let cross1 = Fe::mul(&x2, &z1);
    let cross2 = Fe::mul(&x1, &z2);
    let uu = Fe::sqr(&Fe::sub(&cross1, &cross2));
    let xx = Fe::mul(&x1, &x2);
    let zz = Fe::mul(&z1, &z2);
    let ww = Fe::sqr(&Fe::sub(&xx, &zz));
    let mid = Fe::add(
        &Fe::mul(&Fe::add(&xx, &zz), &Fe::add(&cross1, &cross2)),
        &Fe::mul_const(&Fe::mul(&xx, &zz), 2 * CURVE_A),
    );
    let lhs = Fe::add(&Fe::mul(&uu, &Fe::sqr(&r)), &ww);
    let rhs = Fe::mul_const(&Fe::mul(&mid, &r), 2);
    let mut diff = Fe::sub(&lhs, &rhs);
    diff.canon() == Limb::MAX
}
