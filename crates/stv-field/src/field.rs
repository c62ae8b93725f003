//! Elements of the STARK-friendly prime field `P = 2^251 + 17·2^192 + 1`.
//!
//! Values are stored in Montgomery form (`x·R mod P`, `R = 2^256`) so that
//! multiplication is one 512-bit schoolbook product followed by a reduction.
//! Every constructor and encoder speaks the canonical integer in `[0, P)`.

use core::fmt;
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::u256::{adc, mac, U256};
use crate::FieldError;

/// The modulus `P`.
pub const MODULUS: U256 = U256::from_limbs([1, 0, 0, 0x0800_0000_0000_0011]);

/// `R mod P`, the Montgomery form of one.
const R: U256 = U256::from_limbs([
    0xffff_ffff_ffff_ffe1,
    0xffff_ffff_ffff_ffff,
    0xffff_ffff_ffff_ffff,
    0x07ff_ffff_ffff_fdf0,
]);

/// `R^2 mod P`, used to enter Montgomery form.
const R2: U256 = U256::from_limbs([
    0xffff_fd73_7e00_0401,
    0x0000_0001_330f_ffff,
    0xffff_ffff_ff6f_8000,
    0x07ff_d4ab_5e00_8810,
]);

/// `-P^{-1} mod 2^64`. `P ≡ 1 (mod 2^64)`, so this is `-1`.
const INV: u64 = u64::MAX;

/// `P - 2`, the Fermat inversion exponent.
const P_MINUS_TWO: U256 = U256::from_limbs([
    0xffff_ffff_ffff_ffff,
    0xffff_ffff_ffff_ffff,
    0xffff_ffff_ffff_ffff,
    0x0800_0000_0000_0010,
]);

/// Byte width of an encoded element.
pub const ENCODED_LEN: usize = 32;

/// Montgomery reduction of a 512-bit value `t < P·2^256`: returns `t·R^{-1} mod P`.
fn redc(mut t: [u64; 8]) -> U256 {
    let mut carry2 = 0u64;
    for i in 0..4 {
        let m = t[i].wrapping_mul(INV);
        let mut carry = 0u64;
        for j in 0..4 {
            let (lo, hi) = mac(t[i + j], m, MODULUS.0[j], carry);
            t[i + j] = lo;
            carry = hi;
        }
        let (lo, hi) = adc(t[i + 4], carry, carry2);
        t[i + 4] = lo;
        carry2 = hi;
    }
    let r = U256::from_limbs([t[4], t[5], t[6], t[7]]);
    if carry2 != 0 || r >= MODULUS {
        r.overflowing_sub(&MODULUS).0
    } else {
        r
    }
}

#[inline]
fn mont_mul(a: &U256, b: &U256) -> U256 {
    redc(a.mul_wide(b))
}

/// Field element modulo [`MODULUS`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldElement(U256);

impl FieldElement {
    /// Additive identity.
    pub const ZERO: Self = Self(U256::ZERO);
    /// Multiplicative identity.
    pub const ONE: Self = Self(R);

    /// Multiplicative generator of the full group (a quadratic non-residue).
    #[must_use]
    pub fn generator() -> Self {
        Self::from(3u64)
    }

    /// From a canonical integer.
    ///
    /// # Errors
    /// [`FieldError::NotCanonical`] if `x >= P`.
    pub fn from_u256(x: U256) -> Result<Self, FieldError> {
        if x >= MODULUS {
            return Err(FieldError::NotCanonical(x.to_string()));
        }
        Ok(Self(mont_mul(&x, &R2)))
    }

    /// Canonical integer in `[0, P)`.
    #[must_use]
    pub fn to_u256(&self) -> U256 {
        let l = self.0.limbs();
        redc([l[0], l[1], l[2], l[3], 0, 0, 0, 0])
    }

    /// Decode 32 big-endian bytes.
    ///
    /// # Errors
    /// [`FieldError::NotCanonical`] if the integer is not below `P`.
    pub fn from_be_bytes(bytes: &[u8; ENCODED_LEN]) -> Result<Self, FieldError> {
        Self::from_u256(U256::from_be_bytes(bytes))
    }

    /// Decode from a byte slice that must be exactly 32 bytes long.
    ///
    /// # Errors
    /// [`FieldError::InvalidLength`] or [`FieldError::NotCanonical`].
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self, FieldError> {
        let arr: &[u8; ENCODED_LEN] = bytes.try_into().map_err(|_| FieldError::InvalidLength {
            expected: ENCODED_LEN,
            got: bytes.len(),
        })?;
        Self::from_be_bytes(arr)
    }

    /// Encode as 32 big-endian bytes.
    #[must_use]
    pub fn to_be_bytes(&self) -> [u8; ENCODED_LEN] {
        self.to_u256().to_be_bytes()
    }

    /// Parse a canonical hex literal (optional `0x`).
    ///
    /// # Errors
    /// [`FieldError::InvalidHex`] or [`FieldError::NotCanonical`].
    pub fn from_hex(s: &str) -> Result<Self, FieldError> {
        Self::from_u256(U256::from_hex(s)?)
    }

    /// `true` for the additive identity.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `self^2`.
    #[inline]
    #[must_use]
    pub fn square(&self) -> Self {
        *self * *self
    }

    /// Binary exponentiation. `x^0 = 1` for every `x`, zero included.
    #[must_use]
    pub fn pow(&self, exp: &U256) -> Self {
        let mut acc = Self::ONE;
        for i in (0..exp.bits()).rev() {
            acc = acc.square();
            if exp.bit(i) {
                acc *= *self;
            }
        }
        acc
    }

    /// [`pow`](Self::pow) with a machine-word exponent.
    #[inline]
    #[must_use]
    pub fn pow_u64(&self, exp: u64) -> Self {
        self.pow(&U256::from_u64(exp))
    }

    /// Multiplicative inverse via Fermat (`a^(P-2)`).
    ///
    /// # Errors
    /// [`FieldError::DivisionByZero`] for zero.
    pub fn inverse(&self) -> Result<Self, FieldError> {
        if self.is_zero() {
            return Err(FieldError::DivisionByZero);
        }
        Ok(self.pow(&P_MINUS_TWO))
    }
}

impl From<u64> for FieldElement {
    fn from(x: u64) -> Self {
        Self(mont_mul(&U256::from_u64(x), &R2))
    }
}

impl Add for FieldElement {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        // Both operands are below P < 2^252, so the sum cannot carry out.
        let (sum, _) = self.0.overflowing_add(&rhs.0);
        if sum >= MODULUS {
            Self(sum.overflowing_sub(&MODULUS).0)
        } else {
            Self(sum)
        }
    }
}

impl Sub for FieldElement {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        let (diff, borrow) = self.0.overflowing_sub(&rhs.0);
        if borrow {
            Self(diff.overflowing_add(&MODULUS).0)
        } else {
            Self(diff)
        }
    }
}

impl Mul for FieldElement {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(mont_mul(&self.0, &rhs.0))
    }
}

impl Neg for FieldElement {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::ZERO - self
    }
}

impl AddAssign for FieldElement {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for FieldElement {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for FieldElement {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Sum for FieldElement {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl Product for FieldElement {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.to_u256())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement(0x{:x})", self.to_u256())
    }
}

/// Human-readable formats carry `0x`-prefixed hex; binary formats carry the
/// 32 big-endian bytes.
impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            self.to_be_bytes().serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(de::Error::custom)
        } else {
            let bytes = <[u8; ENCODED_LEN]>::deserialize(deserializer)?;
            Self::from_be_bytes(&bytes).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn montgomery_roundtrip_small_values() {
        for x in [0u64, 1, 2, 3, 0x21, u64::MAX] {
            assert_eq!(FieldElement::from(x).to_u256(), U256::from_u64(x));
        }
        assert_eq!(FieldElement::ONE, FieldElement::from(1u64));
    }

    #[test]
    fn modulus_minus_one_wraps_to_zero() {
        let pm1 = MODULUS.overflowing_sub(&U256::ONE).0;
        let x = FieldElement::from_u256(pm1).unwrap();
        assert_eq!(x + FieldElement::ONE, FieldElement::ZERO);
        assert_eq!(-FieldElement::ONE, x);
        assert_eq!(x * x, FieldElement::ONE);
    }

    #[test]
    fn non_canonical_encodings_rejected() {
        assert!(FieldElement::from_u256(MODULUS).is_err());
        assert!(FieldElement::from_be_slice(&[0u8; 31]).is_err());
    }

    #[test]
    fn inverse_of_zero_fails() {
        assert_eq!(FieldElement::ZERO.inverse(), Err(FieldError::DivisionByZero));
    }

    #[test]
    fn zero_to_the_zero_is_one() {
        assert_eq!(FieldElement::ZERO.pow_u64(0), FieldElement::ONE);
        assert_eq!(FieldElement::ZERO.pow_u64(5), FieldElement::ZERO);
    }

    #[test]
    fn json_uses_hex_strings() {
        let x = FieldElement::from(0x441u64);
        let s = serde_json::to_string(&x).unwrap();
        assert_eq!(
            s,
            "\"0x0000000000000000000000000000000000000000000000000000000000000441\""
        );
        let back: FieldElement = serde_json::from_str(&s).unwrap();
        assert_eq!(back, x);
    }
}
