//! Fixed-width 256-bit unsigned integers (four little-endian `u64` limbs).
//!
//! Only what the field and the transcript need: big-endian byte codecs, hex
//! parsing, comparison, carry/borrow arithmetic, bit access and the 512-bit
//! schoolbook product used by Montgomery reduction.

use core::cmp::Ordering;
use core::fmt;

use crate::FieldError;

/// Unsigned 256-bit integer, limbs in little-endian order.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct U256(pub(crate) [u64; 4]);

/// `a + b + carry`, returning `(sum, carry_out)`.
#[inline]
pub(crate) const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let t = (a as u128) + (b as u128) + (carry as u128);
    (t as u64, (t >> 64) as u64)
}

/// `a - b - borrow`, returning `(difference, borrow_out)` with `borrow_out` in `{0, 1}`.
#[inline]
pub(crate) const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let t = (a as u128).wrapping_sub((b as u128) + (borrow as u128));
    (t as u64, ((t >> 64) as u64) & 1)
}

/// `a + b * c + carry`, returning `(low, high)`. Cannot overflow 128 bits.
#[inline]
pub(crate) const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let t = (a as u128) + (b as u128) * (c as u128) + (carry as u128);
    (t as u64, (t >> 64) as u64)
}

impl U256 {
    /// Zero.
    pub const ZERO: Self = Self([0; 4]);
    /// One.
    pub const ONE: Self = Self([1, 0, 0, 0]);

    /// Build from little-endian limbs.
    #[inline]
    #[must_use]
    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        Self(limbs)
    }

    /// Little-endian limbs.
    #[inline]
    #[must_use]
    pub const fn limbs(&self) -> [u64; 4] {
        self.0
    }

    /// Widen a `u64`.
    #[inline]
    #[must_use]
    pub const fn from_u64(x: u64) -> Self {
        Self([x, 0, 0, 0])
    }

    /// Parse 32 big-endian bytes.
    #[must_use]
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            limbs[3 - i] = u64::from_be_bytes(word);
        }
        Self(limbs)
    }

    /// Encode as 32 big-endian bytes.
    #[must_use]
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, chunk) in out.chunks_exact_mut(8).enumerate() {
            chunk.copy_from_slice(&self.0[3 - i].to_be_bytes());
        }
        out
    }

    /// Parse a hex string (optional `0x` prefix, at most 64 digits).
    ///
    /// # Errors
    /// [`FieldError::InvalidHex`] on a bad digit or an over-long literal.
    pub fn from_hex(s: &str) -> Result<Self, FieldError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > 64 {
            return Err(FieldError::InvalidHex(s.to_owned()));
        }
        let padded = format!("{digits:0>64}");
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes).map_err(|_| FieldError::InvalidHex(s.to_owned()))?;
        Ok(Self::from_be_bytes(&bytes))
    }

    /// `true` when zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 4]
    }

    /// Least-significant 64 bits.
    #[inline]
    #[must_use]
    pub const fn low_u64(&self) -> u64 {
        self.0[0]
    }

    /// Number of significant bits (0 for zero).
    #[must_use]
    pub fn bits(&self) -> u32 {
        for i in (0..4).rev() {
            if self.0[i] != 0 {
                return 64 * i as u32 + (64 - self.0[i].leading_zeros());
            }
        }
        0
    }

    /// Bit `i` (little-endian numbering). Out-of-range bits read as zero.
    #[inline]
    #[must_use]
    pub const fn bit(&self, i: u32) -> bool {
        if i >= 256 {
            return false;
        }
        (self.0[(i / 64) as usize] >> (i % 64)) & 1 == 1
    }

    /// Logical right shift.
    #[must_use]
    pub fn shr(&self, n: u32) -> Self {
        if n >= 256 {
            return Self::ZERO;
        }
        let (words, bits) = ((n / 64) as usize, n % 64);
        let mut out = [0u64; 4];
        for i in 0..4 - words {
            out[i] = self.0[i + words] >> bits;
            if bits > 0 && i + words + 1 < 4 {
                out[i] |= self.0[i + words + 1] << (64 - bits);
            }
        }
        Self(out)
    }

    /// Addition with carry out.
    #[must_use]
    pub const fn overflowing_add(&self, rhs: &Self) -> (Self, bool) {
        let (l0, c) = adc(self.0[0], rhs.0[0], 0);
        let (l1, c) = adc(self.0[1], rhs.0[1], c);
        let (l2, c) = adc(self.0[2], rhs.0[2], c);
        let (l3, c) = adc(self.0[3], rhs.0[3], c);
        (Self([l0, l1, l2, l3]), c != 0)
    }

    /// Subtraction with borrow out.
    #[must_use]
    pub const fn overflowing_sub(&self, rhs: &Self) -> (Self, bool) {
        let (l0, b) = sbb(self.0[0], rhs.0[0], 0);
        let (l1, b) = sbb(self.0[1], rhs.0[1], b);
        let (l2, b) = sbb(self.0[2], rhs.0[2], b);
        let (l3, b) = sbb(self.0[3], rhs.0[3], b);
        (Self([l0, l1, l2, l3]), b != 0)
    }

    /// Full 512-bit product, little-endian limbs.
    #[must_use]
    pub fn mul_wide(&self, rhs: &Self) -> [u64; 8] {
        let mut out = [0u64; 8];
        for i in 0..4 {
            let mut carry = 0;
            for j in 0..4 {
                let (lo, hi) = mac(out[i + j], self.0[i], rhs.0[j], carry);
                out[i + j] = lo;
                carry = hi;
            }
            out[i + 4] = carry;
        }
        out
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..4).rev() {
            match self.0[i].cmp(&other.0[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u64> for U256 {
    fn from(x: u64) -> Self {
        Self::from_u64(x)
    }
}

impl fmt::LowerHex for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_be_bytes()))
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{self:x}")
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{self:x}")
    }
}
