//! KoalaBear field arithmetic in Montgomery form.
//!
//! p = 2^31 - 2^24 + 1 = 2_130_706_433. R = 2^32 (so every residue fits a
//! single u32, and reduction fits in u64 arithmetic with no 128-bit types).

use core::fmt;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// The KoalaBear prime.
pub const P: u32 = 2_130_706_433;

/// R mod p, where R = 2^32.
const R_MOD_P: u32 = 33_554_430;
/// R^2 mod p, used to move a canonical integer into Montgomery form.
const R2_MOD_P: u32 = 402_124_772;
/// -p^{-1} mod 2^32, the REDC constant.
const NEG_P_INV: u32 = 2_130_706_431;

/// A KoalaBear field element, stored internally in Montgomery form
/// (`repr = value * R mod p`). All arithmetic operators work directly on
/// this representation; use [`FieldElement::from_canonical`] and
/// [`FieldElement::to_canonical`] to cross the boundary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldElement(u32);

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_canonical())
    }
}

/// Montgomery REDC: reduces `x` (< p * R) to `x * R^{-1} mod p`.
#[inline]
const fn mont_reduce(x: u64) -> u32 {
    let m = (x as u32).wrapping_mul(NEG_P_INV);
    let t = (x + (m as u64) * (P as u64)) >> 32;
    if t >= P as u64 {
        (t - P as u64) as u32
    } else {
        t as u32
    }
}

#[inline]
const fn mont_mul(a: u32, b: u32) -> u32 {
    mont_reduce((a as u64) * (b as u64))
}

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = Self(0);
    /// The multiplicative identity.
    pub const ONE: Self = Self(R_MOD_P);

    /// Build a field element from an arbitrary u32, reducing modulo p first.
    #[inline]
    pub const fn from_canonical(x: u32) -> Self {
        let x = if x >= P { x % P } else { x };
        Self(mont_mul(x, R2_MOD_P))
    }

    /// Build a field element from a u64, reducing modulo p first.
    #[inline]
    pub const fn from_canonical_u64(x: u64) -> Self {
        let x = (x % P as u64) as u32;
        Self(mont_mul(x, R2_MOD_P))
    }

    /// Recover the canonical representative in [0, p).
    #[inline]
    pub const fn to_canonical(self) -> u32 {
        mont_reduce(self.0 as u64)
    }

    /// Construct directly from an already-Montgomery-form limb. Only used
    /// internally (e.g. by the naive-vs-Montgomery test harness); prefer
    /// [`FieldElement::from_canonical`] elsewhere.
    #[inline]
    pub(crate) const fn from_montgomery_repr(repr: u32) -> Self {
        Self(repr)
    }

    #[inline]
    pub(crate) const fn montgomery_repr(self) -> u32 {
        self.0
    }

    /// `self * self`.
    #[inline]
    pub fn square(self) -> Self {
        Self(mont_mul(self.0, self.0))
    }

    /// `self^3`, the S-box used throughout Poseidon2 for this field.
    #[inline]
    pub fn cube(self) -> Self {
        self.square() * self
    }

    /// `self^exp` by square-and-multiply.
    pub fn pow(self, mut exp: u64) -> Self {
        let mut result = Self::ONE;
        let mut base = self;
        while exp > 0 {
            if exp & 1 == 1 {
                result = result * base;
            }
            base = base.square();
            exp >>= 1;
        }
        result
    }

    /// Multiplicative inverse via Fermat's little theorem (`self^(p-2)`).
    pub fn inverse(self) -> Result<Self, FieldError> {
        if self == Self::ZERO {
            return Err(FieldError::ZeroInverse);
        }
        Ok(self.pow((P - 2) as u64))
    }

    /// True iff this is the additive identity.
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Serialize as 4 little-endian bytes of the canonical representative,
    /// matching the scheme's wire format (§6).
    pub fn to_le_bytes(self) -> [u8; 4] {
        self.to_canonical().to_le_bytes()
    }

    /// Deserialize from 4 little-endian bytes. Values `>= p` are reduced
    /// rather than rejected, since the wire format never validates range on
    /// its own; callers that must reject out-of-range encodings should check
    /// `u32::from_le_bytes(bytes) < field::P` before calling this.
    pub fn from_le_bytes(bytes: [u8; 4]) -> Self {
        Self::from_canonical(u32::from_le_bytes(bytes))
    }
}

impl Add for FieldElement {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        let sum = self.0 + rhs.0;
        Self(if sum >= P { sum - P } else { sum })
    }
}

impl AddAssign for FieldElement {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for FieldElement {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        if self.0 >= rhs.0 {
            Self(self.0 - rhs.0)
        } else {
            Self(self.0 + P - rhs.0)
        }
    }
}

impl SubAssign for FieldElement {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul for FieldElement {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(mont_mul(self.0, rhs.0))
    }
}

impl MulAssign for FieldElement {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Neg for FieldElement {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        if self.0 == 0 {
            self
        } else {
            Self(P - self.0)
        }
    }
}
