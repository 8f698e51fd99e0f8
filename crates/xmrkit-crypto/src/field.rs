//! Elements of GF(q), q = 2^255 - 19

use std::ops::{Add, Mul, Neg, Sub};
use std::sync::LazyLock;

use crate::arith::{U256, FIELD_MODULUS};

/// Field element, always stored reduced
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldElement(U256);

/// (q + 3) / 8
static SQRT_EXPONENT: LazyLock<U256> =
    LazyLock::new(|| FIELD_MODULUS.value().wrapping_add(&U256::from_u64(3)).shr(3));

/// 2^((q - 1) / 4), a square root of -1
static SQRT_M1: LazyLock<FieldElement> = LazyLock::new(|| {
    let exp = FIELD_MODULUS.value().wrapping_sub(&U256::ONE).shr(2);
    FieldElement::from_u64(2).pow(&exp)
});

impl FieldElement {
    pub const ZERO: Self = Self(U256::ZERO);
    pub const ONE: Self = Self(U256::ONE);

    /// Limbs of a value already below q
    pub(crate) const fn from_canonical_limbs(limbs: [u64; 4]) -> Self {
        Self(U256::from_limbs(limbs))
    }

    pub fn from_u64(value: u64) -> Self {
        Self(FIELD_MODULUS.reduce(&U256::from_u64(value)))
    }

    pub fn from_u256(value: &U256) -> Self {
        Self(FIELD_MODULUS.reduce(value))
    }

    /// Little-endian bytes, reduced mod q
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self::from_u256(&U256::from_le_bytes(bytes))
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_le_bytes()
    }

    pub fn as_u256(&self) -> &U256 {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parity of the canonical representative; this is the "sign" of x
    pub fn is_odd(&self) -> bool {
        self.0.is_odd()
    }

    pub fn square(&self) -> Self {
        Self(FIELD_MODULUS.square(&self.0))
    }

    pub fn pow(&self, exp: &U256) -> Self {
        Self(FIELD_MODULUS.pow(&self.0, exp))
    }

    /// Multiplicative inverse; zero maps to zero
    pub fn invert(&self) -> Self {
        FIELD_MODULUS
            .inverse(&self.0)
            .map(Self)
            .unwrap_or(Self::ZERO)
    }

    pub fn sqrt_m1() -> Self {
        *SQRT_M1
    }

    /// Square root of u/v using the q ≡ 5 (mod 8) method.
    ///
    /// Returns `None` when v is zero or u/v is not a square. The root
    /// returned is not sign-normalized.
    pub fn sqrt_ratio(u: &Self, v: &Self) -> Option<Self> {
        if v.is_zero() {
            return None;
        }
        let ratio = *u * v.invert();
        let candidate = ratio.pow(&SQRT_EXPONENT);
        let check = candidate.square();

        if check == ratio {
            Some(candidate)
        } else if check == -ratio {
            Some(candidate * Self::sqrt_m1())
        } else {
            None
        }
    }
}

impl Add for FieldElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(FIELD_MODULUS.add(&self.0, &rhs.0))
    }
}

impl Sub for FieldElement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(FIELD_MODULUS.sub(&self.0, &rhs.0))
    }
}

impl Mul for FieldElement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(FIELD_MODULUS.mul(&self.0, &rhs.0))
    }
}

impl Neg for FieldElement {
    type Output = Self;

    fn neg(self) -> Self {
        Self(FIELD_MODULUS.neg(&self.0))
    }
}
