//! Scalars modulo the prime group order l

use std::ops::{Add, Mul, Neg, Sub};

use crate::arith::{U256, GROUP_ORDER};
use crate::error::CryptoError;

/// Integer in [0, l)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Scalar(U256);

impl Scalar {
    pub const ZERO: Self = Self(U256::ZERO);
    pub const ONE: Self = Self(U256::ONE);

    pub fn from_u64(value: u64) -> Self {
        Self(GROUP_ORDER.reduce(&U256::from_u64(value)))
    }

    /// Reduce any 32-byte little-endian value mod l (`sc_reduce32`)
    pub fn from_bytes_mod_order(bytes: &[u8; 32]) -> Self {
        Self(GROUP_ORDER.reduce(&U256::from_le_bytes(bytes)))
    }

    /// Accept only values already below l
    pub fn from_canonical_bytes(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        let value = U256::from_le_bytes(bytes);
        if value >= *GROUP_ORDER.value() {
            return Err(CryptoError::InvalidEncoding("scalar is not reduced mod l".into()));
        }
        Ok(Self(value))
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

    pub fn invert(&self) -> Result<Self, CryptoError> {
        GROUP_ORDER.inverse(&self.0).map(Self)
    }
}

impl Add for Scalar {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(GROUP_ORDER.add(&self.0, &rhs.0))
    }
}

impl Sub for Scalar {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(GROUP_ORDER.sub(&self.0, &rhs.0))
    }
}

impl Mul for Scalar {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(GROUP_ORDER.mul(&self.0, &rhs.0))
    }
}

impl Neg for Scalar {
    type Output = Self;

    fn neg(self) -> Self {
        Self(GROUP_ORDER.neg(&self.0))
    }
}
