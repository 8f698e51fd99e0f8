//! Fixed-width integers and modular arithmetic
//!
//! [`U256`] is a plain 256-bit unsigned integer stored as four little-endian
//! `u64` limbs. Products of two `U256` values are 512 bits wide and are
//! handled as `[u64; 8]`.
//!
//! [`Modulus`] pairs a prime modulus with the way wide products are reduced
//! against it. Every operation expects reduced inputs and returns the least
//! non-negative residue, so values never leave `[0, m)`.

use std::cmp::Ordering;
use std::fmt;

use crate::error::CryptoError;

/// 256-bit unsigned integer, little-endian limbs.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct U256(pub(crate) [u64; 4]);

impl U256 {
    pub const ZERO: Self = Self([0; 4]);
    pub const ONE: Self = Self([1, 0, 0, 0]);

    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        Self(limbs)
    }

    pub const fn from_u64(value: u64) -> Self {
        Self([value, 0, 0, 0])
    }

    pub const fn limbs(&self) -> [u64; 4] {
        self.0
    }

    /// Interpret 32 bytes as a little-endian integer
    pub fn from_le_bytes(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            *limb = u64::from_le_bytes(buf);
        }
        Self(limbs)
    }

    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (chunk, limb) in out.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&limb.to_le_bytes());
        }
        out
    }

    /// Parse a big-endian hex string of at most 64 digits
    pub fn from_be_hex(s: &str) -> Result<Self, CryptoError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let padded = if s.len() % 2 == 1 {
            format!("0{s}")
        } else {
            s.to_string()
        };
        let bytes = hex::decode(&padded).map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?;
        if bytes.len() > 32 {
            return Err(CryptoError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }

        let mut le = [0u8; 32];
        for (dst, src) in le.iter_mut().zip(bytes.iter().rev()) {
            *dst = *src;
        }
        Ok(Self::from_le_bytes(&le))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&l| l == 0)
    }

    pub fn is_odd(&self) -> bool {
        self.0[0] & 1 == 1
    }

    /// Bit `i`, counting from the least significant bit
    pub fn bit(&self, i: u32) -> bool {
        if i >= 256 {
            return false;
        }
        (self.0[(i / 64) as usize] >> (i % 64)) & 1 == 1
    }

    /// Number of significant bits (0 for zero)
    pub fn bits(&self) -> u32 {
        for (i, &limb) in self.0.iter().enumerate().rev() {
            if limb != 0 {
                return (i as u32) * 64 + (64 - limb.leading_zeros());
            }
        }
        0
    }

    pub fn overflowing_add(&self, rhs: &Self) -> (Self, bool) {
        let mut out = [0u64; 4];
        let mut carry = false;
        for i in 0..4 {
            let (s1, c1) = self.0[i].overflowing_add(rhs.0[i]);
            let (s2, c2) = s1.overflowing_add(carry as u64);
            out[i] = s2;
            carry = c1 || c2;
        }
        (Self(out), carry)
    }

    pub fn overflowing_sub(&self, rhs: &Self) -> (Self, bool) {
        let mut out = [0u64; 4];
        let mut borrow = false;
        for i in 0..4 {
            let (d1, b1) = self.0[i].overflowing_sub(rhs.0[i]);
            let (d2, b2) = d1.overflowing_sub(borrow as u64);
            out[i] = d2;
            borrow = b1 || b2;
        }
        (Self(out), borrow)
    }

    pub fn wrapping_add(&self, rhs: &Self) -> Self {
        self.overflowing_add(rhs).0
    }

    pub fn wrapping_sub(&self, rhs: &Self) -> Self {
        self.overflowing_sub(rhs).0
    }

    /// Shift left by one bit, returning the bit shifted out of the top
    pub fn shl1(&self) -> (Self, bool) {
        let mut out = [0u64; 4];
        let mut carry = 0u64;
        for i in 0..4 {
            out[i] = (self.0[i] << 1) | carry;
            carry = self.0[i] >> 63;
        }
        (Self(out), carry == 1)
    }

    /// Logical right shift; shifts of 256 or more yield zero
    pub fn shr(&self, n: u32) -> Self {
        if n >= 256 {
            return Self::ZERO;
        }
        let limb_shift = (n / 64) as usize;
        let bit_shift = n % 64;

        let mut out = [0u64; 4];
        for i in 0..(4 - limb_shift) {
            let lo = self.0[i + limb_shift] >> bit_shift;
            let hi = if bit_shift > 0 && i + limb_shift + 1 < 4 {
                self.0[i + limb_shift + 1] << (64 - bit_shift)
            } else {
                0
            };
            out[i] = lo | hi;
        }
        Self(out)
    }

    /// Full 512-bit product
    pub fn mul_wide(&self, rhs: &Self) -> [u64; 8] {
        let mut out = [0u64; 8];
        for i in 0..4 {
            let mut carry: u128 = 0;
            for j in 0..4 {
                let t = (self.0[i] as u128) * (rhs.0[j] as u128) + (out[i + j] as u128) + carry;
                out[i + j] = t as u64;
                carry = t >> 64;
            }
            out[i + 4] = carry as u64;
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

impl fmt::Display for U256 {
    /// Big-endian lowercase hex, always 64 digits
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for limb in self.0.iter().rev() {
            write!(f, "{:016x}", limb)?;
        }
        Ok(())
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256(0x{})", self)
    }
}

/// A prime modulus and its reduction strategy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Modulus {
    value: U256,
    /// 2^256 mod `value`, set when it fits in a single limb
    fold: Option<u64>,
}

/// q = 2^255 - 19
pub const FIELD_MODULUS: Modulus = Modulus {
    value: U256([
        0xffff_ffff_ffff_ffed,
        0xffff_ffff_ffff_ffff,
        0xffff_ffff_ffff_ffff,
        0x7fff_ffff_ffff_ffff,
    ]),
    fold: Some(38),
};

/// l = 2^252 + 27742317777372353535851937790883648493
pub const GROUP_ORDER: Modulus = Modulus {
    value: U256([
        0x5812_631a_5cf5_d3ed,
        0x14de_f9de_a2f7_9cd6,
        0x0000_0000_0000_0000,
        0x1000_0000_0000_0000,
    ]),
    fold: None,
};

impl Modulus {
    /// Generic modulus using shift-subtract reduction.
    ///
    /// `inverse` relies on Fermat's little theorem and is only meaningful
    /// for prime moduli.
    pub fn new(value: U256) -> Result<Self, CryptoError> {
        if value.bits() < 2 {
            return Err(CryptoError::InvalidEncoding("modulus must be at least 2".into()));
        }
        Ok(Self { value, fold: None })
    }

    pub const fn value(&self) -> &U256 {
        &self.value
    }

    pub fn reduce(&self, a: &U256) -> U256 {
        let mut wide = [0u64; 8];
        wide[..4].copy_from_slice(&a.0);
        self.reduce_wide(&wide)
    }

    pub fn reduce_wide(&self, wide: &[u64; 8]) -> U256 {
        match self.fold {
            Some(c) => self.reduce_folded(wide, c),
            None => self.reduce_generic(wide),
        }
    }

    /// wide = lo + 2^256 * hi ≡ lo + c * hi
    fn reduce_folded(&self, wide: &[u64; 8], c: u64) -> U256 {
        let mut acc = [0u64; 4];
        let mut carry: u128 = 0;
        for i in 0..4 {
            let t = (wide[i] as u128) + (wide[i + 4] as u128) * (c as u128) + carry;
            acc[i] = t as u64;
            carry = t >> 64;
        }

        // The leftover top limb is at most c; fold it once more
        let mut carry: u128 = carry * (c as u128);
        for limb in acc.iter_mut() {
            let t = (*limb as u128) + carry;
            *limb = t as u64;
            carry = t >> 64;
        }
        let mut r = U256(acc);
        if carry != 0 {
            r = r.wrapping_add(&U256::from_u64(c));
        }

        while r >= self.value {
            r = r.wrapping_sub(&self.value);
        }
        r
    }

    fn reduce_generic(&self, wide: &[u64; 8]) -> U256 {
        let top = wide.iter().rposition(|&l| l != 0);
        let Some(top) = top else {
            return U256::ZERO;
        };
        let start_bit = (top as u32) * 64 + (64 - wide[top].leading_zeros());

        let mut r = U256::ZERO;
        for i in (0..start_bit).rev() {
            let bit = (wide[(i / 64) as usize] >> (i % 64)) & 1;
            let (mut shifted, overflow) = r.shl1();
            shifted.0[0] |= bit;
            r = if overflow || shifted >= self.value {
                shifted.wrapping_sub(&self.value)
            } else {
                shifted
            };
        }
        r
    }

    pub fn add(&self, a: &U256, b: &U256) -> U256 {
        let (sum, carry) = a.overflowing_add(b);
        if carry || sum >= self.value {
            sum.wrapping_sub(&self.value)
        } else {
            sum
        }
    }

    pub fn sub(&self, a: &U256, b: &U256) -> U256 {
        let (diff, borrow) = a.overflowing_sub(b);
        if borrow {
            diff.wrapping_add(&self.value)
        } else {
            diff
        }
    }

    pub fn neg(&self, a: &U256) -> U256 {
        if a.is_zero() {
            U256::ZERO
        } else {
            self.value.wrapping_sub(a)
        }
    }

    pub fn mul(&self, a: &U256, b: &U256) -> U256 {
        self.reduce_wide(&a.mul_wide(b))
    }

    pub fn square(&self, a: &U256) -> U256 {
        self.mul(a, a)
    }

    /// Left-to-right square and multiply over the bits of `exp`
    pub fn pow(&self, base: &U256, exp: &U256) -> U256 {
        let mut result = self.reduce(&U256::ONE);
        for i in (0..exp.bits()).rev() {
            result = self.square(&result);
            if exp.bit(i) {
                result = self.mul(&result, base);
            }
        }
        result
    }

    /// a^(m-2) mod m
    pub fn inverse(&self, a: &U256) -> Result<U256, CryptoError> {
        let a = self.reduce(a);
        if a.is_zero() {
            return Err(CryptoError::NotInvertible);
        }
        let exp = self.value.wrapping_sub(&U256::from_u64(2));
        Ok(self.pow(&a, &exp))
    }
}
