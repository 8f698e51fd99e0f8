//! Twisted Edwards curve -x^2 + y^2 = 1 + d*x^2*y^2 over GF(2^255 - 19)
//!
//! Points are affine, immutable values. Scalar multiplication is an
//! iterative double-and-add over the bits of the scalar. The loop itself
//! runs on extended coordinates (X:Y:Z:T) so that only one field inversion
//! is paid per multiplication; the result is converted back to affine form
//! before it is handed out.
//!
//! Encoding is the usual 32-byte little-endian y with the parity of x
//! stored in the top bit.

use std::ops::{Add, Mul, Neg, Sub};
use std::sync::LazyLock;

use crate::arith::U256;
use crate::error::CryptoError;
use crate::field::FieldElement;
use crate::scalar::Scalar;

/// d = -121665 / 121666
static EDWARDS_D: LazyLock<FieldElement> = LazyLock::new(|| {
    -FieldElement::from_u64(121_665) * FieldElement::from_u64(121_666).invert()
});

static EDWARDS_D2: LazyLock<FieldElement> = LazyLock::new(|| *EDWARDS_D + *EDWARDS_D);

/// B = (x, 4/5) with x even
const BASEPOINT: EdwardsPoint = EdwardsPoint {
    x: FieldElement::from_canonical_limbs([
        0xc956_2d60_8f25_d51a,
        0x692c_c760_9525_a7b2,
        0xc0a4_e231_fdd6_dc5c,
        0x2169_36d3_cd6e_53fe,
    ]),
    y: FieldElement::from_canonical_limbs([
        0x6666_6666_6666_6658,
        0x6666_6666_6666_6666,
        0x6666_6666_6666_6666,
        0x6666_6666_6666_6666,
    ]),
};

/// Affine curve point
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EdwardsPoint {
    x: FieldElement,
    y: FieldElement,
}

/// Extended coordinates: x = X/Z, y = Y/Z, x*y = T/Z
#[derive(Copy, Clone, Debug)]
struct ExtendedPoint {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
    t: FieldElement,
}

impl ExtendedPoint {
    fn identity() -> Self {
        Self {
            x: FieldElement::ZERO,
            y: FieldElement::ONE,
            z: FieldElement::ONE,
            t: FieldElement::ZERO,
        }
    }

    fn from_affine(p: &EdwardsPoint) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: FieldElement::ONE,
            t: p.x * p.y,
        }
    }

    fn to_affine(self) -> EdwardsPoint {
        let z_inv = self.z.invert();
        EdwardsPoint {
            x: self.x * z_inv,
            y: self.y * z_inv,
        }
    }

    // add-2008-hwcd-3, a = -1
    fn add(&self, other: &Self) -> Self {
        let a = (self.y - self.x) * (other.y - other.x);
        let b = (self.y + self.x) * (other.y + other.x);
        let c = self.t * *EDWARDS_D2 * other.t;
        let d = (self.z + self.z) * other.z;
        let e = b - a;
        let f = d - c;
        let g = d + c;
        let h = b + a;
        Self {
            x: e * f,
            y: g * h,
            z: f * g,
            t: e * h,
        }
    }

    // dbl-2008-hwcd, a = -1
    fn double(&self) -> Self {
        let a = self.x.square();
        let b = self.y.square();
        let zz = self.z.square();
        let c = zz + zz;
        let d = -a;
        let e = (self.x + self.y).square() - a - b;
        let g = d + b;
        let f = g - c;
        let h = d - b;
        Self {
            x: e * f,
            y: g * h,
            z: f * g,
            t: e * h,
        }
    }
}

impl EdwardsPoint {
    /// The neutral element (0, 1)
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
    };

    /// Build a point from coordinates, rejecting pairs off the curve
    pub fn from_coordinates(x: FieldElement, y: FieldElement) -> Result<Self, CryptoError> {
        let point = Self { x, y };
        if !point.is_on_curve() {
            return Err(CryptoError::PointNotOnCurve);
        }
        Ok(point)
    }

    pub fn basepoint() -> Self {
        BASEPOINT
    }

    pub fn edwards_d() -> FieldElement {
        *EDWARDS_D
    }

    pub fn x(&self) -> &FieldElement {
        &self.x
    }

    pub fn y(&self) -> &FieldElement {
        &self.y
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// -x^2 + y^2 == 1 + d*x^2*y^2
    pub fn is_on_curve(&self) -> bool {
        let xx = self.x.square();
        let yy = self.y.square();
        yy - xx == FieldElement::ONE + *EDWARDS_D * xx * yy
    }

    /// Affine addition:
    /// x3 = (x1*y2 + x2*y1) / (1 + d*x1*x2*y1*y2),
    /// y3 = (y1*y2 + x1*x2) / (1 - d*x1*x2*y1*y2)
    pub fn add(self, other: &Self) -> Self {
        let dxxyy = *EDWARDS_D * self.x * other.x * self.y * other.y;
        let x = (self.x * other.y + other.x * self.y) * (FieldElement::ONE + dxxyy).invert();
        let y = (self.y * other.y + self.x * other.x) * (FieldElement::ONE - dxxyy).invert();
        Self { x, y }
    }

    pub fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: self.y,
        }
    }

    pub fn sub(self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    pub fn double(self) -> Self {
        ExtendedPoint::from_affine(&self).double().to_affine()
    }

    /// k*P for any 256-bit k; 0*P is the identity
    pub fn mul(self, k: &U256) -> Self {
        let base = ExtendedPoint::from_affine(&self);
        let mut acc = ExtendedPoint::identity();
        for i in (0..k.bits()).rev() {
            acc = acc.double();
            if k.bit(i) {
                acc = acc.add(&base);
            }
        }
        acc.to_affine()
    }

    pub fn mul_scalar(self, k: &Scalar) -> Self {
        self.mul(k.as_u256())
    }

    /// k*B
    pub fn mul_base(k: &U256) -> Self {
        Self::basepoint().mul(k)
    }

    pub fn mul_base_scalar(k: &Scalar) -> Self {
        Self::mul_base(k.as_u256())
    }

    /// 8*P, clears any small-order component
    pub fn mul_by_cofactor(self) -> Self {
        let mut acc = ExtendedPoint::from_affine(&self);
        for _ in 0..3 {
            acc = acc.double();
        }
        acc.to_affine()
    }

    pub fn compress(&self) -> [u8; 32] {
        let mut bytes = self.y.to_bytes();
        bytes[31] |= (self.x.is_odd() as u8) << 7;
        bytes
    }

    /// Recover x from y and the sign bit, then verify the curve equation
    pub fn decompress(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        let sign = bytes[31] >> 7 == 1;
        let mut y_bytes = *bytes;
        y_bytes[31] &= 0x7f;
        let y = FieldElement::from_bytes(&y_bytes);

        // x^2 = (y^2 - 1) / (d*y^2 + 1)
        let yy = y.square();
        let u = yy - FieldElement::ONE;
        let v = *EDWARDS_D * yy + FieldElement::ONE;
        let mut x = FieldElement::sqrt_ratio(&u, &v).ok_or(CryptoError::PointNotOnCurve)?;

        if x.is_zero() && sign {
            return Err(CryptoError::PointNotOnCurve);
        }
        if x.is_odd() != sign {
            x = -x;
        }

        Self::from_coordinates(x, y)
    }
}

impl Add for EdwardsPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        EdwardsPoint::add(self, &rhs)
    }
}

impl Sub for EdwardsPoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        EdwardsPoint::sub(self, &rhs)
    }
}

impl Neg for EdwardsPoint {
    type Output = Self;

    fn neg(self) -> Self {
        EdwardsPoint::neg(self)
    }
}

impl Mul<&Scalar> for EdwardsPoint {
    type Output = Self;

    fn mul(self, rhs: &Scalar) -> Self {
        self.mul_scalar(rhs)
    }
}

/// Compressed 32-byte encoding of a point
pub fn encode_point(point: &EdwardsPoint) -> [u8; 32] {
    point.compress()
}

/// Decode a compressed point from a slice, checking length and curve membership
pub fn decode_point(bytes: &[u8]) -> Result<EdwardsPoint, CryptoError> {
    let arr: &[u8; 32] = bytes.try_into().map_err(|_| CryptoError::InvalidLength {
        expected: 32,
        actual: bytes.len(),
    })?;
    EdwardsPoint::decompress(arr)
}

/// 32-byte little-endian integer encoding
pub fn encode_int(value: &U256) -> [u8; 32] {
    value.to_le_bytes()
}

pub fn decode_int(bytes: &[u8; 32]) -> U256 {
    U256::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::GROUP_ORDER;
    use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
    use curve25519_dalek::edwards::CompressedEdwardsY;
    use curve25519_dalek::scalar::Scalar as DalekScalar;

    #[test]
    fn test_curve_constants() {
        assert_eq!(
            hex::encode(EdwardsPoint::edwards_d().to_bytes()),
            "a3785913ca4deb75abd841414d0a700098e879777940c78c73fe6f2bee6c0352"
        );
        let b = EdwardsPoint::basepoint();
        assert!(b.is_on_curve());
        assert!(!b.x().is_odd());
        let four_fifths = FieldElement::from_u64(4) * FieldElement::from_u64(5).invert();
        assert_eq!(*b.y(), four_fifths);
        assert_eq!(EdwardsPoint::decompress(&four_fifths.to_bytes()), Ok(b));
        assert_eq!(
            hex::encode(b.compress()),
            "5866666666666666666666666666666666666666666666666666666666666666"
        );
    }

    #[test]
    fn test_identity() {
        let b = EdwardsPoint::basepoint();
        assert!(EdwardsPoint::IDENTITY.is_on_curve());
        assert_eq!(b.mul(&U256::ZERO), EdwardsPoint::IDENTITY);
        assert_eq!(b + EdwardsPoint::IDENTITY, b);
        assert_eq!(b - b, EdwardsPoint::IDENTITY);
        assert_eq!(
            hex::encode(EdwardsPoint::IDENTITY.compress()),
            "0100000000000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_group_order_annihilates_basepoint() {
        let b = EdwardsPoint::basepoint();
        assert!(b.mul(GROUP_ORDER.value()).is_identity());
    }

    #[test]
    fn test_affine_add_matches_extended() {
        let b = EdwardsPoint::basepoint();
        let two_b = b.add(&b);
        assert_eq!(two_b, b.double());
        assert_eq!(two_b, b.mul(&U256::from_u64(2)));
        let five_b = two_b + two_b + b;
        assert_eq!(five_b, b.mul(&U256::from_u64(5)));
    }

    #[test]
    fn test_mul_base_matches_dalek() {
        for seed in [1u8, 7, 42, 0xfe] {
            let bytes = [seed; 32];
            let k = Scalar::from_bytes_mod_order(&bytes);
            let ours = EdwardsPoint::mul_base_scalar(&k).compress();
            let theirs = (ED25519_BASEPOINT_POINT * DalekScalar::from_bytes_mod_order(bytes))
                .compress()
                .to_bytes();
            assert_eq!(ours, theirs);
        }
    }

    #[test]
    fn test_variable_base_mul_matches_dalek() {
        let p_scalar = DalekScalar::from_bytes_mod_order([0x33; 32]);
        let p_dalek = ED25519_BASEPOINT_POINT * p_scalar;
        let p = EdwardsPoint::decompress(&p_dalek.compress().to_bytes()).unwrap();

        let k_bytes = [0x9du8; 32];
        let k = Scalar::from_bytes_mod_order(&k_bytes);
        let expected = p_dalek * DalekScalar::from_bytes_mod_order(k_bytes);

        assert_eq!((p * &k).compress(), expected.compress().to_bytes());
        assert_eq!(
            p.mul_by_cofactor().compress(),
            p_dalek.mul_by_cofactor().compress().to_bytes()
        );
    }

    #[test]
    fn test_point_roundtrip() {
        let b = EdwardsPoint::basepoint();
        for k in [1u64, 2, 3, 1000, u64::MAX] {
            let p = b.mul(&U256::from_u64(k));
            let decoded = EdwardsPoint::decompress(&p.compress()).unwrap();
            assert_eq!(decoded, p);
        }
    }

    #[test]
    fn test_decompress_agrees_with_dalek_on_validity() {
        for first in 0u8..32 {
            let mut bytes = [0u8; 32];
            bytes[0] = first;
            bytes[31] = 0x11;
            let ours = EdwardsPoint::decompress(&bytes).is_ok();
            let theirs = CompressedEdwardsY(bytes).decompress().is_some();
            assert_eq!(ours, theirs, "disagreement on {}", hex::encode(bytes));
        }
    }

    #[test]
    fn test_decode_point_rejects_bad_input() {
        assert_eq!(
            decode_point(&[0u8; 31]),
            Err(CryptoError::InvalidLength { expected: 32, actual: 31 })
        );
        // y = 2 gives a non-square x^2
        let mut bytes = [0u8; 32];
        bytes[0] = 2;
        assert_eq!(decode_point(&bytes), Err(CryptoError::PointNotOnCurve));
        // identity with the sign bit set: x = 0 cannot be negative
        let mut bytes = EdwardsPoint::IDENTITY.compress();
        bytes[31] |= 0x80;
        assert_eq!(decode_point(&bytes), Err(CryptoError::PointNotOnCurve));
    }

    #[test]
    fn test_from_coordinates_checks_curve() {
        assert_eq!(
            EdwardsPoint::from_coordinates(FieldElement::ONE, FieldElement::ONE),
            Err(CryptoError::PointNotOnCurve)
        );
    }

    #[test]
    fn test_int_roundtrip() {
        let v = U256::from_be_hex("0badc0ffee0ddf00d").unwrap();
        assert_eq!(decode_int(&encode_int(&v)), v);
    }
}
