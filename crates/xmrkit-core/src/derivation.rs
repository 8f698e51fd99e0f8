//! Key derivations and one-time output keys
//!
//! Sender and receiver meet on the same shared point:
//!
//! ```text
//! derivation = 8*r*A = 8*a*R
//! P = H_s(derivation || varint(index))*G + B
//! ```
//!
//! The receiver recomputes P with the view secret `a` and compares it to the
//! output key; only the spend secret can produce the matching one-time
//! secret `x` with P = x*G.

use std::fmt;

use xmrkit_crypto::varint::{self, MAX_VARINT_LEN};
use xmrkit_crypto::{EdwardsPoint, Scalar};

use crate::error::CoreError;
use crate::keys::{hash_to_scalar, parse_hex_32, PrivateKey, PublicKey, KEY_LEN};

/// Compressed 8*(secret*public)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyDerivation([u8; KEY_LEN]);

impl KeyDerivation {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        Ok(Self(parse_hex_32(s)?))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for KeyDerivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyDerivation([REDACTED])")
    }
}

pub fn generate_key_derivation(public: &PublicKey, secret: &PrivateKey) -> KeyDerivation {
    let shared = public.point().mul_scalar(secret.as_scalar()).mul_by_cofactor();
    KeyDerivation(shared.compress())
}

/// H_s(derivation || varint(index))
pub fn derivation_to_scalar(derivation: &KeyDerivation, output_index: u64) -> Scalar {
    let mut data = Vec::with_capacity(KEY_LEN + MAX_VARINT_LEN);
    data.extend_from_slice(derivation.as_bytes());
    data.extend_from_slice(&varint::encode(output_index));
    hash_to_scalar(&data)
}

/// One-time output key: base + H_s(...)*G
pub fn derive_public_key(derivation: &KeyDerivation, output_index: u64, base: &PublicKey) -> PublicKey {
    let offset = EdwardsPoint::mul_base_scalar(&derivation_to_scalar(derivation, output_index));
    PublicKey::from_point(&(*base.point() + offset))
}

/// One-time output secret: base + H_s(...)
pub fn derive_secret_key(derivation: &KeyDerivation, output_index: u64, base: &PrivateKey) -> PrivateKey {
    PrivateKey::from_scalar(derivation_to_scalar(derivation, output_index) + *base.as_scalar())
}

/// Recover the spend key an output was sent to: P - H_s(...)*G
pub fn derive_subaddress_public_key(
    output_key: &PublicKey,
    derivation: &KeyDerivation,
    output_index: u64,
) -> PublicKey {
    let offset = EdwardsPoint::mul_base_scalar(&derivation_to_scalar(derivation, output_index));
    PublicKey::from_point(&(*output_key.point() - offset))
}

/// Check whether `output_key` was sent to (view_secret, spend_public)
pub fn is_output_mine(
    tx_public: &PublicKey,
    view_secret: &PrivateKey,
    spend_public: &PublicKey,
    output_index: u64,
    output_key: &PublicKey,
) -> bool {
    let derivation = generate_key_derivation(tx_public, view_secret);
    derive_public_key(&derivation, output_index, spend_public).as_bytes() == output_key.as_bytes()
}
