//! 8-byte payment ids and their encryption
//!
//! Short payment ids travel XORed with a keystream drawn from the
//! transaction's key derivation, so only the sender and the receiver can
//! read them.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use xmrkit_crypto::keccak256;

use crate::derivation::generate_key_derivation;
use crate::error::CoreError;
use crate::keys::{PrivateKey, PublicKey, KEY_LEN};

pub const PAYMENT_ID_LEN: usize = 8;

/// Domain byte appended to the derivation before hashing
const ENCRYPTED_PAYMENT_ID_TAIL: u8 = 0x8d;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PaymentId([u8; PAYMENT_ID_LEN]);

impl PaymentId {
    pub fn from_bytes(bytes: [u8; PAYMENT_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let arr: [u8; PAYMENT_ID_LEN] = bytes.try_into().map_err(|_| CoreError::InvalidLength {
            expected: PAYMENT_ID_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        Self::from_slice(&hex::decode(s.trim())?)
    }

    pub fn generate() -> Self {
        let mut bytes = [0u8; PAYMENT_ID_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PAYMENT_ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Encrypt or decrypt; the operation is its own inverse
    pub fn stealth(&self, public: &PublicKey, secret: &PrivateKey) -> Self {
        stealth_payment_id(self, public, secret)
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for PaymentId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for PaymentId {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<PaymentId> for String {
    fn from(id: PaymentId) -> Self {
        id.to_hex()
    }
}

/// XOR `payment_id` with Keccak256(derivation || 0x8d)[..8].
///
/// The sender passes (recipient view public, tx secret); the receiver
/// passes (tx public, view secret). Both reach the same derivation.
pub fn stealth_payment_id(payment_id: &PaymentId, public: &PublicKey, secret: &PrivateKey) -> PaymentId {
    let derivation = generate_key_derivation(public, secret);

    let mut data = [0u8; KEY_LEN + 1];
    data[..KEY_LEN].copy_from_slice(derivation.as_bytes());
    data[KEY_LEN] = ENCRYPTED_PAYMENT_ID_TAIL;
    let keystream = keccak256(&data);

    let mut out = payment_id.0;
    for (byte, key) in out.iter_mut().zip(keystream.iter()) {
        *byte ^= key;
    }
    PaymentId(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;

    #[test]
    fn test_stealth_is_involution() {
        let recipient = KeyPair::from_seed(&[0x10; 32]).account();
        let r = PrivateKey::from_bytes_mod_order(&[0x20; 32]);
        let id = PaymentId::from_hex("1122334455667788").unwrap();

        let encrypted = stealth_payment_id(&id, &recipient.view_public, &r);
        assert_ne!(encrypted, id);
        assert_eq!(stealth_payment_id(&encrypted, &recipient.view_public, &r), id);

        // Receiver decrypts with the tx public key and its view secret
        let decrypted = encrypted.stealth(&r.public_key(), &recipient.view_secret);
        assert_eq!(decrypted, id);
    }

    #[test]
    fn test_keystream_layout() {
        let recipient = KeyPair::from_seed(&[0x10; 32]).account();
        let r = PrivateKey::from_bytes_mod_order(&[0x20; 32]);
        let zero = PaymentId::from_bytes([0; 8]);

        let derivation = generate_key_derivation(&recipient.view_public, &r);
        let mut data = derivation.as_bytes().to_vec();
        data.push(0x8d);
        let expected = &keccak256(&data)[..8];

        assert_eq!(stealth_payment_id(&zero, &recipient.view_public, &r).as_bytes(), expected);
    }

    #[test]
    fn test_hex_parsing() {
        let id: PaymentId = "deadbeefcafebabe".parse().unwrap();
        assert_eq!(id.to_string(), "deadbeefcafebabe");
        assert_eq!(
            PaymentId::from_hex("deadbeef"),
            Err(CoreError::InvalidLength { expected: 8, actual: 4 })
        );
        assert!(matches!(PaymentId::from_hex("xyz"), Err(CoreError::InvalidEncoding(_))));
        assert_ne!(PaymentId::generate(), PaymentId::generate());
    }
}
