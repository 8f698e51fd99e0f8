//! Private/public keys and account key sets
//!
//! A Monero account is two Ed25519-style key pairs. The spend secret comes
//! from a 32-byte seed reduced mod l; the view secret is the hash of the
//! spend secret, so a seed alone restores the whole account.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use xmrkit_crypto::{keccak256, EdwardsPoint, Scalar};
use xmrkit_mnemonic::Mnemonic;

use crate::address::Address;
use crate::error::CoreError;
use crate::network::NetworkConfig;
use crate::payment_id::PaymentId;
use crate::subaddress::{generate_subaddress, SubaddressIndex};

pub const KEY_LEN: usize = 32;

/// Legacy 13-word mnemonics carry 16 bytes of entropy
pub const LEGACY_SEED_LEN: usize = 16;

pub(crate) fn parse_hex_32(s: &str) -> Result<[u8; KEY_LEN], CoreError> {
    let bytes = hex::decode(s.trim())?;
    bytes.as_slice().try_into().map_err(|_| CoreError::InvalidLength {
        expected: KEY_LEN,
        actual: bytes.len(),
    })
}

/// H_s: Keccak-256 reduced mod l
pub fn hash_to_scalar(data: &[u8]) -> Scalar {
    Scalar::from_bytes_mod_order(&keccak256(data))
}

/// View secret derived from the spend secret
pub fn derive_view_key(spend: &PrivateKey) -> PrivateKey {
    PrivateKey(hash_to_scalar(&spend.to_bytes()))
}

/// sk*B
pub fn public_from_private(secret: &PrivateKey) -> PublicKey {
    PublicKey::from_point(&EdwardsPoint::mul_base_scalar(&secret.0))
}

/// Secret scalar mod l
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrivateKey(Scalar);

impl PrivateKey {
    pub fn from_scalar(scalar: Scalar) -> Self {
        Self(scalar)
    }

    /// Accept only reduced 32-byte encodings
    pub fn from_bytes(bytes: &[u8; KEY_LEN]) -> Result<Self, CoreError> {
        Ok(Self(Scalar::from_canonical_bytes(bytes)?))
    }

    /// Reduce arbitrary bytes mod l (`sc_reduce32`)
    pub fn from_bytes_mod_order(bytes: &[u8; KEY_LEN]) -> Self {
        Self(Scalar::from_bytes_mod_order(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        Self::from_bytes(&parse_hex_32(s)?)
    }

    /// Uniform random scalar from the OS RNG
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        loop {
            OsRng.fill_bytes(&mut bytes);
            // Below 2^253 about half the draws are already < l
            bytes[31] &= 0x1f;
            if let Ok(scalar) = Scalar::from_canonical_bytes(&bytes) {
                return Self(scalar);
            }
        }
    }

    pub fn as_scalar(&self) -> &Scalar {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; KEY_LEN] {
        self.0.to_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn public_key(&self) -> PublicKey {
        public_from_private(self)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

impl FromStr for PrivateKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for PrivateKey {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<PrivateKey> for String {
    fn from(key: PrivateKey) -> Self {
        key.to_hex()
    }
}

/// Compressed point, validated on construction
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey {
    bytes: [u8; KEY_LEN],
    point: EdwardsPoint,
}

impl PublicKey {
    pub fn from_point(point: &EdwardsPoint) -> Self {
        Self {
            bytes: point.compress(),
            point: *point,
        }
    }

    /// Decode and check curve membership
    pub fn from_bytes(bytes: &[u8; KEY_LEN]) -> Result<Self, CoreError> {
        Ok(Self {
            bytes: *bytes,
            point: EdwardsPoint::decompress(bytes)?,
        })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let arr: &[u8; KEY_LEN] = bytes.try_into().map_err(|_| CoreError::InvalidLength {
            expected: KEY_LEN,
            actual: bytes.len(),
        })?;
        Self::from_bytes(arr)
    }

    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        Self::from_bytes(&parse_hex_32(s)?)
    }

    pub fn point(&self) -> &EdwardsPoint {
        &self.point
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for PublicKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for PublicKey {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.to_hex()
    }
}

/// Spend and view secrets of one account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPair {
    pub spend: PrivateKey,
    pub view: PrivateKey,
}

impl KeyPair {
    /// spend = seed mod l, view = H_s(spend)
    pub fn from_seed(seed: &[u8; KEY_LEN]) -> Self {
        Self::from_spend_key(PrivateKey::from_bytes_mod_order(seed))
    }

    /// Keys of a 13-word wallet: with h = Keccak(seed), spend = h mod l and
    /// view = Keccak(h) mod l. The view key hashes the unreduced h, so it is
    /// not `derive_view_key(spend)` in general.
    pub fn from_legacy_seed(seed: &[u8; LEGACY_SEED_LEN]) -> Self {
        let first = keccak256(seed);
        Self {
            spend: PrivateKey::from_bytes_mod_order(&first),
            view: PrivateKey::from_bytes_mod_order(&keccak256(&first)),
        }
    }

    pub fn from_spend_key(spend: PrivateKey) -> Self {
        Self {
            view: derive_view_key(&spend),
            spend,
        }
    }

    pub fn generate() -> Self {
        let mut seed = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut seed);
        Self::from_seed(&seed)
    }

    /// Restore from a 25-word (32-byte) or legacy 13-word (16-byte) mnemonic
    pub fn from_mnemonic(mnemonic: &Mnemonic) -> Result<Self, CoreError> {
        let seed = mnemonic.seed();
        match seed.len() {
            KEY_LEN => {
                let mut bytes = [0u8; KEY_LEN];
                bytes.copy_from_slice(seed);
                Ok(Self::from_seed(&bytes))
            }
            LEGACY_SEED_LEN => {
                let mut bytes = [0u8; LEGACY_SEED_LEN];
                bytes.copy_from_slice(seed);
                Ok(Self::from_legacy_seed(&bytes))
            }
            actual => Err(CoreError::InvalidLength {
                expected: KEY_LEN,
                actual,
            }),
        }
    }

    /// The 25-word mnemonic of the spend secret. Restoring it derives the
    /// view key from the spend key, so legacy accounts do not survive it.
    pub fn to_mnemonic(&self, language: &str) -> Result<Mnemonic, CoreError> {
        Ok(Mnemonic::from_seed(&self.spend.to_bytes(), language)?)
    }

    pub fn account(&self) -> AccountKeys {
        AccountKeys::from(*self)
    }
}

/// Both secrets and both public keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountKeys {
    pub spend_secret: PrivateKey,
    pub view_secret: PrivateKey,
    pub spend_public: PublicKey,
    pub view_public: PublicKey,
}

impl From<KeyPair> for AccountKeys {
    fn from(keys: KeyPair) -> Self {
        Self {
            spend_public: keys.spend.public_key(),
            view_public: keys.view.public_key(),
            spend_secret: keys.spend,
            view_secret: keys.view,
        }
    }
}

impl AccountKeys {
    pub fn address(&self, config: &NetworkConfig) -> Address {
        Address::standard(config, self.spend_public, self.view_public)
    }

    pub fn integrated_address(&self, config: &NetworkConfig, payment_id: PaymentId) -> Address {
        Address::integrated(config, self.spend_public, self.view_public, payment_id)
    }

    pub fn subaddress(&self, config: &NetworkConfig, index: SubaddressIndex) -> Address {
        generate_subaddress(config, &self.spend_public, &self.view_secret, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
    use curve25519_dalek::scalar::Scalar as DalekScalar;

    #[test]
    fn test_seed_to_keys_matches_reference() {
        for fill in [0x01u8, 0x5a, 0xff] {
            let seed = [fill; 32];
            let account = KeyPair::from_seed(&seed).account();

            let spend = DalekScalar::from_bytes_mod_order(seed);
            let view = DalekScalar::from_bytes_mod_order(keccak256(&spend.to_bytes()));
            assert_eq!(account.spend_secret.to_bytes(), spend.to_bytes());
            assert_eq!(account.view_secret.to_bytes(), view.to_bytes());
            assert_eq!(
                account.spend_public.as_bytes(),
                &(ED25519_BASEPOINT_POINT * spend).compress().to_bytes()
            );
            assert_eq!(
                account.view_public.as_bytes(),
                &(ED25519_BASEPOINT_POINT * view).compress().to_bytes()
            );
        }
    }

    #[test]
    fn test_view_key_is_deterministic() {
        let keys = KeyPair::generate();
        assert_eq!(derive_view_key(&keys.spend), keys.view);
        assert_eq!(KeyPair::from_spend_key(keys.spend), keys);
    }

    #[test]
    fn test_generate_is_reduced() {
        for _ in 0..16 {
            let key = PrivateKey::generate();
            assert_eq!(PrivateKey::from_bytes(&key.to_bytes()).unwrap(), key);
        }
    }

    #[test]
    fn test_private_key_hex() {
        let key = PrivateKey::from_bytes_mod_order(&[0x42; 32]);
        assert_eq!(PrivateKey::from_hex(&key.to_hex()).unwrap(), key);
        assert!(matches!(
            PrivateKey::from_hex(&hex::encode([0xff; 32])),
            Err(CoreError::Crypto(_))
        ));
        assert_eq!(
            PrivateKey::from_hex("abcd"),
            Err(CoreError::InvalidLength { expected: 32, actual: 2 })
        );
        assert!(matches!(PrivateKey::from_hex("zz"), Err(CoreError::InvalidEncoding(_))));
    }

    #[test]
    fn test_public_key_validation() {
        let key = PrivateKey::from_bytes_mod_order(&[7; 32]).public_key();
        assert_eq!(key.to_string().parse::<PublicKey>().unwrap(), key);

        let mut bad = [0u8; 32];
        bad[0] = 2;
        assert!(matches!(
            PublicKey::from_bytes(&bad),
            Err(CoreError::Crypto(xmrkit_crypto::CryptoError::PointNotOnCurve))
        ));
        assert!(matches!(
            PublicKey::from_slice(&[1u8; 31]),
            Err(CoreError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_serde_as_hex_strings() {
        let keys = KeyPair::from_seed(&[3; 32]);
        let public = keys.spend.public_key();

        let json = serde_json::to_string(&public).unwrap();
        assert_eq!(json, format!("\"{}\"", public.to_hex()));
        assert_eq!(serde_json::from_str::<PublicKey>(&json).unwrap(), public);

        let json = serde_json::to_string(&keys.view).unwrap();
        assert_eq!(serde_json::from_str::<PrivateKey>(&json).unwrap(), keys.view);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let keys = KeyPair::from_seed(&[9; 32]);
        let rendered = format!("{keys:?}");
        assert!(!rendered.contains(&keys.spend.to_hex()));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn test_mnemonic_roundtrip() {
        let keys = KeyPair::generate();
        let mnemonic = keys.to_mnemonic("English").unwrap();
        assert_eq!(mnemonic.words().len(), 25);

        let restored = Mnemonic::from_phrase(&mnemonic.phrase()).unwrap();
        assert_eq!(KeyPair::from_mnemonic(&restored).unwrap(), keys);
    }

    #[test]
    fn test_legacy_mnemonic_keys() {
        // Keccak([1; 16]) is above l, so reducing before the second hash would differ
        let seed = [0x01u8; 16];
        let mnemonic = Mnemonic::from_seed(&seed, "English").unwrap();
        assert_eq!(mnemonic.words().len(), 13);

        let keys = KeyPair::from_mnemonic(&mnemonic).unwrap();
        assert_eq!(keys, KeyPair::from_legacy_seed(&seed));
        assert_eq!(
            keys.spend.to_hex(),
            "a937991746708c8e9f39b517a3e712951b7a09104a7d9ad9236dad1a1a76b506"
        );
        assert_eq!(
            keys.view.to_hex(),
            "da9231678c780fd85c223d59ea862545881d415d2f875c718c38f25a26a16603"
        );
        assert_ne!(keys.view, derive_view_key(&keys.spend));
        assert_eq!(
            keys.account().address(&NetworkConfig::default()).encode(),
            "44uYuqbKt3saWspLR9dfBk2cmoGeQS6Dn9VSuwumUbSwdsKFChmTnm1Q61EvNiTKTGg7EFSuLfpVYFTQYdCKmK6r1vuBQHq"
        );
    }

    #[test]
    fn test_legacy_keys_hash_unreduced_seed_hash() {
        for fill in 0u8..16 {
            let seed = [fill; 16];
            let first = keccak256(&seed);
            let keys = KeyPair::from_legacy_seed(&seed);
            assert_eq!(keys.spend.to_bytes(), DalekScalar::from_bytes_mod_order(first).to_bytes());
            assert_eq!(
                keys.view.to_bytes(),
                DalekScalar::from_bytes_mod_order(keccak256(&first)).to_bytes()
            );
        }
    }
}
