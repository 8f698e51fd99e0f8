//! Subaddresses
//!
//! ```text
//! m = H_s("SubAddr\0" || a || u32le(major) || u32le(minor))
//! D = B + m*G
//! C = a*D
//! ```
//!
//! Every (major, minor) pair goes through the formula, (0, 0) included.
//! `SubaddressTable` is the exception: it maps the primary spend key to
//! (0, 0) so that scans see primary-address outputs too.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use tracing::debug;
use xmrkit_crypto::{EdwardsPoint, Scalar};

use crate::address::Address;
use crate::error::CoreError;
use crate::keys::{hash_to_scalar, PrivateKey, PublicKey, KEY_LEN};
use crate::network::NetworkConfig;

const SUBADDRESS_DOMAIN: &[u8; 8] = b"SubAddr\0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SubaddressIndex {
    /// Account
    pub major: u32,
    /// Address within the account
    pub minor: u32,
}

impl SubaddressIndex {
    pub const PRIMARY: Self = Self { major: 0, minor: 0 };

    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn is_primary(&self) -> bool {
        *self == Self::PRIMARY
    }
}

impl From<(u32, u32)> for SubaddressIndex {
    fn from((major, minor): (u32, u32)) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for SubaddressIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.major, self.minor)
    }
}

/// Parses "major/minor"
impl FromStr for SubaddressIndex {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidEncoding(format!("subaddress index '{s}', expected major/minor"));
        let (major, minor) = s.split_once('/').ok_or_else(invalid)?;
        Ok(Self {
            major: major.trim().parse().map_err(|_| invalid())?,
            minor: minor.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// m for `index`
pub fn subaddress_secret_key(view_secret: &PrivateKey, index: SubaddressIndex) -> Scalar {
    let mut data = Vec::with_capacity(SUBADDRESS_DOMAIN.len() + KEY_LEN + 8);
    data.extend_from_slice(SUBADDRESS_DOMAIN);
    data.extend_from_slice(&view_secret.to_bytes());
    data.extend_from_slice(&index.major.to_le_bytes());
    data.extend_from_slice(&index.minor.to_le_bytes());
    hash_to_scalar(&data)
}

/// D = B + m*G
pub fn subaddress_spend_public_key(
    spend_public: &PublicKey,
    view_secret: &PrivateKey,
    index: SubaddressIndex,
) -> PublicKey {
    let m = subaddress_secret_key(view_secret, index);
    PublicKey::from_point(&(*spend_public.point() + EdwardsPoint::mul_base_scalar(&m)))
}

/// b + m, the spend secret behind D
pub fn subaddress_spend_secret_key(
    spend_secret: &PrivateKey,
    view_secret: &PrivateKey,
    index: SubaddressIndex,
) -> PrivateKey {
    PrivateKey::from_scalar(*spend_secret.as_scalar() + subaddress_secret_key(view_secret, index))
}

/// Encoded subaddress (D, a*D) under the network's subaddress tag
pub fn generate_subaddress(
    config: &NetworkConfig,
    spend_public: &PublicKey,
    view_secret: &PrivateKey,
    index: SubaddressIndex,
) -> Address {
    let spend = subaddress_spend_public_key(spend_public, view_secret, index);
    let view = PublicKey::from_point(&spend.point().mul_scalar(view_secret.as_scalar()));
    Address::subaddress(config, spend, view)
}

/// Lookup from subaddress spend key to its index
#[derive(Debug, Clone)]
pub struct SubaddressTable {
    view_secret: PrivateKey,
    entries: HashMap<[u8; KEY_LEN], SubaddressIndex>,
}

impl SubaddressTable {
    /// Table holding only the primary spend key as (0, 0)
    pub fn new(spend_public: &PublicKey, view_secret: &PrivateKey) -> Self {
        let mut entries = HashMap::new();
        entries.insert(*spend_public.as_bytes(), SubaddressIndex::PRIMARY);
        Self {
            view_secret: *view_secret,
            entries,
        }
    }

    /// Table for every index in `majors` x `minors`, computed in parallel
    pub fn generate(
        spend_public: &PublicKey,
        view_secret: &PrivateKey,
        majors: Range<u32>,
        minors: Range<u32>,
    ) -> Self {
        let mut table = Self::new(spend_public, view_secret);
        let indices: Vec<SubaddressIndex> = majors
            .flat_map(|major| minors.clone().map(move |minor| SubaddressIndex::new(major, minor)))
            .filter(|index| !index.is_primary())
            .collect();

        let keys: Vec<([u8; KEY_LEN], SubaddressIndex)> = indices
            .par_iter()
            .map(|&index| {
                let key = subaddress_spend_public_key(spend_public, view_secret, index);
                (*key.as_bytes(), index)
            })
            .collect();

        table.entries.extend(keys);
        debug!(entries = table.entries.len(), "built subaddress table");
        table
    }

    pub fn insert(&mut self, spend_public: &PublicKey, index: SubaddressIndex) {
        let key = if index.is_primary() {
            *spend_public
        } else {
            subaddress_spend_public_key(spend_public, &self.view_secret, index)
        };
        self.entries.insert(*key.as_bytes(), index);
    }

    /// Index of the subaddress whose spend key is `key`
    pub fn lookup(&self, key: &PublicKey) -> Option<SubaddressIndex> {
        self.entries.get(key.as_bytes()).copied()
    }

    pub fn view_secret(&self) -> &PrivateKey {
        &self.view_secret
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;
    use crate::network::{AddressKind, Network};

    #[test]
    fn test_subaddresses_are_stable_and_distinct() {
        let keys = KeyPair::from_seed(&[0x61; 32]).account();
        let config = Network::Mainnet.config();

        let first = keys.subaddress(&config, (0, 1).into());
        assert_eq!(first, keys.subaddress(&config, (0, 1).into()));
        assert_ne!(first, keys.subaddress(&config, (0, 2).into()));
        assert_ne!(first, keys.subaddress(&config, (1, 0).into()));
        assert_ne!(first.spend_public(), &keys.spend_public);

        let text = first.encode();
        assert_eq!(text.len(), 95);
        let parsed = Address::parse(&text, &config).unwrap();
        assert_eq!(parsed.kind(&config), Some(AddressKind::Subaddress));
    }

    #[test]
    fn test_index_zero_not_special_cased() {
        let keys = KeyPair::from_seed(&[0x61; 32]).account();
        let zero = generate_subaddress(&NetworkConfig::default(), &keys.spend_public, &keys.view_secret, SubaddressIndex::PRIMARY);
        assert_ne!(zero.spend_public(), &keys.spend_public);
    }

    #[test]
    fn test_view_key_relation() {
        let keys = KeyPair::from_seed(&[0x62; 32]).account();
        let index = SubaddressIndex::new(2, 7);
        let address = keys.subaddress(&NetworkConfig::default(), index);

        // C = a*D
        let expected = address.spend_public().point().mul_scalar(keys.view_secret.as_scalar());
        assert_eq!(address.view_public().point(), &expected);

        // D = (b + m)*G
        let secret = subaddress_spend_secret_key(&keys.spend_secret, &keys.view_secret, index);
        assert_eq!(secret.public_key(), *address.spend_public());
    }

    #[test]
    fn test_secret_key_layout() {
        let view = PrivateKey::from_bytes_mod_order(&[0x05; 32]);
        let mut data = b"SubAddr\0".to_vec();
        data.extend_from_slice(&view.to_bytes());
        data.extend_from_slice(&[1, 0, 0, 0, 0x00, 0x01, 0, 0]);
        assert_eq!(
            subaddress_secret_key(&view, SubaddressIndex::new(1, 256)),
            hash_to_scalar(&data)
        );
    }

    #[test]
    fn test_table_lookup() {
        let keys = KeyPair::from_seed(&[0x63; 32]).account();
        let mut table = SubaddressTable::generate(&keys.spend_public, &keys.view_secret, 0..2, 0..5);
        assert_eq!(table.len(), 10);
        assert_eq!(table.lookup(&keys.spend_public), Some(SubaddressIndex::PRIMARY));

        let d = subaddress_spend_public_key(&keys.spend_public, &keys.view_secret, (1, 3).into());
        assert_eq!(table.lookup(&d), Some(SubaddressIndex::new(1, 3)));

        let far = subaddress_spend_public_key(&keys.spend_public, &keys.view_secret, (5, 5).into());
        assert_eq!(table.lookup(&far), None);
        table.insert(&keys.spend_public, (5, 5).into());
        assert_eq!(table.lookup(&far), Some(SubaddressIndex::new(5, 5)));
    }

    #[test]
    fn test_index_parsing() {
        assert_eq!("3/14".parse::<SubaddressIndex>().unwrap(), SubaddressIndex::new(3, 14));
        assert_eq!(SubaddressIndex::new(3, 14).to_string(), "3/14");
        assert!("3".parse::<SubaddressIndex>().is_err());
        assert!("a/1".parse::<SubaddressIndex>().is_err());
    }
}
