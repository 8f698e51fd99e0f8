//! Standard, integrated and subaddress encoding
//!
//! Layout before Base58:
//!
//! ```text
//! varint(tag) || spend_public(32) || view_public(32) [|| payment_id(8)] || checksum(4)
//! ```
//!
//! where the checksum is the first 4 bytes of Keccak-256 over everything
//! before it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tracing::debug;
use xmrkit_crypto::{base58, keccak256, varint};

use crate::error::CoreError;
use crate::keys::{PublicKey, KEY_LEN};
use crate::network::{AddressKind, NetworkConfig};
use crate::payment_id::{PaymentId, PAYMENT_ID_LEN};

pub const CHECKSUM_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    tag: u64,
    spend_public: PublicKey,
    view_public: PublicKey,
    payment_id: Option<PaymentId>,
}

impl Address {
    pub fn new(tag: u64, spend_public: PublicKey, view_public: PublicKey, payment_id: Option<PaymentId>) -> Self {
        Self {
            tag,
            spend_public,
            view_public,
            payment_id,
        }
    }

    pub fn standard(config: &NetworkConfig, spend_public: PublicKey, view_public: PublicKey) -> Self {
        Self::new(config.standard, spend_public, view_public, None)
    }

    pub fn integrated(
        config: &NetworkConfig,
        spend_public: PublicKey,
        view_public: PublicKey,
        payment_id: PaymentId,
    ) -> Self {
        Self::new(config.integrated, spend_public, view_public, Some(payment_id))
    }

    pub fn subaddress(config: &NetworkConfig, spend_public: PublicKey, view_public: PublicKey) -> Self {
        Self::new(config.subaddress, spend_public, view_public, None)
    }

    pub fn tag(&self) -> u64 {
        self.tag
    }

    pub fn spend_public(&self) -> &PublicKey {
        &self.spend_public
    }

    pub fn view_public(&self) -> &PublicKey {
        &self.view_public
    }

    pub fn payment_id(&self) -> Option<&PaymentId> {
        self.payment_id.as_ref()
    }

    /// Kind of this address under `config`, if the tag belongs to it
    pub fn kind(&self, config: &NetworkConfig) -> Option<AddressKind> {
        config.kind_of(self.tag)
    }

    /// Same keys as a standard address; drops any payment id
    pub fn to_standard(&self, config: &NetworkConfig) -> Self {
        Self::standard(config, self.spend_public, self.view_public)
    }

    /// Payload followed by its checksum
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = varint::encode(self.tag);
        data.reserve(2 * KEY_LEN + PAYMENT_ID_LEN + CHECKSUM_LEN);
        data.extend_from_slice(self.spend_public.as_bytes());
        data.extend_from_slice(self.view_public.as_bytes());
        if let Some(id) = &self.payment_id {
            data.extend_from_slice(id.as_bytes());
        }
        let checksum = keccak256(&data);
        data.extend_from_slice(&checksum[..CHECKSUM_LEN]);
        data
    }

    pub fn encode(&self) -> String {
        base58::encode(&self.to_bytes())
    }

    /// Decode any well-formed address, whatever its tag
    pub fn decode(s: &str) -> Result<Self, CoreError> {
        let data = base58::decode(s)?;
        if data.len() < CHECKSUM_LEN + 1 {
            return Err(CoreError::InvalidLength {
                expected: 1 + 2 * KEY_LEN + CHECKSUM_LEN,
                actual: data.len(),
            });
        }

        let (payload, checksum) = data.split_at(data.len() - CHECKSUM_LEN);
        if keccak256(payload)[..CHECKSUM_LEN] != *checksum {
            debug!(address = s, "address checksum mismatch");
            return Err(CoreError::ChecksumMismatch);
        }

        let (tag, body) = varint::pop(payload)?;
        let payment_id = match body.len() {
            n if n == 2 * KEY_LEN => None,
            n if n == 2 * KEY_LEN + PAYMENT_ID_LEN => Some(PaymentId::from_slice(&body[2 * KEY_LEN..])?),
            actual => {
                return Err(CoreError::InvalidLength {
                    expected: 2 * KEY_LEN,
                    actual,
                })
            }
        };

        Ok(Self {
            tag,
            spend_public: PublicKey::from_slice(&body[..KEY_LEN])?,
            view_public: PublicKey::from_slice(&body[KEY_LEN..2 * KEY_LEN])?,
            payment_id,
        })
    }

    /// Decode and require a tag of `config` whose kind agrees with the payload
    pub fn parse(s: &str, config: &NetworkConfig) -> Result<Self, CoreError> {
        let address = Self::decode(s)?;
        let kind = address.kind(config).ok_or_else(|| CoreError::NetworkMismatch {
            tag: address.tag,
            network: config.name.clone(),
        })?;

        let has_id = address.payment_id.is_some();
        if has_id != (kind == AddressKind::Integrated) {
            let (expected, actual) = if has_id {
                (2 * KEY_LEN, 2 * KEY_LEN + PAYMENT_ID_LEN)
            } else {
                (2 * KEY_LEN + PAYMENT_ID_LEN, 2 * KEY_LEN)
            };
            return Err(CoreError::InvalidLength { expected, actual });
        }
        Ok(address)
    }

    pub fn record(&self, kind: AddressKind) -> AddressRecord {
        AddressRecord {
            address: self.encode(),
            network_byte: self.tag,
            kind,
            spend_key: self.spend_public.to_hex(),
            view_key: self.view_public.to_hex(),
            payment_id: self.payment_id.map(|id| id.to_hex()),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// Structured view of a decoded address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    pub address: String,
    pub network_byte: u64,
    pub kind: AddressKind,
    pub spend_key: String,
    pub view_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
}
