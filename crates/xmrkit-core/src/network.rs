//! Network presets and address tags

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Kind of address, selected by its leading tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    /// Primary account address
    Standard,
    /// Standard address with an 8-byte payment id
    Integrated,
    /// Derived receiving address
    Subaddress,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressKind::Standard => write!(f, "standard"),
            AddressKind::Integrated => write!(f, "integrated"),
            AddressKind::Subaddress => write!(f, "subaddress"),
        }
    }
}

/// Address tags of one network
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub name: String,
    pub standard: u64,
    pub integrated: u64,
    pub subaddress: u64,
}

impl NetworkConfig {
    pub fn new(name: impl Into<String>, standard: u64, integrated: u64, subaddress: u64) -> Self {
        Self {
            name: name.into(),
            standard,
            integrated,
            subaddress,
        }
    }

    pub fn tag(&self, kind: AddressKind) -> u64 {
        match kind {
            AddressKind::Standard => self.standard,
            AddressKind::Integrated => self.integrated,
            AddressKind::Subaddress => self.subaddress,
        }
    }

    pub fn kind_of(&self, tag: u64) -> Option<AddressKind> {
        [AddressKind::Standard, AddressKind::Integrated, AddressKind::Subaddress]
            .into_iter()
            .find(|&kind| self.tag(kind) == tag)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Network::Mainnet.config()
    }
}

/// Built-in Monero networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Stagenet,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Mainnet, Network::Testnet, Network::Stagenet];

    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Stagenet => "stagenet",
        }
    }

    pub fn config(&self) -> NetworkConfig {
        match self {
            Network::Mainnet => NetworkConfig::new(self.name(), 18, 19, 42),
            Network::Testnet => NetworkConfig::new(self.name(), 53, 54, 63),
            Network::Stagenet => NetworkConfig::new(self.name(), 24, 25, 36),
        }
    }

    /// Find the built-in network and kind a tag belongs to
    pub fn classify(tag: u64) -> Option<(Network, AddressKind)> {
        Self::ALL
            .into_iter()
            .find_map(|network| network.config().kind_of(tag).map(|kind| (network, kind)))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::InvalidEncoding(format!("unknown network '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let main = NetworkConfig::default();
        assert_eq!((main.standard, main.integrated, main.subaddress), (18, 19, 42));
        let test = Network::Testnet.config();
        assert_eq!((test.standard, test.integrated, test.subaddress), (53, 54, 63));
        let stage = Network::Stagenet.config();
        assert_eq!((stage.standard, stage.integrated, stage.subaddress), (24, 25, 36));
    }

    #[test]
    fn test_classify() {
        assert_eq!(Network::classify(42), Some((Network::Mainnet, AddressKind::Subaddress)));
        assert_eq!(Network::classify(54), Some((Network::Testnet, AddressKind::Integrated)));
        assert_eq!(Network::classify(24), Some((Network::Stagenet, AddressKind::Standard)));
        assert_eq!(Network::classify(0), None);
    }

    #[test]
    fn test_parse_network() {
        assert_eq!("Stagenet".parse::<Network>().unwrap(), Network::Stagenet);
        assert!("regtest".parse::<Network>().is_err());
    }

    #[test]
    fn test_config_serde() {
        let json = serde_json::to_string(&Network::Testnet.config()).unwrap();
        assert_eq!(
            json,
            r#"{"name":"testnet","standard":53,"integrated":54,"subaddress":63}"#
        );
        let back: NetworkConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Network::Testnet.config());
    }
}
