//! xmrkit Core Engine
//!
//! CryptoNote account keys, one-time output keys and Monero addresses.
//!
//! A wallet is two key pairs: spend (b, B) and view (a, A). Senders derive
//! a fresh one-time key for every output:
//!
//! ```text
//! P = H_s(8*r*A || varint(index))*G + B
//! ```
//!
//! and the receiver finds its outputs with `a` alone, using `b` only to
//! spend them.
//!
//! # Example
//!
//! ```rust
//! use xmrkit_core::{KeyPair, Network, Address};
//!
//! let keys = KeyPair::generate().account();
//! let config = Network::Mainnet.config();
//! let address = keys.address(&config).encode();
//! assert_eq!(Address::parse(&address, &config).unwrap(), keys.address(&config));
//! ```

pub mod address;
pub mod derivation;
pub mod error;
pub mod keys;
pub mod network;
pub mod payment_id;
pub mod scan;
pub mod subaddress;

pub use address::{Address, AddressRecord, CHECKSUM_LEN};
pub use derivation::{
    derivation_to_scalar, derive_public_key, derive_secret_key, derive_subaddress_public_key,
    generate_key_derivation, is_output_mine, KeyDerivation,
};
pub use error::CoreError;
pub use keys::{
    derive_view_key, hash_to_scalar, public_from_private, AccountKeys, KeyPair, PrivateKey, PublicKey,
    KEY_LEN, LEGACY_SEED_LEN,
};
pub use network::{AddressKind, Network, NetworkConfig};
pub use payment_id::{stealth_payment_id, PaymentId, PAYMENT_ID_LEN};
pub use scan::{scan_outputs, scan_outputs_with_subaddresses, OwnedOutput};
pub use subaddress::{
    generate_subaddress, subaddress_secret_key, subaddress_spend_public_key, subaddress_spend_secret_key,
    SubaddressIndex, SubaddressTable,
};

// Re-exports for convenience
pub use xmrkit_crypto as crypto;
pub use xmrkit_mnemonic as mnemonic;
pub use xmrkit_mnemonic::Mnemonic;

#[cfg(test)]
mod tests;
