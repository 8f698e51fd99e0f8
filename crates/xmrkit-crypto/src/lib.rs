//! xmrkit Crypto Primitives
//!
//! Self-contained CryptoNote building blocks: modular arithmetic over the
//! Ed25519 base and scalar fields, twisted-Edwards point arithmetic,
//! original-padding Keccak-256, Monero block Base58 and varints.

pub mod arith;
pub mod base58;
pub mod edwards;
pub mod error;
pub mod field;
pub mod keccak;
pub mod scalar;
pub mod varint;

pub use self::arith::{Modulus, U256, FIELD_MODULUS, GROUP_ORDER};
pub use self::edwards::{decode_int, encode_int, EdwardsPoint};
pub use self::error::CryptoError;
pub use self::field::FieldElement;
pub use self::keccak::{keccak256, Keccak256};
pub use self::scalar::Scalar;

// Re-export dependencies for use by other crates
pub use hex;
