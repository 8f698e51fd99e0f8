//! Engine error type

use thiserror::Error;
use xmrkit_crypto::CryptoError;
use xmrkit_mnemonic::MnemonicError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
    #[error("Address checksum mismatch")]
    ChecksumMismatch,
    #[error("Address tag {tag} is not valid for {network}")]
    NetworkMismatch { tag: u64, network: String },
}

impl From<hex::FromHexError> for CoreError {
    fn from(e: hex::FromHexError) -> Self {
        CoreError::InvalidEncoding(e.to_string())
    }
}
