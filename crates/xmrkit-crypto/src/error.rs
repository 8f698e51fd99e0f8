//! Error type shared by the primitive codecs and arithmetic

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
    #[error("Point is not on the curve")]
    PointNotOnCurve,
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
    #[error("Truncated input")]
    TruncatedInput,
    #[error("Value has no inverse modulo the given modulus")]
    NotInvertible,
    #[error("Invalid hasher state: {0}")]
    State(&'static str),
}
