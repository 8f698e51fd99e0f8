use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("Invalid length: {0}")]
    InvalidLength(String),
    #[error("Word not in wordlist: {0}")]
    InvalidWord(String),
    #[error("No wordlist contains every word: {0}")]
    UnknownWordset(String),
    #[error("Words match several wordlists: {}", .0.join(", "))]
    AmbiguousWordset(Vec<String>),
    #[error("Checksum word mismatch")]
    ChecksumMismatch,
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
    #[error("Duplicate prefix '{prefix}' in wordlist {language}")]
    DuplicatePrefix { language: String, prefix: String },
}
