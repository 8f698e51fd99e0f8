//! xmrkit Mnemonic Seeds
//!
//! Electrum-style word encoding used by CryptoNote wallets: every 4 bytes
//! of seed become 3 words, and one extra word chosen by a CRC-32 over the
//! word prefixes guards against typos.

mod crc32;
pub mod codec;
pub mod error;
pub mod wordlist;
mod wordlists;

pub use codec::{checksum_index, decode, decode_any, decode_words, encode, Mnemonic};
pub use error::MnemonicError;
pub use wordlist::{detect_wordlist, languages, wordlist, Wordlist, MIN_WORDS};
