//! Seed <-> word encoding
//!
//! Each little-endian 4-byte group x becomes three word indices over a list
//! of n words:
//!
//! ```text
//! w1 = x mod n
//! w2 = (x / n + w1) mod n
//! w3 = (x / n^2 + w2) mod n
//! ```
//!
//! followed by one checksum word picked by CRC-32 over the word prefixes.

use std::fmt;

use tracing::debug;

use crate::crc32::crc32;
use crate::error::MnemonicError;
use crate::wordlist::{self, detect_wordlist, Wordlist};

/// Index of the data word that doubles as the checksum word
pub fn checksum_index<S: AsRef<str>>(words: &[S], prefix_len: usize) -> usize {
    if words.is_empty() {
        return 0;
    }
    let joined: String = words
        .iter()
        .map(|w| {
            let w = w.as_ref().to_lowercase();
            if prefix_len == 0 {
                w
            } else {
                w.chars().take(prefix_len).collect()
            }
        })
        .collect();
    crc32(joined.as_bytes()) as usize % words.len()
}

/// Encode a seed (non-empty, multiple of 4 bytes) into words plus checksum
pub fn encode(seed: &[u8], list: &Wordlist) -> Result<Vec<String>, MnemonicError> {
    if seed.is_empty() || seed.len() % 4 != 0 {
        return Err(MnemonicError::InvalidLength(format!(
            "seed of {} bytes is not a non-zero multiple of 4",
            seed.len()
        )));
    }

    let n = list.len() as u64;
    let mut words = Vec::with_capacity(seed.len() / 4 * 3 + 1);
    for group in seed.chunks_exact(4) {
        let x = u32::from_le_bytes([group[0], group[1], group[2], group[3]]) as u64;
        let w1 = x % n;
        let w2 = (x / n + w1) % n;
        let w3 = (x / n / n + w2) % n;
        for w in [w1, w2, w3] {
            words.push(list.words()[w as usize].clone());
        }
    }

    let checksum = words[checksum_index(&words, list.prefix_len())].clone();
    words.push(checksum);
    Ok(words)
}

/// Decode words (data plus checksum word) against a known list
pub fn decode_words<S: AsRef<str>>(words: &[S], list: &Wordlist) -> Result<Vec<u8>, MnemonicError> {
    if words.len() < 4 || words.len() % 3 != 1 {
        return Err(MnemonicError::InvalidLength(format!(
            "{} words, expected 3k data words plus a checksum word",
            words.len()
        )));
    }

    let (data, checksum) = words.split_at(words.len() - 1);
    let indices = data
        .iter()
        .map(|w| {
            list.index_of(w.as_ref())
                .ok_or_else(|| MnemonicError::InvalidWord(w.as_ref().to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let expected = data[checksum_index(data, list.prefix_len())].as_ref();
    if list.prefix_of(expected) != list.prefix_of(checksum[0].as_ref()) {
        debug!(language = list.name(), "mnemonic checksum word mismatch");
        return Err(MnemonicError::ChecksumMismatch);
    }

    let n = list.len() as u128;
    let mut seed = Vec::with_capacity(data.len() / 3 * 4);
    for (group, triple) in indices.chunks_exact(3).enumerate() {
        let (w1, w2, w3) = (triple[0] as u128, triple[1] as u128, triple[2] as u128);
        let x = w1 + n * ((n - w1 + w2) % n) + n * n * ((n - w2 + w3) % n);
        let x = u32::try_from(x).map_err(|_| {
            MnemonicError::InvalidEncoding(format!("word group {group} does not fit in 32 bits"))
        })?;
        seed.extend_from_slice(&x.to_le_bytes());
    }
    Ok(seed)
}

/// Decode a space-separated phrase against a known list
pub fn decode(phrase: &str, list: &Wordlist) -> Result<Vec<u8>, MnemonicError> {
    decode_words(&split(phrase), list)
}

/// Decode a phrase, detecting its language among the bundled lists
pub fn decode_any(phrase: &str) -> Result<(Vec<u8>, &'static Wordlist), MnemonicError> {
    let words = split(phrase);
    let list = detect_wordlist(&words, wordlist::registered())?;
    Ok((decode_words(&words, list)?, list))
}

fn split(phrase: &str) -> Vec<String> {
    phrase.split_whitespace().map(str::to_lowercase).collect()
}

/// A validated mnemonic together with the seed it encodes
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    words: Vec<String>,
    language: String,
    seed: Vec<u8>,
}

impl Mnemonic {
    pub fn from_seed(seed: &[u8], language: &str) -> Result<Self, MnemonicError> {
        let list = wordlist::wordlist(language)?;
        Ok(Self {
            words: encode(seed, list)?,
            language: list.name().to_string(),
            seed: seed.to_vec(),
        })
    }

    /// Parse a phrase in any bundled language
    pub fn from_phrase(phrase: &str) -> Result<Self, MnemonicError> {
        let (seed, list) = decode_any(phrase)?;
        Self::canonical(seed, list)
    }

    /// Parse a phrase in the named language
    pub fn from_phrase_in(phrase: &str, language: &str) -> Result<Self, MnemonicError> {
        let list = wordlist::wordlist(language)?;
        Self::canonical(decode(phrase, list)?, list)
    }

    // Abbreviated or mixed-case input is stored as the list's full words
    fn canonical(seed: Vec<u8>, list: &Wordlist) -> Result<Self, MnemonicError> {
        Ok(Self {
            words: encode(&seed, list)?,
            language: list.name().to_string(),
            seed,
        })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn seed(&self) -> &[u8] {
        &self.seed
    }

    pub fn phrase(&self) -> String {
        self.words.join(" ")
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phrase())
    }
}

// Keep seeds out of logs
impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("language", &self.language)
            .field("words", &self.words.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    fn english() -> &'static Wordlist {
        wordlist::wordlist("English").unwrap()
    }

    #[test]
    fn test_zero_seed() {
        let words = encode(&[0u8; 32], english()).unwrap();
        assert_eq!(words.len(), 25);
        assert!(words.iter().all(|w| w == "abbey"));
        assert_eq!(decode(&words.join(" "), english()).unwrap(), vec![0u8; 32]);
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            encode(&[0xff; 4], english()).unwrap(),
            ["foamy", "solved", "soggy", "soggy"]
        );

        let seed: Vec<u8> = (0u8..16).collect();
        let phrase = "amaze buffet cake entrance symptoms tiger lamb maze nestle python dusted faxed faxed";
        assert_eq!(encode(&seed, english()).unwrap().join(" "), phrase);
        assert_eq!(decode(phrase, english()).unwrap(), seed);
    }

    #[test]
    fn test_roundtrip_random_seeds() {
        let mut rng = rand::thread_rng();
        for len in [4, 16, 32, 64] {
            let mut seed = vec![0u8; len];
            rng.fill_bytes(&mut seed);
            let words = encode(&seed, english()).unwrap();
            assert_eq!(words.len(), len / 4 * 3 + 1);
            assert_eq!(decode_words(&words, english()).unwrap(), seed, "{}", hex::encode(&seed));
        }
    }

    #[test]
    fn test_prefixes_and_case_accepted() {
        let seed: Vec<u8> = (0u8..16).collect();
        let phrase = "AMA buf CAKE ent sym tig lam maz nes pyt dus fax  Faxed";
        assert_eq!(decode(phrase, english()).unwrap(), seed);
    }

    #[test]
    fn test_corrupted_word_detected() {
        let seed: Vec<u8> = (0u8..16).collect();
        let mut words = encode(&seed, english()).unwrap();
        words[0] = "zoom".to_string();
        assert_eq!(decode_words(&words, english()), Err(MnemonicError::ChecksumMismatch));

        let mut words = encode(&seed, english()).unwrap();
        words[5] = "yoga".to_string();
        assert_eq!(decode_words(&words, english()), Err(MnemonicError::ChecksumMismatch));
    }

    #[test]
    fn test_wrong_checksum_word() {
        let mut words = encode(&[0u8; 32], english()).unwrap();
        words[24] = "zoom".to_string();
        assert_eq!(decode_words(&words, english()), Err(MnemonicError::ChecksumMismatch));
    }

    #[test]
    fn test_checksum_word_required() {
        let words = encode(&[7u8; 32], english()).unwrap();
        assert!(matches!(
            decode_words(&words[..24], english()),
            Err(MnemonicError::InvalidLength(_))
        ));
        assert!(matches!(decode("", english()), Err(MnemonicError::InvalidLength(_))));
    }

    #[test]
    fn test_unknown_word() {
        let phrase = "qwerty abbey abbey abbey";
        assert_eq!(
            decode(phrase, english()),
            Err(MnemonicError::InvalidWord("qwerty".into()))
        );
    }

    #[test]
    fn test_group_overflow_rejected() {
        // Indices 1625, 1624, 1623 decode to 1626^3 - 1
        let phrase = "zoom zones zombie zones";
        assert!(matches!(decode(phrase, english()), Err(MnemonicError::InvalidEncoding(_))));
    }

    #[test]
    fn test_bad_seed_length() {
        for len in [0, 3, 5, 31] {
            assert!(matches!(
                encode(&vec![1u8; len], english()),
                Err(MnemonicError::InvalidLength(_))
            ));
        }
    }

    #[test]
    fn test_mnemonic_detects_language() {
        let seed = [0x42u8; 32];
        let mnemonic = Mnemonic::from_seed(&seed, "english").unwrap();
        assert_eq!(mnemonic.language(), "English");
        assert_eq!(mnemonic.words().len(), 25);

        let parsed = Mnemonic::from_phrase(&mnemonic.phrase()).unwrap();
        assert_eq!(parsed.seed(), &seed);
        assert_eq!(parsed, mnemonic);

        let parsed = Mnemonic::from_phrase_in(&mnemonic.to_string(), "English").unwrap();
        assert_eq!(parsed.seed(), &seed);

        assert!(matches!(
            Mnemonic::from_phrase("qwerty abbey abbey abbey"),
            Err(MnemonicError::UnknownWordset(_))
        ));
    }

    #[test]
    fn test_mnemonic_stores_full_words() {
        let seed: Vec<u8> = (0u8..16).collect();
        let typed = Mnemonic::from_phrase("AMA buf CAKE ent sym tig lam maz nes pyt dus fax  Faxed").unwrap();
        assert_eq!(
            typed.phrase(),
            "amaze buffet cake entrance symptoms tiger lamb maze nestle python dusted faxed faxed"
        );
        assert_eq!(typed, Mnemonic::from_seed(&seed, "English").unwrap());

        let typed = Mnemonic::from_phrase_in("ABBEYS abb abbot abbey", "English").unwrap();
        assert_eq!(typed.words(), ["abbey", "abbey", "abbey", "abbey"]);
    }

    #[test]
    fn test_whole_word_list() {
        let old = wordlist::wordlist("EnglishOld").unwrap();
        assert_eq!(encode(&[0xff; 4], old).unwrap(), ["fail", "husband", "howl", "fail"]);

        let seed: Vec<u8> = (0u8..16).collect();
        let phrase = "before bring today bleed process melody cruel devil nowhere frozen bit month process";
        assert_eq!(encode(&seed, old).unwrap().join(" "), phrase);
        assert_eq!(decode(phrase, old).unwrap(), seed);

        // No prefix matching on whole-word lists
        assert_eq!(
            decode("fai husband howl fail", old),
            Err(MnemonicError::InvalidWord("fai".into()))
        );

        let mnemonic = Mnemonic::from_phrase(phrase).unwrap();
        assert_eq!(mnemonic.language(), "EnglishOld");
        assert_eq!(mnemonic.seed(), seed.as_slice());
    }

    #[test]
    fn test_phrase_valid_in_two_lists() {
        // Whole Electrum words whose first three letters are also English words
        let phrase = "fail husband howl fail";
        assert_eq!(
            Mnemonic::from_phrase(phrase),
            Err(MnemonicError::AmbiguousWordset(vec!["English".into(), "EnglishOld".into()]))
        );
        assert_eq!(
            Mnemonic::from_phrase_in(phrase, "EnglishOld").unwrap().seed(),
            &[0xff; 4]
        );
    }

    #[test]
    fn test_debug_hides_seed() {
        let mnemonic = Mnemonic::from_seed(&[9u8; 16], "English").unwrap();
        let rendered = format!("{mnemonic:?}");
        assert!(!rendered.contains(&mnemonic.words()[0]));
        assert!(rendered.contains("English"));
    }
}
