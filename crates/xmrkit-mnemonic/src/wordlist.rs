//! Wordlists and the process-wide language registry
//!
//! A wordlist matches words on their first `prefix_len` characters (the
//! whole word when `prefix_len` is 0), so every prefix must be unique. The
//! registry of bundled languages is built once on first use and never
//! changes afterwards.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use tracing::debug;

use crate::error::MnemonicError;
use crate::wordlists::BUNDLED;

/// Three indices must cover every u32: 1626^3 > 2^32
pub const MIN_WORDS: usize = 1626;

static REGISTRY: LazyLock<BTreeMap<String, Wordlist>> = LazyLock::new(|| {
    let mut registry = BTreeMap::new();
    for &(name, words, prefix_len) in BUNDLED {
        let list = Wordlist::bundled(name, words, prefix_len);
        registry.insert(list.name.to_lowercase(), list);
    }
    debug!(languages = registry.len(), "built wordlist registry");
    registry
});

/// Words of one language, indexed by unique prefix
#[derive(Debug, Clone)]
pub struct Wordlist {
    name: String,
    prefix_len: usize,
    words: Vec<String>,
    index: HashMap<String, usize>,
}

impl Wordlist {
    /// Build a wordlist, rejecting short lists and duplicate prefixes
    pub fn new<I, S>(name: impl Into<String>, words: I, prefix_len: usize) -> Result<Self, MnemonicError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let words: Vec<String> = words.into_iter().map(|w| w.into().to_lowercase()).collect();
        if words.len() < MIN_WORDS {
            return Err(MnemonicError::InvalidLength(format!(
                "wordlist {name} has {} words, need at least {MIN_WORDS}",
                words.len()
            )));
        }

        let mut index = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            match index.entry(prefix(word, prefix_len)) {
                Entry::Occupied(entry) => {
                    return Err(MnemonicError::DuplicatePrefix {
                        language: name,
                        prefix: entry.key().clone(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(i);
                }
            }
        }

        Ok(Self {
            name,
            prefix_len,
            words,
            index,
        })
    }

    // Bundled lists are checked by the tests below
    fn bundled(name: &str, words: &[&str], prefix_len: usize) -> Self {
        let words: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (prefix(w, prefix_len), i))
            .collect();
        Self {
            name: name.to_string(),
            prefix_len,
            words,
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    /// Position of `word`, matched case-insensitively on its prefix
    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.index.get(&self.prefix_of(word)).copied()
    }

    /// The part of `word` this list compares on, lowercased
    pub fn prefix_of(&self, word: &str) -> String {
        prefix(&word.to_lowercase(), self.prefix_len)
    }
}

fn prefix(word: &str, prefix_len: usize) -> String {
    if prefix_len == 0 {
        word.to_string()
    } else {
        word.chars().take(prefix_len).collect()
    }
}

/// Look up a bundled wordlist by name, case-insensitively
pub fn wordlist(language: &str) -> Result<&'static Wordlist, MnemonicError> {
    REGISTRY
        .get(&language.to_lowercase())
        .ok_or_else(|| MnemonicError::UnknownWordset(format!("no language named '{language}'")))
}

/// Names of the bundled wordlists
pub fn languages() -> Vec<&'static str> {
    REGISTRY.values().map(Wordlist::name).collect()
}

pub(crate) fn registered() -> impl Iterator<Item = &'static Wordlist> {
    REGISTRY.values()
}

/// Pick the one candidate list that contains every word
pub fn detect_wordlist<'a, S, I>(words: &[S], candidates: I) -> Result<&'a Wordlist, MnemonicError>
where
    S: AsRef<str>,
    I: IntoIterator<Item = &'a Wordlist>,
{
    let matches: Vec<&Wordlist> = candidates
        .into_iter()
        .filter(|list| words.iter().all(|w| list.index_of(w.as_ref()).is_some()))
        .collect();

    match matches.as_slice() {
        [] => Err(MnemonicError::UnknownWordset(format!(
            "no wordlist contains all {} words",
            words.len()
        ))),
        [list] => Ok(*list),
        many => Err(MnemonicError::AmbiguousWordset(
            many.iter().map(|l| l.name.clone()).collect(),
        )),
    }
}
