//! Bundled wordlists

pub(crate) mod english;
pub(crate) mod english_old;

/// Name, words and unique prefix length of every bundled list
pub(crate) const BUNDLED: &[(&str, &[&str], usize)] = &[
    ("English", &english::WORDS, english::PREFIX_LEN),
    ("EnglishOld", &english_old::WORDS, english_old::PREFIX_LEN),
];
