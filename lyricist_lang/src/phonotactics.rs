// Phonotactic tables for morpheme segmentation.
//
// The segmenter classifies every character as a vowel, a consonant, or
// "other", and treats certain consonant digraphs as glued clusters that never
// trigger a split. It also knows a few strong word endings (`-ing`, `-es`,
// `-in'`) that should form their own final morpheme.
//
// These tables are plain data owned by a `Phonotactics` value and handed to
// `Segmenter::new`. `Phonotactics::english()` is the built-in table; a
// different table can be loaded from JSON without recompiling.
//
// All lookups are case-insensitive.

use serde::{Deserialize, Serialize};

/// Built-in vowel set.
pub const VOWELS: &str = "aeiouy";

/// Built-in consonant set. The apostrophe counts as a consonant so that
/// contractions (`don't`, `lovin'`) segment like ordinary words.
pub const CONSONANTS: &str = "bcdfghjklmnpqrstvwxz'";

/// Consonant pairs that stay together as one cluster.
pub const GLUED_PAIRS: &[[char; 2]] = &[
    ['s', 't'],
    ['t', 'r'],
    ['c', 'h'],
    ['s', 'h'],
    ['s', 'c'],
    ['c', 'r'],
    ['n', 'g'],
    ['r', 'd'],
    ['p', 'h'],
    ['t', 'h'],
];

/// Endings that are split off as the final morpheme.
pub const STRONG_SUFFIXES: &[&str] = &["ing", "es", "in'"];

/// Character classification used by the segmentation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Vowel,
    Consonant,
    /// Digits, hyphens, and anything else not listed. Splits a word.
    Other,
}

/// Vowel/consonant tables, glued clusters, and strong suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phonotactics {
    pub vowels: String,
    pub consonants: String,
    pub glued_pairs: Vec<[char; 2]>,
    pub strong_suffixes: Vec<String>,
}

impl Phonotactics {
    /// The built-in English-ish table.
    pub fn english() -> Self {
        Phonotactics {
            vowels: VOWELS.to_string(),
            consonants: CONSONANTS.to_string(),
            glued_pairs: GLUED_PAIRS.to_vec(),
            strong_suffixes: STRONG_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parse a table from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn classify(&self, c: char) -> CharClass {
        let c = fold(c);
        if self.vowels.contains(c) {
            CharClass::Vowel
        } else if self.consonants.contains(c) {
            CharClass::Consonant
        } else {
            CharClass::Other
        }
    }

    pub fn is_vowel(&self, c: char) -> bool {
        self.classify(c) == CharClass::Vowel
    }

    /// Whether `prev` followed by `c` is a glued digraph.
    pub fn is_glued(&self, prev: char, c: char) -> bool {
        let pair = [fold(prev), fold(c)];
        self.glued_pairs.contains(&pair)
    }

    /// The strong suffix `morpheme` ends with, if any, as a char count.
    ///
    /// The first matching entry in table order wins.
    pub fn strong_suffix_len(&self, morpheme: &str) -> Option<usize> {
        let lowered = morpheme.to_lowercase();
        self.strong_suffixes
            .iter()
            .find(|suffix| !suffix.is_empty() && lowered.ends_with(suffix.as_str()))
            .map(|suffix| suffix.chars().count())
    }
}

impl Default for Phonotactics {
    fn default() -> Self {
        Self::english()
    }
}

/// Case-fold a single character for table lookups.
pub(crate) fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
