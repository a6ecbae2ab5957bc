// Rhyme and alliteration lexicons.
//
// A lexicon groups the words of a `MorphemeDict` by a key morpheme: the
// lowercased last morpheme for rhymes, the lowercased first morpheme for
// alliteration. Groups whose members all lowercase to the same word ("Love",
// "love", "LOVE") are removed after construction since a word cannot rhyme
// with itself.
//
// The composer reads group sizes to reward candidate words that have many
// rhyme partners. Lexicons are immutable once built and safe to share across
// composers.

use crate::morpheme::MorphemeDict;
use crate::types::Token;
use std::collections::{BTreeMap, BTreeSet};

/// Which morpheme keys the lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexiconKind {
    /// Keyed by the last morpheme.
    Rhyme,
    /// Keyed by the first morpheme.
    Alliteration,
}

/// Words grouped by a shared key morpheme.
#[derive(Debug, Clone)]
pub struct Lexicon {
    kind: LexiconKind,
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl Lexicon {
    /// Group words by their lowercased last morpheme.
    pub fn rhyme(dict: &MorphemeDict) -> Self {
        Self::build(dict, LexiconKind::Rhyme)
    }

    /// Group words by their lowercased first morpheme.
    pub fn alliteration(dict: &MorphemeDict) -> Self {
        Self::build(dict, LexiconKind::Alliteration)
    }

    fn build(dict: &MorphemeDict, kind: LexiconKind) -> Self {
        let mut groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (token, morphemes) in dict.iter() {
            let Token::Word(word) = token else {
                continue;
            };
            let key = match kind {
                LexiconKind::Rhyme => morphemes.last(),
                LexiconKind::Alliteration => morphemes.first(),
            };
            if let Some(key) = key {
                groups
                    .entry(key.to_lowercase())
                    .or_default()
                    .insert(word.clone());
            }
        }

        let before = groups.len();
        groups.retain(|_, words| {
            let distinct: BTreeSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
            distinct.len() > 1
        });
        tracing::debug!(
            ?kind,
            kept = groups.len(),
            pruned = before - groups.len(),
            "built lexicon"
        );

        Lexicon { kind, groups }
    }

    pub fn kind(&self) -> LexiconKind {
        self.kind
    }

    /// Member words for `key`, if the key survived pruning.
    pub fn group(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.groups.get(key)
    }

    /// Number of distinct member words for `key`; 0 when absent.
    pub fn group_size(&self, key: &str) -> usize {
        self.groups.get(key).map_or(0, BTreeSet::len)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.groups.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
