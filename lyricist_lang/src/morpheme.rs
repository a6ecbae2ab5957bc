// Morpheme segmentation: cuts words into pronounceable chunks.
//
// The segmenter runs a small state machine over the characters of a word:
//
// - `state == 0`: no vowel seen yet in the current morpheme.
// - `state == 1`: a vowel has been seen.
// - `state > 1`: a vowel followed by `state - 1` consonant steps.
//
// A doubled letter or a glued digraph (`st`, `ng`, `th`, ...) never changes
// state. When a vowel arrives after one or more trailing consonants, the
// morpheme is cut just before the last consonant step, so the consonant that
// opened the new vowel's onset moves with it (`hello` -> `he|llo`). An
// "other" character (digit, hyphen) ends the current morpheme and is dropped.
//
// Two passes then rebalance the last pair of morphemes: a strong suffix
// (`-ing`, `-es`, `-in'`) becomes the whole final morpheme, and a final
// morpheme that ends on a consonant pulls its leading consonants back onto a
// vowel-final predecessor (`be|tter` -> `bett|er`).
//
// `MorphemeDict` applies the segmenter to every token of a graph once and is
// read-only afterwards. Its rhyme key (lowercased last morpheme) and
// alliteration key (lowercased first morpheme) feed `lexicon.rs` and the
// composer.

use crate::phonotactics::{CharClass, Phonotactics, fold};
use crate::types::{MorphemeSequence, Token};
use std::collections::BTreeMap;

/// Word segmenter configured with a phonotactic table.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    phonotactics: Phonotactics,
}

impl Segmenter {
    pub fn new(phonotactics: Phonotactics) -> Self {
        Segmenter { phonotactics }
    }

    pub fn phonotactics(&self) -> &Phonotactics {
        &self.phonotactics
    }

    /// Segment a token. The line boundary has no morphemes.
    pub fn segment(&self, token: &Token) -> MorphemeSequence {
        match token {
            Token::Word(word) => self.segment_word(word),
            Token::LineBoundary => MorphemeSequence::empty(),
        }
    }

    /// Segment a single word. Non-empty words always yield at least one
    /// morpheme.
    pub fn segment_word(&self, word: &str) -> MorphemeSequence {
        let chars: Vec<char> = word.chars().collect();
        let mut parts: Vec<String> = Vec::new();
        let mut start = 0usize;
        let mut state = 0u32;
        let mut last_change = 0usize;

        for (i, &c) in chars.iter().enumerate() {
            let class = self.phonotactics.classify(c);
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let before = state;

            if class == CharClass::Other && i != start {
                parts.push(chars[start..i].iter().collect());
                start = i + 1;
                state = 0;
                continue;
            } else if prev.is_some_and(|p| fold(p) == fold(c) || self.phonotactics.is_glued(p, c)) {
                // Same cluster.
            } else if class == CharClass::Vowel && state < 1 {
                state = 1;
            } else if state > 0 && class == CharClass::Consonant {
                state += 1;
            } else if state > 1 {
                parts.push(chars[start..last_change].iter().collect());
                start = last_change;
                state = 1;
            }

            if state != before {
                last_change = i;
            }
        }

        if start < chars.len() {
            parts.push(chars[start..].iter().collect());
        }

        self.rebalance_tail(&mut parts);
        MorphemeSequence::new(parts)
    }

    /// Adjust the boundary between the last two morphemes.
    fn rebalance_tail(&self, parts: &mut [String]) {
        let n = parts.len();
        if n < 2 {
            return;
        }
        let (head, tail) = parts.split_at_mut(n - 1);
        let prev = &mut head[n - 2];
        let last = &mut tail[0];

        if let Some(suffix_len) = self.phonotactics.strong_suffix_len(last) {
            let last_chars: Vec<char> = last.chars().collect();
            if last_chars.len() > suffix_len {
                let cut = last_chars.len() - suffix_len;
                prev.extend(&last_chars[..cut]);
                *last = last_chars[cut..].iter().collect();
            }
        }

        let last_ends_vowel = last.chars().last().is_some_and(|c| self.phonotactics.is_vowel(c));
        let prev_ends_vowel = prev.chars().last().is_some_and(|c| self.phonotactics.is_vowel(c));
        if !last_ends_vowel && prev_ends_vowel {
            let last_chars: Vec<char> = last.chars().collect();
            if let Some(first_vowel) = last_chars.iter().position(|&c| self.phonotactics.is_vowel(c))
                && first_vowel > 0
            {
                prev.extend(&last_chars[..first_vowel]);
                *last = last_chars[first_vowel..].iter().collect();
            }
        }
    }
}

/// Morpheme sequences for every token of a graph.
#[derive(Debug, Clone, Default)]
pub struct MorphemeDict {
    entries: BTreeMap<Token, MorphemeSequence>,
}

impl MorphemeDict {
    /// Segment each distinct token once.
    pub fn build<'a, I>(segmenter: &Segmenter, tokens: I) -> Self
    where
        I: IntoIterator<Item = &'a Token>,
    {
        let mut entries = BTreeMap::new();
        for token in tokens {
            if !entries.contains_key(token) {
                entries.insert(token.clone(), segmenter.segment(token));
            }
        }
        MorphemeDict { entries }
    }

    pub fn get(&self, token: &Token) -> Option<&MorphemeSequence> {
        self.entries.get(token)
    }

    /// Lowercased last morpheme, or `None` for unknown tokens, the line
    /// boundary, or a word without morphemes.
    pub fn rhyme_key(&self, token: &Token) -> Option<String> {
        self.get(token)?.last().map(str::to_lowercase)
    }

    /// Lowercased first morpheme.
    pub fn alliteration_key(&self, token: &Token) -> Option<String> {
        self.get(token)?.first().map(str::to_lowercase)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Token, &MorphemeSequence)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Token, MorphemeSequence)> for MorphemeDict {
    fn from_iter<T: IntoIterator<Item = (Token, MorphemeSequence)>>(iter: T) -> Self {
        MorphemeDict {
            entries: iter.into_iter().collect(),
        }
    }
}
