// Core text types: graph tokens and morpheme sequences.
//
// `Token` is the node/edge label of the bigram graph. It is either a literal
// word (or punctuation mark) as it appeared in the corpus, or the line
// boundary: the distinguished node that precedes the first word of a line
// and follows its last. Keeping the boundary as its own variant means no
// string, not even the empty one, can be confused with it.
//
// `MorphemeSequence` is the ordered list of pronounceable chunks the
// segmenter (`morpheme.rs`) cuts a word into. The line boundary maps to the
// empty sequence; every real word maps to at least one morpheme.
//
// Both types derive `Ord` so they can key `BTreeMap`s. The composer iterates
// successors in map order, which keeps same-seed output reproducible.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A bigram-graph node: a corpus token or the line boundary.
///
/// `LineBoundary` sorts before every word.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Token {
    /// Start-of-line predecessor, end-of-line successor, and the
    /// end-of-phrase marker in generated output.
    LineBoundary,
    /// A word or single punctuation mark, case preserved.
    Word(String),
}

impl Token {
    pub fn word(text: impl Into<String>) -> Self {
        Token::Word(text.into())
    }

    /// The literal text, or `None` for the line boundary.
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Token::Word(w) => Some(w),
            Token::LineBoundary => None,
        }
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self, Token::LineBoundary)
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token::Word(text.to_string())
    }
}

impl From<String> for Token {
    fn from(text: String) -> Self {
        Token::Word(text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => f.write_str(w),
            Token::LineBoundary => f.write_str("∅"),
        }
    }
}

/// Ordered sub-word units of a single word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MorphemeSequence(Vec<String>);

impl MorphemeSequence {
    pub fn new(parts: Vec<String>) -> Self {
        MorphemeSequence(parts)
    }

    /// The sequence assigned to the line boundary.
    pub fn empty() -> Self {
        MorphemeSequence(Vec::new())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// First morpheme, the source of the alliteration key.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Last morpheme, the source of the rhyme key.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenation of all morphemes.
    pub fn joined(&self) -> String {
        self.0.concat()
    }
}

impl fmt::Display for MorphemeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("|"))
    }
}
