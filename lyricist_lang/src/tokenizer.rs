// Lyric tokenizer: splits raw lines into word and punctuation tokens.
//
// A token is the longest run of word characters (letters, digits, hyphen,
// apostrophe) or a single punctuation mark from `, : ; . ! ? "`. Anything
// else, whitespace included, separates tokens and is discarded. Case is
// preserved.
//
// Songs arrive as `Option<Vec<String>>`: `None` is a song the crawler could
// not fetch or parse. Void songs are dropped here and never reach the graph
// as an empty token sequence.

use regex::Regex;

/// Regex alternation used for tokenizing. Leftmost-first matching with a
/// greedy `+` gives the longest word run at each position.
pub const TOKEN_PATTERN: &str = r#"[\p{L}\p{N}'\-]+|[,:;.!?"]"#;

/// Tokens of one song: one inner `Vec` per lyric line.
pub type TokenizedSong = Vec<Vec<String>>;

/// Compiled tokenizer. Build once and reuse across the corpus.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
}

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer {
            pattern: Regex::new(TOKEN_PATTERN).expect("TOKEN_PATTERN is a valid regex"),
        }
    }

    /// Tokenize a single line, left to right.
    pub fn tokenize_line(&self, line: &str) -> Vec<String> {
        self.pattern
            .find_iter(line)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Tokenize every line of one song.
    pub fn tokenize_song<S: AsRef<str>>(&self, lines: &[S]) -> TokenizedSong {
        lines
            .iter()
            .map(|line| self.tokenize_line(line.as_ref()))
            .collect()
    }

    /// Tokenize a corpus, skipping void songs entirely.
    pub fn tokenize_songs<S: AsRef<str>>(&self, songs: &[Option<Vec<S>>]) -> Vec<TokenizedSong> {
        songs
            .iter()
            .flatten()
            .map(|lines| self.tokenize_song(lines))
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
