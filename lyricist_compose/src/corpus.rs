// Corpus ingestion: raw songs in, tokenized songs and word statistics out.
//
// The crawler hands over one entry per located song: the song's lines, or
// nothing when the page could not be fetched or parsed. On disk this is a
// JSON array whose entries are arrays of strings or `null`. Void entries are
// dropped during tokenization.

use crate::config::BuildOptions;
use crate::error::LyricError;
use crate::graph::BigramGraph;
use lyricist_lang::{TokenizedSong, Tokenizer};
use std::collections::BTreeMap;
use std::path::Path;

/// A tokenized lyric corpus.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    songs: Vec<TokenizedSong>,
}

impl Corpus {
    /// Tokenize raw songs, skipping void entries.
    pub fn from_songs<S: AsRef<str>>(tokenizer: &Tokenizer, songs: &[Option<Vec<S>>]) -> Self {
        let tokenized = tokenizer.tokenize_songs(songs);
        tracing::debug!(
            raw = songs.len(),
            kept = tokenized.len(),
            "tokenized corpus"
        );
        Corpus { songs: tokenized }
    }

    /// Parse a JSON corpus (`[["line", ...] | null, ...]`).
    pub fn from_json(tokenizer: &Tokenizer, json: &str) -> Result<Self, LyricError> {
        let raw: Vec<Option<Vec<String>>> = serde_json::from_str(json)?;
        Ok(Self::from_songs(tokenizer, &raw))
    }

    pub fn load(tokenizer: &Tokenizer, path: &Path) -> Result<Self, LyricError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(tokenizer, &data)
    }

    pub fn songs(&self) -> &[TokenizedSong] {
        &self.songs
    }

    pub fn song_count(&self) -> usize {
        self.songs.len()
    }

    pub fn line_count(&self) -> usize {
        self.songs.iter().map(Vec::len).sum()
    }

    /// Build the bigram graph of this corpus.
    pub fn graph(&self, options: BuildOptions) -> BigramGraph {
        BigramGraph::build(&self.songs, options)
    }

    /// Occurrences of every token across all songs.
    pub fn word_counts(&self) -> BTreeMap<&str, u64> {
        let mut counts = BTreeMap::new();
        for word in self.songs.iter().flatten().flatten() {
            *counts.entry(word.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// The `n` most frequent tokens, most frequent first. Ties keep token
    /// order.
    pub fn top_words(&self, n: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self.word_counts().into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}
