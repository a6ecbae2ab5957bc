// Rhyme-aware composer: a weighted random walk over the bigram graph.
//
// The composer starts from a random line-initial word and repeatedly picks a
// successor of the current node. Each candidate edge weighs its graph count
// plus a rhyme bonus (when a rhyme lexicon is attached) and an alliteration
// bonus (always 0 for now; the hook is there so a scorer can be added without
// touching the walk).
//
// Rhyme bonus for candidate `w`, with `key` = lowercased last morpheme of `w`:
//
// - `key` has a lexicon group and `w` already ended a line: `auto`
// - `key` has a lexicon group otherwise:
//   `group_size * rhymability + uses(key) * repeat`
// - `key` has no group but already ended a line: `auto`
// - otherwise 0
//
// then clamped to `cap` if set.
//
// Whenever the walk crosses a line or phrase ending (the boundary, `. ? ! :
// -`, or `, ;`) the word before it and its rhyme key are recorded in
// `RhymeMemory`. The memory is what makes later lines lean toward rhyming
// with earlier ones.
//
// Sparse data never aborts a song. A node with zero total weight forces a
// line break and the walk restarts from the boundary. A line that reaches
// `max_words_per_line` words without ending is cut and the walk continues from
// the current word.
//
// A `Composer` borrows the graph, morpheme dict, and lexicons read-only and
// owns its memory and output. Separate composers over the same model can run
// on separate threads.

use crate::config::{BonusWeights, ComposeRequest, DEFAULT_MAX_WORDS_PER_LINE, RhymeWeights};
use crate::error::LyricError;
use crate::graph::BigramGraph;
use crate::render::{render_line, render_song, split_lines};
use crate::sampling::pick_weighted;
use lyricist_lang::{Lexicon, MorphemeDict, Token};
use lyricist_prng::RandomSource;
use std::collections::BTreeMap;

/// Tokens that end a line.
pub const LINE_ENDINGS: &[&str] = &[".", "?", "!", ":", "-"];

/// Tokens that end a phrase without ending the line.
pub const PHRASE_ENDINGS: &[&str] = &[",", ";"];

/// True for the boundary and line-ending punctuation.
pub fn is_line_ending(token: &Token) -> bool {
    match token {
        Token::LineBoundary => true,
        Token::Word(w) => LINE_ENDINGS.contains(&w.as_str()),
    }
}

/// True for phrase-ending punctuation.
pub fn is_phrase_ending(token: &Token) -> bool {
    token
        .as_word()
        .is_some_and(|w| PHRASE_ENDINGS.contains(&w))
}

/// Per-session counts of line/phrase-final words and rhyme keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RhymeMemory {
    words: BTreeMap<String, u64>,
    keys: BTreeMap<String, u64>,
}

impl RhymeMemory {
    /// How often `word` has ended a line or phrase.
    pub fn word_uses(&self, word: &str) -> u64 {
        self.words.get(word).copied().unwrap_or(0)
    }

    /// How often a word with rhyme key `key` has ended a line or phrase.
    pub fn key_uses(&self, key: &str) -> u64 {
        self.keys.get(key).copied().unwrap_or(0)
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Record one ending. A word that is its own rhyme key counts in both
    /// tables.
    fn record(&mut self, word: &str, key: Option<&str>) {
        *self.words.entry(word.to_string()).or_insert(0) += 1;
        if let Some(key) = key {
            *self.keys.entry(key.to_string()).or_insert(0) += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.keys.is_empty()
    }
}

/// One composition session over a read-only model.
#[derive(Debug, Clone)]
pub struct Composer<'a> {
    graph: &'a BigramGraph,
    morphemes: &'a MorphemeDict,
    rhyme_lexicon: Option<&'a Lexicon>,
    alliteration_lexicon: Option<&'a Lexicon>,
    weights: BonusWeights,
    max_words_per_line: usize,
    memory: RhymeMemory,
    tokens: Vec<Token>,
}

impl<'a> Composer<'a> {
    /// Create a composer. Fails on negative weights or a zero line length.
    pub fn new(
        graph: &'a BigramGraph,
        morphemes: &'a MorphemeDict,
        weights: &RhymeWeights,
        max_words_per_line: usize,
    ) -> Result<Self, LyricError> {
        if max_words_per_line == 0 {
            return Err(LyricError::invalid("max_words_per_line must be at least 1"));
        }
        Ok(Composer {
            graph,
            morphemes,
            rhyme_lexicon: None,
            alliteration_lexicon: None,
            weights: weights.validated()?,
            max_words_per_line,
            memory: RhymeMemory::default(),
            tokens: Vec::new(),
        })
    }

    /// Composer with default weights and line length.
    pub fn with_defaults(
        graph: &'a BigramGraph,
        morphemes: &'a MorphemeDict,
    ) -> Result<Self, LyricError> {
        Self::new(graph, morphemes, &RhymeWeights::default(), DEFAULT_MAX_WORDS_PER_LINE)
    }

    /// Composer configured from a generation request. Lexicons are attached
    /// only when the request enables them.
    pub fn from_request(
        graph: &'a BigramGraph,
        morphemes: &'a MorphemeDict,
        rhyme_lexicon: &'a Lexicon,
        alliteration_lexicon: &'a Lexicon,
        request: &ComposeRequest,
    ) -> Result<Self, LyricError> {
        request.validate()?;
        let mut composer = Self::new(
            graph,
            morphemes,
            &request.rhyme_weights,
            request.max_words_per_line,
        )?;
        if request.use_rhyme {
            composer = composer.with_rhyme_lexicon(rhyme_lexicon);
        }
        if request.use_alliteration {
            composer = composer.with_alliteration_lexicon(alliteration_lexicon);
        }
        Ok(composer)
    }

    pub fn with_rhyme_lexicon(mut self, lexicon: &'a Lexicon) -> Self {
        self.rhyme_lexicon = Some(lexicon);
        self
    }

    pub fn with_alliteration_lexicon(mut self, lexicon: &'a Lexicon) -> Self {
        self.alliteration_lexicon = Some(lexicon);
        self
    }

    /// Generate `lines` more lines, appending to the output.
    pub fn compose<R: RandomSource>(&mut self, lines: usize, rng: &mut R) -> &mut Self {
        let mut remaining = lines;
        if remaining == 0 {
            return self;
        }

        let starts = self.graph.line_starts();
        let mut node = if starts.is_empty() {
            Token::LineBoundary
        } else {
            starts[rng.index(starts.len())].clone()
        };
        let mut line_words = 0usize;
        if !node.is_boundary() {
            self.push(node.clone());
            line_words = 1;
        }

        while remaining > 0 {
            // Also covers the start word, which counts toward the first line.
            if line_words >= self.max_words_per_line {
                tracing::debug!(line_words, "line reached word limit, truncating");
                line_words = 0;
                self.step(&node, Token::LineBoundary);
                remaining -= 1;
                continue;
            }

            let edges = self.evaluate(&node);
            match pick_weighted(&edges, rng) {
                None => {
                    tracing::warn!(
                        node = %node,
                        base_edges = ?self.graph.successors(&node),
                        "no weighted edge, forcing line break"
                    );
                    self.step(&node, Token::LineBoundary);
                    remaining -= 1;
                    line_words = 0;
                    node = Token::LineBoundary;
                }
                Some(&next) => {
                    let next = next.clone();
                    self.step(&node, next.clone());
                    if is_line_ending(&next) {
                        remaining -= 1;
                        line_words = 0;
                    } else {
                        line_words += 1;
                    }
                    node = next;
                }
            }
        }
        self
    }

    /// Edge weights out of `node`: graph count plus bonuses.
    pub fn evaluate(&self, node: &Token) -> Vec<(&'a Token, u64)> {
        let Some(edges) = self.graph.successors(node) else {
            return Vec::new();
        };
        edges
            .iter()
            .map(|(candidate, &count)| {
                let mut weight = count;
                if self.rhyme_lexicon.is_some() {
                    weight = weight.saturating_add(self.rhyme_bonus(candidate));
                }
                if self.alliteration_lexicon.is_some() {
                    weight = weight.saturating_add(self.alliteration_bonus(candidate));
                }
                (candidate, weight)
            })
            .collect()
    }

    /// Rhyme bonus for moving to `candidate`.
    pub fn rhyme_bonus(&self, candidate: &Token) -> u64 {
        let (Some(lexicon), Some(word)) = (self.rhyme_lexicon, candidate.as_word()) else {
            return 0;
        };
        let Some(key) = self.morphemes.rhyme_key(candidate) else {
            return 0;
        };
        let bonus = if lexicon.contains_key(&key) {
            if self.memory.contains_word(word) {
                self.weights.auto
            } else {
                (lexicon.group_size(&key) as u64)
                    .saturating_mul(self.weights.rhymability)
                    .saturating_add(self.memory.key_uses(&key).saturating_mul(self.weights.repeat))
            }
        } else if self.memory.contains_key(&key) {
            self.weights.auto
        } else {
            0
        };
        self.weights.clamp(bonus)
    }

    /// Alliteration bonus for moving to `candidate`. No heuristic yet.
    pub fn alliteration_bonus(&self, _candidate: &Token) -> u64 {
        0
    }

    /// Append `next` after `word`, tracking endings.
    fn step(&mut self, word: &Token, next: Token) {
        let ends_line = is_line_ending(&next);
        let ends_phrase = is_phrase_ending(&next);
        let punctuation_end = ends_line && !next.is_boundary();
        self.push(next);
        if punctuation_end {
            self.tokens.push(Token::LineBoundary);
        }
        if (ends_line || ends_phrase)
            && let Some(text) = word.as_word()
        {
            let key = self.morphemes.rhyme_key(word);
            self.memory.record(text, key.as_deref());
        }
    }

    /// Append a token, capitalizing the first word of the output.
    fn push(&mut self, token: Token) {
        let first_word = !self.tokens.iter().any(|t| !t.is_boundary());
        match token {
            Token::Word(w) if first_word => self.tokens.push(Token::Word(capitalize(&w))),
            other => self.tokens.push(other),
        }
    }

    pub fn memory(&self) -> &RhymeMemory {
        &self.memory
    }

    /// The raw output stream, boundaries included.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Finished lines, rendered.
    pub fn lines(&self) -> Vec<String> {
        split_lines(&self.tokens).into_iter().map(render_line).collect()
    }

    /// The whole song as newline-separated text.
    pub fn song(&self) -> String {
        render_song(&self.tokens)
    }
}

/// Uppercase the first character.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => {
            let upper: String = c.to_uppercase().collect();
            format!("{}{}", upper, chars.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildOptions;
    use lyricist_lang::{Segmenter, Tokenizer};
    use lyricist_prng::{LyricRng, ScriptedSource};

    fn w(s: &str) -> Token {
        Token::word(s)
    }

    fn build(lines: &[&str]) -> (BigramGraph, MorphemeDict) {
        let song = Tokenizer::new().tokenize_song(lines);
        let graph = BigramGraph::build(&[song], BuildOptions::default());
        let dict = MorphemeDict::build(&Segmenter::default(), graph.vocabulary());
        (graph, dict)
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("hello"), "Hello");
        assert_eq!(capitalize("élan"), "Élan");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_endings() {
        assert!(is_line_ending(&Token::LineBoundary));
        assert!(is_line_ending(&w(".")));
        assert!(is_line_ending(&w("-")));
        assert!(!is_line_ending(&w(",")));
        assert!(is_phrase_ending(&w(",")));
        assert!(is_phrase_ending(&w(";")));
        assert!(!is_phrase_ending(&Token::LineBoundary));
        assert!(!is_phrase_ending(&w("word")));
    }

    #[test]
    fn test_single_word_graph_gives_capitalized_line() {
        let mut graph = BigramGraph::new();
        graph.add_edge(Token::LineBoundary, w("hello"), 2);
        graph.add_edge(w("hello"), Token::LineBoundary, 2);
        let dict = MorphemeDict::build(&Segmenter::default(), graph.vocabulary());
        let mut composer = Composer::with_defaults(&graph, &dict).unwrap();
        composer.compose(1, &mut LyricRng::new(0));
        assert_eq!(composer.song(), "Hello");
        assert_eq!(composer.lines(), vec!["Hello".to_string()]);
    }

    #[test]
    fn test_requested_line_count() {
        let (graph, dict) = build(&[
            "I see the light.",
            "the night is long, the road is wide",
            "I feel the night",
        ]);
        let lexicon = Lexicon::rhyme(&dict);
        for seed in 0..20 {
            let mut composer = Composer::with_defaults(&graph, &dict)
                .unwrap()
                .with_rhyme_lexicon(&lexicon);
            composer.compose(6, &mut LyricRng::new(seed));
            assert_eq!(composer.lines().len(), 6, "seed {seed}");
        }
    }

    #[test]
    fn test_same_draws_same_song() {
        let (graph, dict) = build(&["la di da, la di dee", "da da la!", "dee la di"]);
        let lexicon = Lexicon::rhyme(&dict);
        let run = |draws: Vec<u64>| {
            let mut composer = Composer::with_defaults(&graph, &dict)
                .unwrap()
                .with_rhyme_lexicon(&lexicon);
            composer.compose(5, &mut ScriptedSource::new(draws));
            composer.song()
        };
        let draws = vec![4, 17, 2, 9, 31, 0, 5, 12];
        assert_eq!(run(draws.clone()), run(draws));
        let a = Composer::with_defaults(&graph, &dict).unwrap().compose(4, &mut LyricRng::new(9)).song();
        let b = Composer::with_defaults(&graph, &dict).unwrap().compose(4, &mut LyricRng::new(9)).song();
        assert_eq!(a, b);
    }

    #[test]
    fn test_dead_end_forces_new_line() {
        // "stuck" has no outgoing edges at all.
        let mut graph = BigramGraph::new();
        graph.add_edge(Token::LineBoundary, w("stuck"), 1);
        let dict = MorphemeDict::build(&Segmenter::default(), graph.vocabulary());
        let mut composer = Composer::with_defaults(&graph, &dict).unwrap();
        composer.compose(3, &mut LyricRng::new(1));
        assert_eq!(composer.song(), "Stuck\nstuck\nstuck");
    }

    #[test]
    fn test_empty_graph_yields_empty_lines() {
        let graph = BigramGraph::new();
        let dict = MorphemeDict::default();
        let mut composer = Composer::with_defaults(&graph, &dict).unwrap();
        composer.compose(2, &mut LyricRng::new(1));
        assert_eq!(composer.lines(), vec![String::new(), String::new()]);
    }

    #[test]
    fn test_zero_lines_is_empty() {
        let (graph, dict) = build(&["a b"]);
        let mut composer = Composer::with_defaults(&graph, &dict).unwrap();
        composer.compose(0, &mut LyricRng::new(1));
        assert!(composer.tokens().is_empty());
        assert_eq!(composer.song(), "");
    }

    #[test]
    fn test_max_words_truncates_line() {
        let (graph, dict) = build(&["la la la la la la la la la la la la la la"]);
        let mut composer = Composer::new(&graph, &dict, &RhymeWeights::default(), 3).unwrap();
        // "la -> la" outweighs "la -> ∅"; draw 5 always skips the boundary.
        composer.compose(2, &mut ScriptedSource::new(vec![5]));
        assert_eq!(composer.song(), "La la la\nla la la");
    }

    #[test]
    fn test_one_word_lines_include_start_word() {
        let (graph, dict) = build(&["la la la la la la la la la la la la la la"]);
        let mut composer = Composer::new(&graph, &dict, &RhymeWeights::default(), 1).unwrap();
        composer.compose(2, &mut ScriptedSource::new(vec![5]));
        assert_eq!(composer.song(), "La\nla");
        for line in composer.lines() {
            assert_eq!(line.split(' ').count(), 1, "{line:?}");
        }
    }

    #[test]
    fn test_punctuation_ending_closes_line() {
        let (graph, dict) = build(&["go home."]);
        let mut composer = Composer::with_defaults(&graph, &dict).unwrap();
        composer.compose(1, &mut LyricRng::new(4));
        assert_eq!(composer.song(), "Go home.");
        assert_eq!(composer.memory().word_uses("home"), 1);
    }

    #[test]
    fn test_phrase_ending_records_memory_without_line_break() {
        let (graph, dict) = build(&["stay, baby"]);
        let mut composer = Composer::with_defaults(&graph, &dict).unwrap();
        composer.compose(1, &mut LyricRng::new(2));
        assert_eq!(composer.song(), "Stay, baby");
        // A single-morpheme word is its own rhyme key.
        assert_eq!(composer.memory().word_uses("stay"), 1);
        assert_eq!(composer.memory().key_uses("stay"), 1);
        assert_eq!(composer.memory().word_uses("baby"), 1);
        assert_eq!(composer.memory().key_uses("by"), 1);
    }

    #[test]
    fn test_rhyme_bonus_rules() {
        let (graph, dict) = build(&["singing ringing night hello"]);
        let lexicon = Lexicon::rhyme(&dict);
        let weights = RhymeWeights {
            auto: 7,
            repeat: 3,
            rhymability: 2,
            cap: None,
        };
        let mut composer = Composer::new(&graph, &dict, &weights, 10)
            .unwrap()
            .with_rhyme_lexicon(&lexicon);

        // Fresh session: "ing" has 2 partners.
        assert_eq!(composer.rhyme_bonus(&w("singing")), 4);
        // No lexicon group, never used.
        assert_eq!(composer.rhyme_bonus(&w("night")), 0);
        // Boundary and unknown tokens score nothing.
        assert_eq!(composer.rhyme_bonus(&Token::LineBoundary), 0);
        assert_eq!(composer.rhyme_bonus(&w("unseen")), 0);

        composer.memory.record("singing", Some("ing"));
        // Already-used word in a lexicon group: auto.
        assert_eq!(composer.rhyme_bonus(&w("singing")), 7);
        // Partner word: group size plus key reuse.
        assert_eq!(composer.rhyme_bonus(&w("ringing")), 2 * 2 + 3);

        composer.memory.record("night", Some("night"));
        // Key used before but without a lexicon group: auto.
        assert_eq!(composer.rhyme_bonus(&w("night")), 7);
    }

    #[test]
    fn test_self_keyed_word_counts_as_used() {
        // "midnight" is mid|night; both words share the key "night".
        let (graph, dict) = build(&["midnight", "night"]);
        let lexicon = Lexicon::rhyme(&dict);
        assert_eq!(lexicon.group_size("night"), 2);
        let weights = RhymeWeights {
            auto: 1,
            repeat: 3,
            rhymability: 2,
            cap: None,
        };
        let mut composer = Composer::new(&graph, &dict, &weights, 10)
            .unwrap()
            .with_rhyme_lexicon(&lexicon);

        composer.step(&w("night"), Token::LineBoundary);
        assert!(composer.memory().contains_word("night"));
        assert_eq!(composer.rhyme_bonus(&w("night")), 1);
        assert_eq!(composer.rhyme_bonus(&w("midnight")), 2 * 2 + 3);
    }

    #[test]
    fn test_huge_weights_saturate() {
        let (graph, dict) = build(&["we were singing", "we were ringing"]);
        let lexicon = Lexicon::rhyme(&dict);
        let weights = RhymeWeights {
            repeat: i64::MAX,
            rhymability: i64::MAX,
            ..Default::default()
        };
        let mut composer = Composer::new(&graph, &dict, &weights, 10)
            .unwrap()
            .with_rhyme_lexicon(&lexicon);
        let edges = composer.evaluate(&w("were"));
        assert!(edges.iter().all(|&(_, weight)| weight == u64::MAX));

        composer.compose(4, &mut LyricRng::new(8));
        assert_eq!(composer.lines().len(), 4);
    }

    #[test]
    fn test_rhyme_bonus_cap() {
        let (graph, dict) = build(&["singing ringing bringing"]);
        let lexicon = Lexicon::rhyme(&dict);
        let weights = RhymeWeights {
            rhymability: 10,
            cap: Some(5),
            ..Default::default()
        };
        let composer = Composer::new(&graph, &dict, &weights, 10)
            .unwrap()
            .with_rhyme_lexicon(&lexicon);
        assert_eq!(composer.rhyme_bonus(&w("singing")), 5);
    }

    #[test]
    fn test_no_rhyme_lexicon_means_base_counts() {
        let (graph, dict) = build(&["singing ringing", "singing night"]);
        let composer = Composer::with_defaults(&graph, &dict).unwrap();
        let edges = composer.evaluate(&w("singing"));
        let base: Vec<u64> = graph.successors(&w("singing")).unwrap().values().copied().collect();
        let weights: Vec<u64> = edges.iter().map(|(_, weight)| *weight).collect();
        assert_eq!(weights, base);
    }

    #[test]
    fn test_evaluate_adds_bonus_without_touching_graph() {
        let (graph, dict) = build(&["we were singing", "we were ringing"]);
        let before = graph.clone();
        let lexicon = Lexicon::rhyme(&dict);
        let composer = Composer::with_defaults(&graph, &dict)
            .unwrap()
            .with_rhyme_lexicon(&lexicon);
        let edges = composer.evaluate(&w("were"));
        for (candidate, weight) in edges {
            assert_eq!(weight, graph.count(&w("were"), candidate) + 2);
        }
        assert_eq!(graph, before);
    }

    #[test]
    fn test_alliteration_bonus_is_zero() {
        let (graph, dict) = build(&["hello hero heaven"]);
        let lexicon = Lexicon::alliteration(&dict);
        let composer = Composer::with_defaults(&graph, &dict)
            .unwrap()
            .with_alliteration_lexicon(&lexicon);
        let edges = composer.evaluate(&w("hello"));
        assert_eq!(edges, vec![(&w("hero"), 1)]);
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let (graph, dict) = build(&["a"]);
        assert!(matches!(
            Composer::new(&graph, &dict, &RhymeWeights::default(), 0),
            Err(LyricError::InvalidConfiguration(_))
        ));
        let negative = RhymeWeights {
            repeat: -1,
            ..Default::default()
        };
        assert!(matches!(
            Composer::new(&graph, &dict, &negative, 10),
            Err(LyricError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_composers_share_model_across_threads() {
        let (graph, dict) = build(&["the night is young", "the night is long.", "young and long"]);
        let lexicon = Lexicon::rhyme(&dict);
        let songs: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|seed| {
                    let (graph, dict, lexicon) = (&graph, &dict, &lexicon);
                    scope.spawn(move || {
                        let mut composer = Composer::with_defaults(graph, dict)
                            .unwrap()
                            .with_rhyme_lexicon(lexicon);
                        composer.compose(4, &mut LyricRng::new(seed));
                        composer.song()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(songs.len(), 4);
        for song in songs {
            assert_eq!(song.split('\n').count(), 4);
        }
    }
}
