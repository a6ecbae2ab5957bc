// A built lyric model: the graph plus everything derived from it.
//
// `LyricModel` owns the bigram graph, the morpheme dict over the graph's
// vocabulary, and both lexicons. It is immutable after construction, so one
// model can back any number of composers, including composers on different
// threads. Each `compose` call runs a fresh `Composer` with its own rhyme
// memory.
//
// A model also carries a preset request used by `compose_preset`. The plain
// preset walks graph counts only. The hip-hop preset turns the rhyme lexicon
// on with every weight at 1.

use crate::composer::Composer;
use crate::config::ComposeRequest;
use crate::error::LyricError;
use crate::graph::BigramGraph;
use lyricist_lang::{Lexicon, MorphemeDict, Segmenter};
use lyricist_prng::RandomSource;

#[derive(Debug, Clone)]
pub struct LyricModel {
    graph: BigramGraph,
    morphemes: MorphemeDict,
    rhyme: Lexicon,
    alliteration: Lexicon,
    preset: ComposeRequest,
}

impl LyricModel {
    /// Segment the graph's vocabulary and build both lexicons. The preset
    /// request has rhyme and alliteration off.
    pub fn new(graph: BigramGraph, segmenter: &Segmenter) -> Self {
        let morphemes = MorphemeDict::build(segmenter, graph.vocabulary());
        let rhyme = Lexicon::rhyme(&morphemes);
        let alliteration = Lexicon::alliteration(&morphemes);
        tracing::debug!(
            words = morphemes.len(),
            rhyme_keys = rhyme.len(),
            alliteration_keys = alliteration.len(),
            "built lyric model"
        );
        LyricModel {
            graph,
            morphemes,
            rhyme,
            alliteration,
            preset: ComposeRequest {
                use_rhyme: false,
                use_alliteration: false,
                ..ComposeRequest::default()
            },
        }
    }

    /// Model whose preset favours rhyming line endings.
    pub fn hip_hop(graph: BigramGraph, segmenter: &Segmenter) -> Self {
        Self::new(graph, segmenter).with_preset(ComposeRequest::default())
    }

    pub fn with_preset(mut self, preset: ComposeRequest) -> Self {
        self.preset = preset;
        self
    }

    /// Generate a song for `request`.
    pub fn compose<R: RandomSource>(
        &self,
        request: &ComposeRequest,
        rng: &mut R,
    ) -> Result<String, LyricError> {
        let mut composer = self.composer(request)?;
        composer.compose(request.line_count, rng);
        Ok(composer.song())
    }

    /// Generate a song with the model's preset request.
    pub fn compose_preset<R: RandomSource>(&self, rng: &mut R) -> Result<String, LyricError> {
        self.compose(&self.preset, rng)
    }

    /// A fresh composer over this model, configured by `request`.
    pub fn composer(&self, request: &ComposeRequest) -> Result<Composer<'_>, LyricError> {
        Composer::from_request(
            &self.graph,
            &self.morphemes,
            &self.rhyme,
            &self.alliteration,
            request,
        )
    }

    /// The graph with every edge flipped.
    pub fn reverse_graph(&self) -> BigramGraph {
        self.graph.reverse()
    }

    pub fn graph(&self) -> &BigramGraph {
        &self.graph
    }

    pub fn morphemes(&self) -> &MorphemeDict {
        &self.morphemes
    }

    pub fn rhyme_lexicon(&self) -> &Lexicon {
        &self.rhyme
    }

    pub fn alliteration_lexicon(&self) -> &Lexicon {
        &self.alliteration
    }

    pub fn preset(&self) -> &ComposeRequest {
        &self.preset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildOptions, RhymeWeights};
    use lyricist_lang::{Phonotactics, Token, Tokenizer};
    use lyricist_prng::LyricRng;

    fn model(lines: &[&str]) -> LyricModel {
        let song = Tokenizer::new().tokenize_song(lines);
        let graph = BigramGraph::build(&[song], BuildOptions::default());
        LyricModel::hip_hop(graph, &Segmenter::new(Phonotactics::english()))
    }

    #[test]
    fn test_dict_covers_vocabulary() {
        let m = model(&["we were singing", "they were ringing"]);
        for token in m.graph().vocabulary() {
            assert!(m.morphemes().get(token).is_some(), "{token} missing");
        }
        assert!(m.morphemes().get(&Token::LineBoundary).unwrap().is_empty());
        assert_eq!(m.rhyme_lexicon().group_size("ing"), 2);
    }

    #[test]
    fn test_presets() {
        let m = model(&["la"]);
        assert!(m.preset().use_rhyme);
        let plain = LyricModel::new(m.graph().clone(), &Segmenter::new(Phonotactics::english()));
        assert!(!plain.preset().use_rhyme);
        assert!(!plain.preset().use_alliteration);
    }

    #[test]
    fn test_compose_single_word() {
        let m = model(&["hello", "hello"]);
        let request = ComposeRequest {
            line_count: 1,
            ..Default::default()
        };
        let song = m.compose(&request, &mut LyricRng::new(5)).unwrap();
        assert_eq!(song, "Hello");
    }

    #[test]
    fn test_compose_preset_line_count() {
        let m = model(&["the night is long", "the song is strong", "so sing along"]);
        let song = m.compose_preset(&mut LyricRng::new(3)).unwrap();
        assert_eq!(song.split('\n').count(), m.preset().line_count);
    }

    #[test]
    fn test_invalid_request_rejected() {
        let m = model(&["la la"]);
        let request = ComposeRequest {
            rhyme_weights: RhymeWeights {
                repeat: -2,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = m.compose(&request, &mut LyricRng::new(0)).unwrap_err();
        assert!(matches!(err, LyricError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_reverse_graph() {
        let m = model(&["a b"]);
        let reverse = m.reverse_graph();
        assert_eq!(reverse.count(&Token::word("b"), &Token::word("a")), 1);
        assert_eq!(reverse.count(&Token::LineBoundary, &Token::word("b")), 1);
    }
}
