// Graph side of the lyric generator.
//
// Builds a bigram transition graph from a tokenized corpus, biases a weighted
// random walk over it toward rhyming line endings, and persists graphs as
// headerless CSV. The text side (tokens, morphemes, lexicons) lives in
// `lyricist_lang`; randomness comes from `lyricist_prng`.
//
// Architecture:
// - `corpus.rs`: raw songs (with void entries) to tokenized songs, word counts
// - `graph.rs`: `BigramGraph` and its two reset policies, reverse derivation
// - `sampling.rs`: cumulative-weight edge picking, plain Markov walk
// - `composer.rs`: rhyme-aware `Composer` and its `RhymeMemory`
// - `render.rs`: token stream to newline-separated text
// - `model.rs`: `LyricModel`, a graph bundled with its dict and lexicons
// - `codec.rs`: graph to/from `predecessor,successor,count` rows
// - `config.rs`: `ComposeRequest`, rhyme weights, build options
// - `error.rs`: `LyricError`
//
// Pipeline:
//   Corpus -> BigramGraph -> LyricModel (MorphemeDict, Lexicons)
//     -> Composer -> song text
// The codec sits beside the pipeline: a graph can be dumped after building
// and loaded back in place of a corpus.

pub mod codec;
pub mod composer;
pub mod config;
pub mod corpus;
pub mod error;
pub mod graph;
pub mod model;
pub mod render;
pub mod sampling;

pub use codec::{dump_graph, load_graph, read_graph, write_graph};
pub use composer::{Composer, RhymeMemory};
pub use config::{BuildOptions, ComposeRequest, ResetPolicy, RhymeWeights};
pub use corpus::Corpus;
pub use error::LyricError;
pub use graph::BigramGraph;
pub use model::LyricModel;
