// Text side of the lyric generator.
//
// Turns raw lyric lines into tokens, cuts words into pronounceable
// morphemes, and groups words into rhyme and alliteration lexicons. Used by
// `lyricist_compose`, which builds the bigram graph from the tokens and
// biases its random walk with the lexicons.
//
// Architecture:
// - `types.rs`: `Token` (word or line boundary) and `MorphemeSequence`
// - `tokenizer.rs`: regex tokenizer for lyric lines and whole corpora
// - `phonotactics.rs`: vowel/consonant tables, glued digraphs, strong suffixes
// - `morpheme.rs`: segmentation state machine and `MorphemeDict`
// - `lexicon.rs`: rhyme/alliteration `Lexicon` with degenerate-group pruning
//
// Everything here is pure and deterministic: maps are `BTreeMap`/`BTreeSet`
// so iteration order never depends on hashing.

pub mod lexicon;
pub mod morpheme;
pub mod phonotactics;
pub mod tokenizer;
pub mod types;

pub use lexicon::{Lexicon, LexiconKind};
pub use morpheme::{MorphemeDict, Segmenter};
pub use phonotactics::{CharClass, Phonotactics};
pub use tokenizer::{TokenizedSong, Tokenizer};
pub use types::{MorphemeSequence, Token};
