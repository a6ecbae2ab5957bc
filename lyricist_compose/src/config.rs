// Generation and build configuration.
//
// `ComposeRequest` is the generation request: how many lines, how long a line
// may run, and how strongly rhymes are rewarded. It is loaded from JSON with
// every field optional (`#[serde(default)]`), so a file only needs to name
// the knobs it changes. Defaults match the hip-hop preset: every rhyme weight
// at 1, no cap, rhyme on, alliteration off.
//
// Weights are stored signed so that a negative value in a config file reaches
// `validate()` and is reported as `InvalidConfiguration` instead of failing
// deep inside serde. `RhymeWeights::validated()` converts to the unsigned
// `BonusWeights` the composer actually uses.
//
// `BuildOptions` selects how the graph builder treats line boundaries.

use crate::error::LyricError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cap on words in one generated line.
pub const DEFAULT_MAX_WORDS_PER_LINE: usize = 10;

/// Default number of lines in a generated song.
pub const DEFAULT_LINE_COUNT: usize = 10;

/// Rhyme bonus weights as written in configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhymeWeights {
    /// Bonus for reusing a word that already ended a line, or for a rhyme key
    /// that ended a line but has no lexicon group.
    pub auto: i64,
    /// Per-use bonus for a rhyme key that already ended lines.
    pub repeat: i64,
    /// Per-partner bonus for a rhyme key with a lexicon group.
    pub rhymability: i64,
    /// Upper bound on any single bonus; `None` is uncapped.
    pub cap: Option<i64>,
}

impl Default for RhymeWeights {
    fn default() -> Self {
        RhymeWeights {
            auto: 1,
            repeat: 1,
            rhymability: 1,
            cap: None,
        }
    }
}

impl RhymeWeights {
    /// Check signs and convert to the composer's unsigned form.
    pub fn validated(&self) -> Result<BonusWeights, LyricError> {
        let non_negative = |name: &str, value: i64| {
            u64::try_from(value)
                .map_err(|_| LyricError::invalid(format!("{name} weight must be >= 0, got {value}")))
        };
        Ok(BonusWeights {
            auto: non_negative("auto", self.auto)?,
            repeat: non_negative("repeat", self.repeat)?,
            rhymability: non_negative("rhymability", self.rhymability)?,
            cap: self.cap.map(|c| non_negative("cap", c)).transpose()?,
        })
    }
}

/// Validated rhyme weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BonusWeights {
    pub auto: u64,
    pub repeat: u64,
    pub rhymability: u64,
    pub cap: Option<u64>,
}

impl BonusWeights {
    /// Clamp a bonus to the cap, if one is set.
    pub fn clamp(&self, bonus: u64) -> u64 {
        match self.cap {
            Some(cap) => bonus.min(cap),
            None => bonus,
        }
    }
}

/// A generation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeRequest {
    pub line_count: usize,
    pub max_words_per_line: usize,
    pub rhyme_weights: RhymeWeights,
    pub use_rhyme: bool,
    pub use_alliteration: bool,
}

impl Default for ComposeRequest {
    fn default() -> Self {
        ComposeRequest {
            line_count: DEFAULT_LINE_COUNT,
            max_words_per_line: DEFAULT_MAX_WORDS_PER_LINE,
            rhyme_weights: RhymeWeights::default(),
            use_rhyme: true,
            use_alliteration: false,
        }
    }
}

impl ComposeRequest {
    pub fn from_json(json: &str) -> Result<Self, LyricError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, LyricError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn validate(&self) -> Result<(), LyricError> {
        if self.max_words_per_line == 0 {
            return Err(LyricError::invalid("max_words_per_line must be at least 1"));
        }
        self.rhyme_weights.validated()?;
        Ok(())
    }
}

/// Where the graph builder resets the predecessor to the line boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Every line starts from and ends at the boundary.
    #[default]
    PerLine,
    /// Only song starts and ends touch the boundary; lines run together.
    PerSong,
}

/// Options for building a graph from a corpus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub reset: ResetPolicy,
}
