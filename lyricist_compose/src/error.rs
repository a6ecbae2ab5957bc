// Error type for graph loading, configuration, and corpus I/O.
//
// Composition itself never fails on sparse data: dead ends turn into line
// breaks. Errors only come from the edges of the system: a malformed graph
// file, an invalid generation request, or I/O on corpus/graph files.

/// Everything that can go wrong in `lyricist_compose`.
#[derive(Debug, thiserror::Error)]
pub enum LyricError {
    /// A persisted graph row had the wrong shape or a non-integer count.
    #[error("corrupt graph data at row {row}: {reason}")]
    CorruptGraphData { row: usize, reason: String },

    /// Rejected at composer construction, before any text is generated.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LyricError {
    pub(crate) fn corrupt(row: usize, reason: impl Into<String>) -> Self {
        LyricError::CorruptGraphData {
            row,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        LyricError::InvalidConfiguration(reason.into())
    }
}
