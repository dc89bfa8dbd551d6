use std::fmt;

use crate::config::SymSpellConfigBuilderError;

/// A corpus line that could not be turned into a dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number within the corpus.
    pub line_number: usize,
    pub line: String,
    pub reason: String,
}

impl fmt::Display for MalformedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line_number, self.reason, self.line)
    }
}

/// Errors surfaced by dictionary construction and lookup.
#[derive(Debug, thiserror::Error)]
pub enum SymSpellError {
    /// A lookup was attempted before any term reached the lexicon.
    #[error("there are no words in the dictionary, load a dictionary before calling lookup")]
    NotInitialized,

    #[error(
        "max_edit_distance {max_edit_distance} exceeds max_dictionary_edit_distance {max_dictionary_edit_distance}"
    )]
    InvalidArgument {
        max_edit_distance: usize,
        max_dictionary_edit_distance: usize,
    },

    /// The whole corpus was rejected; nothing from it was committed.
    #[error("corpus has {} malformed line(s), first {}", .lines.len(), first_line(.lines))]
    MalformedCorpus { lines: Vec<MalformedLine> },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn first_line(lines: &[MalformedLine]) -> String {
    lines
        .first()
        .map_or_else(|| "unknown".to_string(), ToString::to_string)
}

impl From<SymSpellConfigBuilderError> for SymSpellError {
    fn from(err: SymSpellConfigBuilderError) -> Self {
        SymSpellError::InvalidConfig(err.to_string())
    }
}
