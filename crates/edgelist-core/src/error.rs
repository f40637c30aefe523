use crate::mapping::NodeId;
use thiserror::Error;

/// Error type accepted from line sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ParseError {
    /// A non-blank, non-comment line that did not split into exactly two tokens.
    #[error("line {line}: expected 2 tokens, found {found}: {content:?}")]
    Malformed {
        line: u64,
        found: usize,
        content: String,
    },

    /// A new label on `line` needed an id beyond `NodeId::MAX`.
    #[error("line {line}: {source}")]
    IdSpace {
        line: u64,
        #[source]
        source: IdSpaceExhausted,
    },

    /// The line source itself failed while producing `line`.
    #[error("line {line}: line source failed: {source}")]
    Source {
        line: u64,
        #[source]
        source: BoxError,
    },
}

impl ParseError {
    pub fn line(&self) -> u64 {
        match self {
            ParseError::Malformed { line, .. }
            | ParseError::IdSpace { line, .. }
            | ParseError::Source { line, .. } => *line,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ParseError::Malformed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no identifiers left in the range starting at {base}")]
pub struct IdSpaceExhausted {
    pub base: NodeId,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid parser config: {0}")]
    Json(#[from] serde_json::Error),
}
