use crate::error::ConfigError;
use crate::mapping::NodeId;
use serde::{Deserialize, Serialize};
use std::env;

pub const COMMENT_MARKERS_ENV: &str = "EDGELIST_COMMENT_MARKERS";
pub const ID_BASE_ENV: &str = "EDGELIST_ID_BASE";

/// Parser-level settings fixed for the lifetime of an [`EdgeListParser`](crate::EdgeListParser).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// A trimmed line starting with any of these characters is a comment.
    pub comment_markers: Vec<char>,
    /// Identifier handed to the first label observed.
    pub id_base: NodeId,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            comment_markers: vec!['#', '%'],
            id_base: 0,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `EDGELIST_COMMENT_MARKERS` and `EDGELIST_ID_BASE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay(|key| env::var(key).ok())
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn with_comment_markers(mut self, markers: impl IntoIterator<Item = char>) -> Self {
        self.comment_markers = markers
            .into_iter()
            .filter(|c| !c.is_whitespace())
            .collect();
        self
    }

    pub fn with_id_base(mut self, id_base: NodeId) -> Self {
        self.id_base = id_base;
        self
    }

    fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(markers) = lookup(COMMENT_MARKERS_ENV) {
            self = self.with_comment_markers(markers.chars());
        }
        if let Some(raw) = lookup(ID_BASE_ENV) {
            self.id_base = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ID_BASE_ENV,
                value: raw.clone(),
            })?;
        }
        Ok(self)
    }
}
