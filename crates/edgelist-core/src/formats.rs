use serde::{Deserialize, Serialize};
use std::path::Path;

/// Input shapes accepted by this crate. Descriptive only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputFormat {
    /// One `<source> <target>` pair per line, whitespace separated.
    EdgeList,
}

pub const SUPPORTED_FORMATS: &[InputFormat] = &[InputFormat::EdgeList];

impl InputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            InputFormat::EdgeList => "edge-list",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            InputFormat::EdgeList => &["txt", "edges", "edgelist", "el", "tsv"],
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        SUPPORTED_FORMATS
            .iter()
            .copied()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}
