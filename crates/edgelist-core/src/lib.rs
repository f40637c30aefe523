//! Streaming edge-list parsing with dense identifier normalization.
//!
//! An [`EdgeListParser`] consumes text lines of the shape `<source> <target>`,
//! skips blank and comment lines, and turns every endpoint label into a dense
//! integer id. The label table it builds along the way lives for as long as
//! the parser does and can be read at any point through
//! [`EdgeListParser::snapshot_mappings`].

pub mod cli;
pub mod config;
pub mod error;
pub mod formats;
pub mod mapping;
pub mod session;
pub mod source;
pub mod tokenizer;

pub use config::ParserConfig;
pub use error::{BoxError, ConfigError, IdSpaceExhausted, ParseError};
pub use mapping::{Mapping, MappingTable, NodeId};
pub use session::{Edge, EdgeListParser, Edges, ParseStats};
pub use tokenizer::LineKind;
