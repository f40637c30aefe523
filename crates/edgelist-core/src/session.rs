use crate::config::ParserConfig;
use crate::error::{BoxError, IdSpaceExhausted, ParseError};
use crate::mapping::{Mapping, MappingTable, NodeId};
use crate::tokenizer::{classify, LineKind};
use futures::stream::{FusedStream, Stream};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::io::{self, BufRead};
use std::iter::FusedIterator;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::{debug, warn};

/// A normalized edge: the ids of the source and target labels of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Line counters for one parsing session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Lines pulled from the source, including blank and comment lines.
    pub lines: u64,
    pub blank: u64,
    pub comments: u64,
    pub edges: u64,
}

/// Owns the mapping table for any number of parsing sessions.
///
/// Every `parse_*` call starts a new session over a new line source; the
/// label table is shared by all of them and is never reset.
#[derive(Debug, Default)]
pub struct EdgeListParser {
    config: ParserConfig,
    mappings: MappingTable,
}

impl EdgeListParser {
    pub fn new(config: ParserConfig) -> Self {
        let mappings = MappingTable::with_base(config.id_base);
        Self { config, mappings }
    }

    pub fn mappings(&self) -> &MappingTable {
        &self.mappings
    }

    /// Current label table in id order.
    pub fn snapshot_mappings(&self) -> Vec<Mapping> {
        self.mappings.snapshot()
    }

    pub fn resolve(&self, label: &str) -> Result<NodeId, IdSpaceExhausted> {
        self.mappings.resolve(label)
    }

    /// Resolve `source` before `target`, so two new labels on one line get
    /// ascending ids in that order.
    pub fn process_edge_line(
        &self,
        source: &str,
        target: &str,
    ) -> Result<Edge, IdSpaceExhausted> {
        let source = self.mappings.resolve(source)?;
        let target = self.mappings.resolve(target)?;
        Ok(Edge { source, target })
    }

    pub fn parse_lines<I, S, E>(&self, lines: I) -> Edges<'_, I::IntoIter>
    where
        I: IntoIterator<Item = Result<S, E>>,
        S: AsRef<str>,
        E: Into<BoxError>,
    {
        Edges {
            parser: self,
            lines: lines.into_iter(),
            cursor: Cursor::start(),
        }
    }

    pub fn parse_str<'a>(
        &'a self,
        text: &'a str,
    ) -> Edges<'a, impl Iterator<Item = Result<&'a str, Infallible>> + 'a> {
        self.parse_lines(text.lines().map(Ok::<&str, Infallible>))
    }

    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Edges<'_, io::Lines<R>> {
        self.parse_lines(reader.lines())
    }

    pub fn parse_stream<St, S, E>(&self, lines: St) -> EdgeStream<'_, St>
    where
        St: Stream<Item = Result<S, E>>,
        S: AsRef<str>,
        E: Into<BoxError>,
    {
        EdgeStream {
            parser: self,
            lines: Box::pin(lines),
            cursor: Cursor::start(),
        }
    }
}

enum Step {
    Emit(Result<Edge, ParseError>),
    Skip,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Running,
    Exhausted,
    Failed { line: u64 },
}

/// Classification and normalization state shared by the sync and async drivers.
#[derive(Debug)]
struct Cursor {
    stats: ParseStats,
    status: Status,
}

impl Cursor {
    fn start() -> Self {
        debug!("edge-list session started");
        Self {
            stats: ParseStats::default(),
            status: Status::Running,
        }
    }

    fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    fn feed<S, E>(&mut self, parser: &EdgeListParser, item: Option<Result<S, E>>) -> Step
    where
        S: AsRef<str>,
        E: Into<BoxError>,
    {
        let Some(item) = item else {
            self.status = Status::Exhausted;
            debug!(
                lines = self.stats.lines,
                edges = self.stats.edges,
                "edge-list session exhausted"
            );
            return Step::End;
        };

        self.stats.lines += 1;
        let line = self.stats.lines;
        let text = match item {
            Ok(text) => text,
            Err(source) => {
                return self.fail(ParseError::Source {
                    line,
                    source: source.into(),
                })
            }
        };

        match classify(text.as_ref(), &parser.config.comment_markers) {
            LineKind::Blank => {
                self.stats.blank += 1;
                Step::Skip
            }
            LineKind::Comment => {
                self.stats.comments += 1;
                Step::Skip
            }
            LineKind::Edge { source, target } => match parser.process_edge_line(source, target) {
                Ok(edge) => {
                    self.stats.edges += 1;
                    Step::Emit(Ok(edge))
                }
                Err(source) => self.fail(ParseError::IdSpace { line, source }),
            },
            LineKind::Malformed { found } => self.fail(ParseError::Malformed {
                line,
                found,
                content: text.as_ref().trim().to_string(),
            }),
        }
    }

    fn fail(&mut self, err: ParseError) -> Step {
        warn!(line = err.line(), error = %err, "edge-list session failed");
        self.status = Status::Failed { line: err.line() };
        Step::Emit(Err(err))
    }

    fn failed_at(&self) -> Option<u64> {
        match self.status {
            Status::Failed { line } => Some(line),
            _ => None,
        }
    }
}

/// Lazy, single-pass sequence of edges pulled from a blocking line source.
///
/// Yields at most one edge per pulled line. A fatal error (malformed line,
/// exhausted id range, or a failing source) is yielded exactly once; every
/// later call to `next` returns `None` without pulling more lines. Edges
/// already yielded stay valid, and [`failed_at`](Self::failed_at) keeps the
/// line number of the failure.
pub struct Edges<'a, I> {
    parser: &'a EdgeListParser,
    lines: I,
    cursor: Cursor,
}

impl<I> Edges<'_, I> {
    pub fn stats(&self) -> ParseStats {
        self.cursor.stats
    }

    /// Line number of the fatal error, if the session ended on one.
    pub fn failed_at(&self) -> Option<u64> {
        self.cursor.failed_at()
    }

    pub fn is_terminated(&self) -> bool {
        !self.cursor.is_running()
    }
}

impl<I, S, E> Iterator for Edges<'_, I>
where
    I: Iterator<Item = Result<S, E>>,
    S: AsRef<str>,
    E: Into<BoxError>,
{
    type Item = Result<Edge, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor.is_running() {
            let item = self.lines.next();
            match self.cursor.feed(self.parser, item) {
                Step::Emit(result) => return Some(result),
                Step::Skip => continue,
                Step::End => return None,
            }
        }
        None
    }
}

impl<I, S, E> FusedIterator for Edges<'_, I>
where
    I: Iterator<Item = Result<S, E>>,
    S: AsRef<str>,
    E: Into<BoxError>,
{
}

/// Async counterpart of [`Edges`]; suspends only while the line source does.
///
/// Same termination contract: the first fatal error is yielded once, then
/// the stream reports `None` and [`FusedStream::is_terminated`] turns true.
pub struct EdgeStream<'a, St> {
    parser: &'a EdgeListParser,
    lines: Pin<Box<St>>,
    cursor: Cursor,
}

impl<St> EdgeStream<'_, St> {
    pub fn stats(&self) -> ParseStats {
        self.cursor.stats
    }

    pub fn failed_at(&self) -> Option<u64> {
        self.cursor.failed_at()
    }
}

impl<St, S, E> Stream for EdgeStream<'_, St>
where
    St: Stream<Item = Result<S, E>>,
    S: AsRef<str>,
    E: Into<BoxError>,
{
    type Item = Result<Edge, ParseError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        while this.cursor.is_running() {
            let item = futures::ready!(this.lines.as_mut().poll_next(cx));
            match this.cursor.feed(this.parser, item) {
                Step::Emit(result) => return Poll::Ready(Some(result)),
                Step::Skip => continue,
                Step::End => return Poll::Ready(None),
            }
        }
        Poll::Ready(None)
    }
}

impl<St, S, E> FusedStream for EdgeStream<'_, St>
where
    St: Stream<Item = Result<S, E>>,
    S: AsRef<str>,
    E: Into<BoxError>,
{
    fn is_terminated(&self) -> bool {
        !self.cursor.is_running()
    }
}
