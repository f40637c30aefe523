//! Adapters that turn readers into line sources for [`EdgeListParser`](crate::EdgeListParser).
//!
//! A line source is anything that yields `Result<S, E>` one line at a time,
//! with `S: AsRef<str>` and `E` convertible into [`BoxError`](crate::BoxError).
//! Blocking sources are plain iterators (a `BufRead` goes straight through
//! [`EdgeListParser::parse_reader`](crate::EdgeListParser::parse_reader));
//! async sources are `futures` streams.

use std::convert::Infallible;
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec};

/// Infallible source over in-memory lines.
pub fn in_memory<I>(lines: I) -> impl Iterator<Item = Result<I::Item, Infallible>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    lines.into_iter().map(Ok::<_, Infallible>)
}

/// Line stream over an async reader. Lines may be arbitrarily long.
pub fn async_lines<R: AsyncRead>(reader: R) -> FramedRead<R, LinesCodec> {
    FramedRead::new(reader, LinesCodec::new())
}

/// Like [`async_lines`], but a line longer than `max_length` bytes fails the
/// stream instead of being buffered.
pub fn async_lines_with_max_length<R: AsyncRead>(
    reader: R,
    max_length: usize,
) -> FramedRead<R, LinesCodec> {
    FramedRead::new(reader, LinesCodec::new_with_max_length(max_length))
}
