/// Outcome of classifying one raw input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Comment,
    /// Exactly two whitespace-separated tokens, in (source, target) order.
    Edge { source: &'a str, target: &'a str },
    /// Any other token count. `found` is the number of tokens on the line.
    Malformed { found: usize },
}

/// Classify `line` against a fixed set of comment markers.
///
/// The line is trimmed first; a comment marker only counts as the first
/// character of the trimmed text. Tokens are separated by runs of any
/// Unicode whitespace.
pub fn classify<'a>(line: &'a str, comment_markers: &[char]) -> LineKind<'a> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    if trimmed.starts_with(comment_markers) {
        return LineKind::Comment;
    }

    let mut tokens = trimmed.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(source), Some(target), None) => LineKind::Edge { source, target },
        (Some(_), None, _) => LineKind::Malformed { found: 1 },
        (Some(_), Some(_), Some(_)) => LineKind::Malformed {
            found: 3 + tokens.count(),
        },
        // trimmed is non-empty, so there is always a first token
        (None, _, _) => LineKind::Malformed { found: 0 },
    }
}
