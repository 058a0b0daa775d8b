//! Partitions a document's text into plain and annotated runs.
//!
//! Spans are sorted by start position (stable, so equal starts keep their
//! input order) and walked with a cursor. Plain text is clipped against the
//! cursor so it is never emitted twice; annotated text is always sliced from
//! the span's own bounds. Overlapping spans are therefore neither merged nor
//! rejected: each one still produces its own annotated run, and only in the
//! non-overlapping case does concatenating the runs reproduce the text.

pub mod run;
pub mod span;

use std::fmt;

use crate::text::CharOffsets;

pub use run::{Run, concat_runs};
pub use span::{HighlightSpan, Span};

/// Why a span was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidSpanReason {
    NegativeStart,
    /// `start >= end`
    EmptyOrReversed,
    EndPastText,
}

impl fmt::Display for InvalidSpanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            InvalidSpanReason::NegativeStart => "starts before the text",
            InvalidSpanReason::EmptyOrReversed => "is empty or reversed",
            InvalidSpanReason::EndPastText => "ends past the text",
        };
        f.write_str(msg)
    }
}

/// A span whose offsets do not fit the text being highlighted.
///
/// The whole highlight call fails; what to do with the span (drop it, clamp
/// it, report it) is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("span {span_id} [{start}, {end}) {reason} (text has {text_len} chars)")]
pub struct InvalidSpanError {
    pub span_id: String,
    pub start: i64,
    pub end: i64,
    pub text_len: usize,
    pub reason: InvalidSpanReason,
}

/// Splits `text` into runs according to `spans`.
///
/// With no spans the result is a single plain run holding the whole text,
/// even when the text is empty. Every span is validated before any run is
/// produced, so a malformed span yields an error and no partial output.
pub fn highlight<'a, S: HighlightSpan>(
    text: &'a str,
    spans: &'a [S],
) -> Result<Vec<Run<'a>>, InvalidSpanError> {
    if spans.is_empty() {
        return Ok(vec![Run::plain(text)]);
    }

    let offsets = CharOffsets::new(text);
    let mut bounded = spans
        .iter()
        .map(|span| byte_bounds(span, &offsets).map(|(start, end)| (start, end, span)))
        .collect::<Result<Vec<_>, _>>()?;

    // Byte order matches char order, so sorting on bytes is equivalent.
    bounded.sort_by_key(|&(start, _, _)| start);

    let mut runs = Vec::with_capacity(bounded.len() * 2 + 1);
    let mut cursor = 0;

    for (start, end, span) in bounded {
        if start > cursor {
            runs.push(Run::plain(&text[cursor..start]));
        }
        runs.push(Run::annotated(
            &text[start..end],
            span.span_id(),
            span.color(),
        ));
        cursor = cursor.max(end);
    }

    if cursor < text.len() {
        runs.push(Run::plain(&text[cursor..]));
    }

    Ok(runs)
}

/// Checks a span against the text and converts its char offsets to bytes.
fn byte_bounds<S: HighlightSpan>(
    span: &S,
    offsets: &CharOffsets<'_>,
) -> Result<(usize, usize), InvalidSpanError> {
    let start = span.start_position();
    let end = span.end_position();
    let text_len = offsets.char_len();

    let reject = |reason| InvalidSpanError {
        span_id: span.span_id().to_string(),
        start,
        end,
        text_len,
        reason,
    };

    let Ok(start_char) = usize::try_from(start) else {
        return Err(reject(InvalidSpanReason::NegativeStart));
    };
    if start >= end {
        return Err(reject(InvalidSpanReason::EmptyOrReversed));
    }
    let end_char = usize::try_from(end).map_err(|_| reject(InvalidSpanReason::EndPastText))?;

    match (offsets.byte_offset(start_char), offsets.byte_offset(end_char)) {
        (Some(start_byte), Some(end_byte)) => Ok((start_byte, end_byte)),
        _ => Err(reject(InvalidSpanReason::EndPastText)),
    }
}
