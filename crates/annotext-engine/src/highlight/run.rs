use serde::Serialize;

/// A contiguous piece of highlighter output, either plain or annotated.
///
/// Runs borrow from the highlighted text and spans, so producing them never
/// copies document content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Run<'a> {
    pub text: &'a str,
    /// Id of the owning span; `None` for plain text.
    pub span_id: Option<&'a str>,
    /// Display colour of the owning span's label.
    pub color: Option<&'a str>,
}

impl<'a> Run<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self {
            text,
            span_id: None,
            color: None,
        }
    }

    pub fn annotated(text: &'a str, span_id: &'a str, color: &'a str) -> Self {
        Self {
            text,
            span_id: Some(span_id),
            color: Some(color),
        }
    }

    pub fn is_annotated(&self) -> bool {
        self.span_id.is_some()
    }
}

/// Concatenates the text of `runs` in order.
///
/// Equals the source text only when no spans overlapped.
pub fn concat_runs(runs: &[Run<'_>]) -> String {
    runs.iter().map(|run| run.text).collect()
}
