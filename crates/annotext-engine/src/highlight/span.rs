use serde::{Deserialize, Serialize};

use crate::models::Annotation;

/// A labeled, half-open `[start_position, end_position)` char range over a
/// document's text.
///
/// Positions are signed so malformed data from storage can be represented and
/// rejected by [`highlight`](super::highlight) rather than failing earlier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub id: String,
    pub start_position: i64,
    pub end_position: i64,
    pub label_color: String,
    pub label_name: String,
}

impl Span {
    pub fn new(
        id: impl Into<String>,
        start_position: i64,
        end_position: i64,
        label_name: impl Into<String>,
        label_color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start_position,
            end_position,
            label_color: label_color.into(),
            label_name: label_name.into(),
        }
    }
}

impl From<&Annotation> for Span {
    fn from(annotation: &Annotation) -> Self {
        Self {
            id: annotation.id.clone(),
            start_position: annotation.start_position,
            end_position: annotation.end_position,
            label_color: annotation.label_color.clone(),
            label_name: annotation.label_name.clone(),
        }
    }
}

/// Anything the highlighter can treat as a span.
///
/// Lets callers highlight their own records (annotations straight from
/// storage, for instance) without copying them into [`Span`]s first.
pub trait HighlightSpan {
    fn span_id(&self) -> &str;
    fn start_position(&self) -> i64;
    fn end_position(&self) -> i64;
    fn color(&self) -> &str;
}

impl HighlightSpan for Span {
    fn span_id(&self) -> &str {
        &self.id
    }

    fn start_position(&self) -> i64 {
        self.start_position
    }

    fn end_position(&self) -> i64 {
        self.end_position
    }

    fn color(&self) -> &str {
        &self.label_color
    }
}

impl HighlightSpan for Annotation {
    fn span_id(&self) -> &str {
        &self.id
    }

    fn start_position(&self) -> i64 {
        self.start_position
    }

    fn end_position(&self) -> i64 {
        self.end_position
    }

    fn color(&self) -> &str {
        &self.label_color
    }
}
