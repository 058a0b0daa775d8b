use serde::{Deserialize, Serialize};

/// A label attached to a character range of a document.
///
/// Positions stay signed because they arrive from storage unchecked; the
/// highlighter is what rejects malformed ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: String,
    pub document_id: String,
    pub label_id: String,
    pub label_name: String,
    pub label_color: String,
    pub start_position: i64,
    pub end_position: i64,
    #[serde(default)]
    pub selected_text: String,
    #[serde(default)]
    pub context_before: String,
    #[serde(default)]
    pub context_after: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Everything needed to create an annotation; the id and captured text are
/// filled in when it is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnotationRequest {
    pub document_id: String,
    pub label_id: String,
    pub start_position: i64,
    pub end_position: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
