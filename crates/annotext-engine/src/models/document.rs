use serde::{Deserialize, Serialize};

use super::{Annotation, Label};
use crate::labels::LabelRelationship;

/// A text document loaded for annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub content: String,
}

impl Document {
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: content.into(),
        }
    }
}

/// The labels and annotations stored alongside one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSet {
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<LabelRelationship>,
}

impl AnnotationSet {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.annotations.is_empty() && self.relationships.is_empty()
    }
}
