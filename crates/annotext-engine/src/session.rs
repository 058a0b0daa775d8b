//! Caller-owned state for annotating one document.
//!
//! Everything a front end would otherwise keep in ambient mutable fields (the
//! selected annotation, the pending text selection) lives here, next to the
//! document, its labels and its annotations. Rendering reads from it through
//! [`AnnotationSession::runs`].

use crate::highlight::{InvalidSpanError, Run, highlight};
use crate::labels::{self, LabelRelationship, LabelTreeError, RelationshipError};
use crate::models::{
    Annotation, AnnotationSet, CreateAnnotationRequest, Document, Label, UpdateLabelRequest,
};
use crate::selection::LocatedSelection;
use crate::text::{DEFAULT_CONTEXT_LENGTH, extract_context};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no text is selected")]
    NoSelection,
    #[error("label not found: {0}")]
    LabelNotFound(String),
    #[error("annotation not found: {0}")]
    AnnotationNotFound(String),
    #[error("annotation already exists: {0}")]
    DuplicateAnnotation(String),
    #[error("invalid annotation positions [{start}, {end})")]
    InvalidPosition { start: i64, end: i64 },
    #[error("request is for document {requested}, session holds {current}")]
    WrongDocument { requested: String, current: String },
    #[error("invalid label colour: {0}")]
    InvalidColor(String),
    #[error("label {label_id} is used by {count} annotations")]
    LabelInUse { label_id: String, count: usize },
    #[error(transparent)]
    LabelTree(#[from] LabelTreeError),
    #[error(transparent)]
    Relationship(#[from] RelationshipError),
}

#[derive(Debug, Clone)]
pub struct AnnotationSession {
    document: Document,
    labels: Vec<Label>,
    annotations: Vec<Annotation>,
    relationships: Vec<LabelRelationship>,
    selected: Option<String>,
    pending: Option<LocatedSelection>,
    context_length: usize,
}

impl AnnotationSession {
    pub fn new(document: Document, set: AnnotationSet) -> Self {
        Self {
            document,
            labels: set.labels,
            annotations: set.annotations,
            relationships: set.relationships,
            selected: None,
            pending: None,
            context_length: DEFAULT_CONTEXT_LENGTH,
        }
    }

    /// Chars of surrounding text captured on each side of new annotations
    pub fn with_context_length(mut self, context_length: usize) -> Self {
        self.context_length = context_length;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn relationships(&self) -> &[LabelRelationship] {
        &self.relationships
    }

    pub fn annotation(&self, id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn label(&self, id: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.id == id)
    }

    pub fn annotations_for_label<'a>(
        &'a self,
        label_id: &'a str,
    ) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.annotations.iter().filter(move |a| a.label_id == label_id)
    }

    /// Annotations whose selected text contains `term`, ignoring case.
    pub fn search_annotations(&self, term: &str) -> Vec<&Annotation> {
        let term = term.to_lowercase();
        self.annotations
            .iter()
            .filter(|a| a.selected_text.to_lowercase().contains(&term))
            .collect()
    }

    /// Annotations lying entirely inside `[start, end)`, ordered by start.
    pub fn annotations_in_range(&self, start: i64, end: i64) -> Vec<&Annotation> {
        let mut found: Vec<&Annotation> = self
            .annotations
            .iter()
            .filter(|a| a.start_position >= start && a.end_position <= end)
            .collect();
        found.sort_by_key(|a| a.start_position);
        found
    }

    /// Highlighted runs for the current document and annotations
    pub fn runs(&self) -> Result<Vec<Run<'_>>, InvalidSpanError> {
        highlight(&self.document.content, &self.annotations)
    }

    pub fn select_annotation(&mut self, id: &str) -> Result<(), SessionError> {
        if self.annotation(id).is_none() {
            return Err(SessionError::AnnotationNotFound(id.to_string()));
        }
        self.selected = Some(id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_annotation(&self) -> Option<&Annotation> {
        self.selected.as_deref().and_then(|id| self.annotation(id))
    }

    /// Cycles the selected annotation in document order; wraps around.
    pub fn select_next(&mut self, forward: bool) -> Option<&Annotation> {
        let mut order: Vec<&Annotation> = self.annotations.iter().collect();
        order.sort_by_key(|a| a.start_position);
        if order.is_empty() {
            return None;
        }

        let current = self
            .selected
            .as_deref()
            .and_then(|id| order.iter().position(|a| a.id == id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => order.len() - 1,
            (Some(i), true) => (i + 1) % order.len(),
            (Some(i), false) => (i + order.len() - 1) % order.len(),
        };
        let id = order[next].id.clone();
        self.selected = Some(id);
        self.selected_annotation()
    }

    pub fn set_pending_selection(&mut self, selection: Option<LocatedSelection>) {
        self.pending = selection;
    }

    pub fn pending_selection(&self) -> Option<&LocatedSelection> {
        self.pending.as_ref()
    }

    /// Turns the pending selection into a create request for `label_id`.
    pub fn draft_annotation(
        &self,
        label_id: &str,
        comment: Option<String>,
    ) -> Result<CreateAnnotationRequest, SessionError> {
        let selection = self.pending.as_ref().ok_or(SessionError::NoSelection)?;
        if self.label(label_id).is_none() {
            return Err(SessionError::LabelNotFound(label_id.to_string()));
        }

        Ok(CreateAnnotationRequest {
            document_id: self.document.id.clone(),
            label_id: label_id.to_string(),
            start_position: offset_to_position(selection.start_offset),
            end_position: offset_to_position(selection.end_offset),
            comment: comment.filter(|c| !c.trim().is_empty()),
        })
    }

    /// Creates an annotation from `request`, capturing the selected text and
    /// its context from the document. Clears the pending selection.
    pub fn apply_annotation(
        &mut self,
        id: impl Into<String>,
        request: CreateAnnotationRequest,
    ) -> Result<&Annotation, SessionError> {
        let id = id.into();
        if self.annotation(&id).is_some() {
            return Err(SessionError::DuplicateAnnotation(id));
        }
        let annotation = self.build_annotation(id, request)?;

        log::debug!(
            "annotation {} added at [{}, {})",
            annotation.id,
            annotation.start_position,
            annotation.end_position
        );
        self.pending = None;
        self.annotations.push(annotation);
        Ok(&self.annotations[self.annotations.len() - 1])
    }

    /// Replaces label, range and comment of an existing annotation.
    pub fn update_annotation(
        &mut self,
        id: &str,
        request: CreateAnnotationRequest,
    ) -> Result<&Annotation, SessionError> {
        let index = self
            .annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| SessionError::AnnotationNotFound(id.to_string()))?;
        let updated = self.build_annotation(id.to_string(), request)?;

        log::debug!("annotation {id} updated");
        self.annotations[index] = updated;
        Ok(&self.annotations[index])
    }

    pub fn remove_annotation(&mut self, id: &str) -> Result<Annotation, SessionError> {
        let index = self
            .annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| SessionError::AnnotationNotFound(id.to_string()))?;

        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        log::debug!("annotation {id} removed");
        Ok(self.annotations.remove(index))
    }

    pub fn add_label(&mut self, label: Label) -> Result<(), SessionError> {
        if !labels::is_valid_hex_color(&label.color) {
            return Err(SessionError::InvalidColor(label.color));
        }
        labels::check_new_label(&self.labels, &label)?;

        log::debug!("label {} added", label.id);
        self.labels.push(label);
        Ok(())
    }

    /// Moves a label under `parent_id`, or to the root with `None`.
    pub fn move_label(&mut self, label_id: &str, parent_id: Option<&str>) -> Result<(), SessionError> {
        labels::check_reparent(&self.labels, label_id, parent_id)?;
        if let Some(label) = self.labels.iter_mut().find(|l| l.id == label_id) {
            label.parent_id = parent_id.map(str::to_string);
        }
        Ok(())
    }

    /// Renames, recolours, redescribes or reparents a label. Annotations
    /// using it pick up the new name and colour.
    pub fn update_label(
        &mut self,
        label_id: &str,
        request: UpdateLabelRequest,
    ) -> Result<&Label, SessionError> {
        if !labels::is_valid_hex_color(&request.color) {
            return Err(SessionError::InvalidColor(request.color));
        }
        labels::check_rename(&self.labels, label_id, &request.name)?;
        labels::check_reparent(&self.labels, label_id, request.parent_id.as_deref())?;

        for annotation in self.annotations.iter_mut().filter(|a| a.label_id == label_id) {
            annotation.label_name.clone_from(&request.name);
            annotation.label_color.clone_from(&request.color);
        }

        let index = self
            .labels
            .iter()
            .position(|l| l.id == label_id)
            .ok_or_else(|| SessionError::LabelNotFound(label_id.to_string()))?;
        let label = &mut self.labels[index];
        label.name = request.name;
        label.color = request.color;
        label.description = request.description;
        label.parent_id = request.parent_id;

        log::debug!("label {label_id} updated");
        Ok(&self.labels[index])
    }

    /// Removes a label that has neither annotations nor child labels, along
    /// with any relationships it takes part in.
    pub fn remove_label(&mut self, label_id: &str) -> Result<Label, SessionError> {
        labels::check_removable(&self.labels, label_id)?;
        let count = self.annotations_for_label(label_id).count();
        if count > 0 {
            return Err(SessionError::LabelInUse {
                label_id: label_id.to_string(),
                count,
            });
        }

        let before = self.relationships.len();
        self.relationships.retain(|r| !r.involves(label_id));
        let index = self
            .labels
            .iter()
            .position(|l| l.id == label_id)
            .ok_or_else(|| SessionError::LabelNotFound(label_id.to_string()))?;

        log::debug!(
            "label {label_id} removed with {} relationships",
            before - self.relationships.len()
        );
        Ok(self.labels.remove(index))
    }

    pub fn add_relationship(
        &mut self,
        relationship: LabelRelationship,
    ) -> Result<&LabelRelationship, SessionError> {
        labels::check_new_relationship(&self.labels, &self.relationships, &relationship)?;

        log::debug!(
            "relationship {} added: {} -> {}",
            relationship.id,
            relationship.source_label_id,
            relationship.target_label_id
        );
        self.relationships.push(relationship);
        Ok(&self.relationships[self.relationships.len() - 1])
    }

    /// Only the description of a relationship can change; its ends are fixed.
    pub fn update_relationship(
        &mut self,
        id: &str,
        description: Option<String>,
    ) -> Result<&LabelRelationship, SessionError> {
        let relationship = self
            .relationships
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RelationshipError::NotFound(id.to_string()))?;
        relationship.description = description;
        Ok(relationship)
    }

    pub fn remove_relationship(&mut self, id: &str) -> Result<LabelRelationship, SessionError> {
        let index = self
            .relationships
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| RelationshipError::NotFound(id.to_string()))?;
        Ok(self.relationships.remove(index))
    }

    /// Relationships with `label_id` at either end.
    pub fn relationships_for_label<'a>(
        &'a self,
        label_id: &'a str,
    ) -> impl Iterator<Item = &'a LabelRelationship> + 'a {
        self.relationships.iter().filter(move |r| r.involves(label_id))
    }

    /// Snapshot of labels, annotations and relationships for persisting.
    pub fn annotation_set(&self) -> AnnotationSet {
        AnnotationSet {
            labels: self.labels.clone(),
            annotations: self.annotations.clone(),
            relationships: self.relationships.clone(),
        }
    }

    fn build_annotation(
        &self,
        id: String,
        request: CreateAnnotationRequest,
    ) -> Result<Annotation, SessionError> {
        if request.document_id != self.document.id {
            return Err(SessionError::WrongDocument {
                requested: request.document_id,
                current: self.document.id.clone(),
            });
        }
        let label = self
            .label(&request.label_id)
            .ok_or_else(|| SessionError::LabelNotFound(request.label_id.clone()))?;

        let invalid = || SessionError::InvalidPosition {
            start: request.start_position,
            end: request.end_position,
        };
        let start = usize::try_from(request.start_position).map_err(|_| invalid())?;
        let end = usize::try_from(request.end_position).map_err(|_| invalid())?;
        if start >= end {
            return Err(invalid());
        }
        let context = extract_context(&self.document.content, start, end, self.context_length)
            .ok_or_else(invalid)?;

        Ok(Annotation {
            id,
            document_id: self.document.id.clone(),
            label_id: label.id.clone(),
            label_name: label.name.clone(),
            label_color: label.color.clone(),
            start_position: request.start_position,
            end_position: request.end_position,
            selected_text: context.selected.to_string(),
            context_before: context.before.to_string(),
            context_after: context.after.to_string(),
            comment: request.comment,
        })
    }
}

fn offset_to_position(offset: usize) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}
