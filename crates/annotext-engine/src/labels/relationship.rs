use serde::{Deserialize, Serialize};

use crate::models::Label;

/// A directed, non-hierarchical link between two labels, e.g. "Person works at
/// Organisation". Independent of the parent/child tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRelationship {
    pub id: String,
    pub source_label_id: String,
    pub target_label_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LabelRelationship {
    pub fn new(
        id: impl Into<String>,
        source_label_id: impl Into<String>,
        target_label_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_label_id: source_label_id.into(),
            target_label_id: target_label_id.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether `label_id` is either end of this link.
    pub fn involves(&self, label_id: &str) -> bool {
        self.source_label_id == label_id || self.target_label_id == label_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelationshipError {
    #[error("source label not found: {0}")]
    SourceNotFound(String),
    #[error("target label not found: {0}")]
    TargetNotFound(String),
    #[error("label {0} cannot have a relationship with itself")]
    SelfLink(String),
    #[error("relationship from {source_id} to {target_id} already exists")]
    Duplicate { source_id: String, target_id: String },
    #[error("relationship with id '{0}' already exists")]
    DuplicateId(String),
    #[error("relationship not found: {0}")]
    NotFound(String),
}

/// Checks that `relationship` can be added alongside `existing`.
pub fn check_new_relationship(
    labels: &[Label],
    existing: &[LabelRelationship],
    relationship: &LabelRelationship,
) -> Result<(), RelationshipError> {
    let source = relationship.source_label_id.as_str();
    let target = relationship.target_label_id.as_str();

    if !labels.iter().any(|l| l.id == source) {
        return Err(RelationshipError::SourceNotFound(source.to_string()));
    }
    if !labels.iter().any(|l| l.id == target) {
        return Err(RelationshipError::TargetNotFound(target.to_string()));
    }
    if source == target {
        return Err(RelationshipError::SelfLink(source.to_string()));
    }
    if existing.iter().any(|r| r.id == relationship.id) {
        return Err(RelationshipError::DuplicateId(relationship.id.clone()));
    }
    if existing
        .iter()
        .any(|r| r.source_label_id == source && r.target_label_id == target)
    {
        return Err(RelationshipError::Duplicate {
            source_id: source.to_string(),
            target_id: target.to_string(),
        });
    }
    Ok(())
}

/// Links leaving `label_id`.
pub fn outgoing<'a>(
    relationships: &'a [LabelRelationship],
    label_id: &'a str,
) -> impl Iterator<Item = &'a LabelRelationship> + 'a {
    relationships
        .iter()
        .filter(move |r| r.source_label_id == label_id)
}

/// Links arriving at `label_id`.
pub fn incoming<'a>(
    relationships: &'a [LabelRelationship],
    label_id: &'a str,
) -> impl Iterator<Item = &'a LabelRelationship> + 'a {
    relationships
        .iter()
        .filter(move |r| r.target_label_id == label_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels() -> Vec<Label> {
        vec![
            Label::new("person", "Person", "#FF6B6B"),
            Label::new("org", "Organisation", "#4ECDC4"),
            Label::new("place", "Place", "#45B7D1"),
        ]
    }

    fn existing() -> Vec<LabelRelationship> {
        vec![LabelRelationship::new("r1", "person", "org").with_description("works at")]
    }

    #[test]
    fn accepts_new_link() {
        let link = LabelRelationship::new("r2", "org", "place");
        assert_eq!(check_new_relationship(&labels(), &existing(), &link), Ok(()));
    }

    #[test]
    fn reverse_direction_is_a_different_link() {
        let link = LabelRelationship::new("r2", "org", "person");
        assert_eq!(check_new_relationship(&labels(), &existing(), &link), Ok(()));
    }

    #[test]
    fn rejects_bad_links() {
        let labels = labels();
        let existing = existing();
        let check = |link: LabelRelationship| check_new_relationship(&labels, &existing, &link);

        assert_eq!(
            check(LabelRelationship::new("r2", "ghost", "org")),
            Err(RelationshipError::SourceNotFound("ghost".into()))
        );
        assert_eq!(
            check(LabelRelationship::new("r2", "org", "ghost")),
            Err(RelationshipError::TargetNotFound("ghost".into()))
        );
        assert_eq!(
            check(LabelRelationship::new("r2", "place", "place")),
            Err(RelationshipError::SelfLink("place".into()))
        );
        assert_eq!(
            check(LabelRelationship::new("r2", "person", "org")),
            Err(RelationshipError::Duplicate {
                source_id: "person".into(),
                target_id: "org".into(),
            })
        );
        assert_eq!(
            check(LabelRelationship::new("r1", "org", "place")),
            Err(RelationshipError::DuplicateId("r1".into()))
        );
    }

    #[test]
    fn directions_are_filtered() {
        let mut links = existing();
        links.push(LabelRelationship::new("r2", "place", "person"));

        let out: Vec<_> = outgoing(&links, "person").map(|r| r.id.as_str()).collect();
        let inc: Vec<_> = incoming(&links, "person").map(|r| r.id.as_str()).collect();
        assert_eq!(out, vec!["r1"]);
        assert_eq!(inc, vec!["r2"]);
        assert!(links[0].involves("org"));
        assert!(!links[0].involves("place"));
    }
}
