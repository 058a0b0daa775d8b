use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::Label;

/// A label with its children, as built by [`build_label_tree`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelNode<'a> {
    pub label: &'a Label,
    pub children: Vec<LabelNode<'a>>,
}

/// A label positioned in a pre-order walk of the tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlatLabel<'a> {
    pub label: &'a Label,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelTreeError {
    #[error("label not found: {0}")]
    LabelNotFound(String),
    #[error("parent label not found: {0}")]
    ParentNotFound(String),
    #[error("label {0} cannot be its own parent")]
    SelfParent(String),
    #[error("making {parent_id} the parent of {label_id} would create a cycle")]
    CircularReference { label_id: String, parent_id: String },
    #[error("label with name '{0}' already exists")]
    DuplicateName(String),
    #[error("label with id '{0}' already exists")]
    DuplicateId(String),
    #[error("label {0} still has child labels")]
    HasChildren(String),
}

/// Builds the label hierarchy from a flat list.
///
/// Roots are labels without a parent; children keep their input order.
/// Labels whose parent id is unknown are left out, and so are labels that
/// are only reachable through a cycle.
pub fn build_label_tree(labels: &[Label]) -> Vec<LabelNode<'_>> {
    let known: HashSet<&str> = labels.iter().map(|l| l.id.as_str()).collect();
    let mut children_of: HashMap<&str, Vec<&Label>> = HashMap::new();
    let mut roots = Vec::new();

    for label in labels {
        match label.parent_id.as_deref() {
            None => roots.push(label),
            Some(parent) if known.contains(parent) => {
                children_of.entry(parent).or_default().push(label)
            }
            Some(parent) => {
                log::warn!(
                    "label {} references unknown parent {parent}; left out of tree",
                    label.id
                );
            }
        }
    }

    let mut visited = HashSet::new();
    roots
        .into_iter()
        .filter_map(|root| build_node(root, &children_of, &mut visited))
        .collect()
}

fn build_node<'a>(
    label: &'a Label,
    children_of: &HashMap<&str, Vec<&'a Label>>,
    visited: &mut HashSet<&'a str>,
) -> Option<LabelNode<'a>> {
    // Duplicate ids could otherwise loop forever.
    if !visited.insert(label.id.as_str()) {
        return None;
    }

    let children = children_of
        .get(label.id.as_str())
        .map(|kids| {
            kids.iter()
                .copied()
                .filter_map(|child| build_node(child, children_of, visited))
                .collect()
        })
        .unwrap_or_default();

    Some(LabelNode { label, children })
}

/// Flattens a tree into pre-order with depths, roots at depth 0.
pub fn flatten_label_tree<'a>(roots: &[LabelNode<'a>]) -> Vec<FlatLabel<'a>> {
    fn walk<'a>(nodes: &[LabelNode<'a>], depth: usize, out: &mut Vec<FlatLabel<'a>>) {
        for node in nodes {
            out.push(FlatLabel {
                label: node.label,
                depth,
            });
            walk(&node.children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(roots, 0, &mut out);
    out
}

/// Checks that `label_id` may be moved under `new_parent_id`.
///
/// Moving to the root (`None`) is always allowed for an existing label.
pub fn check_reparent(
    labels: &[Label],
    label_id: &str,
    new_parent_id: Option<&str>,
) -> Result<(), LabelTreeError> {
    let by_id: HashMap<&str, &Label> = labels.iter().map(|l| (l.id.as_str(), l)).collect();

    if !by_id.contains_key(label_id) {
        return Err(LabelTreeError::LabelNotFound(label_id.to_string()));
    }
    let Some(parent_id) = new_parent_id else {
        return Ok(());
    };
    if parent_id == label_id {
        return Err(LabelTreeError::SelfParent(label_id.to_string()));
    }
    if !by_id.contains_key(parent_id) {
        return Err(LabelTreeError::ParentNotFound(parent_id.to_string()));
    }

    // Walk up from the new parent; meeting the label means it is an ancestor.
    let mut seen = HashSet::new();
    let mut current = by_id.get(parent_id).and_then(|l| l.parent_id.as_deref());
    while let Some(ancestor) = current {
        if ancestor == label_id {
            return Err(LabelTreeError::CircularReference {
                label_id: label_id.to_string(),
                parent_id: parent_id.to_string(),
            });
        }
        if !seen.insert(ancestor) {
            break;
        }
        current = by_id.get(ancestor).and_then(|l| l.parent_id.as_deref());
    }

    Ok(())
}

/// Checks that a new label can join `labels`: its id and name must be unused
/// and its parent, if any, must exist.
pub fn check_new_label(labels: &[Label], label: &Label) -> Result<(), LabelTreeError> {
    if labels.iter().any(|l| l.id == label.id) {
        return Err(LabelTreeError::DuplicateId(label.id.clone()));
    }
    if labels.iter().any(|l| l.name == label.name) {
        return Err(LabelTreeError::DuplicateName(label.name.clone()));
    }
    if let Some(parent_id) = label.parent_id.as_deref()
        && !labels.iter().any(|l| l.id == parent_id)
    {
        return Err(LabelTreeError::ParentNotFound(parent_id.to_string()));
    }
    Ok(())
}

/// Checks that `label_id` may be renamed to `name`. Keeping its own name is fine.
pub fn check_rename(labels: &[Label], label_id: &str, name: &str) -> Result<(), LabelTreeError> {
    if !labels.iter().any(|l| l.id == label_id) {
        return Err(LabelTreeError::LabelNotFound(label_id.to_string()));
    }
    if labels.iter().any(|l| l.name == name && l.id != label_id) {
        return Err(LabelTreeError::DuplicateName(name.to_string()));
    }
    Ok(())
}

/// Checks that `label_id` exists and has no child labels.
pub fn check_removable(labels: &[Label], label_id: &str) -> Result<(), LabelTreeError> {
    if !labels.iter().any(|l| l.id == label_id) {
        return Err(LabelTreeError::LabelNotFound(label_id.to_string()));
    }
    if labels
        .iter()
        .any(|l| l.parent_id.as_deref() == Some(label_id))
    {
        return Err(LabelTreeError::HasChildren(label_id.to_string()));
    }
    Ok(())
}

/// Labels whose name contains `term`, ignoring case, in input order.
pub fn search_labels<'a>(labels: &'a [Label], term: &str) -> Vec<&'a Label> {
    let term = term.to_lowercase();
    labels
        .iter()
        .filter(|l| l.name.to_lowercase().contains(&term))
        .collect()
}
