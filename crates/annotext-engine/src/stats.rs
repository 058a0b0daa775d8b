use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Annotation, Label};

/// Positions within this many chars of each other count as close when
/// measuring how concentrated a label is in a document.
pub const DEFAULT_PROXIMITY: i64 = 100;

/// The annotations of one document, for statistics across a corpus
#[derive(Debug, Clone, Copy)]
pub struct DocumentAnnotations<'a> {
    pub document_id: &'a str,
    pub annotations: &'a [Annotation],
}

/// How densely one label clusters in a document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelConcentration<'a> {
    pub document_id: &'a str,
    /// Ordered pairs of the label's annotations where one starts within
    /// `proximity` chars of where the other ends, a pair with itself included.
    pub concentration: usize,
}

/// How many annotations use a label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelUsage<'a> {
    pub label: &'a Label,
    pub count: usize,
}

/// Usage of every label, most used first; ties are ordered by name.
pub fn label_usage<'a>(labels: &'a [Label], annotations: &[Annotation]) -> Vec<LabelUsage<'a>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for annotation in annotations {
        *counts.entry(annotation.label_id.as_str()).or_default() += 1;
    }

    let mut usage: Vec<LabelUsage<'a>> = labels
        .iter()
        .map(|label| LabelUsage {
            label,
            count: counts.get(label.id.as_str()).copied().unwrap_or(0),
        })
        .collect();
    usage.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.label.name.cmp(&b.label.name))
    });
    usage
}

/// The `limit` most used labels that have at least one annotation.
pub fn most_used_labels<'a>(
    labels: &'a [Label],
    annotations: &[Annotation],
    limit: usize,
) -> Vec<LabelUsage<'a>> {
    label_usage(labels, annotations)
        .into_iter()
        .filter(|u| u.count > 0)
        .take(limit)
        .collect()
}

/// Labels no annotation refers to, in input order.
pub fn unused_labels<'a>(labels: &'a [Label], annotations: &[Annotation]) -> Vec<&'a Label> {
    labels
        .iter()
        .filter(|label| !annotations.iter().any(|a| a.label_id == label.id))
        .collect()
}

/// Documents where `label_id` is most concentrated, highest first; ties are
/// ordered by document id. Documents without the label are left out.
pub fn label_concentration<'a>(
    documents: &[DocumentAnnotations<'a>],
    label_id: &str,
    proximity: i64,
    limit: usize,
) -> Vec<LabelConcentration<'a>> {
    let mut found: Vec<LabelConcentration<'a>> = documents
        .iter()
        .filter_map(|doc| {
            let tagged: Vec<&Annotation> = doc
                .annotations
                .iter()
                .filter(|a| a.label_id == label_id)
                .collect();
            let concentration = tagged
                .iter()
                .flat_map(|a| tagged.iter().map(move |b| (a, b)))
                .filter(|(a, b)| (a.start_position - b.end_position).abs() <= proximity)
                .count();
            (concentration > 0).then_some(LabelConcentration {
                document_id: doc.document_id,
                concentration,
            })
        })
        .collect();

    found.sort_by(|a, b| {
        b.concentration
            .cmp(&a.concentration)
            .then_with(|| a.document_id.cmp(b.document_id))
    });
    found.truncate(limit);
    found
}

/// Ids of documents that have no annotations, in input order.
pub fn documents_without_annotations<'a>(documents: &[DocumentAnnotations<'a>]) -> Vec<&'a str> {
    documents
        .iter()
        .filter(|doc| doc.annotations.is_empty())
        .map(|doc| doc.document_id)
        .collect()
}
