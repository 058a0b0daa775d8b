use super::{Boundary, BoundingBox, NodeId, SelectionSurface};
use crate::highlight::Run;

/// Fixed-size glyph metrics used to approximate selection rectangles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 16.0,
        }
    }
}

/// An in-memory surface: text nodes laid out one after another, as a renderer
/// would emit them for a sequence of runs.
#[derive(Debug, Clone, Default)]
pub struct TextNodeSurface {
    nodes: Vec<String>,
    metrics: TextMetrics,
}

impl TextNodeSurface {
    pub fn new(nodes: Vec<String>) -> Self {
        Self {
            nodes,
            metrics: TextMetrics::default(),
        }
    }

    /// One node per run, in order.
    pub fn from_runs(runs: &[Run<'_>]) -> Self {
        Self::new(runs.iter().map(|run| run.text.to_string()).collect())
    }

    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Boundary for a char offset into the concatenated content.
    ///
    /// Offsets that fall between two nodes resolve to the end of the earlier one.
    pub fn boundary_at(&self, offset: usize) -> Option<Boundary> {
        let mut remaining = offset;
        for (index, node) in self.nodes.iter().enumerate() {
            let len = node.chars().count();
            if remaining <= len {
                return Some(Boundary::new(index, remaining));
            }
            remaining -= len;
        }
        None
    }

    fn node_len(&self, node: NodeId) -> usize {
        self.nodes
            .get(node.0)
            .map_or(0, |text| text.chars().count())
    }

    /// (line, column) of a content offset, both zero-based.
    fn position_of(&self, offset: usize) -> (usize, usize) {
        let mut line = 0;
        let mut column = 0;
        for ch in self.nodes.iter().flat_map(|n| n.chars()).take(offset) {
            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        (line, column)
    }
}

impl SelectionSurface for TextNodeSurface {
    fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    fn length_to(&self, boundary: Boundary) -> usize {
        let preceding: usize = self
            .nodes
            .iter()
            .take(boundary.node.0)
            .map(|n| n.chars().count())
            .sum();
        preceding + boundary.offset.min(self.node_len(boundary.node))
    }

    fn text_between(&self, start: Boundary, end: Boundary) -> String {
        let from = self.length_to(start);
        let to = self.length_to(end);
        self.nodes
            .iter()
            .flat_map(|n| n.chars())
            .skip(from)
            .take(to.saturating_sub(from))
            .collect()
    }

    fn bounding_box(&self, start: Boundary, end: Boundary) -> BoundingBox {
        let (start_line, start_col) = self.position_of(self.length_to(start));
        let (end_line, end_col) = self.position_of(self.length_to(end));
        let TextMetrics {
            char_width,
            line_height,
        } = self.metrics;

        let (x, columns) = if start_line == end_line {
            (start_col, end_col.saturating_sub(start_col))
        } else {
            // The first line starts at `start_col`; later lines start at 0.
            let widest = self
                .text_between(start, end)
                .split('\n')
                .enumerate()
                .map(|(i, line)| {
                    let len = line.chars().count();
                    if i == 0 { start_col + len } else { len }
                })
                .max()
                .unwrap_or(0);
            (0, widest)
        };

        BoundingBox {
            x: x as f32 * char_width,
            y: start_line as f32 * line_height,
            width: columns as f32 * char_width,
            height: (end_line - start_line + 1) as f32 * line_height,
        }
    }
}
