//! Maps an on-screen selection to char offsets in the document's text.
//!
//! The rendering layer owns the live view, so it is reached through the
//! [`SelectionSurface`] trait. The start offset is the length of a synthetic
//! range running from the start of the surface's content to the selection's
//! start boundary; the end offset adds the selected text's length.

pub mod surface;

use serde::Serialize;

pub use surface::{TextMetrics, TextNodeSurface};

/// Identifies a text node within a rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// A point in the rendered view: a node plus a char offset inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Boundary {
    pub node: NodeId,
    pub offset: usize,
}

impl Boundary {
    pub fn new(node: usize, offset: usize) -> Self {
        Self {
            node: NodeId(node),
            offset,
        }
    }
}

/// A user selection. The anchor is where it began, the focus where it ended,
/// so the focus may precede the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionRange {
    pub anchor: Boundary,
    pub focus: Boundary,
}

impl SelectionRange {
    pub fn new(anchor: Boundary, focus: Boundary) -> Self {
        Self { anchor, focus }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// Screen rectangle covering a selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A rendered view that selections can be made in.
pub trait SelectionSurface {
    /// Whether `node` belongs to this surface's content.
    fn contains(&self, node: NodeId) -> bool;

    /// Char length of the range from the start of the content to `boundary`.
    fn length_to(&self, boundary: Boundary) -> usize;

    /// Text between two boundaries, `start` preceding `end`.
    fn text_between(&self, start: Boundary, end: Boundary) -> String;

    fn bounding_box(&self, start: Boundary, end: Boundary) -> BoundingBox;
}

/// A selection resolved to document offsets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedSelection {
    pub selected_text: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub bounding_box: BoundingBox,
}

/// Resolves `selection` against `surface`.
///
/// Returns `None` when there is no selection, when it is collapsed, or when
/// either end lies outside the surface.
pub fn locate_selection<S: SelectionSurface + ?Sized>(
    surface: &S,
    selection: Option<&SelectionRange>,
) -> Option<LocatedSelection> {
    let selection = selection?;
    if selection.is_collapsed() {
        return None;
    }
    if !surface.contains(selection.anchor.node) || !surface.contains(selection.focus.node) {
        return None;
    }

    let anchor_len = surface.length_to(selection.anchor);
    let focus_len = surface.length_to(selection.focus);
    let (start, end, start_offset) = if anchor_len <= focus_len {
        (selection.anchor, selection.focus, anchor_len)
    } else {
        (selection.focus, selection.anchor, focus_len)
    };

    let selected_text = surface.text_between(start, end);
    // End of one node and start of the next are distinct boundaries that
    // enclose nothing.
    if selected_text.is_empty() {
        return None;
    }

    let end_offset = start_offset + selected_text.chars().count();
    Some(LocatedSelection {
        bounding_box: surface.bounding_box(start, end),
        selected_text,
        start_offset,
        end_offset,
    })
}
