pub mod highlight;
pub mod io;
pub mod labels;
pub mod models;
pub mod render;
pub mod selection;
pub mod session;
pub mod stats;
pub mod text;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use highlight::{HighlightSpan, InvalidSpanError, InvalidSpanReason, Run, Span, highlight};
pub use io::*;
pub use models::*;
pub use selection::{
    Boundary, BoundingBox, LocatedSelection, NodeId, SelectionRange, SelectionSurface,
    TextNodeSurface, locate_selection,
};
pub use session::{AnnotationSession, SessionError};
