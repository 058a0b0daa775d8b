pub mod annotation;
pub mod document;
pub mod document_file;
pub mod label;

pub use annotation::{Annotation, CreateAnnotationRequest};
pub use document::{AnnotationSet, Document};
pub use document_file::DocumentFile;
pub use label::{Label, UpdateLabelRequest};
