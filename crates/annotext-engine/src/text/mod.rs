pub mod context;
pub mod offsets;
pub mod size;

pub use context::{Context, DEFAULT_CONTEXT_LENGTH, extract_context, is_valid_position};
pub use offsets::{CharOffsets, char_len};
pub use size::format_file_size;
