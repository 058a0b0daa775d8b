// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use annotext_engine::Span;

#[allow(dead_code)]
pub fn generate_document(paragraphs: usize) -> String {
    let base = "Ada Lovelace wrote the first program for Babbage's Analytical Engine in London.\nНекоторые строки содержат кириллицу, чтобы смещения считались по символам.\n\n";
    base.repeat(paragraphs)
}

/// Non-overlapping spans of `width` chars every `stride` chars, in reverse order.
#[allow(dead_code)]
pub fn generate_spans(text: &str, stride: usize, width: usize) -> Vec<Span> {
    let len = text.chars().count();
    let mut spans: Vec<Span> = (0..len)
        .step_by(stride)
        .filter(|start| start + width <= len)
        .map(|start| {
            Span::new(
                format!("span-{start}"),
                start as i64,
                (start + width) as i64,
                "Entity",
                "#45B7D1",
            )
        })
        .collect();
    spans.reverse();
    spans
}
