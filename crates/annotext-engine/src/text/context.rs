use super::offsets::CharOffsets;

/// Characters kept on each side of an annotation when capturing its context.
pub const DEFAULT_CONTEXT_LENGTH: usize = 50;

/// The selected text of an annotation together with its surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context<'a> {
    pub before: &'a str,
    pub selected: &'a str,
    pub after: &'a str,
}

/// Whether `[start, end)` is a usable position range over `text`.
///
/// Empty ranges are accepted here; the highlighter is stricter.
pub fn is_valid_position(text: &str, start: i64, end: i64) -> bool {
    let Ok(len) = i64::try_from(text.chars().count()) else {
        return false;
    };
    start >= 0 && end >= start && end <= len
}

/// Extracts the selected text plus up to `context_length` chars on each side.
///
/// Returns `None` when the range is reversed or runs past the text.
pub fn extract_context(
    text: &str,
    start: usize,
    end: usize,
    context_length: usize,
) -> Option<Context<'_>> {
    let offsets = CharOffsets::new(text);
    let selected = offsets.slice(start, end)?;
    let before = offsets.slice(start.saturating_sub(context_length), start)?;
    let after_end = end.saturating_add(context_length).min(offsets.char_len());
    let after = offsets.slice(end, after_end)?;

    Some(Context {
        before,
        selected,
        after,
    })
}
