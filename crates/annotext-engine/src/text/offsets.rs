/// Maps character offsets to byte offsets within a string.
///
/// Annotation offsets count Unicode scalar values, while Rust slices by byte.
/// The table is built once per text so every lookup afterwards is O(1).
#[derive(Debug, Clone)]
pub struct CharOffsets<'a> {
    text: &'a str,
    /// Byte offset of each char, plus a trailing entry for `text.len()`.
    bytes: Vec<usize>,
}

impl<'a> CharOffsets<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut bytes: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        bytes.push(text.len());
        Self { text, bytes }
    }

    /// Number of chars in the text.
    pub fn char_len(&self) -> usize {
        self.bytes.len() - 1
    }

    /// Byte offset for a char offset. `char_len()` maps to `text.len()`.
    pub fn byte_offset(&self, char_offset: usize) -> Option<usize> {
        self.bytes.get(char_offset).copied()
    }

    /// Slices `[start, end)` in char offsets. `None` when reversed or out of range.
    pub fn slice(&self, start: usize, end: usize) -> Option<&'a str> {
        if start > end {
            return None;
        }
        let start = self.byte_offset(start)?;
        let end = self.byte_offset(end)?;
        Some(&self.text[start..end])
    }
}

/// Length of `text` in chars.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_offsets_match_bytes() {
        let offsets = CharOffsets::new("hello");
        assert_eq!(offsets.char_len(), 5);
        assert_eq!(offsets.byte_offset(0), Some(0));
        assert_eq!(offsets.byte_offset(5), Some(5));
        assert_eq!(offsets.byte_offset(6), None);
    }

    #[test]
    fn multibyte_chars_count_once() {
        let offsets = CharOffsets::new("Документ");
        assert_eq!(offsets.char_len(), 8);
        assert_eq!(offsets.byte_offset(1), Some(2));
        assert_eq!(offsets.slice(0, 3), Some("Док"));
    }

    #[test]
    fn slice_rejects_reversed_and_out_of_range() {
        let offsets = CharOffsets::new("abc");
        assert_eq!(offsets.slice(2, 1), None);
        assert_eq!(offsets.slice(1, 4), None);
        assert_eq!(offsets.slice(3, 3), Some(""));
    }

    #[test]
    fn empty_text_has_one_boundary() {
        let offsets = CharOffsets::new("");
        assert_eq!(offsets.char_len(), 0);
        assert_eq!(offsets.slice(0, 0), Some(""));
    }
}
