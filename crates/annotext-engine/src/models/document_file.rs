use relative_path::{RelativePath, RelativePathBuf};

/// A document on disk, addressed relative to the documents root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DocumentFile {
    relative_path: RelativePathBuf,
    display_name: String,
}

impl DocumentFile {
    pub fn new(relative_path: RelativePathBuf) -> Self {
        let display_name = Self::extract_display_name(&relative_path);
        Self {
            relative_path,
            display_name,
        }
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// File name without its extension
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Relative path of the TOML sidecar that holds this document's annotations
    pub fn sidecar_path(&self) -> RelativePathBuf {
        let stem = self.relative_path.file_stem().unwrap_or("untitled");
        self.relative_path
            .with_file_name(format!("{stem}.annotations.toml"))
    }

    fn extract_display_name(path: &RelativePath) -> String {
        path.file_stem().unwrap_or("Untitled").to_string()
    }
}

impl From<&str> for DocumentFile {
    fn from(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_strips_extension() {
        let file = DocumentFile::from("reports/q3 notes.txt");
        assert_eq!(file.display_name(), "q3 notes");
        assert_eq!(file.relative_path().as_str(), "reports/q3 notes.txt");
    }

    #[test]
    fn sidecar_sits_next_to_document() {
        let file = DocumentFile::from("reports/q3.txt");
        assert_eq!(file.sidecar_path().as_str(), "reports/q3.annotations.toml");
    }

    #[test]
    fn sidecar_at_root() {
        let file = DocumentFile::from("memo.txt");
        assert_eq!(file.sidecar_path().as_str(), "memo.annotations.toml");
    }
}
