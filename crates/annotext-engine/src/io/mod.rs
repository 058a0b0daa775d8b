use crate::models::{AnnotationSet, Document, DocumentFile};
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid documents directory: {0}")]
    InvalidDocumentsDir(String),
    #[error("Invalid document pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("Failed to parse annotations at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize annotations: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Find documents under `documents_root` matching a glob `pattern` relative to it
pub fn scan_documents(documents_root: &Path, pattern: &str) -> Result<Vec<DocumentFile>, IoError> {
    validate_documents_dir(documents_root)?;

    // The root is literal; only `pattern` may contain glob syntax.
    let root = glob::Pattern::escape(&documents_root.to_string_lossy());
    let full_pattern = Path::new(&root).join(pattern);
    let full_pattern = full_pattern.to_string_lossy();
    let paths = glob::glob(&full_pattern).map_err(|source| IoError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                log::warn!("Skipping unreadable path: {e}");
                continue;
            }
        };
        if !path.is_file() || is_sidecar(&path) {
            continue;
        }
        match RelativePathBuf::from_path(path.strip_prefix(documents_root).unwrap_or(&path)) {
            Ok(relative) => files.push(DocumentFile::new(relative)),
            Err(e) => log::warn!("Skipping {}: {e}", path.display()),
        }
    }

    files.sort();
    log::debug!(
        "Found {} documents in {}",
        files.len(),
        documents_root.display()
    );
    Ok(files)
}

/// Read a document's text; its id is the relative path
pub fn read_document(relative_path: &RelativePath, documents_root: &Path) -> Result<Document, IoError> {
    let absolute_path = relative_path.to_path(documents_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    let content = fs::read_to_string(&absolute_path)?;
    let file = DocumentFile::new(relative_path.to_relative_path_buf());

    Ok(Document::new(
        relative_path.as_str(),
        file.display_name(),
        content,
    ))
}

/// Load the labels and annotations stored next to a document.
///
/// A document without a sidecar simply has no annotations yet.
pub fn load_annotation_set(
    file: &DocumentFile,
    documents_root: &Path,
) -> Result<AnnotationSet, IoError> {
    let path = file.sidecar_path().to_path(documents_root);
    if !path.exists() {
        return Ok(AnnotationSet::default());
    }

    let content = fs::read_to_string(&path)?;
    let set: AnnotationSet =
        toml::from_str(&content).map_err(|source| IoError::Parse { path, source })?;
    Ok(set)
}

/// Write the labels and annotations for a document to its sidecar
pub fn save_annotation_set(
    file: &DocumentFile,
    documents_root: &Path,
    set: &AnnotationSet,
) -> Result<(), IoError> {
    let path = file.sidecar_path().to_path(documents_root);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(set)?;
    fs::write(&path, content)?;
    log::debug!("Saved {} annotations to {}", set.annotations.len(), path.display());
    Ok(())
}

pub fn validate_documents_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidDocumentsDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}

fn is_sidecar(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".annotations.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::LabelRelationship;
    use crate::models::{Annotation, Label};
    use crate::tests::{create_test_documents_dir, create_test_file};
    use pretty_assertions::assert_eq;

    fn sample_set() -> AnnotationSet {
        AnnotationSet {
            labels: vec![
                Label::new("person", "Person", "#FF6B6B"),
                Label::new("hero", "Hero", "#FECA57").with_parent("person"),
            ],
            annotations: vec![Annotation {
                id: "a1".into(),
                document_id: "story.txt".into(),
                label_id: "hero".into(),
                label_name: "Hero".into(),
                label_color: "#FECA57".into(),
                start_position: 0,
                end_position: 5,
                selected_text: "Alice".into(),
                context_before: String::new(),
                context_after: " went".into(),
                comment: Some("protagonist".into()),
            }],
            relationships: vec![
                LabelRelationship::new("r1", "hero", "person").with_description("is a"),
            ],
        }
    }

    #[test]
    fn test_scan_finds_documents_and_skips_sidecars() {
        // Given a documents directory with text files and a sidecar
        let docs_dir = create_test_documents_dir();
        create_test_file(&docs_dir, "a.txt", "first");
        create_test_file(&docs_dir, "nested/b.txt", "second");
        create_test_file(&docs_dir, "a.annotations.toml", "");
        create_test_file(&docs_dir, "notes.md", "ignored");

        // When scanning for documents
        let files = scan_documents(docs_dir.path(), "**/*.txt").unwrap();

        // Then only the text documents are returned, sorted
        let paths: Vec<_> = files.iter().map(|f| f.relative_path().as_str()).collect();
        assert_eq!(paths, vec!["a.txt", "nested/b.txt"]);
    }

    #[test]
    fn test_scan_root_with_glob_metacharacters() {
        let docs_dir = create_test_documents_dir();
        create_test_file(&docs_dir, "docs[1]/a.txt", "first");
        create_test_file(&docs_dir, "docs[1]/more*/b.txt", "second");
        let root = docs_dir.path().join("docs[1]");

        let files = scan_documents(&root, "**/*.txt").unwrap();

        let paths: Vec<_> = files.iter().map(|f| f.relative_path().as_str()).collect();
        assert_eq!(paths, vec!["a.txt", "more*/b.txt"]);
    }

    #[test]
    fn test_scan_invalid_directory() {
        let result = scan_documents(Path::new("/this/path/does/not/exist"), "*.txt");
        assert!(matches!(result, Err(IoError::InvalidDocumentsDir(_))));
    }

    #[test]
    fn test_scan_invalid_pattern() {
        let docs_dir = create_test_documents_dir();
        let result = scan_documents(docs_dir.path(), "[");
        assert!(matches!(result, Err(IoError::Pattern { .. })));
    }

    #[test]
    fn test_read_document() {
        let docs_dir = create_test_documents_dir();
        create_test_file(&docs_dir, "story.txt", "Alice went home.");

        let doc = read_document(RelativePath::new("story.txt"), docs_dir.path()).unwrap();
        assert_eq!(doc.id, "story.txt");
        assert_eq!(doc.name, "story");
        assert_eq!(doc.content, "Alice went home.");
    }

    #[test]
    fn test_read_missing_document() {
        let docs_dir = create_test_documents_dir();
        let result = read_document(RelativePath::new("missing.txt"), docs_dir.path());
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_missing_sidecar_is_empty() {
        let docs_dir = create_test_documents_dir();
        let set = load_annotation_set(&DocumentFile::from("story.txt"), docs_dir.path()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_save_and_load_annotation_set() {
        let docs_dir = create_test_documents_dir();
        let file = DocumentFile::from("nested/story.txt");
        let set = sample_set();

        save_annotation_set(&file, docs_dir.path(), &set).unwrap();
        assert!(docs_dir.path().join("nested/story.annotations.toml").exists());

        let loaded = load_annotation_set(&file, docs_dir.path()).unwrap();
        assert_eq!(loaded, set);
    }

    #[test]
    fn test_sidecar_uses_camel_case_keys() {
        let docs_dir = create_test_documents_dir();
        create_test_file(
            &docs_dir,
            "story.annotations.toml",
            r##"
[[labels]]
id = "person"
name = "Person"
color = "#FF6B6B"

[[annotations]]
id = "a1"
documentId = "story.txt"
labelId = "person"
labelName = "Person"
labelColor = "#FF6B6B"
startPosition = 0
endPosition = 5
"##,
        );

        let set = load_annotation_set(&DocumentFile::from("story.txt"), docs_dir.path()).unwrap();
        assert_eq!(set.labels.len(), 1);
        assert_eq!(set.annotations[0].end_position, 5);
        assert_eq!(set.annotations[0].selected_text, "");
    }

    #[test]
    fn test_malformed_sidecar_reports_path() {
        let docs_dir = create_test_documents_dir();
        create_test_file(&docs_dir, "story.annotations.toml", "[[annotations]]\nid = 3\n");

        let err = load_annotation_set(&DocumentFile::from("story.txt"), docs_dir.path())
            .unwrap_err();
        assert!(matches!(err, IoError::Parse { .. }));
        assert!(err.to_string().contains("story.annotations.toml"));
    }
}
