use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary documents directory
pub fn create_test_documents_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test file, including any parent directories
pub fn create_test_file(docs_dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = docs_dir.path().join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}
