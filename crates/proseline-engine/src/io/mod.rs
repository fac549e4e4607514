use crate::models::{Document, Format};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("Invalid directory: {0}")]
    InvalidDir(PathBuf),
}

/// Read a document, detecting its format from the extension unless one is given.
pub fn read_document(path: &Path, format: Option<Format>) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned());
    let format = format
        .or_else(|| ext.as_deref().and_then(Format::from_extension))
        .ok_or_else(|| IoError::UnsupportedFormat(path.to_path_buf()))?;

    let content = fs::read_to_string(path)?;
    Ok(match ext {
        Some(ext) => Document::with_extension(content, format, &ext),
        None => Document::new(content, format),
    })
}

/// Recursively collect every file whose extension maps to a known format.
pub fn scan_documents(root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !root.is_dir() {
        return Err(IoError::InvalidDir(root.to_path_buf()));
    }

    let mut files = Vec::new();
    scan_directory_recursive(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && Format::from_extension(&ext.to_string_lossy()).is_some()
        {
            files.push(path);
        }
    }

    Ok(())
}
