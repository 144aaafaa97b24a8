use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

/// Extension of the documents this application reads and writes
pub const PRESENTATION_EXTENSION: &str = "pptx";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Create the parent directory of `path` and return it
    ///
    /// A bare file name resolves to the current directory.
    pub fn ensure_parent_dir<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
        let parent = match path.as_ref().parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::ensure_dir(&parent)?;
        Ok(parent)
    }

    // @checks: Path carries the presentation extension (case-insensitive)
    pub fn is_presentation_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(PRESENTATION_EXTENSION))
    }

    /// Append `.pptx` when a save dialog returned a name without it
    pub fn with_presentation_extension(path: PathBuf) -> PathBuf {
        if Self::is_presentation_file(&path) {
            path
        } else {
            let mut name = path.clone().into_os_string();
            name.push(".");
            name.push(PRESENTATION_EXTENSION);
            PathBuf::from(name)
        }
    }
}
