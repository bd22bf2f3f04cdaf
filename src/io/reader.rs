//! Reading notes from disk
//!
//! Notes are read whole, as UTF-8 text. Folders are expanded into the
//! markdown files beneath them.

use crate::error::{MatterSyncError, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Configuration for the document reader
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Maximum file size to read (in bytes)
    pub max_file_size: Option<usize>,
    /// Include hidden files and folders (starting with .) when walking
    pub include_hidden: bool,
    /// Follow symbolic links when walking
    pub follow_links: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_file_size: Some(10 * 1024 * 1024), // 10MB default limit
            include_hidden: false,
            follow_links: false,
        }
    }
}

/// Reads notes and finds the notes inside a folder
pub struct DocumentReader {
    config: ReaderConfig,
}

impl DocumentReader {
    /// Create a new reader with default configuration
    pub fn new() -> Self {
        Self {
            config: ReaderConfig::default(),
        }
    }

    /// Create a new reader with custom configuration
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a note's text
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(MatterSyncError::file_not_found(path));
        }

        if !path.is_file() {
            return Err(MatterSyncError::invalid_file_format(path));
        }

        if let Some(max_size) = self.config.max_file_size {
            let metadata = fs::metadata(path).map_err(MatterSyncError::Io)?;

            if metadata.len() as usize > max_size {
                return Err(MatterSyncError::validation(format!(
                    "File too large: {} bytes (limit: {} bytes)",
                    metadata.len(),
                    max_size
                )));
            }
        }

        fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => MatterSyncError::permission_denied(path),
            _ => MatterSyncError::Io(e),
        })
    }

    /// Markdown files beneath `folder`, sorted, as paths relative to `folder`
    pub fn markdown_files<P: AsRef<Path>>(&self, folder: P) -> Result<Vec<PathBuf>> {
        let folder = folder.as_ref();
        if !folder.is_dir() {
            return Err(MatterSyncError::file_not_found(folder));
        }

        let include_hidden = self.config.include_hidden;
        let mut files = Vec::new();
        let walker = WalkDir::new(folder)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || include_hidden || !is_hidden(entry.path()));

        for entry in walker {
            let entry = entry.map_err(|e| {
                MatterSyncError::Io(std::io::Error::other(format!(
                    "failed to walk {}: {}",
                    folder.display(),
                    e
                )))
            })?;
            if entry.file_type().is_file() && Self::is_markdown_file(entry.path()) {
                if let Ok(relative) = entry.path().strip_prefix(folder) {
                    files.push(relative.to_path_buf());
                }
            }
        }

        debug!("Found {} notes in {}", files.len(), folder.display());
        Ok(files)
    }

    /// Check if a file is a markdown file
    pub fn is_markdown_file<P: AsRef<Path>>(path: P) -> bool {
        let path = path.as_ref();
        match path.extension() {
            Some(ext) => {
                let ext_str = ext.to_string_lossy().to_lowercase();
                matches!(
                    ext_str.as_str(),
                    "md" | "markdown" | "mdown" | "mkd" | "mkdn"
                )
            }
            None => false,
        }
    }

    /// Get reader configuration
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}

impl Default for DocumentReader {
    fn default() -> Self {
        Self::new()
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
