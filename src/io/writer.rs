//! Writing transformed notes with atomic operations and dry-run diffs

use crate::error::{MatterSyncError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where the rewritten note goes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to the destination path
    #[default]
    File,
    /// Print to stdout instead of writing
    Stdout,
    /// Only compute the diff against the current destination
    DryRun,
}

/// Result of a write operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    /// Whether the destination content changed (or would change)
    pub modified: bool,
    /// Path where the content was written (None for stdout)
    pub output_path: Option<PathBuf>,
    /// Unified diff showing changes (for dry runs)
    pub diff: Option<String>,
}

/// Writes notes to their destination, atomically
#[derive(Debug, Clone, Default)]
pub struct DocumentWriter;

impl DocumentWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write `content` to `path`
    pub fn write_file<P: AsRef<Path>>(
        &self,
        content: &str,
        path: P,
        target: &OutputTarget,
    ) -> Result<WriteResult> {
        let path = path.as_ref();
        let original_content = if path.is_file() {
            Some(fs::read_to_string(path).map_err(MatterSyncError::Io)?)
        } else {
            None
        };
        let modified = original_content.as_deref() != Some(content);

        match target {
            OutputTarget::DryRun => Ok(WriteResult {
                modified,
                output_path: Some(path.to_path_buf()),
                diff: self.generate_diff(
                    original_content.as_deref().unwrap_or(""),
                    content,
                    path,
                ),
            }),
            OutputTarget::Stdout => {
                print!("{}", content);
                Ok(WriteResult {
                    modified,
                    output_path: None,
                    diff: None,
                })
            }
            OutputTarget::File => {
                if modified {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        fs::create_dir_all(parent).map_err(MatterSyncError::Io)?;
                    }
                    self.write_atomic(path, content)?;
                }
                Ok(WriteResult {
                    modified,
                    output_path: Some(path.to_path_buf()),
                    diff: None,
                })
            }
        }
    }

    /// Generate unified diff between old and new content
    fn generate_diff(&self, old_content: &str, new_content: &str, path: &Path) -> Option<String> {
        if old_content == new_content {
            return None;
        }

        let old_lines: Vec<&str> = old_content.lines().collect();
        let new_lines: Vec<&str> = new_content.lines().collect();

        let mut diff_lines = Vec::new();
        diff_lines.push(format!("--- {}", path.display()));
        diff_lines.push(format!("+++ {}", path.display()));

        // Common prefix and suffix keep the hunk small
        let common_prefix = old_lines
            .iter()
            .zip(new_lines.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let old_rest = &old_lines[common_prefix..];
        let new_rest = &new_lines[common_prefix..];

        let common_suffix = old_rest
            .iter()
            .rev()
            .zip(new_rest.iter().rev())
            .take_while(|(a, b)| a == b)
            .count();

        let old_middle = &old_rest[..old_rest.len() - common_suffix];
        let new_middle = &new_rest[..new_rest.len() - common_suffix];

        if !old_middle.is_empty() || !new_middle.is_empty() {
            diff_lines.push(format!(
                "@@ -{},{} +{},{} @@",
                common_prefix + 1,
                old_middle.len(),
                common_prefix + 1,
                new_middle.len()
            ));

            for line in old_middle {
                diff_lines.push(format!("-{}", line));
            }
            for line in new_middle {
                diff_lines.push(format!("+{}", line));
            }
        }

        if diff_lines.len() > 2 {
            Some(diff_lines.join("\n"))
        } else {
            None
        }
    }

    /// Write file atomically using temporary file
    fn write_atomic(&self, path: &Path, content: &str) -> Result<()> {
        let parent_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp_file = NamedTempFile::new_in(parent_dir).map_err(MatterSyncError::Io)?;

        temp_file
            .write_all(content.as_bytes())
            .map_err(MatterSyncError::Io)?;
        temp_file.flush().map_err(MatterSyncError::Io)?;

        temp_file.persist(path).map_err(|e| {
            MatterSyncError::Io(std::io::Error::other(format!(
                "Failed to persist temporary file: {}",
                e
            )))
        })?;

        Ok(())
    }
}
