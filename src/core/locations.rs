//! Source and destination locations for a single transform call
//!
//! The host environment (vault, active note, folder picker) is outside this
//! crate. It hands the transform a vault root, the note's path relative to that
//! root and the path the rewritten note will be written to.

use std::path::{Path, PathBuf};

/// Where a document comes from and where it is going
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locations {
    vault_root: PathBuf,
    source_path: PathBuf,
    destination_path: PathBuf,
    project_folder: Option<PathBuf>,
}

impl Locations {
    /// Create locations for a note at `source_path` (relative to `vault_root`)
    /// that will be written to `destination_path`
    pub fn new(
        vault_root: impl Into<PathBuf>,
        source_path: impl Into<PathBuf>,
        destination_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            vault_root: vault_root.into(),
            source_path: source_path.into(),
            destination_path: destination_path.into(),
            project_folder: None,
        }
    }

    /// Attach the project folder relative destinations are resolved against
    pub fn with_project_folder(mut self, project_folder: impl Into<PathBuf>) -> Self {
        self.project_folder = Some(project_folder.into());
        self
    }

    pub fn vault_root(&self) -> &Path {
        &self.vault_root
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn project_folder(&self) -> Option<&Path> {
        self.project_folder.as_deref()
    }

    /// Absolute directory of the source note inside the vault
    pub fn source_dir(&self) -> PathBuf {
        match non_empty_parent(&self.source_path) {
            Some(parent) => self.vault_root.join(parent),
            None => self.vault_root.clone(),
        }
    }

    /// Destination file path, resolved against the project folder when relative
    pub fn destination_path(&self) -> PathBuf {
        match &self.project_folder {
            Some(project) if self.destination_path.is_relative() => {
                project.join(&self.destination_path)
            }
            _ => self.destination_path.clone(),
        }
    }

    /// Directory the destination note will live in
    pub fn destination_dir(&self) -> PathBuf {
        let destination = self.destination_path();
        match non_empty_parent(&destination) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        }
    }
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
