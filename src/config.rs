//! Sync settings
//!
//! Settings live in a small YAML file. Every key is optional; a missing file
//! means defaults. Command-line flags are applied on top by the binary.

use crate::core::strategy::{addressing_for, AddressingMode, AssetAddressing, MissingImagePolicy};
use crate::error::{MatterSyncError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "mattersync.yaml";

/// Settings for pushing notes from a vault into a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Absolute path of the vault the notes live in
    pub vault_root: Option<PathBuf>,
    /// Root of the external project notes are pushed to
    pub project_folder: Option<PathBuf>,
    /// How images are addressed in pushed notes
    pub mode: AddressingMode,
    /// Asset folder relative to the project folder, used in flat mode
    pub images_folder: String,
    /// What happens when a body image cannot be found
    pub missing_images: MissingImagePolicy,
    /// Only used by interactive folder browsers
    pub show_hidden_folders: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            vault_root: None,
            project_folder: None,
            mode: AddressingMode::Colocated,
            images_folder: "images".to_string(),
            missing_images: MissingImagePolicy::Warn,
            show_hidden_folders: false,
        }
    }
}

impl SyncConfig {
    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load settings from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => MatterSyncError::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => MatterSyncError::permission_denied(path),
            _ => MatterSyncError::Io(e),
        })?;
        debug!("Loaded settings from {}", path.display());
        Self::from_yaml(&content)
    }

    /// Load settings from a file, falling back to defaults when it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Serialize the settings back to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check that the settings are usable for the configured mode
    pub fn validate(&self) -> Result<()> {
        if self.mode == AddressingMode::Flat && self.project_folder.is_none() {
            return Err(MatterSyncError::config(
                "flat mode requires project_folder to be set",
            ));
        }
        if self.images_folder.contains("..") {
            return Err(MatterSyncError::config(format!(
                "images_folder must stay inside the project folder: {}",
                self.images_folder
            )));
        }
        Ok(())
    }

    /// The vault root, or a configuration error when unset
    pub fn require_vault_root(&self) -> Result<&Path> {
        self.vault_root
            .as_deref()
            .ok_or_else(|| MatterSyncError::config("vault_root is not set"))
    }

    /// The project folder, or a configuration error when unset
    pub fn require_project_folder(&self) -> Result<&Path> {
        self.project_folder
            .as_deref()
            .ok_or_else(|| MatterSyncError::config("project_folder is not set"))
    }

    /// Addressing strategy for the configured mode
    pub fn addressing(&self) -> Box<dyn AssetAddressing> {
        addressing_for(self.mode, &self.images_folder)
    }
}
