//! Error types for the mattersync library
//!
//! Missing images are not errors: the transform reports them and leaves the
//! reference alone. The variants here cover configuration problems, document
//! I/O and the per-asset failures that end up in a transform report.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum MatterSyncError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file parsing or serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Report serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Not a markdown document
    #[error("Invalid file format: {path} (expected markdown)")]
    InvalidFileFormat { path: PathBuf },

    /// The destination project folder is missing or is not a directory
    #[error("Project folder does not exist: {path}")]
    ProjectRootMissing { path: PathBuf },

    /// The vault root is missing or is not a directory
    #[error("Vault root does not exist: {path}")]
    VaultRootMissing { path: PathBuf },

    /// Invalid or incomplete configuration
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// A reference could not be turned into source/destination paths
    #[error("Path resolution error: {reason}")]
    PathResolution { reason: String },

    /// Creating the asset folder or copying an image failed
    #[error("Failed to copy {} to {}: {source}", .from.display(), .to.display())]
    AssetCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Permission errors
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Generic validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Multiple errors (for folder pushes)
    #[error("{} documents failed", .errors.len())]
    Multiple { errors: Vec<MatterSyncError> },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MatterSyncError>;

impl MatterSyncError {
    /// Create a new file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new invalid file format error
    pub fn invalid_file_format(path: impl Into<PathBuf>) -> Self {
        Self::InvalidFileFormat { path: path.into() }
    }

    /// Create a new missing project folder error
    pub fn project_root_missing(path: impl Into<PathBuf>) -> Self {
        Self::ProjectRootMissing { path: path.into() }
    }

    /// Create a new missing vault root error
    pub fn vault_root_missing(path: impl Into<PathBuf>) -> Self {
        Self::VaultRootMissing { path: path.into() }
    }

    /// Create a new configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a new path resolution error
    pub fn path_resolution(reason: impl Into<String>) -> Self {
        Self::PathResolution {
            reason: reason.into(),
        }
    }

    /// Create a new asset copy error
    pub fn asset_copy(
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::AssetCopy {
            from: from.into(),
            to: to.into(),
            source,
        }
    }

    /// Create a new permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied { path: path.into() }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a multiple errors wrapper
    pub fn multiple(errors: Vec<MatterSyncError>) -> Self {
        Self::Multiple { errors }
    }
}
