//! Per-call record of what a transform did to the filesystem

use crate::core::strategy::AssetKind;
use serde::Serialize;
use std::path::PathBuf;

/// An image copied into the destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedAsset {
    pub kind: AssetKind,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// A reference left unchanged because its image is not in the vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingAsset {
    pub kind: AssetKind,
    pub reference: String,
    pub source: PathBuf,
}

/// A reference left unchanged because relocating it failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetFailure {
    pub kind: AssetKind,
    pub reference: String,
    pub reason: String,
}

/// Everything a single transform call copied, skipped or failed on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    pub copied: Vec<CopiedAsset>,
    pub missing: Vec<MissingAsset>,
    /// User-visible notices, one line each
    pub warnings: Vec<String>,
    pub failures: Vec<AssetFailure>,
}

impl TransformReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing was copied, skipped or failed
    pub fn is_empty(&self) -> bool {
        self.copied.is_empty()
            && self.missing.is_empty()
            && self.warnings.is_empty()
            && self.failures.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// One-line summary for notices
    pub fn summary(&self) -> String {
        format!(
            "{} copied, {} missing, {} failed",
            self.copied.len(),
            self.missing.len(),
            self.failures.len()
        )
    }
}
