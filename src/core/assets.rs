//! Shared resolve → copy → rewrite skeleton used by both transform passes

use crate::core::locations::Locations;
use crate::core::report::{AssetFailure, CopiedAsset, MissingAsset, TransformReport};
use crate::core::strategy::{AssetAddressing, AssetKind, MissingImagePolicy};
use crate::error::{MatterSyncError, Result};
use log::{debug, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// An image reference with both ends resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// The text matched in the document
    pub raw: String,
    pub kind: AssetKind,
    pub file_name: String,
    /// Absolute path in the vault
    pub source: PathBuf,
    /// Absolute path the image is copied to
    pub destination: PathBuf,
}

impl ImageReference {
    /// Resolve `path` (as written in the document) against the locations
    pub fn resolve(
        kind: AssetKind,
        raw: &str,
        path: &str,
        addressing: &dyn AssetAddressing,
        locations: &Locations,
    ) -> Result<Self> {
        let path = normalize_reference_path(path);
        let file_name = file_name_of(path).ok_or_else(|| {
            MatterSyncError::path_resolution(format!("no file name in reference '{}'", raw))
        })?;
        let source = addressing.source_path(kind, locations, path, &file_name)?;
        let destination = addressing
            .destination_dir(kind, locations)?
            .join(&file_name);

        Ok(Self {
            raw: raw.to_string(),
            kind,
            file_name,
            source,
            destination,
        })
    }
}

/// Where a relocated reference now points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink {
    pub file_name: String,
    /// Link target to write into the document
    pub target: String,
}

/// Outcome of relocating one reference
#[derive(Debug)]
pub enum Relocation {
    /// The image was copied (or would be, on a dry run)
    Copied(ImageReference),
    /// The image does not exist in the vault
    Missing(ImageReference),
    /// Resolution or copying failed
    Failed { raw: String, error: MatterSyncError },
}

/// Everything a pass needs to relocate references for one document
pub struct RelocationScope<'a> {
    pub locations: &'a Locations,
    pub addressing: &'a dyn AssetAddressing,
    pub missing_images: MissingImagePolicy,
    pub dry_run: bool,
}

impl<'a> RelocationScope<'a> {
    pub fn new(locations: &'a Locations, addressing: &'a dyn AssetAddressing) -> Self {
        Self {
            locations,
            addressing,
            missing_images: MissingImagePolicy::default(),
            dry_run: false,
        }
    }

    /// Resolve and copy a single reference
    pub fn relocate(&self, kind: AssetKind, raw: &str, path: &str) -> Relocation {
        let reference =
            match ImageReference::resolve(kind, raw, path, self.addressing, self.locations) {
                Ok(reference) => reference,
                Err(error) => {
                    return Relocation::Failed {
                        raw: raw.to_string(),
                        error,
                    }
                }
            };

        if !reference.source.is_file() {
            return Relocation::Missing(reference);
        }

        if self.dry_run {
            debug!(
                "Dry run, not copying {} to {}",
                reference.source.display(),
                reference.destination.display()
            );
            return Relocation::Copied(reference);
        }

        match copy_asset(&reference.source, &reference.destination) {
            Ok(()) => Relocation::Copied(reference),
            Err(error) => Relocation::Failed {
                raw: raw.to_string(),
                error,
            },
        }
    }

    /// Relocate a reference and record the outcome
    ///
    /// Returns the link to write back, or `None` when the reference must stay
    /// as it is.
    pub fn relocate_and_record(
        &self,
        kind: AssetKind,
        raw: &str,
        path: &str,
        report: &mut TransformReport,
    ) -> Option<ImageLink> {
        match self.relocate(kind, raw, path) {
            Relocation::Copied(reference) => {
                if !self.dry_run {
                    info!(
                        "Copied {} -> {}",
                        reference.source.display(),
                        reference.destination.display()
                    );
                }
                let target = self.addressing.link(kind, &reference.file_name);
                report.copied.push(CopiedAsset {
                    kind,
                    source: reference.source,
                    destination: reference.destination,
                });
                Some(ImageLink {
                    file_name: reference.file_name,
                    target,
                })
            }
            Relocation::Missing(reference) => {
                self.record_missing(reference, report);
                None
            }
            Relocation::Failed { raw, error } => {
                error!("Failed to relocate {}: {}", raw, error);
                report.failures.push(AssetFailure {
                    kind,
                    reference: raw,
                    reason: error.to_string(),
                });
                None
            }
        }
    }

    fn record_missing(&self, reference: ImageReference, report: &mut TransformReport) {
        let warned =
            reference.kind == AssetKind::Body && self.missing_images == MissingImagePolicy::Warn;
        if warned {
            let notice = format!("Image not found: {}", reference.source.display());
            warn!("{}", notice);
            report.warnings.push(notice);
        } else {
            debug!(
                "Image not found, leaving {} unchanged: {}",
                reference.raw,
                reference.source.display()
            );
        }
        report.missing.push(MissingAsset {
            kind: reference.kind,
            reference: reference.raw,
            source: reference.source,
        });
    }
}

/// Copy `source` to `destination`, creating the destination folder first
///
/// Existing files are overwritten. When both paths name the same file the
/// copy is skipped, since `fs::copy` would truncate the source.
pub fn copy_asset(source: &Path, destination: &Path) -> Result<()> {
    if is_same_file(source, destination) {
        debug!("{} is already in place", destination.display());
        return Ok(());
    }
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| MatterSyncError::asset_copy(source, destination, e))?;
    }
    fs::copy(source, destination).map_err(|e| MatterSyncError::asset_copy(source, destination, e))?;
    Ok(())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Last path component of a reference, if any
pub fn file_name_of(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn normalize_reference_path(path: &str) -> &str {
    let path = path.trim();
    path.strip_prefix("./").unwrap_or(path)
}
