//! Asset addressing strategies
//!
//! Both passes of the transform follow the same skeleton: resolve the source
//! image, copy it, rewrite the reference. What differs between deployments is
//! where images are looked up, where they are copied to and how the rewritten
//! reference is spelled. [`AssetAddressing`] captures exactly those three
//! decisions.

use crate::core::locations::Locations;
use crate::error::{MatterSyncError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Folder created next to the destination note in colocated mode
pub const ATTACHMENTS_DIR: &str = "attachments";

/// Subfolder of [`ATTACHMENTS_DIR`] that receives frontmatter cover images
pub const COVER_IMAGE_DIR: &str = "cover-image";

/// The kind of image reference being relocated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// A `![[...]]` embed in the document body
    Body,
    /// The `image:` key of the frontmatter block
    Cover,
}

/// Addressing scheme selected by configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressingMode {
    /// Images go to an `attachments` folder next to the output note
    #[default]
    Colocated,
    /// Images go to one configured folder, referenced from the site root
    Flat,
}

/// What to do when a body image cannot be found in the vault
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingImagePolicy {
    /// Log a warning and add it to the report
    #[default]
    Warn,
    /// Leave the reference alone without telling anyone
    Silent,
}

/// Decides where an image comes from, where it goes and how it is referenced
pub trait AssetAddressing {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// Absolute path of the image in the vault
    ///
    /// `path` is the reference as written in the document (trimmed, without
    /// any leading `./`), `file_name` its last component.
    fn source_path(
        &self,
        kind: AssetKind,
        locations: &Locations,
        path: &str,
        file_name: &str,
    ) -> Result<PathBuf>;

    /// Folder the image is copied into
    fn destination_dir(&self, kind: AssetKind, locations: &Locations) -> Result<PathBuf>;

    /// Link target written back into the document
    fn link(&self, kind: AssetKind, file_name: &str) -> String;
}

/// Images live in `attachments/` beside the note, on both sides
#[derive(Debug, Clone, Copy, Default)]
pub struct ColocatedAddressing;

impl AssetAddressing for ColocatedAddressing {
    fn name(&self) -> &'static str {
        "colocated"
    }

    fn source_path(
        &self,
        _kind: AssetKind,
        locations: &Locations,
        _path: &str,
        file_name: &str,
    ) -> Result<PathBuf> {
        Ok(locations
            .source_dir()
            .join(ATTACHMENTS_DIR)
            .join(file_name))
    }

    fn destination_dir(&self, kind: AssetKind, locations: &Locations) -> Result<PathBuf> {
        let attachments = locations.destination_dir().join(ATTACHMENTS_DIR);
        Ok(match kind {
            AssetKind::Body => attachments,
            AssetKind::Cover => attachments.join(COVER_IMAGE_DIR),
        })
    }

    fn link(&self, kind: AssetKind, file_name: &str) -> String {
        match kind {
            AssetKind::Body => format!("./{}/{}", ATTACHMENTS_DIR, file_name),
            AssetKind::Cover => format!("./{}/{}/{}", ATTACHMENTS_DIR, COVER_IMAGE_DIR, file_name),
        }
    }
}

/// Images are looked up from the vault root and gathered in one project folder
#[derive(Debug, Clone)]
pub struct FlatAddressing {
    images_folder: String,
}

impl FlatAddressing {
    /// `images_folder` is relative to the project folder, e.g. `public/images`
    pub fn new(images_folder: impl AsRef<str>) -> Self {
        Self {
            images_folder: images_folder.as_ref().trim_matches('/').to_string(),
        }
    }

    pub fn images_folder(&self) -> &str {
        &self.images_folder
    }
}

impl AssetAddressing for FlatAddressing {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn source_path(
        &self,
        _kind: AssetKind,
        locations: &Locations,
        path: &str,
        _file_name: &str,
    ) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative.components().any(|component| {
            matches!(
                component,
                Component::RootDir | Component::Prefix(_) | Component::ParentDir
            )
        });
        if escapes {
            return Err(MatterSyncError::path_resolution(format!(
                "'{}' is not inside the vault",
                path
            )));
        }
        Ok(locations.vault_root().join(relative))
    }

    fn destination_dir(&self, _kind: AssetKind, locations: &Locations) -> Result<PathBuf> {
        let project = locations.project_folder().ok_or_else(|| {
            MatterSyncError::config("flat addressing needs a project folder")
        })?;
        Ok(join_folder(project, &self.images_folder))
    }

    fn link(&self, _kind: AssetKind, file_name: &str) -> String {
        if self.images_folder.is_empty() {
            format!("/{}", file_name)
        } else {
            format!("/{}/{}", self.images_folder, file_name)
        }
    }
}

fn join_folder(base: &Path, folder: &str) -> PathBuf {
    folder
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(base.to_path_buf(), |acc, segment| acc.join(segment))
}

/// Build the addressing strategy for a mode
pub fn addressing_for(mode: AddressingMode, images_folder: &str) -> Box<dyn AssetAddressing> {
    match mode {
        AddressingMode::Colocated => Box::new(ColocatedAddressing),
        AddressingMode::Flat => Box::new(FlatAddressing::new(images_folder)),
    }
}
