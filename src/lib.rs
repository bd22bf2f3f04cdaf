//! mattersync: push markdown notes and their images from a vault into a project
//!
//! A note written in a vault embeds images as `![[diagram.png]]` and keeps them
//! in an `attachments` folder beside it. Copying the note into another project
//! (a static site, a docs folder) breaks those embeds. This library rewrites
//! the note for its new home:
//!
//! - `![[diagram.png]]` embeds become `![diagram.png](./attachments/diagram.png)`
//!   (colocated mode) or `![diagram.png](/images/diagram.png)` (flat mode),
//!   and the image files are copied accordingly
//! - a bullet list of `tags:` in the frontmatter becomes `tags: ["a", "b"]`
//! - an `image: ./cover.png` frontmatter entry is copied and repointed
//!
//! Images that cannot be found are left exactly as written.
//!
//! # Quick Start
//!
//! ## Transforming text
//!
//! ```rust,no_run
//! use mattersync::{transform, Locations, Result, SyncConfig};
//!
//! fn main() -> Result<()> {
//!     let locations = Locations::new("/home/me/vault", "blog/post.md", "/srv/site/post.md");
//!     let output = transform("![[diagram.png]]", &locations, &SyncConfig::default())?;
//!     println!("{}", output.text);
//!     for warning in &output.report.warnings {
//!         eprintln!("{}", warning);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pushing a note
//!
//! ```rust,no_run
//! use mattersync::{PushOptions, Result, SyncConfig, SyncSession};
//!
//! fn main() -> Result<()> {
//!     let config = SyncConfig::load_or_default("mattersync.yaml")?;
//!     let session = SyncSession::new(config)?;
//!     let outcome = session.push("blog/post.md", &PushOptions::default())?;
//!     println!("Pushed to {}", outcome.destination.display());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`core`]: the transform, its two passes and the addressing strategies
//! - [`io`]: reading notes and writing them atomically
//! - [`config`]: the settings file
//! - [`session`]: push and pull orchestration
//! - [`error`]: error types

// Public API exports
pub use error::{MatterSyncError, Result};

// Core types
pub use self::core::{
    transform, AddressingMode, AssetAddressing, AssetKind, ColocatedAddressing, FlatAddressing,
    FrontmatterNormalizer, InlineImageRelocator, Locations, MissingImagePolicy, TransformOutput,
    TransformReport, Transformer,
};

// IO types
pub use io::{DocumentReader, DocumentWriter, OutputTarget, ReaderConfig, WriteResult};

pub use config::SyncConfig;
pub use session::{PullOptions, PullOutcome, PushOptions, PushOutcome, SyncSession};

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod session;

// CLI components are available only in the binary, not as part of the library API

/// Convenience functions for common operations
pub mod convenience {
    //! Simple entry points with default settings

    use crate::{DocumentReader, Locations, Result, SyncConfig, TransformOutput, Transformer};
    use std::path::Path;

    /// Transform a string with default (colocated) settings
    pub fn transform_str(text: &str, locations: &Locations) -> Result<TransformOutput> {
        Transformer::new(&SyncConfig::default()).transform(text, locations)
    }

    /// Read `vault_root/note` and transform it for `destination`
    pub fn transform_note(
        vault_root: &Path,
        note: &Path,
        destination: &Path,
        config: &SyncConfig,
    ) -> Result<TransformOutput> {
        let text = DocumentReader::new().read_file(vault_root.join(note))?;
        let locations = Locations::new(vault_root, note, destination);
        let locations = match &config.project_folder {
            Some(project) => locations.with_project_folder(project),
            None => locations,
        };
        Transformer::new(config).transform(&text, &locations)
    }
}
