//! Core transform types and passes
//!
//! - [`transform`]: runs both passes over a document
//! - [`frontmatter`]: tag list and cover image normalization
//! - [`images`]: `![[...]]` embed relocation
//! - [`strategy`]: colocated and flat asset addressing
//! - [`assets`]: the resolve, copy and rewrite steps both passes share

pub mod assets;
pub mod frontmatter;
pub mod images;
pub mod locations;
pub mod report;
pub mod strategy;
pub mod transform;

pub use assets::{ImageLink, ImageReference, Relocation, RelocationScope};
pub use frontmatter::{FrontmatterNormalizer, FrontmatterSpan};
pub use images::InlineImageRelocator;
pub use locations::Locations;
pub use report::{AssetFailure, CopiedAsset, MissingAsset, TransformReport};
pub use strategy::{
    AddressingMode, AssetAddressing, AssetKind, ColocatedAddressing, FlatAddressing,
    MissingImagePolicy,
};
pub use transform::{transform, TransformOutput, Transformer};
