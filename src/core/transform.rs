//! The document transform: frontmatter first, then the body

use crate::config::SyncConfig;
use crate::core::assets::RelocationScope;
use crate::core::frontmatter::FrontmatterNormalizer;
use crate::core::images::InlineImageRelocator;
use crate::core::locations::Locations;
use crate::core::report::TransformReport;
use crate::core::strategy::{AddressingMode, AssetAddressing, MissingImagePolicy};
use crate::error::{MatterSyncError, Result};
use log::debug;
use serde::Serialize;

/// Rewritten text plus what happened on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformOutput {
    pub text: String,
    pub report: TransformReport,
}

/// Rewrites a document for its new location and copies its images
pub struct Transformer {
    addressing: Box<dyn AssetAddressing>,
    mode: AddressingMode,
    missing_images: MissingImagePolicy,
    dry_run: bool,
    normalizer: FrontmatterNormalizer,
    relocator: InlineImageRelocator,
}

impl Transformer {
    /// Create a transformer for the addressing mode and policies in `config`
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            addressing: config.addressing(),
            mode: config.mode,
            missing_images: config.missing_images,
            dry_run: false,
            normalizer: FrontmatterNormalizer::new(),
            relocator: InlineImageRelocator::new(),
        }
    }

    /// Resolve and rewrite references without copying any file
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Transform `text`, a note at `locations.source_path()`, for its destination
    ///
    /// Missing images and per-image copy failures do not fail the call; they
    /// are left unchanged and listed in the report. The only error is a
    /// configuration that cannot address images at all.
    pub fn transform(&self, text: &str, locations: &Locations) -> Result<TransformOutput> {
        if self.mode == AddressingMode::Flat && locations.project_folder().is_none() {
            return Err(MatterSyncError::config(
                "flat mode requires a project folder",
            ));
        }

        let scope = RelocationScope {
            locations,
            addressing: self.addressing.as_ref(),
            missing_images: self.missing_images,
            dry_run: self.dry_run,
        };
        let mut report = TransformReport::new();

        let (head, body) = match self.normalizer.locate(text) {
            Some(span) => text.split_at(span.end),
            None => ("", text),
        };
        debug!(
            "Transforming {} ({} bytes of frontmatter, {} embeds)",
            locations.source_path().display(),
            head.len(),
            self.relocator.count_embeds(body)
        );

        let mut out = self.normalizer.normalize(head, &scope, &mut report);
        out.push_str(&self.relocator.relocate(body, &scope, &mut report));

        Ok(TransformOutput { text: out, report })
    }
}

/// Transform `text` with a one-off [`Transformer`]
pub fn transform(text: &str, locations: &Locations, config: &SyncConfig) -> Result<TransformOutput> {
    Transformer::new(config).transform(text, locations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_plain_text_is_identity() {
        let text = "# Title\n\nSome prose with [[links]] and ![alt](a.png).\n";
        let locations = Locations::new("/nonexistent", "a.md", "/nonexistent/out/a.md");
        let output = transform(text, &locations, &SyncConfig::default()).unwrap();
        assert_eq!(output.text, text);
        assert!(output.report.is_empty());
    }

    #[test]
    fn test_embeds_in_frontmatter_are_not_relocated() {
        let text = "---\nsummary: ![[a.png]]\n---\n![[a.png]]\n";
        let locations = Locations::new("/nonexistent", "a.md", "/nonexistent/out/a.md");
        let output = transform(text, &locations, &SyncConfig::default()).unwrap();
        assert_eq!(output.text, text);
        assert_eq!(output.report.missing.len(), 1);
    }

    #[test]
    fn test_flat_mode_without_project_folder_fails() {
        let config = SyncConfig {
            mode: AddressingMode::Flat,
            ..Default::default()
        };
        let locations = Locations::new("/vault", "a.md", "/site/a.md");
        let err = transform("text", &locations, &config).unwrap_err();
        assert!(matches!(err, MatterSyncError::Config { .. }));
    }

    #[test]
    fn test_dry_run_rewrites_without_copying() {
        let dir = TempDir::new().unwrap();
        let vault = dir.path().join("vault");
        let site = dir.path().join("site");
        fs::create_dir_all(vault.join("attachments")).unwrap();
        fs::write(vault.join("attachments/a.png"), b"a").unwrap();

        let transformer = Transformer::new(&SyncConfig::default()).dry_run(true);
        assert!(transformer.is_dry_run());
        let locations = Locations::new(&vault, "a.md", site.join("a.md"));
        let output = transformer.transform("![[a.png]]", &locations).unwrap();

        assert_eq!(output.text, "![a.png](./attachments/a.png)");
        assert_eq!(output.report.copied.len(), 1);
        assert!(!site.exists());
    }
}
