//! Inline image relocation
//!
//! Finds `![[image.png]]` embeds in a document body, copies each image into
//! the destination and replaces the embed with standard markdown image syntax.
//! Embeds whose image cannot be found or copied are left exactly as written.

use crate::core::assets::RelocationScope;
use crate::core::report::TransformReport;
use crate::core::strategy::AssetKind;
use log::debug;
use regex::{Captures, Regex};

const EMBED_PATTERN: &str = r"!\[\[(.*?)\]\]";

/// Rewrites `![[...]]` embeds into `![name](link)`
#[derive(Debug, Clone)]
pub struct InlineImageRelocator {
    embed: Regex,
}

impl InlineImageRelocator {
    pub fn new() -> Self {
        Self {
            embed: Regex::new(EMBED_PATTERN).expect("embed pattern is valid"),
        }
    }

    /// Number of embeds in `body`
    pub fn count_embeds(&self, body: &str) -> usize {
        self.embed.find_iter(body).count()
    }

    /// Relocate every embed in `body`
    ///
    /// Matches are taken from the original text in one pass, so a rewritten
    /// embed never affects how later ones are found. A failure on one embed is
    /// recorded and does not stop the others.
    pub fn relocate(
        &self,
        body: &str,
        scope: &RelocationScope<'_>,
        report: &mut TransformReport,
    ) -> String {
        debug!(
            "Relocating embeds with {} addressing",
            scope.addressing.name()
        );
        self.embed
            .replace_all(body, |caps: &Captures<'_>| {
                let raw = &caps[0];
                match scope.relocate_and_record(AssetKind::Body, raw, &caps[1], report) {
                    Some(link) => format!("![{}]({})", link.file_name, link.target),
                    None => raw.to_string(),
                }
            })
            .into_owned()
    }
}

impl Default for InlineImageRelocator {
    fn default() -> Self {
        Self::new()
    }
}
