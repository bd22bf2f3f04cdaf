//! Frontmatter normalization
//!
//! Rewrites the leading `---` block of a document in place:
//!
//! - a bullet list under `tags:` becomes an inline array of quoted strings
//! - an `image: ./cover.png` line is relocated into the destination's asset
//!   folder and its path rewritten
//!
//! Everything else in the block, including the delimiters, is left as is.
//! This works on the raw text rather than a parsed YAML tree so that key
//! order, comments and quoting survive the round trip.

use crate::core::assets::RelocationScope;
use crate::core::report::TransformReport;
use crate::core::strategy::AssetKind;
use log::debug;
use regex::{Captures, Regex};
use std::ops::Range;

const BLOCK_PATTERN: &str = r"\A---\r?\n((?s:.*?))^---[ \t]*\r?$";
const COVER_PATTERN: &str =
    r"(?im)^image:[ \t]*\./([^\r\n]*?\.(?:png|jpe?g|gif))([ \t]*\r?)$";
const TAGS_PATTERN: &str = r"(?m)^tags:[ \t]*(\r?\n|\z)((?:[ \t]*- [^\r\n]*(?:\r?\n|\z))*)";

/// Location of a frontmatter block within a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterSpan {
    /// Text between the delimiters
    pub content: Range<usize>,
    /// End of the closing delimiter line (exclusive, before its newline)
    pub end: usize,
}

/// Rewrites tags and the cover image inside a frontmatter block
#[derive(Debug, Clone)]
pub struct FrontmatterNormalizer {
    block: Regex,
    cover: Regex,
    tags: Regex,
}

impl FrontmatterNormalizer {
    pub fn new() -> Self {
        Self {
            block: Regex::new(&format!("(?m){}", BLOCK_PATTERN))
                .expect("frontmatter block pattern is valid"),
            cover: Regex::new(COVER_PATTERN).expect("cover image pattern is valid"),
            tags: Regex::new(TAGS_PATTERN).expect("tags pattern is valid"),
        }
    }

    /// Find the leading frontmatter block, if the document has one
    pub fn locate(&self, text: &str) -> Option<FrontmatterSpan> {
        let captures = self.block.captures(text)?;
        let content = captures.get(1)?;
        let whole = captures.get(0)?;
        Some(FrontmatterSpan {
            content: content.range(),
            end: whole.end(),
        })
    }

    /// Normalize the frontmatter block of `text`
    ///
    /// Returns `text` unchanged when there is no block. Never fails: an image
    /// that cannot be relocated keeps its original line.
    pub fn normalize(
        &self,
        text: &str,
        scope: &RelocationScope<'_>,
        report: &mut TransformReport,
    ) -> String {
        let Some(span) = self.locate(text) else {
            debug!("No frontmatter block found");
            return text.to_string();
        };

        let block = &text[span.content.clone()];
        let normalized = self.normalize_block(block, scope, report);

        let mut out = String::with_capacity(text.len() - block.len() + normalized.len());
        out.push_str(&text[..span.content.start]);
        out.push_str(&normalized);
        out.push_str(&text[span.content.end..]);
        out
    }

    /// Normalize the content of a block (without its delimiters)
    pub fn normalize_block(
        &self,
        block: &str,
        scope: &RelocationScope<'_>,
        report: &mut TransformReport,
    ) -> String {
        let block = self.relocate_cover(block, scope, report);
        self.inline_tags(&block)
    }

    fn relocate_cover(
        &self,
        block: &str,
        scope: &RelocationScope<'_>,
        report: &mut TransformReport,
    ) -> String {
        self.cover
            .replacen(block, 1, |caps: &Captures<'_>| {
                let raw = &caps[0];
                let path = &caps[1];
                match scope.relocate_and_record(AssetKind::Cover, raw.trim_end(), path, report) {
                    Some(link) => format!("image: {}{}", link.target, &caps[2]),
                    None => raw.to_string(),
                }
            })
            .into_owned()
    }

    fn inline_tags(&self, block: &str) -> String {
        self.tags
            .replacen(block, 1, |caps: &Captures<'_>| {
                let tags: Vec<String> = caps[2].lines().filter_map(tag_from_bullet).collect();
                let newline = if caps[1].is_empty() { "\n" } else { &caps[1] };
                debug!("Inlining {} tags", tags.len());
                format!("tags: [{}]{}", tags.join(", "), newline)
            })
            .into_owned()
    }
}

impl Default for FrontmatterNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn `  - #rust` into `"rust"`
fn tag_from_bullet(line: &str) -> Option<String> {
    let line = line.trim();
    let tag = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix('-'))
        .unwrap_or(line)
        .trim();
    let tag = tag.strip_prefix('#').unwrap_or(tag).trim();
    if tag.is_empty() {
        return None;
    }
    Some(format!("\"{}\"", tag.replace('\\', "\\\\").replace('"', "\\\"")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::locations::Locations;
    use crate::core::strategy::{ColocatedAddressing, FlatAddressing};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn normalize_with(text: &str, locations: &Locations) -> (String, TransformReport) {
        let normalizer = FrontmatterNormalizer::new();
        let scope = RelocationScope::new(locations, &ColocatedAddressing);
        let mut report = TransformReport::new();
        let out = normalizer.normalize(text, &scope, &mut report);
        (out, report)
    }

    fn nowhere() -> Locations {
        Locations::new("/nonexistent/vault", "post.md", "/nonexistent/site/post.md")
    }

    #[test]
    fn test_no_frontmatter_is_identity() {
        let text = "# Title\n\ntags:\n  - foo\n";
        let (out, report) = normalize_with(text, &nowhere());
        assert_eq!(out, text);
        assert!(report.is_empty());
    }

    #[test]
    fn test_unclosed_block_is_identity() {
        let text = "---\ntags:\n  - foo\nno closing delimiter\n";
        let (out, _) = normalize_with(text, &nowhere());
        assert_eq!(out, text);
    }

    #[test]
    fn test_locate_block() {
        let normalizer = FrontmatterNormalizer::new();
        let text = "---\ntitle: x\n---\nbody";
        let span = normalizer.locate(text).unwrap();
        assert_eq!(&text[span.content.clone()], "title: x\n");
        assert_eq!(&text[span.end..], "\nbody");
    }

    #[test]
    fn test_locate_requires_delimiter_on_its_own_line() {
        let normalizer = FrontmatterNormalizer::new();
        let text = "---\ntitle: a---b\n---\nbody";
        let span = normalizer.locate(text).unwrap();
        assert_eq!(&text[span.content], "title: a---b\n");
    }

    #[test]
    fn test_locate_empty_block() {
        let normalizer = FrontmatterNormalizer::new();
        let span = normalizer.locate("---\n---\nbody").unwrap();
        assert!(span.content.is_empty());
    }

    #[test]
    fn test_tags_are_inlined() {
        let text = "---\ntitle: Post\ntags:\n  - #foo\n  - bar\ndraft: false\n---\nbody\n";
        let (out, _) = normalize_with(text, &nowhere());
        assert_eq!(
            out,
            "---\ntitle: Post\ntags: [\"foo\", \"bar\"]\ndraft: false\n---\nbody\n"
        );
    }

    #[test]
    fn test_tags_as_last_key() {
        let text = "---\ntags:\n  - #foo\n  - bar\n---\n";
        let (out, _) = normalize_with(text, &nowhere());
        assert_eq!(out, "---\ntags: [\"foo\", \"bar\"]\n---\n");
    }

    #[test]
    fn test_empty_tags_become_empty_array() {
        let text = "---\ntags:\ntitle: x\n---\n";
        let (out, _) = normalize_with(text, &nowhere());
        assert_eq!(out, "---\ntags: []\ntitle: x\n---\n");
    }

    #[test]
    fn test_inline_tags_untouched() {
        let text = "---\ntags: [a, b]\n---\n";
        let (out, _) = normalize_with(text, &nowhere());
        assert_eq!(out, text);
    }

    #[test]
    fn test_tags_outside_block_untouched() {
        let text = "---\ntitle: x\n---\ntags:\n  - foo\n";
        let (out, _) = normalize_with(text, &nowhere());
        assert_eq!(out, text);
    }

    #[test]
    fn test_tag_from_bullet() {
        assert_eq!(tag_from_bullet("  - #rust"), Some("\"rust\"".to_string()));
        assert_eq!(tag_from_bullet("  - c#"), Some("\"c#\"".to_string()));
        assert_eq!(
            tag_from_bullet("  - say \"hi\""),
            Some("\"say \\\"hi\\\"\"".to_string())
        );
        assert_eq!(tag_from_bullet("  - "), None);
    }

    #[test]
    fn test_missing_cover_left_unchanged() {
        let text = "---\nimage: ./cover.png\n---\n";
        let (out, report) = normalize_with(text, &nowhere());
        assert_eq!(out, text);
        assert_eq!(report.missing.len(), 1);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_non_image_extension_ignored() {
        let text = "---\nimage: ./cover.svg\n---\n";
        let (out, report) = normalize_with(text, &nowhere());
        assert_eq!(out, text);
        assert!(report.is_empty());
    }

    fn write_cover(vault: &Path, name: &str) {
        fs::create_dir_all(vault.join("blog/attachments")).unwrap();
        fs::write(vault.join("blog/attachments").join(name), b"cover").unwrap();
    }

    #[test]
    fn test_cover_relocated_colocated() {
        let dir = TempDir::new().unwrap();
        let vault = dir.path().join("vault");
        let site = dir.path().join("site");
        write_cover(&vault, "cover.PNG");

        let locations = Locations::new(&vault, "blog/post.md", site.join("posts/post.md"));
        let text = "---\ntitle: x\nImage: ./img/cover.PNG  \n---\nbody";
        let (out, report) = normalize_with(text, &locations);

        assert_eq!(
            out,
            "---\ntitle: x\nimage: ./attachments/cover-image/cover.PNG  \n---\nbody"
        );
        assert_eq!(
            fs::read(site.join("posts/attachments/cover-image/cover.PNG")).unwrap(),
            b"cover"
        );
        assert_eq!(report.copied.len(), 1);
    }

    #[test]
    fn test_cover_relocated_flat() {
        let dir = TempDir::new().unwrap();
        let vault = dir.path().join("vault");
        let site = dir.path().join("site");
        fs::create_dir_all(vault.join("covers")).unwrap();
        fs::write(vault.join("covers/hero.jpg"), b"hero").unwrap();

        let locations =
            Locations::new(&vault, "blog/post.md", "posts/post.md").with_project_folder(&site);
        let addressing = FlatAddressing::new("static/img");
        let scope = RelocationScope::new(&locations, &addressing);
        let mut report = TransformReport::new();

        let out = FrontmatterNormalizer::new().normalize(
            "---\nimage: ./covers/hero.jpg\n---\n",
            &scope,
            &mut report,
        );

        assert_eq!(out, "---\nimage: /static/img/hero.jpg\n---\n");
        assert!(site.join("static/img/hero.jpg").is_file());
    }

    #[test]
    fn test_cover_and_tags_together() {
        let dir = TempDir::new().unwrap();
        let vault = dir.path().join("vault");
        let site = dir.path().join("site");
        write_cover(&vault, "cover.png");

        let locations = Locations::new(&vault, "blog/post.md", site.join("post.md"));
        let text = "---\nimage: ./cover.png\ntags:\n  - #a\n---\n# Body\n";
        let (out, _) = normalize_with(text, &locations);

        assert_eq!(
            out,
            "---\nimage: ./attachments/cover-image/cover.png\ntags: [\"a\"]\n---\n# Body\n"
        );
    }

    #[test]
    fn test_crlf_block() {
        let text = "---\r\ntags:\r\n  - #foo\r\n---\r\nbody\r\n";
        let (out, _) = normalize_with(text, &nowhere());
        assert_eq!(out, "---\r\ntags: [\"foo\"]\r\n---\r\nbody\r\n");
    }
}
