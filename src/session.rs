//! Push and pull orchestration
//!
//! A [`SyncSession`] checks that both roots exist, reads the note, runs the
//! transform and writes the result. Everything path-related the host would
//! normally provide comes from [`SyncConfig`].

use crate::config::SyncConfig;
use crate::core::{Locations, TransformReport, Transformer};
use crate::error::{MatterSyncError, Result};
use crate::io::{DocumentReader, DocumentWriter, OutputTarget, WriteResult};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Options for a single push
#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    /// Destination note path, absolute or relative to the project folder.
    /// Defaults to the note's path inside the vault. For folder pushes this
    /// is the destination folder.
    pub destination: Option<PathBuf>,
    pub target: OutputTarget,
}

/// Options for a single pull
#[derive(Debug, Clone, Default)]
pub struct PullOptions {
    /// Source note path, absolute or relative to the project folder.
    /// Defaults to the note's path inside the vault.
    pub source: Option<PathBuf>,
    pub target: OutputTarget,
}

/// What a push did
#[derive(Debug, Clone)]
pub struct PushOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub report: TransformReport,
    pub write: WriteResult,
}

/// What a pull did
#[derive(Debug, Clone)]
pub struct PullOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub write: WriteResult,
}

/// Pushes notes from the vault into the project and pulls them back
pub struct SyncSession {
    config: SyncConfig,
    transformer: Transformer,
    preview: Transformer,
    reader: DocumentReader,
    writer: DocumentWriter,
}

impl SyncSession {
    /// Create a session, validating the configuration
    pub fn new(config: SyncConfig) -> Result<Self> {
        Self::with_io(config, DocumentReader::new(), DocumentWriter::new())
    }

    /// Create a session with custom reader and writer
    pub fn with_io(
        config: SyncConfig,
        reader: DocumentReader,
        writer: DocumentWriter,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            transformer: Transformer::new(&config),
            preview: Transformer::new(&config).dry_run(true),
            config,
            reader,
            writer,
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Push one note, `note` being relative to the vault root (or absolute
    /// inside it)
    pub fn push<P: AsRef<Path>>(&self, note: P, options: &PushOptions) -> Result<PushOutcome> {
        let (vault, project) = self.roots()?;
        let note = vault_relative(vault, note.as_ref())?;
        let destination = options.destination.clone().unwrap_or_else(|| note.clone());
        self.push_resolved(vault, project, note, destination, &options.target)
    }

    /// Push every markdown note beneath `folder`
    ///
    /// Each note is pushed independently; one failure does not stop the rest.
    /// Fails up front only when a root is missing or the folder does not exist.
    pub fn push_folder<P: AsRef<Path>>(
        &self,
        folder: P,
        options: &PushOptions,
    ) -> Result<Vec<(PathBuf, Result<PushOutcome>)>> {
        let (vault, project) = self.roots()?;
        let folder = vault_relative(vault, folder.as_ref())?;
        let notes = self.reader.markdown_files(vault.join(&folder))?;
        if notes.is_empty() {
            warn!("No notes found in {}", vault.join(&folder).display());
        }

        let outcomes = notes
            .into_iter()
            .map(|relative| {
                let note = folder.join(&relative);
                let destination = match &options.destination {
                    Some(dir) => dir.join(&relative),
                    None => note.clone(),
                };
                let outcome =
                    self.push_resolved(vault, project, note.clone(), destination, &options.target);
                (note, outcome)
            })
            .collect();
        Ok(outcomes)
    }

    /// Copy a note from the project back into the vault, unchanged
    pub fn pull<P: AsRef<Path>>(&self, note: P, options: &PullOptions) -> Result<PullOutcome> {
        let (vault, project) = self.roots()?;
        let note = vault_relative(vault, note.as_ref())?;
        let source = project.join(options.source.as_deref().unwrap_or(note.as_path()));
        let destination = vault.join(&note);

        let text = self.reader.read_file(&source)?;
        let write = self.writer.write_file(&text, &destination, &options.target)?;
        info!("Pulled {} -> {}", source.display(), destination.display());

        Ok(PullOutcome {
            source,
            destination,
            write,
        })
    }

    fn push_resolved(
        &self,
        vault: &Path,
        project: &Path,
        note: PathBuf,
        destination: PathBuf,
        target: &OutputTarget,
    ) -> Result<PushOutcome> {
        let source = vault.join(&note);
        let locations = Locations::new(vault, note, destination).with_project_folder(project);
        let destination = locations.destination_path();
        debug!("Pushing {} -> {}", source.display(), destination.display());

        let text = self.reader.read_file(&source)?;
        let transformer = match target {
            OutputTarget::File => &self.transformer,
            OutputTarget::Stdout | OutputTarget::DryRun => &self.preview,
        };
        let output = transformer.transform(&text, &locations)?;
        let write = self.writer.write_file(&output.text, &destination, target)?;
        info!(
            "Pushed {} -> {} ({})",
            source.display(),
            destination.display(),
            output.report.summary()
        );

        Ok(PushOutcome {
            source,
            destination,
            report: output.report,
            write,
        })
    }

    /// Vault root and project folder, both checked to exist
    fn roots(&self) -> Result<(&Path, &Path)> {
        let vault = self.config.require_vault_root()?;
        if !vault.is_dir() {
            return Err(MatterSyncError::vault_root_missing(vault));
        }
        let project = self.config.require_project_folder()?;
        if !project.is_dir() {
            return Err(MatterSyncError::project_root_missing(project));
        }
        Ok((vault, project))
    }
}

fn vault_relative(vault: &Path, note: &Path) -> Result<PathBuf> {
    if note.is_relative() {
        return Ok(note.to_path_buf());
    }
    note.strip_prefix(vault)
        .map(Path::to_path_buf)
        .map_err(|_| {
            MatterSyncError::path_resolution(format!(
                "{} is not inside the vault {}",
                note.display(),
                vault.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AddressingMode;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    struct Workspace {
        _dir: TempDir,
        vault: PathBuf,
        project: PathBuf,
    }

    fn workspace() -> Workspace {
        let dir = TempDir::new().unwrap();
        let vault = dir.path().join("vault");
        let project = dir.path().join("project");
        fs::create_dir_all(vault.join("blog/attachments")).unwrap();
        fs::create_dir_all(&project).unwrap();
        Workspace {
            _dir: dir,
            vault,
            project,
        }
    }

    fn session(ws: &Workspace) -> SyncSession {
        SyncSession::new(SyncConfig {
            vault_root: Some(ws.vault.clone()),
            project_folder: Some(ws.project.clone()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_push_default_destination() {
        let ws = workspace();
        fs::write(ws.vault.join("blog/post.md"), "![[a.png]]\n").unwrap();
        fs::write(ws.vault.join("blog/attachments/a.png"), b"a").unwrap();

        let outcome = session(&ws)
            .push("blog/post.md", &PushOptions::default())
            .unwrap();

        assert_eq!(outcome.destination, ws.project.join("blog/post.md"));
        assert_eq!(
            fs::read_to_string(ws.project.join("blog/post.md")).unwrap(),
            "![a.png](./attachments/a.png)\n"
        );
        assert!(ws.project.join("blog/attachments/a.png").is_file());
        assert!(outcome.write.modified);
    }

    #[test]
    fn test_push_absolute_note_path() {
        let ws = workspace();
        fs::write(ws.vault.join("blog/post.md"), "text\n").unwrap();

        let options = PushOptions {
            destination: Some(PathBuf::from("content/p.md")),
            ..Default::default()
        };
        let outcome = session(&ws)
            .push(ws.vault.join("blog/post.md"), &options)
            .unwrap();

        assert_eq!(outcome.destination, ws.project.join("content/p.md"));
        assert!(ws.project.join("content/p.md").is_file());
    }

    #[test]
    fn test_push_note_outside_vault() {
        let ws = workspace();
        let err = session(&ws)
            .push("/somewhere/else.md", &PushOptions::default())
            .unwrap_err();
        assert!(matches!(err, MatterSyncError::PathResolution { .. }));
    }

    #[test]
    fn test_push_missing_project_root() {
        let ws = workspace();
        fs::write(ws.vault.join("blog/post.md"), "text\n").unwrap();
        fs::remove_dir_all(&ws.project).unwrap();

        let err = session(&ws)
            .push("blog/post.md", &PushOptions::default())
            .unwrap_err();
        assert!(matches!(err, MatterSyncError::ProjectRootMissing { .. }));
    }

    #[test]
    fn test_push_missing_note() {
        let ws = workspace();
        let err = session(&ws)
            .push("blog/none.md", &PushOptions::default())
            .unwrap_err();
        assert!(matches!(err, MatterSyncError::FileNotFound { .. }));
    }

    #[test]
    fn test_push_dry_run_touches_nothing() {
        let ws = workspace();
        fs::write(ws.vault.join("blog/post.md"), "![[a.png]]\n").unwrap();
        fs::write(ws.vault.join("blog/attachments/a.png"), b"a").unwrap();

        let options = PushOptions {
            target: OutputTarget::DryRun,
            ..Default::default()
        };
        let outcome = session(&ws).push("blog/post.md", &options).unwrap();

        assert!(outcome.write.diff.unwrap().contains("+![a.png](./attachments/a.png)"));
        assert!(!ws.project.join("blog").exists());
    }

    #[test]
    fn test_push_folder() {
        let ws = workspace();
        fs::write(ws.vault.join("blog/one.md"), "one\n").unwrap();
        fs::create_dir_all(ws.vault.join("blog/nested")).unwrap();
        fs::write(ws.vault.join("blog/nested/two.md"), "two\n").unwrap();

        let options = PushOptions {
            destination: Some(PathBuf::from("content")),
            ..Default::default()
        };
        let outcomes = session(&ws).push_folder("blog", &options).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|(_, outcome)| outcome.is_ok()));
        assert!(ws.project.join("content/one.md").is_file());
        assert!(ws.project.join("content/nested/two.md").is_file());
    }

    #[test]
    fn test_pull_copies_verbatim() {
        let ws = workspace();
        fs::create_dir_all(ws.project.join("blog")).unwrap();
        let text = "---\ntags: [\"a\"]\n---\n![a.png](./attachments/a.png)\n";
        fs::write(ws.project.join("blog/post.md"), text).unwrap();

        let outcome = session(&ws)
            .pull("blog/post.md", &PullOptions::default())
            .unwrap();

        assert_eq!(outcome.destination, ws.vault.join("blog/post.md"));
        assert_eq!(
            fs::read_to_string(ws.vault.join("blog/post.md")).unwrap(),
            text
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = SyncSession::new(SyncConfig {
            mode: AddressingMode::Flat,
            ..Default::default()
        });
        assert!(matches!(result, Err(MatterSyncError::Config { .. })));
    }

    #[test]
    fn test_unset_vault_root() {
        let session = SyncSession::new(SyncConfig::default()).unwrap();
        let err = session
            .push("post.md", &PushOptions::default())
            .unwrap_err();
        assert!(matches!(err, MatterSyncError::Config { .. }));
    }
}
