//! CLI command handlers that bridge CLI arguments to library operations

use crate::cli_bin::args::*;
use log::{debug, info, warn};
use mattersync::config::DEFAULT_CONFIG_FILE;
use mattersync::error::{MatterSyncError, Result};
use mattersync::{
    DocumentReader, Locations, OutputTarget, PullOptions, PushOptions, PushOutcome, SyncConfig,
    SyncSession, TransformReport, Transformer,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One entry of a yaml/json push report
#[derive(Debug, Serialize)]
struct PushSummary<'a> {
    source: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<&'a Path>,
    modified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a TransformReport>,
}

/// Execute the push command
pub fn push_command(args: PushArgs, config_path: Option<&Path>) -> Result<()> {
    debug!("Executing push command with args: {:?}", args);

    let config = load_config(config_path, &args.settings)?;
    let session = SyncSession::new(config)?;
    let target = output_target(args.output.dry_run, args.output.stdout);
    let options = PushOptions {
        destination: args.to.clone(),
        target: target.clone(),
    };

    let vault = session.config().require_vault_root()?;
    let results = if vault.join(&args.note).is_dir() {
        session.push_folder(&args.note, &options)?
    } else {
        vec![(args.note.clone(), session.push(&args.note, &options))]
    };

    // Rewritten notes own stdout in --stdout mode
    let notice = |line: String| {
        if target == OutputTarget::Stdout {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    };

    let mut summaries = Vec::with_capacity(results.len());
    for (note, result) in &results {
        match result {
            Ok(outcome) => {
                if args.output.format == ReportFormat::Text {
                    notice(pushed_line(outcome));
                    if let Some(diff) = &outcome.write.diff {
                        println!("{}", diff);
                    }
                }
                summaries.push(PushSummary {
                    source: &outcome.source,
                    destination: Some(&outcome.destination),
                    modified: outcome.write.modified,
                    error: None,
                    report: Some(&outcome.report),
                });
            }
            Err(err) => {
                if args.output.format == ReportFormat::Text {
                    notice(format!("Failed to push {}: {}", note.display(), err));
                }
                summaries.push(PushSummary {
                    source: note,
                    destination: None,
                    modified: false,
                    error: Some(err.to_string()),
                    report: None,
                });
            }
        }
    }

    match args.output.format {
        ReportFormat::Text => {}
        ReportFormat::Yaml => print!("{}", serde_yaml::to_string(&summaries)?),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
    }

    let total = results.len();
    let errors: Vec<MatterSyncError> = results
        .into_iter()
        .filter_map(|(_, result)| result.err())
        .collect();
    push_failures(errors)?;
    info!("Pushed {} note(s)", total);
    Ok(())
}

/// Execute the pull command
pub fn pull_command(args: PullArgs, config_path: Option<&Path>) -> Result<()> {
    debug!("Executing pull command with args: {:?}", args);

    let config = load_config(config_path, &args.settings)?;
    let session = SyncSession::new(config)?;
    let options = PullOptions {
        source: args.from.clone(),
        target: output_target(args.dry_run, args.stdout),
    };

    let outcome = session.pull(&args.note, &options)?;
    match options.target {
        OutputTarget::Stdout => {}
        OutputTarget::DryRun => {
            if let Some(diff) = outcome.write.diff {
                println!("{}", diff);
            }
        }
        OutputTarget::File => {
            if outcome.write.modified {
                println!(
                    "Pulled {} -> {}",
                    outcome.source.display(),
                    outcome.destination.display()
                );
            } else {
                println!("Unchanged {}", outcome.destination.display());
            }
        }
    }
    Ok(())
}

/// Execute the transform command
pub fn transform_command(args: TransformArgs, config_path: Option<&Path>) -> Result<()> {
    debug!("Executing transform command with args: {:?}", args);

    let config = load_config(config_path, &args.settings)?;
    config.validate()?;

    let text = DocumentReader::new().read_file(&args.file)?;
    let vault = match &config.vault_root {
        Some(vault) => vault.clone(),
        None => parent_or_current(&args.file),
    };
    let source_path = match &args.source_path {
        Some(path) => path.clone(),
        None => args
            .file
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| MatterSyncError::invalid_file_format(&args.file))?,
    };

    let locations = Locations::new(vault, source_path, &args.dest);
    let locations = match &config.project_folder {
        Some(project) => locations.with_project_folder(project),
        None => locations,
    };

    let output = Transformer::new(&config)
        .dry_run(args.dry_run)
        .transform(&text, &locations)?;
    print!("{}", output.text);

    if !output.report.is_empty() {
        info!("{}", output.report.summary());
    }
    Ok(())
}

/// Execute the config command
pub fn config_command(args: ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, &args.settings)?;
    if let Err(err) = config.validate() {
        warn!("{}", err);
    }

    match args.format {
        ConfigFormat::Yaml => print!("{}", config.to_yaml()?),
        ConfigFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}

/// Load the settings file (explicit, or the default one when present) and
/// apply command-line overrides on top
fn load_config(config_path: Option<&Path>, overrides: &SettingsOverrides) -> Result<SyncConfig> {
    let mut config = match config_path {
        Some(path) => SyncConfig::load(path)?,
        None => SyncConfig::load_or_default(DEFAULT_CONFIG_FILE)?,
    };
    apply_overrides(&mut config, overrides);
    Ok(config)
}

fn apply_overrides(config: &mut SyncConfig, overrides: &SettingsOverrides) {
    if let Some(vault) = &overrides.vault {
        config.vault_root = Some(vault.clone());
    }
    if let Some(project) = &overrides.project {
        config.project_folder = Some(project.clone());
    }
    if let Some(mode) = overrides.mode {
        config.mode = mode.into();
    }
    if let Some(folder) = &overrides.images_folder {
        config.images_folder = folder.clone();
    }
    if let Some(policy) = overrides.missing_images() {
        config.missing_images = policy;
    }
}

fn output_target(dry_run: bool, stdout: bool) -> OutputTarget {
    if dry_run {
        OutputTarget::DryRun
    } else if stdout {
        OutputTarget::Stdout
    } else {
        OutputTarget::File
    }
}

/// A single failure is returned as is, several are wrapped together
fn push_failures(mut errors: Vec<MatterSyncError>) -> Result<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(MatterSyncError::multiple(errors)),
    }
}

fn pushed_line(outcome: &PushOutcome) -> String {
    format!(
        "Pushed {} -> {}",
        outcome.source.display(),
        outcome.destination.display()
    )
}

fn parent_or_current(path: &Path) -> PathBuf {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mattersync::{AddressingMode, MissingImagePolicy};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_apply_overrides() {
        let mut config = SyncConfig::default();
        let overrides = SettingsOverrides {
            vault: Some(PathBuf::from("/vault")),
            project: Some(PathBuf::from("/site")),
            mode: Some(ModeArg::Flat),
            images_folder: Some("public/images".to_string()),
            silent_missing: true,
        };
        apply_overrides(&mut config, &overrides);

        assert_eq!(config.vault_root, Some(PathBuf::from("/vault")));
        assert_eq!(config.project_folder, Some(PathBuf::from("/site")));
        assert_eq!(config.mode, AddressingMode::Flat);
        assert_eq!(config.images_folder, "public/images");
        assert_eq!(config.missing_images, MissingImagePolicy::Silent);
    }

    #[test]
    fn test_empty_overrides_keep_settings() {
        let mut config = SyncConfig {
            images_folder: "static".to_string(),
            ..Default::default()
        };
        apply_overrides(&mut config, &SettingsOverrides::default());
        assert_eq!(config.images_folder, "static");
        assert_eq!(config.missing_images, MissingImagePolicy::Warn);
    }

    #[test]
    fn test_push_failures() {
        assert!(push_failures(Vec::new()).is_ok());

        let single = push_failures(vec![MatterSyncError::file_not_found("a.md")]).unwrap_err();
        assert!(matches!(single, MatterSyncError::FileNotFound { .. }));

        let several = push_failures(vec![
            MatterSyncError::file_not_found("a.md"),
            MatterSyncError::project_root_missing("/site"),
        ])
        .unwrap_err();
        match several {
            MatterSyncError::Multiple { errors } => assert_eq!(errors.len(), 2),
            other => panic!("expected multiple errors, got {:?}", other),
        }
    }

    #[test]
    fn test_output_target() {
        assert_eq!(output_target(true, false), OutputTarget::DryRun);
        assert_eq!(output_target(false, true), OutputTarget::Stdout);
        assert_eq!(output_target(false, false), OutputTarget::File);
    }

    #[test]
    fn test_parent_or_current() {
        assert_eq!(parent_or_current(Path::new("note.md")), PathBuf::from("."));
        assert_eq!(
            parent_or_current(Path::new("blog/note.md")),
            PathBuf::from("blog")
        );
    }
}
