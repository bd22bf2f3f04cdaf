//! Command-line argument definitions and parsing

use clap::{Args, Parser, Subcommand, ValueEnum};
use mattersync::{AddressingMode, MissingImagePolicy};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "mattersync",
    version,
    about = "Push markdown notes and their embedded images from a vault into a project",
    long_about = "mattersync copies a note out of a vault into an external project folder. \
                  `![[image]]` embeds are rewritten to standard markdown image links and the \
                  images copied next to the note (or into one flat asset folder), bullet-list \
                  tags are inlined and the frontmatter cover image is relocated."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Settings file (defaults to ./mattersync.yaml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Push a note (or every note in a folder) into the project
    Push(PushArgs),
    /// Copy a note from the project back into the vault
    Pull(PullArgs),
    /// Transform a single file and print the result
    Transform(TransformArgs),
    /// Show the effective settings
    Config(ConfigArgs),
}

/// Settings that override the settings file
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// Vault root directory
    #[arg(long, value_name = "DIR")]
    pub vault: Option<PathBuf>,

    /// Project folder notes are pushed to
    #[arg(long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Image addressing mode
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Flat-mode asset folder, relative to the project folder
    #[arg(long, value_name = "PATH")]
    pub images_folder: Option<String>,

    /// Do not warn about images missing from the vault
    #[arg(long)]
    pub silent_missing: bool,
}

/// Common options for commands that write notes
#[derive(Args, Debug, Clone)]
pub struct OutputOptions {
    /// Preview changes without writing or copying anything (show diff)
    #[arg(long)]
    pub dry_run: bool,

    /// Print the rewritten note to stdout instead of writing it
    #[arg(long, conflicts_with = "dry_run")]
    pub stdout: bool,

    /// How to print the result summary
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

/// Image addressing modes
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// `attachments/` next to the pushed note
    Colocated,
    /// One asset folder, referenced from the site root
    Flat,
}

impl From<ModeArg> for AddressingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Colocated => AddressingMode::Colocated,
            ModeArg::Flat => AddressingMode::Flat,
        }
    }
}

impl SettingsOverrides {
    pub fn missing_images(&self) -> Option<MissingImagePolicy> {
        self.silent_missing.then_some(MissingImagePolicy::Silent)
    }
}

/// Output formats for summaries
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// One line per note
    Text,
    /// YAML report
    Yaml,
    /// JSON report
    Json,
}

/// Arguments for the push command
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Note or folder to push, relative to the vault root
    pub note: PathBuf,

    /// Destination path, relative to the project folder (a folder when pushing a folder)
    #[arg(long, value_name = "PATH")]
    pub to: Option<PathBuf>,

    #[command(flatten)]
    pub settings: SettingsOverrides,

    #[command(flatten)]
    pub output: OutputOptions,
}

/// Arguments for the pull command
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Note to pull, relative to the vault root
    pub note: PathBuf,

    /// Source path, relative to the project folder (defaults to the note path)
    #[arg(long, value_name = "PATH")]
    pub from: Option<PathBuf>,

    #[command(flatten)]
    pub settings: SettingsOverrides,

    /// Preview changes without writing (show diff)
    #[arg(long)]
    pub dry_run: bool,

    /// Print the note to stdout instead of writing it
    #[arg(long, conflicts_with = "dry_run")]
    pub stdout: bool,
}

/// Arguments for the transform command
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Note file to read
    pub file: PathBuf,

    /// The note's path relative to the vault root (defaults to its file name)
    #[arg(long, value_name = "PATH")]
    pub source_path: Option<PathBuf>,

    /// Where the note will be written; decides where images are copied
    #[arg(long, value_name = "PATH", required = true)]
    pub dest: PathBuf,

    #[command(flatten)]
    pub settings: SettingsOverrides,

    /// Resolve and rewrite references without copying images
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub settings: SettingsOverrides,

    /// Output format
    #[arg(long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Output formats for the config command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}
