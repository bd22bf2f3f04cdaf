mod cli_bin;

use anyhow::Result;
use clap::Parser;
use cli_bin::args::{Cli, Commands};
use cli_bin::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Push(args) => commands::push_command(args, config)?,
        Commands::Pull(args) => commands::pull_command(args, config)?,
        Commands::Transform(args) => commands::transform_command(args, config)?,
        Commands::Config(args) => commands::config_command(args, config)?,
    }

    Ok(())
}

/// RUST_LOG wins over -v/-q when set
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
