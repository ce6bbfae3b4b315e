//! Command-line wrapper around `itemsets_core`.
//!
//! # Responsibility
//! - Own the file I/O the core leaves to callers.
//! - Map core errors to a non-zero exit status with a readable message.

use clap::{Parser, Subcommand};
use itemsets_core::{init_logging, LoggingConfig};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "itemsets", version, about = "Read and rewrite client item-set preferences")]
struct Cli {
    /// trace|debug|info|warn|error; overrides `ITEMSETS_LOG_LEVEL`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; overrides `ITEMSETS_LOG_DIR`.
    /// Logs go to stderr when neither is set.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the item-set document embedded in a preferences file.
    Extract {
        envelope: PathBuf,
        /// Print compact JSON instead of pretty JSON.
        #[arg(long)]
        compact: bool,
    },
    /// Print the checksum for an item-set JSON document.
    Checksum { document: PathBuf },
    /// Replace the item sets in a preferences file.
    Rewrite {
        envelope: PathBuf,
        document: PathBuf,
        /// Write here instead of overwriting the envelope.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = logging_config(&cli, LoggingConfig::from_env());
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: logging disabled: {err}");
    }

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=command_failed module=cli status=error error={err}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Flags win over the environment-derived `base`.
fn logging_config(cli: &Cli, base: LoggingConfig) -> LoggingConfig {
    LoggingConfig {
        level: cli.log_level.clone().unwrap_or(base.level),
        log_dir: cli.log_dir.clone().or(base.log_dir),
    }
}
