//! skillkeep CLI
//!
//! Command-line interface for skillkeep - versioned skill documents.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use skillkeep_core::{Config, SkillRepo};

mod commands;
mod editor;
mod output;

use output::{Output, OutputFormat};

/// Default filter when RUST_LOG is not set
const DEFAULT_LOG_FILTER: &str = "skillkeep_core=warn,skillkeep_cli=warn";

#[derive(Parser)]
#[command(name = "skillkeep")]
#[command(about = "skillkeep - Version history for skill documents")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all skills
    #[command(alias = "ls")]
    List {
        /// Show version counts
        #[arg(short, long)]
        verbose: bool,
    },
    /// Show a skill's document and recent versions
    Show {
        /// Skill name
        name: String,
    },
    /// Create a new skill
    Create {
        /// Skill name
        name: String,
        /// Description written into the front matter
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Show version history
    #[command(alias = "log")]
    History {
        /// Skill name
        name: String,
    },
    /// Save the current document as a new version
    Save {
        /// Skill name
        name: String,
        /// Version message
        message: Option<String>,
    },
    /// Roll back to a version (1 = most recent)
    Rollback {
        /// Skill name
        name: String,
        /// Version number
        #[arg(value_name = "VERSION", default_value_t = 1, allow_negative_numbers = true)]
        index: i64,
    },
    /// Compare two versions
    Diff {
        /// Skill name
        name: String,
        /// Newer version
        #[arg(default_value_t = 1, allow_negative_numbers = true)]
        v1: i64,
        /// Older version
        #[arg(default_value_t = 2, allow_negative_numbers = true)]
        v2: i64,
    },
    /// Save a version before editing
    Update {
        /// Skill name
        name: String,
        /// Version message
        message: Option<String>,
        /// Open the document in $EDITOR after saving
        #[arg(short, long)]
        edit: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (skills_dir, versions_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    match run(cli, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, output: &Output) -> Result<()> {
    let config_path = cli.config.as_ref();

    // Config commands work even when the config file is broken
    if let Commands::Config { command } = cli.command {
        return match command {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    let repo = SkillRepo::open(config);

    match cli.command {
        Commands::List { verbose } => commands::skill::list(&repo, verbose, output),
        Commands::Show { name } => commands::skill::show(&repo, name, output),
        Commands::Create { name, description } => {
            commands::skill::create(&repo, name, description, output)
        }
        Commands::History { name } => commands::version::history(&repo, name, output),
        Commands::Save { name, message } => commands::version::save(&repo, name, message, output),
        Commands::Rollback { name, index } => {
            commands::version::rollback(&repo, name, index, output)
        }
        Commands::Diff { name, v1, v2 } => commands::version::diff(&repo, name, v1, v2, output),
        Commands::Update {
            name,
            message,
            edit,
        } => commands::version::update(&repo, name, message, edit, output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Initialize logging to stderr, or to the configured log file
///
/// RUST_LOG overrides the default filter in both cases.
fn init_logging(config: &Config) {
    let env_filter = |fallback: &str| {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    };

    if let Some(log_path) = &config.log_file {
        match File::options().create(true).append(true).open(log_path) {
            Ok(log_file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter("skillkeep_core=debug,skillkeep_cli=debug"))
                    .with_ansi(false)
                    .with_writer(Mutex::new(log_file))
                    .try_init();
                debug!("logging initialized to {:?}", log_path);
                return;
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            }
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_LOG_FILTER))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
