//! Clap derive structures for the `doorman` CLI.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// doorman -- keypad codes for a MyQ garage door
#[derive(Debug, Parser)]
#[command(
    name = "doorman",
    version,
    about = "Open and close a MyQ garage door from keypad codes",
    long_about = "Checks a submitted code against the family and cleaner codes and \
        operates the first garage door opener on the MyQ account.\n\n\
        Secrets (ACCOUNT, PASSWORD, CLEANER_CODE, FAMILY_CODE, CLEANER_DAY) are \
        read from the environment, then from the system keyring.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, env = "DOORMAN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// MyQ API base URL (overrides settings)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (overrides settings)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Handle one submitted code and print the response JSON
    Invoke(InvokeArgs),

    /// Print the current door state
    State,

    /// Open the door (no code check)
    Open,

    /// Close the door (no code check)
    Close,

    /// Toggle the door (no code check)
    Toggle,

    /// Inspect settings and store secrets
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct InvokeArgs {
    /// Invocation event JSON, e.g. '{"body-json": "code=1234"}'
    #[arg(long, conflicts_with = "code")]
    pub event: Option<String>,

    /// Submitted code (shorthand for an event carrying `code=<CODE>`)
    #[arg(long)]
    pub code: Option<String>,

    /// Evaluate as if at this instant (RFC 3339) instead of now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the settings file path
    Path,

    /// Print the effective settings as TOML
    Show,

    /// Store a secret in the system keyring (value read from stdin)
    SetSecret {
        /// Secret name
        #[arg(value_parser = doorman_config::secrets::ALL_KEYS)]
        key: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
