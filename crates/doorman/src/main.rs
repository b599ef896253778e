mod cli;
mod commands;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use doorman_config::LogLevel;

use crate::cli::{Cli, Command, LogFormat};
use crate::commands::door::DoorOp;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// `RUST_LOG` wins, then `-v`, then the configured level.
fn init_tracing(verbosity: u8, configured: LogLevel, format: LogFormat) {
    let fallback = match verbosity {
        0 => configured.as_filter(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // Logs go to stderr; stdout carries command output only.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Command::Completions(ref args) = cli.command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "doorman", &mut std::io::stdout());
        return Ok(());
    }

    let settings = commands::load_settings(&cli.global);
    let level = settings.as_ref().map_or(LogLevel::default(), |s| s.log_level);
    init_tracing(cli.global.verbose, level, cli.global.log_format);

    match cli.command {
        Command::Invoke(ref args) => commands::invoke::handle(args, settings).await,
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global, settings),
        Command::State => commands::door::handle(DoorOp::State, &settings?).await,
        Command::Open => commands::door::handle(DoorOp::Open, &settings?).await,
        Command::Close => commands::door::handle(DoorOp::Close, &settings?).await,
        Command::Toggle => commands::door::handle(DoorOp::Toggle, &settings?).await,
        Command::Completions(_) => Ok(()),
    }
}
