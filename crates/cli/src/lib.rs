pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "menucheck",
    about = "Menucheck operator CLI",
    long_about = "Run one-off menu checks, inspect effective configuration, and verify runtime readiness.",
    after_help = "Examples:\n  menucheck check \"Green Leaf @ Irvine, CA\"\n  menucheck check \"Green Leaf\" --location \"Tustin, CA\"\n  menucheck doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Check one restaurant's menu and print the SMS reply that would be sent")]
    Check {
        #[arg(help = "Message text, e.g. \"Green Leaf\" or \"Green Leaf @ Irvine, CA\"")]
        text: String,
        #[arg(long, help = "Search location, overriding any \" @ \" suffix and the defaults")]
        location: Option<String>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, venue credentials, and danger-word list readability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Check { text, location } => commands::check::run(&text, location.as_deref()),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Diagnostics go to stderr so command output stays parseable.
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("MENUCHECK_CLI_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .compact()
        .try_init();
}
