pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "dinebot",
    about = "Dinebot operator CLI",
    long_about = "Inspect configuration, check readiness, migrate the database, seed restaurants \
                  from the business directory, and run the suggestion worker by hand.",
    after_help = "Examples:\n  dinebot doctor --json\n  dinebot seed --cuisine thai --cuisine \
                  korean\n  dinebot dispatch"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, database connectivity, and integration readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Fetch restaurant listings from the business directory into the store")]
    Seed {
        #[arg(long = "cuisine", help = "Cuisine to seed; repeat to seed several")]
        cuisines: Vec<String>,
    },
    #[command(about = "Run one worker invocation against the suggestion queue")]
    Dispatch,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Migrate => commands::migrate::run(),
        Command::Seed { cuisines } => commands::seed::run(cuisines),
        Command::Dispatch => commands::dispatch::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Command output owns stdout, so diagnostics go to stderr.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("DINEBOT_CLI_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
