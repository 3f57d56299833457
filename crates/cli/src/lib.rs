pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "ratecard",
    about = "Ratecard operator CLI",
    long_about = "Operate ratecard migrations, seed data, rate-sheet imports, config inspection, and readiness checks.",
    after_help = "Examples:\n  ratecard doctor --json\n  ratecard import rates.csv\n  ratecard seed"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the fallback rate catalog and exchange-rate fixtures into the store")]
    Seed,
    #[command(about = "Import a rate sheet (CSV with Region, Role, and per-seniority columns)")]
    Import {
        #[arg(help = "Path to the CSV rate sheet")]
        file: PathBuf,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, database connectivity, and provider readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Import { file } => commands::import::run(&file),
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
