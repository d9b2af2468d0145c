use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod records;
mod remote;

use commands::{ConfigCommand, DedupCommand, DeleteCommand, PushCommand, StatusCommand};
use config::Config;

#[derive(Parser)]
#[command(name = "sheetsync")]
#[command(version)]
#[command(about = "Sync local records into spreadsheet rows by primary key", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update rows from a file of records
    Push(PushCommand),

    /// Show which records differ from the sheet
    Status(StatusCommand),

    /// Remove duplicate rows sharing a primary key
    Dedup(DedupCommand),

    /// Delete rows by primary key
    Delete(DeleteCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "sheetsync=info,sheetsync_core=info",
        1 => "sheetsync=debug,sheetsync_core=debug",
        _ => "sheetsync=trace,sheetsync_core=trace,reqwest=debug",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load(cli.config)?;

    match &cli.command {
        Some(Commands::Push(cmd)) => cmd.run(&config)?,
        Some(Commands::Status(cmd)) => cmd.run(&config)?,
        Some(Commands::Dedup(cmd)) => cmd.run(&config)?,
        Some(Commands::Delete(cmd)) => cmd.run(&config)?,
        Some(Commands::Config(cmd)) => cmd.run(&config)?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
