//! Client Registry CLI - data file maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Write the three seed records (refuses to overwrite without --force)
//! registry-cli seed --force
//!
//! # Replace the data file with records from a YAML list
//! registry-cli import clients.yaml
//!
//! # Print the stored records
//! registry-cli list
//!
//! # Check a CPF against the checksum rule
//! registry-cli check-cpf 529.982.247-25
//! ```
//!
//! The data file defaults to `REGISTRY_DATA_FILE`, then `data/clients.json`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

/// Data file used when neither `--data-file` nor `REGISTRY_DATA_FILE` is set.
const DEFAULT_DATA_FILE: &str = "data/clients.json";

#[derive(Parser)]
#[command(name = "registry-cli")]
#[command(author, version, about = "Client registry maintenance tools")]
struct Cli {
    /// Path to the JSON data file
    #[arg(long, global = true, env = "REGISTRY_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the seed records to the data file
    Seed {
        /// Overwrite an existing data file
        #[arg(short, long)]
        force: bool,
    },
    /// Replace the data file with client payloads from a YAML list
    Import {
        /// YAML file holding a list of client payloads
        file: PathBuf,
    },
    /// Print the stored records as JSON
    List,
    /// Report whether a CPF passes the checksum rule
    CheckCpf {
        /// CPF, bare digits or masked
        value: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed { force } => commands::seed::write_seed(&cli.data_file, force).await?,
        Commands::Import { file } => {
            commands::import::from_yaml(&cli.data_file, &file).await?;
        }
        Commands::List => commands::list::print_all(&cli.data_file).await?,
        Commands::CheckCpf { value } => commands::check::cpf(&value)?,
    }
    Ok(())
}
