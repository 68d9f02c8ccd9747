//! Certificate Lookup CLI - lookups from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Look up certificates and print the records
//! cert-cli lookup 12345678 87654321
//!
//! # Same, as JSON, appending each row to the spreadsheet
//! cert-cli lookup 12345678 --json --persist
//!
//! # Process a CSV with a cert_number column (dry run prints rows as CSV)
//! cert-cli batch certs.csv [--persist]
//! ```
//!
//! # Commands
//!
//! - `lookup` - Look up certificates given on the command line
//! - `batch` - Look up every `cert_number` row of a CSV file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cert-cli")]
#[command(author, version, about = "Certificate lookup CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one or more certificate numbers
    Lookup {
        /// Certificate numbers, used verbatim after trimming
        #[arg(required = true)]
        certs: Vec<String>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,

        /// Append each row to the configured spreadsheet
        #[arg(long)]
        persist: bool,
    },
    /// Look up every row of a CSV file with a `cert_number` column
    Batch {
        /// Path to the CSV file
        file: PathBuf,

        /// Append rows to the configured spreadsheet instead of printing them
        #[arg(long)]
        persist: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Lookup {
            certs,
            json,
            persist,
        } => commands::lookup::run(&certs, json, persist).await?,
        Commands::Batch { file, persist } => {
            let summary = commands::batch::run(&file, persist).await?;
            if summary.failed_persists > 0 {
                return Err(
                    format!("{} rows could not be persisted", summary.failed_persists).into(),
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_lookup_flags() {
        let cli = Cli::try_parse_from(["cert-cli", "lookup", "1", "2", "--json"]).unwrap();
        match cli.command {
            Commands::Lookup {
                certs,
                json,
                persist,
            } => {
                assert_eq!(certs, ["1", "2"]);
                assert!(json);
                assert!(!persist);
            }
            Commands::Batch { .. } => panic!("expected lookup"),
        }
    }

    #[test]
    fn test_lookup_requires_a_cert() {
        assert!(Cli::try_parse_from(["cert-cli", "lookup"]).is_err());
    }
}
