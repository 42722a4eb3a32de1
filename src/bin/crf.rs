//! crf CLI
//!
//! Command-line interface for writing and inspecting encrypted CRF files.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crfile::{Config, CrfError, CrfKey, CrfStore, PlaintextRecord, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// crf
#[derive(Parser, Debug)]
#[command(name = "crf")]
#[command(about = "Encrypted credit record file tool")]
#[command(version)]
struct Args {
    /// Base64 envelope key
    #[arg(short, long, env = "CRF_KEY", hide_env_values = true, global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new envelope key and print it
    Keygen,

    /// Encrypt records from a JSON array into a CRF file
    Write {
        /// JSON file holding an array of records
        input: PathBuf,

        /// CRF file to create
        output: PathBuf,

        /// Format version to write
        #[arg(long, default_value_t = crfile::container::CURRENT_VERSION)]
        format_version: u16,

        /// Skip fsync after writing
        #[arg(long)]
        no_sync: bool,
    },

    /// Decrypt a CRF file and print its records as JSON
    Read {
        /// CRF file to read
        path: PathBuf,
    },

    /// Print format version and record count
    Meta {
        /// CRF file to inspect
        path: PathBuf,
    },

    /// Find one record by its plaintext identifier
    Lookup {
        /// CRF file to search
        path: PathBuf,

        /// Identifier to hash and look up
        identifier: String,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,crfile=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Commands::Keygen => {
            println!("{}", CrfKey::generate().to_base64());
            tracing::info!("Generated key; store it somewhere safer than a text file");
        }
        Commands::Write {
            input,
            output,
            format_version,
            no_sync,
        } => {
            let config = Config::builder()
                .format_version(format_version)
                .sync_on_write(!no_sync)
                .build();
            let store = open_store(args.key.as_deref(), config)?;

            let json = fs::read_to_string(&input)?;
            let records: Vec<PlaintextRecord> = serde_json::from_str(&json)
                .map_err(|e| CrfError::Serialization(format!("{}: {}", input.display(), e)))?;

            store.write(&output, &records)?;
            tracing::info!("Wrote {} records to {}", records.len(), output.display());
        }
        Commands::Read { path } => {
            let store = open_store(args.key.as_deref(), Config::default())?;
            let records = store.read(&path)?;
            print_json(&records)?;
        }
        Commands::Meta { path } => {
            let store = open_store(args.key.as_deref(), Config::default())?;
            let metadata = store.read_metadata(&path)?;
            print_json(&metadata)?;
        }
        Commands::Lookup { path, identifier } => {
            let store = open_store(args.key.as_deref(), Config::default())?;
            match store.lookup(&path, &identifier)? {
                Some(record) => print_json(&record)?,
                None => {
                    tracing::info!("No record for that identifier");
                    std::process::exit(2);
                }
            }
        }
    }
    Ok(())
}

fn open_store(key: Option<&str>, config: Config) -> Result<CrfStore> {
    let key = key.ok_or_else(|| CrfError::Key("no key given (use --key or CRF_KEY)".to_string()))?;
    CrfStore::with_key(config, &CrfKey::from_base64(key)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CrfError::Serialization(e.to_string()))?;
    println!("{}", text);
    Ok(())
}
