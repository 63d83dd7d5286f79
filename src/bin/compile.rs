//! Schema Compile CLI
//!
//! Compiles descriptor JSON into a builder schema and optionally validates
//! values against it.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use schema_bridge::{create_schema, Descriptor};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-compile")]
#[command(about = "Compile validator descriptors into executable schemas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a descriptor file and print the resulting schema tree
    Build {
        /// Path to the descriptor JSON
        descriptor: PathBuf,
    },

    /// Compile a descriptor file and validate a JSON value against it
    Check {
        /// Path to the descriptor JSON
        descriptor: PathBuf,
        /// Path to the JSON value to validate
        value: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Build { descriptor } => {
            let schema = load_and_compile(&descriptor)?;
            println!("{:#?}", schema);
            Ok(())
        }

        Commands::Check { descriptor, value } => {
            let schema = load_and_compile(&descriptor)?;

            let raw = std::fs::read_to_string(&value)
                .with_context(|| format!("reading {}", value.display()))?;
            let value: serde_json::Value = serde_json::from_str(&raw)?;

            match schema.validate(Some(&value)) {
                Ok(resolved) => {
                    println!("✅ value is valid");
                    if let Some(resolved) = resolved {
                        println!("{}", serde_json::to_string_pretty(&resolved)?);
                    }
                    Ok(())
                }
                Err(violation) => {
                    println!("❌ {}", violation);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn load_and_compile(path: &PathBuf) -> anyhow::Result<schema_bridge::Schema> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let node: Descriptor = serde_json::from_str(&raw)?;

    create_schema(&node)?
        .ok_or_else(|| anyhow::anyhow!("descriptor kind could not be classified"))
}
