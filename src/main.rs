//! # Langdb - Language Lookup Database Generator
//!
//! Scans syntax definition manifests, resolves which definition owns each
//! name, MIME type, extension glob and first-line glob, and writes the
//! resulting tables for the editor to compile in.
//!
//! ## Quick Start
//!
//! ```bash
//! # Regenerate the C++ tables from ./syntax
//! cargo run
//!
//! # Write JSON instead
//! cargo run -- --definitions syntax --out language_db.json --format json
//! ```

mod config;
mod pipeline;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use config::BuildConfig;
use langdb_emit::Format;

/// Langdb - regenerate the syntax lookup database
#[derive(Parser, Debug)]
#[command(name = "langdb")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing definition manifests
    #[arg(short, long, value_name = "DIR", alias = "xml-path")]
    definitions: Option<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "FILE", alias = "out-file")]
    out: Option<PathBuf>,

    /// Output format: qmap, json or toml
    #[arg(short, long)]
    format: Option<Format>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Load and aggregate on worker threads
    #[arg(long)]
    parallel: bool,

    /// Reject definitions that do not set a name
    #[arg(long)]
    strict_names: bool,

    /// Write the effective config to FILE and exit
    #[arg(long, value_name = "FILE")]
    dump_config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Resolves the effective config: file first, then command-line flags.
    fn into_config(self) -> anyhow::Result<BuildConfig> {
        let mut config = match &self.config {
            Some(path) => BuildConfig::load_from(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => BuildConfig::load_default().context("Failed to load default config")?,
        };

        if let Some(dir) = self.definitions {
            config.definitions_dir = dir;
        }
        if let Some(out) = self.out {
            config.out_file = out;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        config.parallel |= self.parallel;
        config.strict_names |= self.strict_names;

        Ok(config)
    }
}

/// Default log directive for a `-v` count.
fn log_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // RUST_LOG takes precedence over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(args.verbose)));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();

    tracing::info!("Starting langdb v{}", env!("CARGO_PKG_VERSION"));

    let dump_path = args.dump_config.clone();
    let config = args.into_config()?;

    if let Some(path) = dump_path {
        config
            .save_to(&path)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        println!("Wrote config to {}", path.display());
        return Ok(());
    }

    let summary = pipeline::run(&config)?;

    println!(
        "Wrote {} ({} definitions, {} entries, {} rejected, {} warnings)",
        config.out_file.display(),
        summary.records,
        summary.entries,
        summary.rejected,
        summary.warnings
    );
    println!("Done. Do not forget to commit the changes");

    Ok(())
}
