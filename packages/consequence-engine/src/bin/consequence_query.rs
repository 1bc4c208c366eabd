//! Consequence Query CLI
//!
//! Loads a compiler output directory as one compilation event and prints
//! JSON.
//!
//! # Usage
//!
//! ```bash
//! # Consequences of violating pay_rent in the final instance
//! consequence-query --dir out/ query pay_rent --kind violation
//!
//! # Same, in a component instance
//! consequence-query --dir out/ query pay_rent --instance core_lease
//!
//! # Whole-instance report, instance listing, support profile
//! consequence-query --dir out/ analyze
//! consequence-query --dir out/ instances
//! consequence-query --dir out/ support --instance core_lease
//! ```
//!
//! Logging goes to stderr; filter with `RUST_LOG` (e.g. `RUST_LOG=debug`).

use clap::{Parser, Subcommand};
use consequence_engine::{
    AnalysisKind, ConsequenceService, DirectoryArtifactSource, EngineConfig,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "consequence-query")]
#[command(about = "Consequence discovery over compiled contract solution spaces", long_about = None)]
struct Cli {
    /// Compiler output directory
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Engine configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Artifact-set id the directory is published under
    #[arg(long, default_value = "default")]
    artifact_set: String,

    /// Compact JSON output
    #[arg(long)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Consequences of one predicate
    Query {
        /// Predicate name
        predicate: String,

        /// violation or fulfillment
        #[arg(short, long, default_value = "violation")]
        kind: AnalysisKind,

        /// Instance (defaults to the final instance)
        #[arg(short, long)]
        instance: Option<String>,

        /// Also print example scenarios
        #[arg(long)]
        samples: bool,
    },

    /// Violation and fulfillment report for every predicate
    Analyze {
        #[arg(short, long)]
        instance: Option<String>,
    },

    /// Resolved instances, order and final instance
    Instances,

    /// Predicate support across solutions
    Support {
        #[arg(short, long)]
        instance: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_yaml(path)?,
        None => EngineConfig::default(),
    };
    let source = DirectoryArtifactSource::with_layout(&cli.dir, config.layout.clone());
    let service = ConsequenceService::new(config)?;
    let set = service.compile_from_source(cli.artifact_set.as_str(), &source)?;

    match cli.command {
        Commands::Query {
            predicate,
            kind,
            instance,
            samples,
        } => {
            let result =
                service.query(set.id().as_str(), instance.as_deref(), &predicate, kind)?;
            if samples {
                let scenarios = service.sample_scenarios(
                    set.id().as_str(),
                    instance.as_deref(),
                    &predicate,
                    None,
                )?;
                print_json(
                    &serde_json::json!({ "result": result.as_ref(), "samples": scenarios }),
                    cli.compact,
                )?;
            } else {
                print_json(result.as_ref(), cli.compact)?;
            }
        }
        Commands::Analyze { instance } => {
            let report = service.analyze_instance(set.id().as_str(), instance.as_deref())?;
            print_json(&report, cli.compact)?;
        }
        Commands::Instances => {
            print_json(&set.summary(), cli.compact)?;
        }
        Commands::Support { instance } => {
            let profile = service.support_profile(set.id().as_str(), instance.as_deref())?;
            print_json(&profile, cli.compact)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<(), serde_json::Error> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", rendered);
    Ok(())
}
