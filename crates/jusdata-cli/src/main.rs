//! `jusdata`: legal claim risk estimation from historical decisions.
//!
//! - `jusdata seed --out corpus.csv` writes the synthetic corpus
//! - `jusdata train --corpus corpus.csv --models models/` trains and saves artifacts
//! - `jusdata analyze --forum <forum> --claim <text>` prints a risk report
//! - `jusdata forums` lists the forums known to the model
//! - `jusdata inspect` prints the artifact manifest

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use jusdata_ai::{AnalyzeError, DEFAULT_TOP_N, FitParams, RiskQuery, TrainConfig};
use jusdata_core::synthetic::SYNTHETIC_REPEATS;
use jusdata_store::ArtifactDir;
use tracing_subscriber::EnvFilter;

mod display;
mod pipeline;

const DEFAULT_MODELS_DIR: &str = "models";

#[derive(Parser)]
#[command(name = "jusdata", version, about = "Estimate the risk of a legal claim from past decisions")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the synthetic demo corpus
    Seed {
        /// Output file (.csv or .parquet)
        #[arg(long, env = "JUSDATA_CORPUS")]
        out: PathBuf,

        /// Copies of each distinct case
        #[arg(long, default_value_t = SYNTHETIC_REPEATS)]
        repeats: usize,
    },

    /// Train the outcome classifier and similarity index
    Train {
        /// Corpus file (.csv or .parquet)
        #[arg(long, env = "JUSDATA_CORPUS")]
        corpus: PathBuf,

        #[arg(long, env = "JUSDATA_MODELS_DIR", default_value = DEFAULT_MODELS_DIR)]
        models: PathBuf,

        /// Inverse L2 regularization strength
        #[arg(long, default_value_t = FitParams::default().c)]
        c: f64,

        #[arg(long, default_value_t = FitParams::default().max_iter)]
        max_iter: usize,

        #[arg(long, default_value_t = FitParams::default().tol)]
        tol: f64,

        /// Do not store the precomputed similarity matrix
        #[arg(long)]
        no_matrix: bool,
    },

    /// Estimate the risk of a claim in a forum
    Analyze {
        #[arg(long, env = "JUSDATA_MODELS_DIR", default_value = DEFAULT_MODELS_DIR)]
        models: PathBuf,

        #[arg(long)]
        forum: String,

        #[arg(long)]
        claim: String,

        /// Number of similar cases to return
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the forums seen in training
    Forums {
        #[arg(long, env = "JUSDATA_MODELS_DIR", default_value = DEFAULT_MODELS_DIR)]
        models: PathBuf,
    },

    /// Show the artifact manifest
    Inspect {
        #[arg(long, env = "JUSDATA_MODELS_DIR", default_value = DEFAULT_MODELS_DIR)]
        models: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("jusdata v{}", env!("CARGO_PKG_VERSION"));

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

/// Rejected input is a usage error (2); everything else is a failure (1).
fn exit_status(err: &anyhow::Error) -> u8 {
    if err
        .downcast_ref::<AnalyzeError>()
        .is_some_and(AnalyzeError::is_invalid_query)
    {
        2
    } else {
        1
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Seed { out, repeats } => {
            let rows = pipeline::run_seed(&out, repeats)?;
            eprintln!("Wrote {rows} rows to {}", out.display());
        }

        Command::Train {
            corpus,
            models,
            c,
            max_iter,
            tol,
            no_matrix,
        } => {
            let config = TrainConfig {
                c,
                max_iter,
                tol,
                precompute_matrix: !no_matrix,
            };
            let stats = pipeline::run_train(&corpus, &ArtifactDir::new(models), &config)?;
            eprintln!(
                "Done: {} rows, training accuracy {:.1}%, {:.2}s",
                stats.manifest.corpus_rows,
                stats.manifest.training_accuracy * 100.0,
                stats.elapsed_secs
            );
        }

        Command::Analyze {
            models,
            forum,
            claim,
            top_n,
            json,
        } => {
            let engine = pipeline::load_engine(&ArtifactDir::new(models))?;
            let query = RiskQuery::new(claim, forum).with_top_n(top_n);
            let report = engine.analyze(&query)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("serializing report")?
                );
            } else {
                let known = engine.forums().iter().any(|f| *f == query.forum);
                display::print_report_card(&query, &report, known);
            }
        }

        Command::Forums { models } => {
            let engine = pipeline::load_engine(&ArtifactDir::new(models))?;
            display::print_forums(engine.forums());
        }

        Command::Inspect { models, json } => {
            let manifest = pipeline::load_manifest(&ArtifactDir::new(models))?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&manifest).context("serializing manifest")?
                );
            } else {
                display::print_manifest(&manifest);
            }
        }
    }
    Ok(())
}
