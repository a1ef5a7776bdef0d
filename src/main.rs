//! # Repo Scout CLI (`scout`)
//!
//! ## Usage
//!
//! ```bash
//! scout --config ./config/scout.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scout collect` | Search, enrich and write one raw CSV per search term |
//! | `scout merge <dir>` | Concatenate every CSV in a folder |
//! | `scout dedup <file>` | Remove duplicate repositories |
//! | `scout language <file>` | Keep descriptions in the configured language |
//! | `scout exclude <file>` | Drop tutorials, demos, courses and similar |
//! | `scout curate <dir>` | Run merge → dedup → language → exclude |
//! | `scout config` | Print the effective configuration |
//!
//! Logs go to stderr (`RUST_LOG` controls verbosity); summaries go to stdout.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use repo_scout::collect::Collector;
use repo_scout::config;
use repo_scout::curate::pipeline::{self, StageReport};
use repo_scout::curate::LinguaDetector;

/// Repo Scout: discover, enrich and curate GitHub repositories.
#[derive(Parser)]
#[command(name = "scout", version, about)]
struct Cli {
    /// Path to configuration file (TOML). Missing file means defaults.
    #[arg(long, global = true, default_value = "./config/scout.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, enrich and write one raw dataset per term.
    ///
    /// Uses `[collect].search_terms` unless `--term` is given.
    Collect {
        /// Search term (repeatable).
        #[arg(long = "term")]
        terms: Vec<String>,
    },

    /// Concatenate every CSV file in a folder.
    Merge {
        dir: PathBuf,
    },

    /// Remove rows duplicating an earlier (name, full_name, URL).
    Dedup {
        file: PathBuf,
    },

    /// Keep rows whose description is in the configured language.
    Language {
        file: PathBuf,
    },

    /// Drop rows mentioning an exclusion term.
    Exclude {
        file: PathBuf,

        /// Label used in the output file name. Inferred from the input
        /// file name when omitted.
        #[arg(long)]
        label: Option<String>,
    },

    /// Run every curation stage on a folder of raw datasets.
    Curate {
        dir: PathBuf,
    },

    /// Print the effective configuration as TOML.
    Config,
}

fn init_tracing() {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("repo_scout=info,scout=info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &StageReport) {
    println!("{}", report.stage);
    println!("  rows in: {}", report.rows_in);
    println!("  rows out: {}", report.rows_out);
    match &report.output {
        Some(path) => println!("  output: {}", path.display()),
        None => println!("  output: none"),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Collect { terms } => {
            let terms = if terms.is_empty() {
                cfg.collect.search_terms.clone()
            } else {
                terms
            };
            let collector = Collector::from_config(cfg)?;
            let summaries = collector.run(&terms)?;

            println!("collect");
            for s in &summaries {
                match &s.output {
                    Some(path) => println!("  {}: {} repos -> {}", s.term, s.hits, path.display()),
                    None => println!("  {}: {} repos", s.term, s.hits),
                }
            }
            println!("ok");
        }
        Commands::Merge { dir } => {
            print_report(&pipeline::run_merge(&cfg.curate, &dir)?);
            println!("ok");
        }
        Commands::Dedup { file } => {
            print_report(&pipeline::run_dedup(&cfg.curate, &file)?);
            println!("ok");
        }
        Commands::Language { file } => {
            let detector = LinguaDetector::new(&cfg.curate.candidate_languages)?;
            print_report(&pipeline::run_language(&cfg.curate, &file, &detector)?);
            println!("ok");
        }
        Commands::Exclude { file, label } => {
            print_report(&pipeline::run_exclusion(&cfg.curate, &file, label.as_deref())?);
            println!("ok");
        }
        Commands::Curate { dir } => {
            let detector = LinguaDetector::new(&cfg.curate.candidate_languages)?;
            for report in pipeline::run_all(&cfg.curate, &dir, &detector)? {
                print_report(&report);
            }
            println!("ok");
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&cfg)?);
        }
    }

    Ok(())
}
