//! jobstack CLI
//!
//! Local entry point for comparing posting snapshots and querying them by
//! tech stack.

use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use jobstack::{
    error::{AppError, Result},
    models::Config,
    pipeline,
    query::QueryEngine,
    storage::LocalStorage,
    utils::log::LogTee,
};

/// jobstack - Hacker News job posting toolkit
#[derive(Parser, Debug)]
#[command(
    name = "jobstack",
    version,
    about = "Diff Hacker News job snapshots and filter them by tech stack"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare two snapshots and report new and updated postings
    Diff {
        /// Older snapshot (JSON array)
        #[arg(long)]
        original: String,

        /// Newer snapshot (JSON array)
        #[arg(long)]
        updated: String,

        /// Where to write the comparison report
        #[arg(long, default_value = "updated_entries.json")]
        output: String,

        /// Also write log output to this file
        #[arg(long, default_value = "comparison.log")]
        log: PathBuf,
    },

    /// List postings matching a tech-stack query
    Filter {
        /// Snapshot to search
        #[arg(long)]
        dataset: String,

        /// Query, e.g. "Python AND (React OR Vue) AND NOT PHP"
        #[arg(short, long)]
        query: String,

        /// Write matching postings to this file
        #[arg(long)]
        output: Option<String>,

        /// Print at most this many matches
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Parse a query and print its canonical form
    Parse {
        #[arg(short, long)]
        query: String,
    },

    /// Show how often each technology is mentioned
    Tags {
        /// Snapshot to analyse
        #[arg(long)]
        dataset: String,

        /// Only show the N most frequent tags
        #[arg(long)]
        top: Option<usize>,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging; `--verbose` wins over the configured level.
///
/// With `log_file`, records go to that file and to stderr. If the file cannot
/// be created, logging still starts on stderr and the error is returned.
fn init_logging(verbose: bool, level: &str, log_file: Option<&Path>) -> io::Result<()> {
    let level = if verbose { "debug" } else { level };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    builder.format_timestamp_secs();

    let outcome = match log_file.map(LogTee::create).transpose() {
        Ok(Some(tee)) => {
            builder.target(env_logger::Target::Pipe(Box::new(tee)));
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => Err(e),
    };
    builder.init();
    outcome
}

/// Point at the offending token of a query that failed to parse.
fn report_query_error(query: &str, error: &AppError) {
    let AppError::Query(inner) = error else {
        return;
    };
    let Some(column) = inner
        .position()
        .and_then(|pos| query.get(..pos))
        .map(|prefix| prefix.chars().count())
    else {
        return;
    };
    log::error!("  {query}");
    log::error!("  {}^", " ".repeat(column));
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let storage = LocalStorage::new(".").with_pretty(config.output.pretty);

    match cli.command {
        Command::Diff {
            original,
            updated,
            output,
            log: log_file,
        } => {
            let comparison = pipeline::run_compare(
                &storage,
                &original,
                &updated,
                &output,
                Some(log_file.as_path()),
            )
            .await?;
            if !comparison.malformed.is_empty() {
                log::warn!(
                    "{} malformed entries were left out; see {}",
                    comparison.malformed.len(),
                    output
                );
            }
        }

        Command::Filter {
            dataset,
            query,
            output,
            limit,
        } => {
            let result = pipeline::run_filter(
                &config,
                &storage,
                &dataset,
                &query,
                output.as_deref(),
                limit,
            )
            .await;
            if let Err(e) = &result {
                report_query_error(&query, e);
            }
            result?;
        }

        Command::Parse { query } => {
            let engine = QueryEngine::new(&config);
            match engine.compile(&query) {
                Ok(expr) => {
                    log::info!("Canonical: {expr}");
                    log::info!("Terms: {}", expr.terms().join(", "));
                }
                Err(e) => {
                    let error = AppError::from(e);
                    report_query_error(&query, &error);
                    return Err(error);
                }
            }
        }

        Command::Tags { dataset, top } => {
            pipeline::run_tags(&config, &storage, &dataset, top).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} technologies)",
                config.vocabulary.technologies.len()
            );
        }
    }

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Read the config before logging starts so its level can apply.
    let loaded = Config::load(&cli.config);
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    let log_file = match &cli.command {
        Command::Diff { log, .. } => Some(log.clone()),
        _ => None,
    };
    if let Err(e) = init_logging(cli.verbose, &level, log_file.as_deref()) {
        log::warn!("Cannot write log file: {e}. Logging to stderr only.");
    }

    let config = match loaded {
        Ok(config) => {
            log::info!("Loaded configuration from {}", cli.config.display());
            config
        }
        Err(e) => {
            log::warn!(
                "Config load failed from {}: {}. Using defaults.",
                cli.config.display(),
                e
            );
            Config::default()
        }
    };

    if let Err(e) = run(cli, config).await {
        log::error!("{e}");
        std::process::exit(1);
    }
}
