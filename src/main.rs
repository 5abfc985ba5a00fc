// file: src/main.rs
// description: commandline entry point for the basic cleaning step
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use basic_cleaning::utils::logging::{format_error, format_success};
use basic_cleaning::{Cleaner, CleaningParams, CleaningReport, Config, open_store};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "basic_cleaning")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "A very basic data cleaning", long_about = None)]
struct Cli {
    /// Fully-qualified name for the input artifact
    #[arg(long = "input_artifact")]
    input_artifact: String,

    /// Name for the output artifact
    #[arg(long = "output_artifact")]
    output_artifact: String,

    /// Type for the output artifact
    #[arg(long = "output_type")]
    output_type: String,

    /// Description for the output artifact
    #[arg(long = "output_description")]
    output_description: String,

    /// Minimum price for cleaning outliers
    #[arg(long = "min_price", allow_negative_numbers = true)]
    min_price: f64,

    /// Maximum price for cleaning outliers
    #[arg(long = "max_price", allow_negative_numbers = true)]
    max_price: f64,

    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

impl Cli {
    fn params(&self) -> CleaningParams {
        CleaningParams {
            input_artifact: self.input_artifact.clone(),
            output_artifact: self.output_artifact.clone(),
            output_type: self.output_type.clone(),
            output_description: self.output_description.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

/// One colored line for the terminal, `Err` when the run failed.
fn outcome_line(result: &basic_cleaning::Result<CleaningReport>) -> std::result::Result<String, String> {
    match result {
        Ok(report) => Ok(format_success(&format!(
            "Logged {} ({} of {} rows kept)",
            report.artifact.qualified_name(),
            report.stats.rows_after_geo_filter,
            report.stats.rows_read
        ))),
        Err(e) => {
            let context = if e.is_input_error() {
                "Input artifact rejected"
            } else {
                "Cleaning run failed"
            };
            Err(format_error(&format!("{}: {}", context, e)))
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    basic_cleaning::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Basic cleaning");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    let store = open_store(&config.store).context("Failed to open artifact store")?;
    let cleaner = Cleaner::new(store, &config);

    let result = cleaner.run(&cli.params()).await;
    match outcome_line(&result) {
        Ok(line) => {
            println!("{}", line);
            Ok(ExitCode::SUCCESS)
        }
        Err(line) => {
            eprintln!("{}", line);
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basic_cleaning::{ArtifactRecord, CleaningError, CleaningStats};
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    const ARGS: [&str; 13] = [
        "basic_cleaning",
        "--input_artifact",
        "sample.csv:latest",
        "--output_artifact",
        "clean_sample.csv",
        "--output_type",
        "clean_sample",
        "--output_description",
        "Data with outliers and null values removed",
        "--min_price",
        "10",
        "--max_price",
        "350",
    ];

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_all_flags() {
        let cli = Cli::try_parse_from(ARGS).unwrap();
        let params = cli.params();
        assert_eq!(params.input_artifact, "sample.csv:latest");
        assert_eq!(params.output_artifact, "clean_sample.csv");
        assert_eq!(params.min_price, 10.0);
        assert_eq!(params.max_price, 350.0);
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        assert!(cli.color);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_every_cleaning_flag_is_required() {
        for skip in (1..ARGS.len()).step_by(2) {
            let args: Vec<&str> = ARGS
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip && *i != skip + 1)
                .map(|(_, a)| *a)
                .collect();
            assert!(Cli::try_parse_from(args).is_err(), "{} accepted", ARGS[skip]);
        }
    }

    #[test]
    fn test_price_must_be_numeric() {
        let mut args = ARGS.to_vec();
        args[10] = "ten";
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_outcome_line_reports_failure_once() {
        colored::control::set_override(false);
        let result: basic_cleaning::Result<CleaningReport> =
            Err(CleaningError::NotFound("sample.csv:v9".to_string()));

        let line = outcome_line(&result).unwrap_err();
        assert_eq!(
            line,
            "✗ Input artifact rejected: Artifact not found: sample.csv:v9"
        );
        assert_eq!(line.matches("sample.csv:v9").count(), 1);

        let result: basic_cleaning::Result<CleaningReport> =
            Err(CleaningError::Store("registry unavailable".to_string()));
        assert!(outcome_line(&result).unwrap_err().contains("Cleaning run failed"));
    }

    #[test]
    fn test_outcome_line_on_success() {
        colored::control::set_override(false);
        let report = CleaningReport {
            run_id: "run-1".to_string(),
            artifact: ArtifactRecord {
                name: "clean_sample.csv".to_string(),
                version: 2,
                artifact_type: "clean_sample".to_string(),
                description: "cleaned".to_string(),
                file_name: "clean_sample.csv".to_string(),
                digest: String::new(),
                size_bytes: 0,
                created_at: "2024-01-01T00:00:00+00:00".to_string(),
                producer_run: Some("run-1".to_string()),
            },
            output_path: PathBuf::from("clean_sample.csv"),
            stats: CleaningStats {
                rows_read: 10,
                rows_after_geo_filter: 7,
                ..CleaningStats::new()
            },
        };

        assert_eq!(
            outcome_line(&Ok(report)).unwrap(),
            "✓ Logged clean_sample.csv:v2 (7 of 10 rows kept)"
        );
    }
}
