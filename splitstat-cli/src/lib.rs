#![warn(missing_docs)]
//! Splitstat CLI Library
//!
//! Command-line front end: argument parsing, `splitstat.toml` discovery,
//! logging setup, and the parallel analysis run. Use
//! `splitstat_cli::run()` from a binary's `main` to get the full CLI.

mod config;
mod runner;

pub use config::*;
pub use runner::run_analysis;

use chrono::Utc;
use clap::{Parser, Subcommand};
use regex::Regex;
use splitstat_core::{AnalysisConfig, Metric, TestKind};
use splitstat_data::{discover_datasets, load_frame};
use splitstat_report::{
    AnalysisReport, OutputFormat, ReportMeta, SCHEMA_VERSION, generate_json_report, render_human,
};
use std::io::Write;
use std::path::PathBuf;

/// Splitstat CLI arguments
#[derive(Parser, Debug)]
#[command(name = "splitstat")]
#[command(author, version, about = "Splitstat - A/B experiment analysis")]
pub struct Cli {
    /// Optional subcommand (List, Run); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter experiments by regex pattern
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Directory containing the dataset CSV drops
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Output format: human, json
    #[arg(long, default_value = "human")]
    pub format: String,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Comma-separated tests to run (permutation, mannwhitney, bootstrap, ttest)
    #[arg(long)]
    pub tests: Option<String>,

    /// Comma-separated metrics to analyze (arpu, messages, user_retention)
    #[arg(long)]
    pub metrics: Option<String>,

    /// Significance level
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Bootstrap / permutation resample count
    #[arg(long)]
    pub resamples: Option<usize>,

    /// Base random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of parallel workers (0 = all cores)
    #[arg(long, short = 'j', default_value = "0")]
    pub jobs: usize,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List discovered dataset files and experiments
    List,
    /// Run the analysis (default)
    Run,
}

/// Run the splitstat CLI. This is the main entry point for the binary.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the splitstat CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("splitstat=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("splitstat=info")
            .init();
    }

    // Discover splitstat.toml configuration (CLI flags override)
    let config = SplitConfig::discover().unwrap_or_default();

    match cli.command {
        Some(Commands::List) => list_datasets(&cli, &config),
        Some(Commands::Run) | None => run_experiments(&cli, &config),
    }
}

fn data_dir(cli: &Cli, config: &SplitConfig) -> PathBuf {
    cli.data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.data.directory))
}

/// Layer analysis settings: splitstat.toml defaults, then CLI overrides.
fn build_analysis_config(cli: &Cli, config: &SplitConfig) -> AnalysisConfig {
    AnalysisConfig {
        alpha: cli.alpha.unwrap_or(config.analysis.alpha),
        n_resamples: cli.resamples.unwrap_or(config.analysis.resamples),
        power: config.analysis.power,
        seed: cli.seed.unwrap_or(config.analysis.seed),
    }
}

/// Resolve the test selection, failing fast on unknown names.
fn selected_tests(cli: &Cli, config: &SplitConfig) -> anyhow::Result<Vec<TestKind>> {
    let names: Vec<String> = match &cli.tests {
        Some(csv) => csv.split(',').map(|s| s.trim().to_string()).collect(),
        None => config.analysis.tests.clone(),
    };
    names
        .iter()
        .map(|name| name.parse::<TestKind>().map_err(Into::into))
        .collect()
}

/// Resolve the metric selection, failing fast on unknown names.
fn selected_metrics(cli: &Cli, config: &SplitConfig) -> anyhow::Result<Vec<Metric>> {
    let names: Vec<String> = match &cli.metrics {
        Some(csv) => csv.split(',').map(|s| s.trim().to_string()).collect(),
        None => config.analysis.metrics.clone(),
    };
    names
        .iter()
        .map(|name| name.parse::<Metric>().map_err(Into::into))
        .collect()
}

fn filter_experiments(cli: &Cli, experiments: &[String]) -> anyhow::Result<Vec<String>> {
    let filter = Regex::new(&cli.filter)
        .map_err(|e| anyhow::anyhow!("invalid experiment filter {:?}: {}", cli.filter, e))?;
    Ok(experiments
        .iter()
        .filter(|name| filter.is_match(name))
        .cloned()
        .collect())
}

fn list_datasets(cli: &Cli, config: &SplitConfig) -> anyhow::Result<()> {
    let dir = data_dir(cli, config);
    let files = discover_datasets(&dir)?;

    println!("Datasets in {}:", dir.display());
    for file in &files {
        println!("├── {} ({})", file.path.display(), file.date);
    }

    let frame = load_frame(&dir)?;
    let experiments = filter_experiments(cli, &frame.experiments)?;
    println!(
        "{} rows, {} experiments: {}",
        frame.rows.len(),
        experiments.len(),
        experiments.join(", ")
    );

    Ok(())
}

fn run_experiments(cli: &Cli, config: &SplitConfig) -> anyhow::Result<()> {
    let tests = selected_tests(cli, config)?;
    let metrics = selected_metrics(cli, config)?;
    let analysis_cfg = build_analysis_config(cli, config);
    let format: OutputFormat = cli
        .format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let dir = data_dir(cli, config);
    tracing::info!(dir = %dir.display(), "loading datasets");
    let frame = load_frame(&dir)?;

    let experiments = filter_experiments(cli, &frame.experiments)?;
    if experiments.is_empty() {
        println!("No experiments match the filter.");
        return Ok(());
    }

    tracing::info!(
        experiments = experiments.len(),
        tests = tests.len(),
        metrics = metrics.len(),
        "running analysis"
    );

    let reports = run_analysis(
        &frame,
        &experiments,
        &tests,
        &metrics,
        &analysis_cfg,
        cli.jobs,
    )?;

    let report = AnalysisReport {
        meta: ReportMeta {
            schema_version: SCHEMA_VERSION,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            alpha: analysis_cfg.alpha,
            n_resamples: analysis_cfg.n_resamples,
            seed: analysis_cfg.seed,
        },
        experiments: reports,
    };

    let rendered = match format {
        OutputFormat::Human => render_human(&report),
        OutputFormat::Json => generate_json_report(&report)?,
    };

    let output_path = cli
        .output
        .clone()
        .or_else(|| config.output.path.as_ref().map(PathBuf::from));
    match output_path {
        Some(path) => {
            let mut file = std::fs::File::create(&path)?;
            file.write_all(rendered.as_bytes())?;
            println!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("splitstat").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_defaults() {
        let cli = cli(&[]);
        assert_eq!(cli.filter, ".*");
        assert_eq!(cli.format, "human");
        assert_eq!(cli.jobs, 0);
        assert!(cli.tests.is_none());
    }

    #[test]
    fn test_selected_tests_from_flag() {
        let cli = cli(&["--tests", "permutation, ttest"]);
        let tests = selected_tests(&cli, &SplitConfig::default()).unwrap();
        assert_eq!(tests, vec![TestKind::Permutation, TestKind::TTest]);
    }

    #[test]
    fn test_selected_tests_unknown_name_fails() {
        let cli = cli(&["--tests", "z_test"]);
        assert!(selected_tests(&cli, &SplitConfig::default()).is_err());
    }

    #[test]
    fn test_selected_metrics_default_set() {
        let cli = cli(&[]);
        let metrics = selected_metrics(&cli, &SplitConfig::default()).unwrap();
        assert_eq!(metrics, vec![Metric::Arpu, Metric::Messages]);
    }

    #[test]
    fn test_metric_opt_in_retention() {
        let cli = cli(&["--metrics", "user_retention"]);
        let metrics = selected_metrics(&cli, &SplitConfig::default()).unwrap();
        assert_eq!(metrics, vec![Metric::UserRetention]);
    }

    #[test]
    fn test_analysis_config_layering() {
        let cli = cli(&["--alpha", "0.05", "--seed", "42"]);
        let cfg = build_analysis_config(&cli, &SplitConfig::default());
        assert_eq!(cfg.alpha, 0.05);
        assert_eq!(cfg.seed, 42);
        // File/default values fill the rest
        assert_eq!(cfg.n_resamples, 10_000);
        assert_eq!(cfg.power, 0.8);
    }

    #[test]
    fn test_filter_experiments() {
        let cli = cli(&["exp_btn.*"]);
        let filtered = filter_experiments(
            &cli,
            &[
                "exp_btn_color".to_string(),
                "exp_onboarding".to_string(),
                "exp_btn_size".to_string(),
            ],
        )
        .unwrap();
        assert_eq!(filtered, vec!["exp_btn_color", "exp_btn_size"]);
    }

    #[test]
    fn test_invalid_filter_is_an_error() {
        let cli = cli(&["["]);
        assert!(filter_experiments(&cli, &["exp_a".to_string()]).is_err());
    }
}
