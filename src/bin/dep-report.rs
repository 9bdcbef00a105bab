//! CLI tool for reporting on package.json dependencies

use anyhow::Context;
use clap::Parser;
use colored::*;
use dependency_report::{render_json, render_markdown, AnalysisReport, Analyzer, AnalyzerConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "dep-report")]
#[command(
    about = "Report version currency, licenses and authors of a package.json's dependencies",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Path to the manifest to analyze
    #[arg(default_value = "./package.json")]
    manifest: PathBuf,

    /// Path of the report to write
    #[arg(default_value = "./dependency-analysis-report.md")]
    output: PathBuf,

    /// Path to custom configuration file (TOML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Registry base URL
    #[arg(long, env = "DEP_REPORT_REGISTRY")]
    registry: Option<String>,

    /// Pause after every registry request, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Take a long pause after this many requests (0 disables)
    #[arg(long)]
    batch_size: Option<u64>,

    /// Length of the long pause, in seconds
    #[arg(long)]
    batch_pause_secs: Option<u64>,

    /// Dependencies to ignore (can be specified multiple times)
    #[arg(long = "ignore")]
    ignore_dependencies: Vec<String>,

    /// Output format
    #[arg(short = 'f', long, default_value = "markdown")]
    format: ReportFormat,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Clone, Debug)]
enum ReportFormat {
    Json,
    Markdown,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = match build_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{} Failed to load config: {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    let mut analyzer = match Analyzer::new(&config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let result = analyzer
        .analyze(&cli.manifest, |pkg, done, total| {
            progress.set_length(total as u64);
            progress.set_position(done as u64);
            progress.set_message(pkg.name.clone());
        })
        .await;

    progress.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} Analysis failed: {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    let content = match cli.format {
        ReportFormat::Markdown => render_markdown(&report),
        ReportFormat::Json => match render_json(&report) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("{} Failed to serialize report: {}", "Error:".red().bold(), e);
                process::exit(1);
            }
        },
    };

    if let Err(e) = std::fs::write(&cli.output, content) {
        eprintln!("{} Failed to write report: {}", "Error:".red().bold(), e);
        process::exit(1);
    }

    info!("Made {} registry requests", analyzer.request_count());
    display_summary(&report, &cli.output);
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_config(cli: &Cli) -> anyhow::Result<AnalyzerConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AnalyzerConfig::default(),
    };

    if let Some(registry) = &cli.registry {
        config.registry.base_url = registry.clone();
    }
    if let Some(delay) = cli.delay_ms {
        config.registry.request_delay_ms = delay;
    }
    if let Some(batch_size) = cli.batch_size {
        config.registry.batch_size = batch_size;
    }
    if let Some(pause) = cli.batch_pause_secs {
        config.registry.batch_pause_secs = pause;
    }
    for dep in &cli.ignore_dependencies {
        config.ignored_dependencies.insert(dep.clone());
    }

    Ok(config)
}

fn load_config(path: &Path) -> anyhow::Result<AnalyzerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = AnalyzerConfig::from_toml(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn display_summary(report: &AnalysisReport, output: &Path) {
    let summary = &report.summary;

    println!("Report written to: {}", output.display().to_string().cyan());
    println!(
        "{} packages, {} outdated",
        summary.total_packages,
        if summary.outdated_packages > 0 {
            summary.outdated_packages.to_string().yellow()
        } else {
            summary.outdated_packages.to_string().green()
        }
    );
    if summary.failed_packages > 0 {
        println!(
            "{} {} lookups failed",
            "Warning:".yellow().bold(),
            summary.failed_packages
        );
    }
}
