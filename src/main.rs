//! WebSecura - Passive Web Security Scanner CLI

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing_subscriber::EnvFilter;

use websecura::config::{self, ScanConfig};
use websecura::models::{ScanReport, Severity};
use websecura::scanner::ScanEngine;

/// WebSecura - Passive security assessment for websites
#[derive(Parser)]
#[command(name = "websecura", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a security scan against a target URL
    Scan {
        /// Target URL to scan (https:// is assumed when no scheme is given)
        #[arg(short, long)]
        target: String,

        /// Output format (table or json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Global scan deadline in seconds
        #[arg(long)]
        deadline: Option<u64>,

        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Exit with code 1 if any failed finding is at or above this
        /// severity (low, medium, high)
        #[arg(long)]
        fail_on: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the registered checks
    Checks,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            target,
            format,
            output,
            timeout,
            deadline,
            config: config_path,
            fail_on,
            verbose,
        } => {
            init_logging(verbose);

            let mut scan_config = match config_path {
                Some(path) => match config::load_config(&path) {
                    Ok(c) => c,
                    Err(e) => {
                        eprintln!("{} {e}", "Config error:".red());
                        return ExitCode::FAILURE;
                    }
                },
                None => ScanConfig::default(),
            };
            config::merge_cli_args(&mut scan_config, timeout, deadline);

            let fail_threshold = match fail_on.as_deref() {
                Some(s) => match Severity::parse(s) {
                    Some(sev) => Some(sev),
                    None => {
                        eprintln!("{} unknown severity '{s}'", "Error:".red());
                        return ExitCode::FAILURE;
                    }
                },
                None => None,
            };

            let engine = ScanEngine::with_defaults();
            let report = match engine.scan(&scan_config, &target).await {
                Ok(report) => report,
                Err(e) => {
                    eprintln!("{} {e}", "Scan failed:".red());
                    return ExitCode::FAILURE;
                }
            };

            let rendered = match format.as_str() {
                "json" => match serde_json::to_string_pretty(&report) {
                    Ok(json) => json,
                    Err(e) => {
                        eprintln!("{} {e}", "Serialization error:".red());
                        return ExitCode::FAILURE;
                    }
                },
                _ => render_table(&report),
            };

            match output {
                Some(path) => {
                    if let Err(e) = std::fs::write(&path, &rendered) {
                        eprintln!("{} could not write {}: {e}", "Error:".red(), path.display());
                        return ExitCode::FAILURE;
                    }
                    println!("Report written to {}", path.display());
                }
                None => println!("{rendered}"),
            }

            if let Some(threshold) = fail_threshold {
                if report.has_failures_at(threshold) {
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }

        Commands::Checks => {
            let engine = ScanEngine::with_defaults();
            let mut builder = Builder::default();
            builder.push_record(["Check", "Description"]);
            for (name, description) in engine.list_checks() {
                builder.push_record([name, description]);
            }
            println!("{}", builder.build().with(Style::rounded()));
            ExitCode::SUCCESS
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "websecura=debug" } else { "websecura=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();
}

fn render_table(report: &ScanReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Check", "Result", "Severity", "Details"]);
    for finding in &report.findings {
        let result = if finding.passed {
            "PASS".green().to_string()
        } else {
            "FAIL".red().to_string()
        };
        let severity = finding
            .severity
            .to_string()
            .color(finding.severity.color())
            .to_string();
        builder.push_record([
            finding.check.as_str(),
            result.as_str(),
            severity.as_str(),
            finding.details.as_str(),
        ]);
    }
    let table = builder.build().with(Style::rounded()).to_string();

    let summary = format!(
        "{} | {} checks, {} passed, {} failed",
        report.url,
        report.summary.total,
        report.summary.passed.to_string().green(),
        if report.summary.failed > 0 {
            report.summary.failed.to_string().red().to_string()
        } else {
            report.summary.failed.to_string()
        },
    );
    format!("{table}\n{summary}")
}
