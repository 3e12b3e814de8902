//! CLI entry point for the tripcheck tool.
//!
//! Provides subcommands for verifying ad-hoc gzip resources, running the
//! built-in NYC TLC dataset checks, and rendering tripdata filenames.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use tripcheck::{
    batch::BatchVerifier,
    datasets::{Check, TaxiColor, builtin_checks, find_check, tripdata_file},
    fetch::BasicClient,
    metric::Metric,
    output::{append_records, format_mib, print_report},
};
use std::ffi::OsStr;
use std::path::Path;

#[derive(Parser)]
#[command(name = "tripcheck")]
#[command(about = "A tool to verify sizes and row counts of remote gzip datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one or more gzip resources and aggregate a metric over them
    Check {
        /// URLs of gzip-compressed resources, processed in order
        #[arg(value_name = "URL", required = true)]
        urls: Vec<String>,

        /// Metric to apply to each decompressed payload
        #[arg(short, long, default_value = "line-count")]
        metric: Metric,

        /// Expected aggregate total to compare against
        #[arg(short, long)]
        expected: Option<i64>,

        /// CSV file to append per-resource results to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run a single built-in check by name
    Run {
        /// Check name (see `list-checks`)
        #[arg(value_name = "NAME")]
        name: String,

        /// CSV file to append per-resource results to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run the built-in checks
    All {
        /// Include the full-year checks (twelve downloads each)
        #[arg(long, default_value_t = false)]
        full: bool,

        /// CSV file to append per-resource results to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List the built-in checks
    ListChecks,
    /// Render a tripdata filename from its parts
    Render {
        /// Taxi color (yellow or green)
        #[arg(short, long)]
        taxi: TaxiColor,

        /// Four-digit year
        #[arg(short, long)]
        year: u16,

        /// Month number (1-12)
        #[arg(short, long)]
        month: u8,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/tripcheck.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("tripcheck.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            urls,
            metric,
            expected,
            output,
        } => {
            let verifier = BatchVerifier::new(BasicClient::new(), metric);
            let report = verifier.process_all(&urls, expected).await?;

            print_report(&report);
            if let Some(path) = output {
                append_records(&path, &report)?;
            }
        }
        Commands::Run { name, output } => {
            let check = find_check(&name)
                .ok_or_else(|| anyhow::anyhow!("no built-in check named '{name}'"))?;
            run_check(&check, output.as_deref()).await?;
        }
        Commands::All { full, output } => {
            let checks: Vec<_> = builtin_checks()
                .into_iter()
                .filter(|c| full || c.quick)
                .collect();

            info!(count = checks.len(), full, "Running built-in checks");
            if !full {
                info!("Full-year checks skipped (pass --full to include them)");
            }

            for check in &checks {
                run_check(check, output.as_deref()).await?;
            }
        }
        Commands::ListChecks => {
            let checks = builtin_checks();

            for check in &checks {
                info!(
                    name = check.name,
                    metric = %check.metric,
                    resources = check.locators.len(),
                    quick = check.quick,
                    description = check.description,
                    "Check"
                );
            }

            let quick = checks.iter().filter(|c| c.quick).count();
            info!(total = checks.len(), quick, full = checks.len() - quick, "Check list summary");
        }
        Commands::Render { taxi, year, month } => {
            anyhow::ensure!((1..=12).contains(&month), "month must be in 1..=12");
            println!("{}", tripdata_file(taxi, year, month));
        }
    }

    Ok(())
}

/// Runs one built-in check end to end: fetch, measure, report, persist.
#[tracing::instrument(skip(check, output), fields(check = check.name))]
async fn run_check(check: &Check, output: Option<&str>) -> Result<()> {
    info!(description = check.description, "Starting check");

    let verifier = BatchVerifier::new(BasicClient::new(), check.metric);
    let report = verifier.process_all(&check.locators, check.expected).await?;

    print_report(&report);

    // Size checks carry a display-rounded MiB expectation instead of an
    // exact byte total.
    if let Some(expected_mib) = check.expected_mib {
        let got = format_mib(report.total);
        match check.matches_mib(report.total) {
            Some(true) => info!(mib = %got, expected_mib, "Size matches expected value"),
            _ => warn!(mib = %got, expected_mib, "Size does NOT match expected value"),
        }
    }

    if let Some(path) = output {
        append_records(path, &report)?;
    }

    Ok(())
}
