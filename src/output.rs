//! Report formatting and persistence.
//!
//! Supports per-resource progress lines, JSON serialization, and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::report::{BatchReport, Outcome};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs one line per resource and a final aggregate line.
///
/// The aggregate line includes a match/mismatch verdict when the report
/// carries an expected total. Printed, not enforced.
pub fn print_report(report: &BatchReport) {
    for entry in &report.entries {
        match &entry.outcome {
            Outcome::Measured { value } => {
                info!(resource = entry.short_name(), value, "ok");
            }
            Outcome::Failed { kind, message } => {
                warn!(
                    resource = entry.short_name(),
                    kind = kind.as_str(),
                    error = %message,
                    "failed"
                );
            }
        }
    }

    match report.matches_expected() {
        Some(true) => info!(
            total = report.total,
            expected = report.expected,
            failed = report.failed_count(),
            "Total matches expected value"
        ),
        Some(false) => warn!(
            total = report.total,
            expected = report.expected,
            failed = report.failed_count(),
            "Total does NOT match expected value"
        ),
        None => info!(
            total = report.total,
            failed = report.failed_count(),
            "Total computed (no expected value supplied)"
        ),
    }
}

/// Logs the full report as pretty-printed JSON.
pub fn print_json(report: &BatchReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Formats a byte count as MiB with one decimal, e.g. `"128.3"`.
///
/// Defined for byte counts, which are non-negative; negative inputs clamp
/// to zero rather than rendering as `-0.0`.
pub fn format_mib(bytes: i64) -> String {
    format!("{:.1}", bytes.max(0) as f64 / (1024.0 * 1024.0))
}

/// One CSV row per processed resource.
#[derive(Serialize)]
struct ResourceRow<'a> {
    timestamp: DateTime<Utc>,
    locator: &'a str,
    value: Option<i64>,
    error_type: Option<&'static str>,
    error_message: Option<&'a str>,
}

/// Appends every entry of a [`BatchReport`] as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records(path: &str, report: &BatchReport) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    let now = Utc::now();
    for entry in &report.entries {
        let row = match &entry.outcome {
            Outcome::Measured { value } => ResourceRow {
                timestamp: now,
                locator: &entry.locator,
                value: Some(*value),
                error_type: None,
                error_message: None,
            },
            Outcome::Failed { kind, message } => ResourceRow {
                timestamp: now,
                locator: &entry.locator,
                value: None,
                error_type: Some(kind.as_str()),
                error_message: Some(message),
            },
        };
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
