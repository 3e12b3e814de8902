//! NYC TLC trip-data locators and the built-in check registry.
//!
//! The DataTalksClub mirror publishes one gzip CSV per taxi color and month.
//! Known-good totals live here as data so the batch driver stays agnostic of
//! any particular dataset.

use anyhow::Result;
use std::fmt;
use std::str::FromStr;

use crate::metric::Metric;
use crate::output::format_mib;

pub const NYC_TLC_BASE: &str =
    "https://github.com/DataTalksClub/nyc-tlc-data/releases/download";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxiColor {
    Yellow,
    Green,
}

impl fmt::Display for TaxiColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxiColor::Yellow => write!(f, "yellow"),
            TaxiColor::Green => write!(f, "green"),
        }
    }
}

impl FromStr for TaxiColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "yellow" => Ok(TaxiColor::Yellow),
            "green" => Ok(TaxiColor::Green),
            other => Err(anyhow::anyhow!(
                "unknown taxi color '{other}' (expected 'yellow' or 'green')"
            )),
        }
    }
}

/// Renders the tripdata CSV filename for a taxi color, year, and month.
///
/// # Panics
///
/// Panics if `month` is outside `1..=12`.
pub fn tripdata_file(taxi: TaxiColor, year: u16, month: u8) -> String {
    assert!((1..=12).contains(&month), "month {month} out of range 1..=12");
    format!("{taxi}_tripdata_{year}-{month:02}.csv")
}

/// Full download URL for one month's gzip-compressed tripdata file.
pub fn tripdata_url(taxi: TaxiColor, year: u16, month: u8) -> String {
    format!(
        "{NYC_TLC_BASE}/{taxi}/{}.gz",
        tripdata_file(taxi, year, month)
    )
}

/// URLs for all twelve months of a year, in calendar order.
pub fn monthly_urls(taxi: TaxiColor, year: u16) -> Vec<String> {
    (1..=12).map(|m| tripdata_url(taxi, year, m)).collect()
}

/// A named verification: a set of locators, the metric to apply, and the
/// known-good aggregate to compare against.
#[derive(Debug, Clone)]
pub struct Check {
    pub name: &'static str,
    pub description: &'static str,
    pub metric: Metric,
    pub locators: Vec<String>,
    pub expected: Option<i64>,
    /// Display-rounded expectation in MiB, for size checks where only the
    /// formatted answer is on record.
    pub expected_mib: Option<&'static str>,
    /// Quick checks download a single file; the rest pull a full year.
    pub quick: bool,
}

impl Check {
    /// Compares a byte total against the display-rounded MiB expectation.
    ///
    /// `None` when the check carries no MiB expectation.
    pub fn matches_mib(&self, total: i64) -> Option<bool> {
        self.expected_mib.map(|mib| format_mib(total) == mib)
    }
}

/// The built-in checks, in reporting order.
pub fn builtin_checks() -> Vec<Check> {
    vec![
        Check {
            name: "yellow-2020-12-size",
            description: "Yellow taxi December 2020: uncompressed file size",
            metric: Metric::ByteLength,
            locators: vec![tripdata_url(TaxiColor::Yellow, 2020, 12)],
            expected: None,
            expected_mib: Some("128.3"),
            quick: true,
        },
        Check {
            name: "yellow-2021-03-rows",
            description: "Yellow taxi March 2021: data row count",
            metric: Metric::LineCount,
            locators: vec![tripdata_url(TaxiColor::Yellow, 2021, 3)],
            expected: Some(1_925_152),
            expected_mib: None,
            quick: true,
        },
        Check {
            name: "yellow-2020-rows",
            description: "Yellow taxi 2020: total data rows across all months",
            metric: Metric::LineCount,
            locators: monthly_urls(TaxiColor::Yellow, 2020),
            expected: Some(24_648_499),
            expected_mib: None,
            quick: false,
        },
        Check {
            name: "green-2020-rows",
            description: "Green taxi 2020: total data rows across all months",
            metric: Metric::LineCount,
            locators: monthly_urls(TaxiColor::Green, 2020),
            expected: Some(1_734_051),
            expected_mib: None,
            quick: false,
        },
    ]
}

/// Looks up a built-in check by name.
pub fn find_check(name: &str) -> Option<Check> {
    builtin_checks().into_iter().find(|c| c.name == name)
}
