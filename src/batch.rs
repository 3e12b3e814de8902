//! Sequential batch driver: fetch, decompress, measure, record.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::fetch::{HttpClient, fetch_bytes};
use crate::gz::gunzip;
use crate::metric::Metric;
use crate::report::{BatchReport, FailureKind, ResourceReport};

/// Fetches a set of gzip resources one at a time, applies a metric to each
/// decompressed payload, and accumulates the results into a [`BatchReport`].
///
/// Processing is strictly sequential so report order matches locator order
/// and connections to the remote host never overlap.
pub struct BatchVerifier<C: HttpClient> {
    client: C,
    metric: Metric,
}

impl<C: HttpClient> BatchVerifier<C> {
    pub fn new(client: C, metric: Metric) -> Self {
        Self { client, metric }
    }

    /// Processes a single locator to its terminal state.
    ///
    /// Transport, HTTP, and gzip errors all land in the returned report
    /// entry; nothing propagates past this boundary, so a failing locator
    /// never aborts the batch.
    #[tracing::instrument(skip(self), fields(locator = %locator))]
    pub async fn process_one(&self, locator: &str) -> ResourceReport {
        let raw = match fetch_bytes(&self.client, locator).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Fetch failed");
                return ResourceReport::failed(locator, FailureKind::Fetch, e.to_string());
            }
        };

        debug!(compressed_bytes = raw.len(), "Payload received, decompressing");

        let data = match gunzip(&raw) {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "Decompression failed");
                return ResourceReport::failed(locator, FailureKind::Decompress, e.to_string());
            }
        };

        let value = self.metric.apply(&data);
        let entry = ResourceReport::measured(locator, value);
        info!(resource = entry.short_name(), metric = %self.metric, value, "Resource measured");
        entry
    }

    /// Visits every locator exactly once, in order, and returns the report.
    ///
    /// # Errors
    ///
    /// Fails only on a contract violation: an empty locator list combined
    /// with a non-zero expected total, for which no meaningful batch exists.
    pub async fn process_all(
        &self,
        locators: &[String],
        expected: Option<i64>,
    ) -> Result<BatchReport> {
        match expected {
            Some(e) if e != 0 && locators.is_empty() => {
                anyhow::bail!("no locators given but a non-zero expected total ({e}) was requested");
            }
            _ => {}
        }

        let mut report = BatchReport::new(expected);

        for locator in locators {
            report.push(self.process_one(locator).await);
        }

        info!(
            resources = report.entries.len(),
            measured = report.measured_count(),
            failed = report.failed_count(),
            total = report.total,
            "Batch complete"
        );

        Ok(report)
    }
}
