//! HTTP report uploader.
//!
//! Implements [`ReportSink`] by POSTing the JSON-serialised [`Report`]
//! to the ingestion endpoint (a spreadsheet web-app URL in the deployed
//! system).  Single attempt per scheduled tick, bounded by the
//! configured timeout; the response code is logged either way.
//!
//! The call **blocks the control loop** for up to the timeout.  That
//! stall is an accepted design limitation of the single-threaded
//! station, not a bug to work around here.

use log::{info, warn};

use crate::app::ports::ReportSink;
use crate::error::CommsError;
use crate::report::Report;

pub struct HttpReporter {
    url: String,
    timeout_ms: u32,
}

impl HttpReporter {
    pub fn new(url: &str, timeout_ms: u32) -> Self {
        Self {
            url: url.to_string(),
            timeout_ms,
        }
    }

    #[cfg(target_os = "espidf")]
    fn post_json(&mut self, body: &str) -> Result<u16, CommsError> {
        crate::adapters::alert_http::http_post(
            &self.url,
            "application/json",
            body,
            self.timeout_ms,
        )
    }

    #[cfg(not(target_os = "espidf"))]
    fn post_json(&mut self, body: &str) -> Result<u16, CommsError> {
        info!(
            "report(sim): would POST {} bytes to {} (timeout {} ms)",
            body.len(),
            self.url,
            self.timeout_ms
        );
        Ok(200)
    }
}

impl ReportSink for HttpReporter {
    fn submit(&mut self, report: &Report) -> Result<(), CommsError> {
        let body = serde_json::to_string(report).map_err(|_| CommsError::RequestFailed)?;
        match self.post_json(&body) {
            Ok(status) if (200..300).contains(&status) => {
                info!("report: accepted (status {status})");
                Ok(())
            }
            Ok(status) => {
                warn!("report: endpoint answered status {status}");
                Err(CommsError::RejectedStatus(status))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readings::Readings;

    #[test]
    fn sim_submit_succeeds() {
        let mut reporter = HttpReporter::new("http://example.invalid/ingest", 5000);
        let report = Report::from_readings(&Readings::default());
        assert!(reporter.submit(&report).is_ok());
    }
}
