//! Uplink adapter — WiFi plus the two outbound HTTP collaborators.
//!
//! Bundles the [`WifiAdapter`], the report uploader and the alarm
//! notifier behind one object satisfying [`ConnectivityPort`] +
//! [`ReportSink`] + [`AlertSink`], which is exactly the bound the
//! service's `tick` takes for its `uplink` parameter.
//!
//! Both outbound paths are gated on connectivity: the upload tick is
//! skipped while offline, and a notification that cannot be delivered
//! is logged, not queued.

use log::warn;

use crate::app::ports::{AlertSink, ConnectivityPort, ReportSink};
use crate::error::CommsError;
use crate::report::Report;

use super::alert_http::HttpNotifier;
use super::report_http::HttpReporter;
use super::wifi::WifiAdapter;

pub struct Uplink {
    wifi: WifiAdapter,
    reporter: HttpReporter,
    notifier: HttpNotifier,
}

impl Uplink {
    pub fn new(wifi: WifiAdapter, reporter: HttpReporter, notifier: HttpNotifier) -> Self {
        Self {
            wifi,
            reporter,
            notifier,
        }
    }

    pub fn wifi(&self) -> &WifiAdapter {
        &self.wifi
    }
}

impl ConnectivityPort for Uplink {
    fn connect(&mut self) -> Result<(), CommsError> {
        self.wifi.connect()
    }

    fn disconnect(&mut self) {
        self.wifi.disconnect();
    }

    fn is_connected(&self) -> bool {
        self.wifi.is_connected()
    }

    fn poll(&mut self) {
        self.wifi.poll();
    }
}

impl ReportSink for Uplink {
    fn submit(&mut self, report: &Report) -> Result<(), CommsError> {
        if !self.wifi.is_connected() {
            return Err(CommsError::WifiDisconnected);
        }
        self.reporter.submit(report)
    }
}

impl AlertSink for Uplink {
    fn notify(&mut self, message: &str) -> Result<(), CommsError> {
        if !self.wifi.is_connected() {
            warn!("alert: no WiFi connection, notification not sent");
            return Err(CommsError::WifiDisconnected);
        }
        self.notifier.notify(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uplink() -> Uplink {
        Uplink::new(
            WifiAdapter::new("TestNet", "password1"),
            HttpReporter::new("http://example.invalid/ingest", 5000),
            HttpNotifier::new("http://example.invalid/messages", "+1", "+2", 5000),
        )
    }

    #[test]
    fn offline_submit_is_refused() {
        let mut u = uplink();
        let report = Report::from_readings(&crate::readings::Readings::default());
        assert_eq!(u.submit(&report), Err(CommsError::WifiDisconnected));
    }

    #[test]
    fn offline_notify_is_refused() {
        let mut u = uplink();
        assert_eq!(u.notify("test"), Err(CommsError::WifiDisconnected));
    }

    #[test]
    fn online_paths_delegate() {
        let mut u = uplink();
        u.connect().unwrap();
        let report = Report::from_readings(&crate::readings::Readings::default());
        assert!(u.submit(&report).is_ok());
        assert!(u.notify("test").is_ok());
    }
}
