use std::time::Duration;

use slicewatch_api::{TlsMode, TransportConfig};
use url::Url;

/// Default poll cadence for both synchronizers.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for a dashboard session.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Slice manager root URL (endpoints live under `{base}/api`).
    pub base_url: Url,
    /// Cadence of the list and detail poll loops. A zero interval
    /// disables background polling entirely (one-shot mode).
    pub poll_interval: Duration,
    /// Per-request timeout for gateway calls.
    pub request_timeout: Duration,
    /// TLS verification mode for the gateway transport.
    pub tls: TlsMode,
}

impl DashboardConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: Duration::from_secs(30),
            tls: TlsMode::System,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.request_timeout,
        }
    }
}
