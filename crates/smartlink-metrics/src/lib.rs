//! Prometheus-backed link event sink.
//!
//! [`PrometheusEvents`] implements [`LinkEvents`] on top of a private
//! [`Registry`] holding the three SmartLink counters and, on Linux, the
//! standard `process_*` collector.

use prometheus::{Encoder, IntCounter, Registry, TextEncoder};
use smartlink_core::LinkEvents;
use thiserror::Error;

pub const URLS_CREATED_TOTAL: &str = "smartlink_urls_created_total";
pub const REDIRECTS_TOTAL: &str = "smartlink_redirects_total";
pub const URLS_EXPIRED_TOTAL: &str = "smartlink_urls_expired_total";

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
    #[error("metrics output is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Point-in-time values of the link counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventSnapshot {
    pub created: u64,
    pub redirected: u64,
    pub expired: u64,
}

pub struct PrometheusEvents {
    registry: Registry,
    urls_created: IntCounter,
    redirects: IntCounter,
    urls_expired: IntCounter,
}

impl PrometheusEvents {
    /// Creates the counters and registers them with a fresh registry.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let urls_created = IntCounter::new(URLS_CREATED_TOTAL, "Total short URLs created")?;
        let redirects = IntCounter::new(REDIRECTS_TOTAL, "Total URL redirections")?;
        let urls_expired = IntCounter::new(URLS_EXPIRED_TOTAL, "Total expired URLs deleted")?;

        registry.register(Box::new(urls_created.clone()))?;
        registry.register(Box::new(redirects.clone()))?;
        registry.register(Box::new(urls_expired.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            urls_created,
            redirects,
            urls_expired,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn snapshot(&self) -> EventSnapshot {
        EventSnapshot {
            created: self.urls_created.get(),
            redirected: self.redirects.get(),
            expired: self.urls_expired.get(),
        }
    }

    /// Content type of [`PrometheusEvents::export`] output.
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    /// Exports every registered metric in Prometheus text format.
    pub fn export(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl LinkEvents for PrometheusEvents {
    fn link_created(&self) {
        self.urls_created.inc();
    }

    fn link_redirected(&self) {
        self.redirects.inc();
    }

    fn links_expired(&self, count: u64) {
        self.urls_expired.inc_by(count);
    }
}
