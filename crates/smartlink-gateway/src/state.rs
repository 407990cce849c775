use std::sync::Arc;

use jiff::Timestamp;
use smartlink_core::{Clock, Shortener};
use smartlink_metrics::PrometheusEvents;
use smartlink_redirector::Redirector;
use typed_builder::TypedBuilder;

#[derive(Clone, TypedBuilder)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    redirector: Arc<dyn Redirector>,
    metrics: Arc<PrometheusEvents>,
    clock: Arc<dyn Clock>,
    /// Public origin that short URLs are built on, e.g. `https://smart.link`.
    #[builder(setter(into))]
    base_url: String,
}

impl AppState {
    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn redirector(&self) -> &dyn Redirector {
        self.redirector.as_ref()
    }

    pub fn metrics(&self) -> &PrometheusEvents {
        &self.metrics
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }
}
