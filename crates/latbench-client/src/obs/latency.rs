//! The `http_client_latency` instrument.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use opentelemetry::metrics::Histogram;
use opentelemetry::{InstrumentationScope, KeyValue};
use opentelemetry_semantic_conventions as semcov;

use latbench_core::TransportTag;

use super::provider::MeterProvider;

pub const LATENCY_METRIC: &str = "http_client_latency";
pub const METER_SCOPE: &str = "latbench";

static SCOPE: LazyLock<InstrumentationScope> = LazyLock::new(|| {
    InstrumentationScope::builder(METER_SCOPE)
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_schema_url(semcov::SCHEMA_URL)
        .build()
});

/// Instrumentation scope the latency meter is created under.
pub fn scope() -> &'static InstrumentationScope {
    &SCOPE
}

/// Round-trip latency in whole milliseconds, labeled `{url, name}`.
#[derive(Clone)]
pub struct LatencyHistogram {
    histogram: Histogram<f64>,
    shutdown: Arc<AtomicBool>,
}

impl LatencyHistogram {
    pub fn new(provider: &MeterProvider) -> Self {
        let histogram = provider
            .meter_with_scope(SCOPE.clone())
            .f64_histogram(LATENCY_METRIC)
            .with_unit("ms")
            .build();
        Self {
            histogram,
            shutdown: provider.shutdown_flag(),
        }
    }

    /// Records `latency` truncated to whole milliseconds.
    ///
    /// Returns `false` once the provider has shut down; the sample is dropped.
    pub fn record(&self, url: &str, tag: TransportTag, latency: Duration) -> bool {
        if self.shutdown.load(Ordering::Acquire) {
            return false;
        }
        self.histogram.record(
            latency.as_millis() as f64,
            &[
                KeyValue::new("url", url.to_owned()),
                KeyValue::new("name", tag.as_str()),
            ],
        );
        true
    }
}
