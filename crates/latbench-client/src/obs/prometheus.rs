//! Prometheus pull reader.
//!
//! The SDK side is an `opentelemetry-prometheus` reader registered on its
//! own `prometheus::Registry`; the handle kept here encodes that registry
//! in text format once per scrape.

use prometheus::{Encoder, Registry, TextEncoder};

use latbench_core::error::{LatBenchError, Result};

use super::aggregation::validate_boundaries;
use super::provider::ExporterOptions;

pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Scrape handle on the registry the reader writes into.
#[derive(Clone)]
pub struct PrometheusExporter {
    registry: Registry,
}

impl PrometheusExporter {
    /// Build the SDK reader and its scrape handle.
    ///
    /// Scope labels and unit suffixes are turned off so series keep their
    /// instrument name and exactly the recorded attributes.
    pub fn new(
        opts: &ExporterOptions,
    ) -> Result<(Self, opentelemetry_prometheus::PrometheusExporter)> {
        if let Some(boundaries) = &opts.histogram_boundaries {
            if let Err(e) = validate_boundaries(boundaries) {
                tracing::error!(error = %e, "prometheus histogram boundaries rejected");
                return Err(LatBenchError::Exporter("prometheus".into()));
            }
        }

        let registry = Registry::new();
        let reader = opentelemetry_prometheus::exporter()
            .with_registry(registry.clone())
            .without_scope_info()
            .without_units()
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "prometheus reader build failed");
                LatBenchError::Exporter("prometheus".into())
            })?;

        Ok((Self { registry }, reader))
    }

    /// Text exposition of everything collected so far.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| LatBenchError::Internal(format!("prometheus encode: {e}")))?;
        String::from_utf8(buffer)
            .map_err(|e| LatBenchError::Internal(format!("prometheus utf8: {e}")))
    }
}
