//! Metrics pipeline on the OpenTelemetry SDK.
//!
//! A meter provider bound to readers picked by name (only `prometheus` is
//! known). The Prometheus reader writes into its own registry, which the
//! `/metrics` handler encodes in text format.

pub mod aggregation;
pub mod latency;
pub mod prometheus;
pub mod provider;
pub mod resource;

pub use self::aggregation::{histogram_view, validate_boundaries};
pub use self::latency::LatencyHistogram;
pub use self::prometheus::PrometheusExporter;
pub use self::provider::{
    global_meter_provider, init_meter_provider, ExporterOptions, ExporterRegistry, MeterProvider,
    Reader,
};
pub use self::resource::{application_resource, compose_resource, init_resource};
