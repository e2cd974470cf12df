//! Histogram bucket layouts and the view that applies them.

use opentelemetry_sdk::metrics::{new_view, Aggregation, Instrument, InstrumentKind, Stream, View};

use latbench_core::error::{LatBenchError, Result};

/// Boundaries the SDK uses when no view overrides histogram aggregation.
pub const DEFAULT_HISTOGRAM_BOUNDARIES: [f64; 15] = [
    0.0, 5.0, 10.0, 25.0, 50.0, 75.0, 100.0, 250.0, 500.0, 750.0, 1000.0, 2500.0, 5000.0, 7500.0,
    10000.0,
];

/// Fine-grained millisecond boundaries for the HTTP/2 latency histogram.
pub const PROMETHEUS_HISTOGRAM_BOUNDARIES: [f64; 29] = [
    0.01, 0.05, 0.1, 0.2, 0.3, 0.4, 0.5, 0.8, //
    1.0, 1.3, 2.0, 3.0, 5.0, 8.0, //
    10.0, 13.0, 25.0, 50.0, 75.0, 100.0, 250.0, 500.0, 750.0, 1000.0, 2500.0, 5000.0, 7500.0,
    10000.0, 15000.0,
];

/// Boundaries must be finite and strictly increasing.
pub fn validate_boundaries(boundaries: &[f64]) -> Result<()> {
    if boundaries.iter().any(|b| !b.is_finite()) {
        return Err(LatBenchError::InvalidConfig(
            "histogram boundaries must be finite".into(),
        ));
    }
    if boundaries.windows(2).any(|w| w[0] >= w[1]) {
        return Err(LatBenchError::InvalidConfig(
            "histogram boundaries must be strictly increasing".into(),
        ));
    }
    Ok(())
}

/// View pinning every histogram instrument to `boundaries` (min/max kept).
pub fn histogram_view(boundaries: &[f64]) -> Result<Box<dyn View>> {
    validate_boundaries(boundaries)?;
    new_view(
        {
            let mut criteria = Instrument::new();
            criteria.kind = Some(InstrumentKind::Histogram);
            criteria
        },
        Stream::new().aggregation(Aggregation::ExplicitBucketHistogram {
            boundaries: boundaries.to_vec(),
            record_min_max: true,
        }),
    )
    .map_err(|e| LatBenchError::InvalidConfig(format!("histogram view: {e}")))
}
