//! Meter provider assembly.
//!
//! Exporters are picked by name from a registry; each known name yields an
//! SDK reader plus a handle the ops endpoints can use. The provider wraps an
//! `SdkMeterProvider` and remembers whether it was shut down, so callers can
//! tell a dropped observation from a recorded one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use opentelemetry::metrics::{Meter, MeterProvider as _};
use opentelemetry::InstrumentationScope;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::Resource;

use latbench_core::error::{LatBenchError, Result};
use latbench_core::ApplicationResource;

use super::aggregation::histogram_view;
use super::prometheus::PrometheusExporter;
use super::resource::init_resource;

// --------------------
// Readers / exporter registry
// --------------------

/// A reader ready to attach to a provider.
pub enum Reader {
    Prometheus {
        exporter: PrometheusExporter,
        reader: opentelemetry_prometheus::PrometheusExporter,
    },
}

impl Reader {
    pub fn name(&self) -> &'static str {
        match self {
            Reader::Prometheus { .. } => "prometheus",
        }
    }
}

/// Options handed to every exporter factory.
#[derive(Debug, Clone, Default)]
pub struct ExporterOptions {
    /// Explicit histogram boundaries; `None` keeps the SDK defaults.
    pub histogram_boundaries: Option<Vec<f64>>,
}

type ReaderFactory = fn(&ExporterOptions) -> Result<Reader>;

/// Exporter factories keyed by name.
pub struct ExporterRegistry {
    factories: HashMap<&'static str, ReaderFactory>,
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        let mut reg = Self {
            factories: HashMap::new(),
        };
        reg.register("prometheus", |opts| {
            let (exporter, reader) = PrometheusExporter::new(opts)?;
            Ok(Reader::Prometheus { exporter, reader })
        });
        reg
    }
}

impl ExporterRegistry {
    pub fn register(&mut self, name: &'static str, factory: ReaderFactory) {
        self.factories.insert(name, factory);
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Build a reader per recognized name. Unknown names are skipped.
    pub fn build<S: AsRef<str>>(&self, names: &[S], opts: &ExporterOptions) -> Result<Vec<Reader>> {
        let mut readers = Vec::new();
        for name in names {
            let name = name.as_ref();
            match self.factories.get(name) {
                Some(factory) => readers.push(factory(opts)?),
                None => tracing::debug!(exporter = %name, "unknown exporter ignored"),
            }
        }
        Ok(readers)
    }
}

// --------------------
// Provider
// --------------------

struct ProviderInner {
    sdk: SdkMeterProvider,
    resource: Resource,
    readers: Vec<&'static str>,
    prometheus: Option<PrometheusExporter>,
    shutdown: Arc<AtomicBool>,
}

/// Cheap-to-clone handle on a meter provider.
#[derive(Clone)]
pub struct MeterProvider {
    inner: Arc<ProviderInner>,
}

impl MeterProvider {
    /// Build a provider from exporter names using the default registry.
    pub fn from_exporters<S: AsRef<str>>(
        exporters: &[S],
        resource: Resource,
        opts: &ExporterOptions,
    ) -> Result<Self> {
        let readers = ExporterRegistry::default().build(exporters, opts)?;

        let mut builder = SdkMeterProvider::builder().with_resource(resource.clone());
        if let Some(boundaries) = &opts.histogram_boundaries {
            builder = builder.with_view(histogram_view(boundaries)?);
        }

        let mut names = Vec::with_capacity(readers.len());
        let mut prometheus = None;
        for r in readers {
            names.push(r.name());
            match r {
                Reader::Prometheus { exporter, reader } => {
                    builder = builder.with_reader(reader);
                    prometheus = Some(exporter);
                }
            }
        }

        Ok(Self {
            inner: Arc::new(ProviderInner {
                sdk: builder.build(),
                resource,
                readers: names,
                prometheus,
                shutdown: Arc::new(AtomicBool::new(false)),
            }),
        })
    }

    pub fn meter(&self, name: &'static str) -> Meter {
        self.inner.sdk.meter(name)
    }

    pub fn meter_with_scope(&self, scope: InstrumentationScope) -> Meter {
        self.inner.sdk.meter_with_scope(scope)
    }

    pub fn sdk(&self) -> &SdkMeterProvider {
        &self.inner.sdk
    }

    pub fn resource(&self) -> &Resource {
        &self.inner.resource
    }

    /// Names of the attached readers, in configuration order.
    pub fn readers(&self) -> &[&'static str] {
        &self.inner.readers
    }

    /// The attached Prometheus reader, if one was configured.
    pub fn prometheus(&self) -> Option<&PrometheusExporter> {
        self.inner.prometheus.as_ref()
    }

    pub fn is_shutdown(&self) -> bool {
        self.inner.shutdown.load(Ordering::Acquire)
    }

    /// Flag shared with instruments built through this provider.
    pub(crate) fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.inner.shutdown)
    }

    /// Stop accepting observations and shut the SDK down. A second call fails.
    pub fn shutdown(&self) -> Result<()> {
        if self.inner.shutdown.swap(true, Ordering::AcqRel) {
            return Err(LatBenchError::AlreadyShutdown);
        }
        self.inner
            .sdk
            .shutdown()
            .map_err(|e| LatBenchError::Internal(format!("meter provider shutdown: {e}")))?;
        tracing::debug!(readers = self.inner.readers.len(), "meter provider shut down");
        Ok(())
    }
}

// --------------------
// Process-global provider
// --------------------

static GLOBAL_PROVIDER: OnceLock<MeterProvider> = OnceLock::new();

/// Initialize the process meter provider once.
///
/// The first successful call composes the resource, attaches readers, and
/// installs the SDK provider as the `opentelemetry::global` one; every later
/// call returns that same provider and ignores its arguments.
pub fn init_meter_provider<S: AsRef<str>>(
    exporters: &[S],
    app: &ApplicationResource,
    opts: &ExporterOptions,
) -> Result<MeterProvider> {
    if let Some(p) = GLOBAL_PROVIDER.get() {
        return Ok(p.clone());
    }
    let provider = MeterProvider::from_exporters(exporters, init_resource(app).clone(), opts)?;
    let provider = GLOBAL_PROVIDER.get_or_init(|| {
        opentelemetry::global::set_meter_provider(provider.sdk().clone());
        provider
    });
    Ok(provider.clone())
}

/// The process provider, if [`init_meter_provider`] has succeeded.
pub fn global_meter_provider() -> Option<MeterProvider> {
    GLOBAL_PROVIDER.get().cloned()
}
