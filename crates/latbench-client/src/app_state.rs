//! Shared process state: config, meter provider, and the one HTTP client.
//!
//! Built once before any worker starts and never mutated afterwards.

use std::sync::Arc;

use latbench_core::error::Result;

use crate::client::LatencyClient;
use crate::config::ClientConfig;
use crate::obs::{self, MeterProvider, PrometheusExporter};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    client: Arc<LatencyClient>,
}

struct AppStateInner {
    cfg: ClientConfig,
    provider: MeterProvider,
}

impl AppState {
    /// Bring up the process meter provider and the client.
    /// Returns Result so main can exit cleanly on a broken pipeline.
    pub fn new(cfg: ClientConfig) -> Result<Self> {
        let provider = obs::init_meter_provider(&cfg.exporters, &cfg.resource, &cfg.exporter_options)?;
        Self::with_provider(cfg, provider)
    }

    /// Same as [`AppState::new`] with a caller-owned provider.
    pub fn with_provider(cfg: ClientConfig, provider: MeterProvider) -> Result<Self> {
        let client = LatencyClient::new(cfg.transport, &provider)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, provider }),
            client: Arc::new(client),
        })
    }

    pub fn cfg(&self) -> &ClientConfig {
        &self.inner.cfg
    }

    pub fn provider(&self) -> &MeterProvider {
        &self.inner.provider
    }

    pub fn prometheus(&self) -> Option<&PrometheusExporter> {
        self.inner.provider.prometheus()
    }

    pub fn client(&self) -> Arc<LatencyClient> {
        Arc::clone(&self.client)
    }
}
