use std::net::SocketAddr;

use latbench_core::error::{LatBenchError, Result};
use latbench_core::resource::ApplicationResource;

use crate::client::{Http2Mode, TlsVerification, Transport};
use crate::obs::aggregation::PROMETHEUS_HISTOGRAM_BOUNDARIES;
use crate::obs::ExporterOptions;

/// Which of the two client programs is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientProfile {
    Http1,
    Http2,
}

impl ClientProfile {
    /// Environment variable holding the target URL.
    pub fn env_var(self) -> &'static str {
        match self {
            ClientProfile::Http1 => "SERVER_HTTP1_URL",
            ClientProfile::Http2 => "SERVER_HTTP2_URL",
        }
    }

    pub fn application_resource(self) -> ApplicationResource {
        let service = match self {
            ClientProfile::Http1 => "example",
            ClientProfile::Http2 => "http2",
        };
        ApplicationResource::new(service, "example version", "test env")
    }

    pub fn transport(self) -> Transport {
        match self {
            ClientProfile::Http1 => Transport::Http1 {
                verification: TlsVerification::InsecureSkipVerify,
            },
            ClientProfile::Http2 => Transport::Http2(Http2Mode::Cleartext),
        }
    }

    /// HTTP/2 pins explicit latency buckets; HTTP/1.1 keeps the defaults.
    pub fn exporter_options(self) -> ExporterOptions {
        let histogram_boundaries = match self {
            ClientProfile::Http1 => None,
            ClientProfile::Http2 => Some(PROMETHEUS_HISTOGRAM_BOUNDARIES.to_vec()),
        };
        ExporterOptions { histogram_boundaries }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub url: String,
    pub listen: SocketAddr,
    pub workers: usize,
    pub exporters: Vec<String>,
    pub resource: ApplicationResource,
    pub transport: Transport,
    pub exporter_options: ExporterOptions,
}

impl ClientConfig {
    pub fn for_profile(profile: ClientProfile, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            listen: default_listen(),
            workers: default_workers(),
            exporters: default_exporters(),
            resource: profile.application_resource(),
            transport: profile.transport(),
            exporter_options: profile.exporter_options(),
        }
    }

    /// Only emptiness is checked for the URL; a malformed one fails each
    /// fetch instead of startup.
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(LatBenchError::InvalidConfig("url must not be empty".into()));
        }
        if self.workers == 0 {
            return Err(LatBenchError::InvalidConfig("workers must be at least 1".into()));
        }
        Ok(())
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}
fn default_workers() -> usize {
    3
}
fn default_exporters() -> Vec<String> {
    vec!["prometheus".into()]
}
