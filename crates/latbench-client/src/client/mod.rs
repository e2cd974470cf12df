//! Latency-measuring HTTP client.
//!
//! One `LatencyClient` per process, shared by every worker. Each fetch
//! stamps the request with the synthetic header block, times the round trip
//! up to response headers, drains the body, and only then records.

pub mod transport;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Request, Url};

use latbench_core::error::{LatBenchError, Result};
use latbench_core::request::{synthetic_headers, SYNTHETIC_HEADER_COUNT};
use latbench_core::TransportTag;

use crate::driver::Fetcher;
use crate::obs::{LatencyHistogram, MeterProvider};

pub use transport::{Http2Mode, TlsVerification, Transport};

/// Result of one fetch, as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Headers arrived and the body drained; one sample was recorded.
    Recorded { latency: Duration },
    /// As `Recorded`, but the meter provider had shut down and the sample
    /// was dropped.
    Discarded { latency: Duration },
    /// No response headers (connect/send/protocol failure or a bad URL).
    TransportFailed,
    /// Headers arrived but the body could not be drained.
    BodyFailed,
}

pub struct LatencyClient {
    http: reqwest::Client,
    transport: Transport,
    latency: LatencyHistogram,
}

impl LatencyClient {
    pub fn new(transport: Transport, provider: &MeterProvider) -> Result<Self> {
        Ok(Self {
            http: transport.build_client()?,
            transport,
            latency: LatencyHistogram::new(provider),
        })
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn tag(&self) -> TransportTag {
        self.transport.tag()
    }

    /// GET `url` once. Errors are logged here and never returned.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let target = match Url::parse(url) {
            Ok(u) => self.transport.dial_url(u),
            Err(e) => {
                let err = LatBenchError::InvalidUrl(format!("{url}: {e}"));
                tracing::warn!(%url, kind = err.kind().as_str(), "Error: {err}");
                return FetchOutcome::TransportFailed;
            }
        };

        let mut req = Request::new(Method::GET, target);
        *req.headers_mut() = synthetic_header_map();

        let start = Instant::now();
        let resp = match self.http.execute(req).await {
            Ok(resp) => resp,
            Err(e) => {
                let err = LatBenchError::Transport(e.to_string());
                tracing::warn!(%url, kind = err.kind().as_str(), "Error: {err}");
                return FetchOutcome::TransportFailed;
            }
        };
        // headers are in; body drain is not part of the sample
        let latency = start.elapsed();

        if let Err(e) = resp.bytes().await {
            let err = LatBenchError::Body(e.to_string());
            tracing::warn!(%url, kind = err.kind().as_str(), "Error reading response body: {err}");
            return FetchOutcome::BodyFailed;
        }

        if !self.latency.record(url, self.tag(), latency) {
            tracing::debug!(%url, "meter provider shut down; sample dropped");
            return FetchOutcome::Discarded { latency };
        }
        tracing::trace!(%url, latency_ms = latency.as_millis() as u64, "fetch recorded");
        FetchOutcome::Recorded { latency }
    }
}

#[async_trait]
impl Fetcher for LatencyClient {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        LatencyClient::fetch(self, url).await
    }
}

/// Fresh header block for one request.
pub fn synthetic_header_map() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(SYNTHETIC_HEADER_COUNT);
    for (k, v) in synthetic_headers(SYNTHETIC_HEADER_COUNT) {
        match (HeaderName::from_bytes(k.as_bytes()), HeaderValue::from_str(&v)) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => tracing::debug!(header = %k, "skipping unrepresentable synthetic header"),
        }
    }
    headers
}
