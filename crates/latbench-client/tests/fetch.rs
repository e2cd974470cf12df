//! LatencyClient against loopback servers.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashSet;
use std::time::{Duration, Instant};

use opentelemetry_sdk::Resource;

use latbench_client::client::{FetchOutcome, Http2Mode, LatencyClient, TlsVerification, Transport};
use latbench_client::config::ClientProfile;
use latbench_client::obs::MeterProvider;

use harness::*;

const HTTP1: Transport = Transport::Http1 {
    verification: TlsVerification::InsecureSkipVerify,
};
const H2C: Transport = Transport::Http2(Http2Mode::Cleartext);

fn provider_for(profile: ClientProfile) -> MeterProvider {
    MeterProvider::from_exporters(&["prometheus"], Resource::default(), &profile.exporter_options())
        .unwrap()
}

#[tokio::test]
async fn http1_happy_path_records_one_sample_per_fetch() {
    let addr = spawn_server(echo_router("Hello, HTTP/1.1!")).await;
    let url = format!("http://{addr}/");
    let provider = provider_for(ClientProfile::Http1);
    let client = LatencyClient::new(HTTP1, &provider).unwrap();

    for k in 1..=5u64 {
        let outcome = client.fetch(&url).await;
        assert!(matches!(outcome, FetchOutcome::Recorded { .. }), "{outcome:?}");
        assert_eq!(latency_count(&provider, &url, "http1.1"), k);
    }

    let body = provider.prometheus().unwrap().render().unwrap();
    let count = scrape_value(
        &body,
        &format!("http_client_latency_count{{name=\"http1.1\",url=\"{url}\"}}"),
    );
    assert_eq!(count, Some(5.0));
    let sum = scrape_value(&body, &format!("http_client_latency_sum{{name=\"http1.1\",url=\"{url}\"}}"));
    assert!(sum.unwrap() >= 0.0);
}

#[tokio::test]
async fn h2c_happy_path() {
    let addr = spawn_server(echo_router("Hello, HTTP/2 without TLS!")).await;
    let url = format!("http://{addr}/");
    let provider = provider_for(ClientProfile::Http2);
    let client = LatencyClient::new(H2C, &provider).unwrap();

    for _ in 0..3 {
        assert!(matches!(client.fetch(&url).await, FetchOutcome::Recorded { .. }));
    }
    assert_eq!(latency_count(&provider, &url, "http2"), 3);
    assert_eq!(latency_count(&provider, &url, "http1.1"), 0);
}

#[tokio::test]
async fn h2c_dials_plain_tcp_for_https_urls() {
    let addr = spawn_server(echo_router("Hello, HTTP/2 without TLS!")).await;
    let url = format!("https://{addr}/");
    let provider = provider_for(ClientProfile::Http2);
    let client = LatencyClient::new(H2C, &provider).unwrap();

    assert!(matches!(client.fetch(&url).await, FetchOutcome::Recorded { .. }));
    // label keeps the configured URL
    assert_eq!(latency_count(&provider, &url, "http2"), 1);
}

#[tokio::test]
async fn http2_tls_mode_allows_cleartext_urls() {
    let addr = spawn_server(echo_router("ok")).await;
    let url = format!("http://{addr}/");
    let provider = provider_for(ClientProfile::Http2);
    let transport = Transport::Http2(Http2Mode::Tls {
        verification: TlsVerification::InsecureSkipVerify,
    });
    let client = LatencyClient::new(transport, &provider).unwrap();

    assert!(matches!(client.fetch(&url).await, FetchOutcome::Recorded { .. }));
    assert_eq!(latency_count(&provider, &url, "http2"), 1);
}

#[tokio::test]
async fn server_down_records_nothing() {
    let addr = closed_addr().await;
    let url = format!("http://{addr}/");
    let provider = provider_for(ClientProfile::Http1);
    let client = LatencyClient::new(HTTP1, &provider).unwrap();

    for _ in 0..3 {
        assert_eq!(client.fetch(&url).await, FetchOutcome::TransportFailed);
    }
    assert_eq!(latency_count(&provider, &url, "http1.1"), 0);
    let body = provider.prometheus().unwrap().render().unwrap();
    assert!(!body.contains("http_client_latency_count{"));
}

#[tokio::test]
async fn unparseable_url_is_a_transport_failure() {
    let provider = provider_for(ClientProfile::Http2);
    let client = LatencyClient::new(H2C, &provider).unwrap();
    assert_eq!(client.fetch("::not a url::").await, FetchOutcome::TransportFailed);
}

#[tokio::test]
async fn unsupported_scheme_is_a_transport_failure() {
    let provider = provider_for(ClientProfile::Http1);
    let client = LatencyClient::new(HTTP1, &provider).unwrap();
    let url = "ftp://127.0.0.1/";

    assert_eq!(client.fetch(url).await, FetchOutcome::TransportFailed);
    assert_eq!(latency_count(&provider, url, "http1.1"), 0);
}

#[tokio::test]
async fn fetch_after_shutdown_reports_discarded_sample() {
    let addr = spawn_server(echo_router("ok")).await;
    let url = format!("http://{addr}/");
    let provider = provider_for(ClientProfile::Http1);
    let client = LatencyClient::new(HTTP1, &provider).unwrap();

    assert!(matches!(client.fetch(&url).await, FetchOutcome::Recorded { .. }));
    provider.shutdown().unwrap();

    let outcome = client.fetch(&url).await;
    assert!(matches!(outcome, FetchOutcome::Discarded { .. }), "{outcome:?}");
}

#[tokio::test]
async fn body_failure_drops_the_sample() {
    let addr = spawn_truncating_server().await;
    let url = format!("http://{addr}/");
    let provider = provider_for(ClientProfile::Http1);
    let client = LatencyClient::new(HTTP1, &provider).unwrap();

    assert_eq!(client.fetch(&url).await, FetchOutcome::BodyFailed);
    assert_eq!(latency_count(&provider, &url, "http1.1"), 0);
}

#[tokio::test]
async fn body_drain_is_excluded_from_latency() {
    let delay = Duration::from_millis(400);
    let addr = spawn_server(slow_body_router(delay)).await;
    let url = format!("http://{addr}/");
    let provider = provider_for(ClientProfile::Http1);
    let client = LatencyClient::new(HTTP1, &provider).unwrap();

    let start = Instant::now();
    let outcome = client.fetch(&url).await;
    let wall = start.elapsed();

    let FetchOutcome::Recorded { latency } = outcome else {
        panic!("expected a recorded sample, got {outcome:?}");
    };
    assert!(wall >= delay, "fetch returned before the body was drained");
    assert!(latency < delay, "latency {latency:?} includes body drain");
    assert!(latency <= wall);
    assert_eq!(latency_count(&provider, &url, "http1.1"), 1);
}

async fn assert_header_fidelity(transport: Transport, profile: ClientProfile) {
    let (app, seen) = capture_router();
    let addr = spawn_server(app).await;
    let url = format!("http://{addr}/");
    let provider = provider_for(profile);
    let client = LatencyClient::new(transport, &provider).unwrap();

    for _ in 0..4 {
        assert!(matches!(client.fetch(&url).await, FetchOutcome::Recorded { .. }));
    }

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    for headers in seen.iter() {
        let custom: Vec<_> = headers
            .keys()
            .filter(|k| k.as_str().starts_with("custom-header-"))
            .collect();
        let distinct: HashSet<_> = custom.iter().map(|k| k.as_str()).collect();
        assert_eq!(custom.len(), 12);
        assert_eq!(distinct.len(), 12);

        for i in 0..12 {
            let name = format!("custom-header-{i}");
            let values: Vec<_> = headers.get_all(name.as_str()).iter().collect();
            assert_eq!(values.len(), 1, "{name} duplicated");
            assert_eq!(values[0], format!("Custom-Value-{i}").as_str());
        }
    }
}

#[tokio::test]
async fn http1_sends_exactly_twelve_synthetic_headers() {
    assert_header_fidelity(HTTP1, ClientProfile::Http1).await;
}

#[tokio::test]
async fn h2c_sends_exactly_twelve_synthetic_headers() {
    assert_header_fidelity(H2C, ClientProfile::Http2).await;
}

#[tokio::test]
async fn concurrent_fetches_share_one_client() {
    let addr = spawn_server(echo_router("ok")).await;
    let url = format!("http://{addr}/");
    let provider = provider_for(ClientProfile::Http2);
    let client = std::sync::Arc::new(LatencyClient::new(H2C, &provider).unwrap());

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..3 {
        let client = client.clone();
        let url = url.clone();
        tasks.spawn(async move {
            for _ in 0..10 {
                assert!(matches!(client.fetch(&url).await, FetchOutcome::Recorded { .. }));
            }
        });
    }
    while let Some(res) = tasks.join_next().await {
        res.unwrap();
    }
    assert_eq!(latency_count(&provider, &url, "http2"), 30);
}
