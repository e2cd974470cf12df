//! HTTP/2 load client (h2c, prior knowledge).
//!
//! Reads `SERVER_HTTP2_URL`, runs three request loops against it, and
//! serves the latency histogram on `:8080/metrics`.

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use latbench_client::config::ClientProfile;
use latbench_client::driver;

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    driver::main_for(ClientProfile::Http2).await
}
