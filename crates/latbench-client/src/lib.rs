//! latbench client library entry.
//!
//! This crate wires the metrics pipeline, the latency-measuring HTTP client,
//! and the load driver into the two client binaries (`http1-client`,
//! `http2-client`). It is also consumed by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod app_state;
pub mod client;
pub mod config;
pub mod driver;
pub mod obs;
pub mod ops;
pub mod router;
