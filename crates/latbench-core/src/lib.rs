//! latbench core: transport-agnostic primitives shared by the load clients.
//!
//! This crate defines the error surface, the application labels, and the
//! synthetic request template. It intentionally carries no transport
//! or runtime dependencies so the pieces can be unit tested in isolation.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod request;
pub mod resource;

/// Shared result type.
pub use error::{LatBenchError, Result};
pub use request::TransportTag;
pub use resource::ApplicationResource;
