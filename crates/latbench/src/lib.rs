//! Top-level facade crate for latbench.
//!
//! Re-exports core types and the client library so users can depend on a single crate.

pub mod core {
    pub use latbench_core::*;
}

pub mod client {
    pub use latbench_client::*;
}
