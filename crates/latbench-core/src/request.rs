//! Request template shared by both transports.
//!
//! Every outbound GET carries the same fixed set of synthetic headers so the
//! two transports are compared on identical header blocks.

use std::fmt;

/// Number of `Custom-Header-i` pairs attached to each request.
pub const SYNTHETIC_HEADER_COUNT: usize = 12;

/// Transport tag written into the `name` label of every latency sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportTag {
    Http1,
    Http2,
}

impl TransportTag {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportTag::Http1 => "http1.1",
            TransportTag::Http2 => "http2",
        }
    }
}

impl fmt::Display for TransportTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Custom-Header-{i}: Custom-Value-{i}` for `i` in `0..n`.
///
/// Freshly allocated on each call; callers regenerate per request.
pub fn synthetic_headers(n: usize) -> impl Iterator<Item = (String, String)> {
    (0..n).map(|i| (format!("Custom-Header-{i}"), format!("Custom-Value-{i}")))
}
