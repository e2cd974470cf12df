//! Transport variants and how each one builds its pooled HTTP client.

use reqwest::Url;

use latbench_core::error::{LatBenchError, Result};
use latbench_core::TransportTag;

/// Peer-certificate handling for TLS connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsVerification {
    Verify,
    /// Accept any server certificate. Only for self-signed test servers.
    InsecureSkipVerify,
}

impl TlsVerification {
    fn skips(self) -> bool {
        matches!(self, TlsVerification::InsecureSkipVerify)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Http2Mode {
    /// h2c with prior knowledge. Every connection is plain TCP, including
    /// URLs whose scheme is `https`.
    Cleartext,
    /// TLS with ALPN `h2` for `https` URLs; `http` URLs fall back to h2c.
    Tls { verification: TlsVerification },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Http1 { verification: TlsVerification },
    Http2(Http2Mode),
}

impl Transport {
    pub fn tag(&self) -> TransportTag {
        match self {
            Transport::Http1 { .. } => TransportTag::Http1,
            Transport::Http2(_) => TransportTag::Http2,
        }
    }

    /// Build the one client shared by every worker. Connections are pooled
    /// and kept alive; there is no request timeout.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let builder = reqwest::Client::builder().use_rustls_tls().no_proxy();

        let builder = match *self {
            Transport::Http1 { verification } => builder
                .http1_only()
                .danger_accept_invalid_certs(verification.skips()),
            Transport::Http2(Http2Mode::Cleartext) => builder.http2_prior_knowledge(),
            Transport::Http2(Http2Mode::Tls { verification }) => builder
                .http2_prior_knowledge()
                .danger_accept_invalid_certs(verification.skips()),
        };

        builder
            .build()
            .map_err(|e| LatBenchError::Internal(format!("failed to build http client: {e}")))
    }

    /// The URL actually dialed for `url`.
    ///
    /// Cleartext HTTP/2 rewrites `https` to `http` and keeps the port the
    /// `https` URL implied, so a TLS-looking URL still reaches an h2c server.
    pub fn dial_url(&self, mut url: Url) -> Url {
        if let Transport::Http2(Http2Mode::Cleartext) = self {
            if url.scheme() == "https" {
                let port = url.port_or_known_default();
                if url.set_scheme("http").is_ok() {
                    let _ = url.set_port(port);
                }
            }
        }
        url
    }
}
