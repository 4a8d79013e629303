//! Transport-level reachability probing for website URIs.

use std::time::Duration;

use reqwest::{Client, Url};
use sitecheck_core::ProbeResult;

use crate::error::VerifierError;

/// Responses at or above this status mean the URI is not serving the page.
/// Redirects and success codes both count as reachable.
const CLIENT_ERROR_THRESHOLD: u16 = 400;

/// Checks whether a website URI is reachable and whether it serves over
/// encrypted transport.
///
/// The probe is interested in reachability and content, not trust-chain
/// validity, so certificate validation is relaxed and redirects are not
/// followed — a redirect status already proves the host is serving.
pub struct ProtocolProbe {
    client: Client,
}

impl ProtocolProbe {
    /// Creates a probe with the given per-attempt timeout.
    ///
    /// # Errors
    ///
    /// Returns [`VerifierError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, VerifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { client })
    }

    /// Probe a URI for reachability and HTTPS support.
    ///
    /// Tries encrypted transport first; success there is conclusive and no
    /// plaintext attempt is made. Otherwise the same resource is retried
    /// over plain HTTP. Never fails: malformed URIs, timeouts, and network
    /// errors all resolve to an unreachable result.
    pub async fn probe(&self, uri: &str) -> ProbeResult {
        let Some(url) = normalize_uri(uri) else {
            tracing::debug!(uri, "unparseable website URI");
            return ProbeResult {
                is_accessible: false,
                supports_https: false,
            };
        };

        if let Some(https_url) = with_scheme(&url, "https") {
            if self.attempt(https_url).await {
                return ProbeResult {
                    is_accessible: true,
                    supports_https: true,
                };
            }
        }

        let is_accessible = match with_scheme(&url, "http") {
            Some(http_url) => self.attempt(http_url).await,
            None => false,
        };

        ProbeResult {
            is_accessible,
            supports_https: false,
        }
    }

    /// One HEAD attempt against a concrete URL. Reachable means the response
    /// status is below the client-error threshold.
    async fn attempt(&self, url: Url) -> bool {
        match self.client.head(url.clone()).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                tracing::debug!(url = %url, status, "probe attempt");
                status < CLIENT_ERROR_THRESHOLD
            }
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "probe attempt failed");
                false
            }
        }
    }
}

/// Parse a stored website URI, defaulting scheme-less values to `https://`.
fn normalize_uri(uri: &str) -> Option<Url> {
    let trimmed = uri.trim();
    if trimmed.is_empty() {
        return None;
    }
    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    Url::parse(&candidate).ok().filter(Url::has_host)
}

/// Rebuild `url` with the given scheme, keeping host, path, and query.
fn with_scheme(url: &Url, scheme: &str) -> Option<Url> {
    let mut rewritten = url.clone();
    rewritten.set_scheme(scheme).ok()?;
    Some(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn normalize_uri_defaults_to_https() {
        let url = normalize_uri("example.com/contact").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/contact");
    }

    #[test]
    fn normalize_uri_keeps_explicit_scheme() {
        let url = normalize_uri("http://example.com").unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn normalize_uri_rejects_blank_and_garbage() {
        assert!(normalize_uri("").is_none());
        assert!(normalize_uri("   ").is_none());
        assert!(normalize_uri("ht!tp://^^^").is_none());
    }

    #[test]
    fn with_scheme_swaps_transport_only() {
        let url = Url::parse("https://example.com/a?b=c").unwrap();
        let http = with_scheme(&url, "http").unwrap();
        assert_eq!(http.as_str(), "http://example.com/a?b=c");
    }

    #[tokio::test]
    async fn falls_back_to_plain_http_when_https_fails() {
        // The mock server speaks plain HTTP, so the probe's HTTPS-first
        // attempt fails its TLS handshake and the HTTP retry succeeds.
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let probe = ProtocolProbe::new(5).unwrap();
        let host_port = server.uri().trim_start_matches("http://").to_string();
        let result = probe.probe(&host_port).await;

        assert!(result.is_accessible);
        assert!(!result.supports_https);
    }

    #[tokio::test]
    async fn not_found_status_is_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let probe = ProtocolProbe::new(5).unwrap();
        let result = probe.probe(&server.uri()).await;

        assert!(!result.is_accessible);
        assert!(!result.supports_https);
    }

    #[tokio::test]
    async fn redirect_status_counts_as_reachable() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/moved"))
            .mount(&server)
            .await;

        let probe = ProtocolProbe::new(5).unwrap();
        let result = probe.probe(&server.uri()).await;

        assert!(result.is_accessible);
    }

    #[tokio::test]
    async fn connection_refused_is_unreachable_not_an_error() {
        // Grab a port with nothing listening on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let probe = ProtocolProbe::new(2).unwrap();
        let result = probe.probe(&format!("http://127.0.0.1:{port}")).await;

        assert!(!result.is_accessible);
        assert!(!result.supports_https);
    }

    #[tokio::test]
    async fn malformed_uri_is_unreachable_without_network() {
        let probe = ProtocolProbe::new(2).unwrap();
        let result = probe.probe("not a uri at all").await;

        assert!(!result.is_accessible);
        assert!(!result.supports_https);
    }
}
