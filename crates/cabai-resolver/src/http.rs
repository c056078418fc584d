//! # HTTP Record Source
//!
//! Reads records from a remote traceability API.
//!
//! | Method | Path | Outcome |
//! |--------|------|---------|
//! | GET | `{base_url}/api/product/{canonical_id}` | 200 → record, 404 → none |
//!
//! Only a 404 carrying the API's own `{"detail": "Product not found"}` body
//! means the product is unregistered. A bare 404 (wrong base path, gateway,
//! route missing mid-deploy) is [`SourceError::Unavailable`], as is any 5xx,
//! transport failure or timeout. Other 4xx responses are
//! [`SourceError::Rejected`].

use std::time::Duration;

use cabai_core::TraceabilityRecord;
use url::Url;

use crate::error::SourceError;
use crate::source::RecordSource;

/// Path prefix of the product lookup endpoint.
const PRODUCT_PATH: &str = "api/product";

/// `detail` of the API's 404 body for an unregistered product.
const PRODUCT_NOT_FOUND_DETAIL: &str = "Product not found";

/// Connection settings for [`HttpSource`].
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// Base URL of the traceability API.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpSourceConfig {
    /// Configuration with the default 5 second timeout.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(5),
        }
    }
}

/// Record source backed by a remote traceability API.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpSource {
    /// Build the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest` error if the client cannot be built
    /// (e.g. the TLS backend fails to initialise).
    pub fn new(config: HttpSourceConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url,
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn product_url(&self, canonical_id: &str) -> String {
        format!(
            "{}/{PRODUCT_PATH}/{canonical_id}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }

    fn transport_error(&self, e: &reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Timeout {
                elapsed_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            SourceError::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}

impl RecordSource for HttpSource {
    async fn lookup(&self, canonical_id: &str) -> Result<Option<TraceabilityRecord>, SourceError> {
        let url = self.product_url(canonical_id);

        let resp = crate::retry::retry_send(|| self.http.get(&url).send())
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            let body = resp.text().await.unwrap_or_default();
            if is_product_not_found(&body) {
                return Ok(None);
            }
            return Err(SourceError::Unavailable {
                reason: format!(
                    "HTTP {status} without a product-not-found body: {}",
                    excerpt(&body)
                ),
            });
        }
        if status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Unavailable {
                reason: format!("HTTP {status}: {}", excerpt(&body)),
            });
        }
        if !status.is_success() {
            return Err(SourceError::Rejected {
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| self.transport_error(&e))?;
        serde_json::from_slice::<TraceabilityRecord>(&bytes)
            .map(Some)
            .map_err(|e| SourceError::InvalidPayload {
                reason: e.to_string(),
            })
    }
}

/// Whether a 404 body is the API's "no such product" answer rather than a
/// routing failure.
fn is_product_not_found(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail")?.as_str().map(str::to_owned))
        .is_some_and(|detail| detail.eq_ignore_ascii_case(PRODUCT_NOT_FOUND_DETAIL))
}

/// First 200 characters of a response body, for diagnostics.
fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_url_joins_without_double_slash() {
        for base in ["http://trace.example/", "http://trace.example"] {
            let source = HttpSource::new(HttpSourceConfig::new(base.parse().unwrap())).unwrap();
            assert_eq!(
                source.product_url("CHI-H001-B001-20260102"),
                "http://trace.example/api/product/CHI-H001-B001-20260102"
            );
        }
    }

    #[test]
    fn product_url_keeps_base_path() {
        let base: Url = "http://trace.example/v2/".parse().unwrap();
        let source = HttpSource::new(HttpSourceConfig::new(base)).unwrap();
        assert_eq!(
            source.product_url("CHI-H001-B001-20260102"),
            "http://trace.example/v2/api/product/CHI-H001-B001-20260102"
        );
    }

    #[test]
    fn only_product_not_found_body_means_missing() {
        assert!(is_product_not_found(r#"{"detail": "Product not found"}"#));
        assert!(is_product_not_found(r#"{"detail": "product not found"}"#));
        assert!(!is_product_not_found(r#"{"detail": "Not Found"}"#));
        assert!(!is_product_not_found("Not Found"));
        assert!(!is_product_not_found(""));
        assert!(!is_product_not_found("[]"));
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        let long = "x".repeat(500);
        assert_eq!(excerpt(&long).len(), 200);
        assert_eq!(excerpt("short"), "short");
    }
}
