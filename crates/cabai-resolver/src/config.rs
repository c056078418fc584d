//! Resolver configuration.
//!
//! Selects the record source (remote API, JSON dataset, or empty), the
//! per-lookup deadline and the cache TTL. Loaded from environment variables
//! by the API service, or assembled from flags by the CLI.

use std::path::PathBuf;
use std::time::Duration;

use cabai_core::TraceabilityRecord;
use url::Url;

use crate::cache::CachedSource;
use crate::error::{DatasetError, SourceError};
use crate::http::{HttpSource, HttpSourceConfig};
use crate::memory::InMemorySource;
use crate::resolver::{RecordResolver, DEFAULT_LOOKUP_TIMEOUT};
use crate::source::RecordSource;

/// Where records come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceSpec {
    /// No source configured; every lookup answers "not found".
    #[default]
    Empty,
    /// A JSON dataset file loaded into memory at startup.
    Dataset(PathBuf),
    /// A remote traceability API.
    Remote(Url),
}

/// Everything needed to build a [`RecordResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub source: SourceSpec,
    /// Per-lookup deadline.
    pub lookup_timeout: Duration,
    /// Record cache TTL. Zero disables the cache.
    pub cache_ttl: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            source: SourceSpec::Empty,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            cache_ttl: Duration::ZERO,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CABAI_SOURCE_URL`: remote traceability API (takes precedence)
    /// - `CABAI_DATASET`: path to a JSON dataset file
    /// - `CABAI_SOURCE_TIMEOUT_MS` (default: 5000)
    /// - `CABAI_CACHE_TTL_SECS` (default: 0, disabled)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| get(name).filter(|v| !v.trim().is_empty());

        let source = if let Some(raw) = non_empty("CABAI_SOURCE_URL") {
            SourceSpec::Remote(parse_url("CABAI_SOURCE_URL", &raw)?)
        } else if let Some(path) = non_empty("CABAI_DATASET") {
            SourceSpec::Dataset(PathBuf::from(path))
        } else {
            SourceSpec::Empty
        };

        let lookup_timeout = match non_empty("CABAI_SOURCE_TIMEOUT_MS") {
            Some(raw) => {
                let ms = parse_number("CABAI_SOURCE_TIMEOUT_MS", &raw)?;
                if ms == 0 {
                    return Err(ConfigError::InvalidNumber {
                        var: "CABAI_SOURCE_TIMEOUT_MS".to_string(),
                        value: raw,
                    });
                }
                Duration::from_millis(ms)
            }
            None => DEFAULT_LOOKUP_TIMEOUT,
        };

        let cache_ttl = match non_empty("CABAI_CACHE_TTL_SECS") {
            Some(raw) => Duration::from_secs(parse_number("CABAI_CACHE_TTL_SECS", &raw)?),
            None => Duration::ZERO,
        };

        Ok(Self {
            source,
            lookup_timeout,
            cache_ttl,
        })
    }

    /// Build the source stack and wrap it in a resolver.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the dataset cannot be loaded or the HTTP
    /// client cannot be built.
    pub fn build(&self) -> Result<RecordResolver<CachedSource<ConfiguredSource>>, ConfigError> {
        let source = match &self.source {
            SourceSpec::Empty => {
                tracing::warn!("no record source configured; every lookup will be not found");
                ConfiguredSource::Memory(InMemorySource::new())
            }
            SourceSpec::Dataset(path) => ConfiguredSource::Memory(InMemorySource::load(path)?),
            SourceSpec::Remote(url) => {
                tracing::info!(base_url = %url, "using remote record source");
                ConfiguredSource::Http(HttpSource::new(HttpSourceConfig {
                    base_url: url.clone(),
                    timeout: self.lookup_timeout,
                })?)
            }
        };
        Ok(RecordResolver::with_deadline(
            CachedSource::new(source, self.cache_ttl),
            self.lookup_timeout,
        ))
    }
}

/// The record source selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Memory(InMemorySource),
    Http(HttpSource),
}

impl RecordSource for ConfiguredSource {
    async fn lookup(&self, canonical_id: &str) -> Result<Option<TraceabilityRecord>, SourceError> {
        match self {
            Self::Memory(source) => source.lookup(canonical_id).await,
            Self::Http(source) => source.lookup(canonical_id).await,
        }
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn parse_number(var: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var: var.to_string(),
        value: raw.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid value for {var}: {value:?}")]
    InvalidNumber { var: String, value: String },
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ResolverConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config, ResolverConfig::default());
        assert_eq!(config.lookup_timeout, Duration::from_secs(5));
        assert!(config.cache_ttl.is_zero());
    }

    #[test]
    fn remote_takes_precedence_over_dataset() {
        let config = ResolverConfig::from_vars(vars(&[
            ("CABAI_SOURCE_URL", "http://trace.example"),
            ("CABAI_DATASET", "/tmp/products.json"),
        ]))
        .unwrap();
        assert!(matches!(
            config.source,
            SourceSpec::Remote(ref u) if u.host_str() == Some("trace.example")
        ));
    }

    #[test]
    fn dataset_and_numbers() {
        let config = ResolverConfig::from_vars(vars(&[
            ("CABAI_DATASET", "/tmp/products.json"),
            ("CABAI_SOURCE_TIMEOUT_MS", "250"),
            ("CABAI_CACHE_TTL_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.source, SourceSpec::Dataset(PathBuf::from("/tmp/products.json")));
        assert_eq!(config.lookup_timeout, Duration::from_millis(250));
        assert_eq!(config.cache_ttl, Duration::from_secs(30));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = ResolverConfig::from_vars(vars(&[("CABAI_SOURCE_URL", "  ")])).unwrap();
        assert_eq!(config.source, SourceSpec::Empty);
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            ResolverConfig::from_vars(vars(&[("CABAI_SOURCE_URL", "not a url")])),
            Err(ConfigError::InvalidUrl(..))
        ));
        assert!(matches!(
            ResolverConfig::from_vars(vars(&[("CABAI_SOURCE_TIMEOUT_MS", "soon")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            ResolverConfig::from_vars(vars(&[("CABAI_SOURCE_TIMEOUT_MS", "0")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn build_with_missing_dataset_fails() {
        let config = ResolverConfig {
            source: SourceSpec::Dataset(PathBuf::from("/nonexistent/products.json")),
            ..ResolverConfig::default()
        };
        assert!(matches!(config.build(), Err(ConfigError::Dataset(_))));
    }

    #[tokio::test]
    async fn build_empty_resolves_nothing() {
        let resolver = ResolverConfig::default().build().unwrap();
        let id = cabai_core::ProductIdentifier::parse("CHI-H001-B001-20260102").unwrap();
        assert!(matches!(
            resolver.resolve(&id).await,
            Err(crate::error::ResolveError::NotFound(_))
        ));
    }
}
