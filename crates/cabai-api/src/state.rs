//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor. Holds the verification engine behind an `Arc`;
//! the engine itself is stateless apart from its optional record cache.

use std::sync::Arc;

use cabai_resolver::{
    CachedSource, ConfigError, ConfiguredSource, InMemorySource, RecordResolver, ResolverConfig,
};
use cabai_verify::VerificationEngine;

/// The engine type the service runs.
pub type Engine = VerificationEngine<CachedSource<ConfiguredSource>>;

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Emit JSON-formatted logs.
    pub log_json: bool,
    pub resolver: ResolverConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            log_json: false,
            resolver: ResolverConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `CABAI_LOG_JSON` (default: false)
    /// - everything read by [`ResolverConfig::from_env`]
    pub fn from_env() -> Result<Self, AppConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, AppConfigError> {
        let port = match get("PORT").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| AppConfigError::InvalidPort(raw))?,
            None => 8080,
        };
        let log_json = get("CABAI_LOG_JSON")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            port,
            log_json,
            resolver: ResolverConfig::from_vars(get)?,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum AppConfigError {
    #[error("invalid PORT {0:?}")]
    InvalidPort(String),
    #[error(transparent)]
    Resolver(#[from] ConfigError),
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub config: AppConfig,
}

impl AppState {
    /// State with default configuration and an empty record source.
    pub fn new() -> Self {
        Self::with_source(ConfiguredSource::Memory(InMemorySource::new()))
    }

    /// State serving records from `source`, uncached, with default settings.
    pub fn with_source(source: ConfiguredSource) -> Self {
        let resolver = RecordResolver::new(CachedSource::disabled(source));
        Self {
            engine: Arc::new(VerificationEngine::new(resolver)),
            config: AppConfig::default(),
        }
    }

    /// Build the source stack described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the dataset cannot be loaded or the HTTP
    /// client cannot be built.
    pub fn try_with_config(config: AppConfig) -> Result<Self, ConfigError> {
        let resolver = config.resolver.build()?;
        Ok(Self {
            engine: Arc::new(VerificationEngine::new(resolver)),
            config,
        })
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
