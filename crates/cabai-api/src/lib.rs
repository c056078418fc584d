//! # cabai-api — Verification HTTP Service
//!
//! Exposes the verification engine over HTTP, built on Axum/Tower/Tokio.
//!
//! ## Routes
//!
//! - `/v1/verify/{identifier}` (GET) and `/v1/verify` (POST): verify a
//!   product identifier
//! - `/health/*`: liveness and readiness probes
//!
//! ## Middleware Stack (Tower)
//!
//! TraceLayer → CorsLayer → Handler
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers; they delegate to `cabai-verify`.
//! - Errors for uninterpretable requests map to structured bodies via
//!   `AppError`. Verdicts are responses, never errors.

pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::{AppConfig, AppState};

use axum::http::Uri;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new()
        .merge(health)
        .merge(routes::verify::router())
        .fallback(fallback)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe. Returns 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. The engine is built before the listener binds, so a
/// serving process is ready.
async fn readiness() -> &'static str {
    "ready"
}

async fn fallback(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}
