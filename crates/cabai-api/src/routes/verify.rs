//! # Verification Routes
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | GET | `/v1/verify/{identifier}` | none |
//! | GET | `/v1/verify/` | none (empty identifier) |
//! | POST | `/v1/verify` | `{"identifier": "..."}` |
//!
//! Both respond with the verification result plus a guidance `message`.
//! Every verdict is a 200, including malformed input and unknown products,
//! except `source_unavailable`, which is a 503 with `Retry-After` so clients
//! know to ask again.
//!
//! A path segment that does not decode to UTF-8 is verified in its
//! percent-encoded form, which is always malformed.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, RawPathParams, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use cabai_verify::VerificationResult;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Seconds a client should wait before retrying an unavailable source.
const RETRY_AFTER_SECS: &str = "5";

/// Build the verification router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/verify", post(verify_body))
        .route("/v1/verify/", get(verify_empty))
        .route("/v1/verify/{identifier}", get(verify_path))
}

/// Request body for `POST /v1/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// Raw identifier as typed or decoded from a QR label.
    pub identifier: String,
}

/// Verification response: the tagged result with guidance alongside.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    #[serde(flatten)]
    pub result: VerificationResult,
    /// Whether the product can be trusted.
    pub trusted: bool,
    /// User-facing guidance text.
    pub message: String,
}

impl From<VerificationResult> for VerifyResponse {
    fn from(result: VerificationResult) -> Self {
        Self {
            trusted: result.is_trusted(),
            message: result.guidance(),
            result,
        }
    }
}

impl IntoResponse for VerifyResponse {
    fn into_response(self) -> Response {
        if self.result.is_retryable() {
            let mut response = (StatusCode::SERVICE_UNAVAILABLE, Json(self)).into_response();
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from_static(RETRY_AFTER_SECS),
            );
            return response;
        }
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// GET /v1/verify/{identifier}
async fn verify_path(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    raw: RawPathParams,
) -> VerifyResponse {
    let identifier = match path {
        Ok(Path(identifier)) => identifier,
        Err(_) => raw
            .iter()
            .next()
            .map(|(_, encoded)| encoded.to_owned())
            .unwrap_or_default(),
    };
    state.engine.verify(&identifier).await.into()
}

/// GET /v1/verify/
async fn verify_empty(State(state): State<AppState>) -> VerifyResponse {
    state.engine.verify("").await.into()
}

/// POST /v1/verify
async fn verify_body(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<VerifyResponse, AppError> {
    let req = extract_json(body)?;
    Ok(state.engine.verify(&req.identifier).await.into())
}
