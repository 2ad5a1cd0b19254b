//! HTTP error mapping and response envelopes.
//!
//! Every response body carries a `status` field: `"ok"` with the payload
//! flattened beside it, or `"error"` with a single `error` message. Driver
//! errors are logged here and replaced with a fixed message.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use crate::common::{AuthError, QueryParamError, StoreError};
use crate::domains::auth::SignInError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Request timed out")]
    Timeout,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a store failure; `internal_message` replaces driver text
    pub fn from_store(err: StoreError, internal_message: &str) -> Self {
        match err {
            StoreError::NotFound(entity) => ApiError::NotFound(format!("{entity} not found")),
            StoreError::InvalidInput(message) => ApiError::BadRequest(message),
            StoreError::Storage { op, source } => {
                error!(op, error = %source, "Store operation failed");
                ApiError::Internal(internal_message.to_string())
            }
        }
    }

    pub fn invalid_id() -> Self {
        ApiError::BadRequest("Invalid ID".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": "error",
            "error": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationRequired => ApiError::Unauthorized("Unauthorized".to_string()),
            AuthError::InsufficientRole { .. } => ApiError::Unauthorized(err.to_string()),
            AuthError::InvalidToken(ref source) => {
                debug!(error = %source, "Token rejected");
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::SigningFailed(source) => {
                error!(error = %source, "Token signing failed");
                ApiError::Internal("Failed to create token".to_string())
            }
        }
    }
}

impl From<QueryParamError> for ApiError {
    fn from(err: QueryParamError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "Malformed JSON body");
        ApiError::BadRequest("Invalid request".to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        debug!(error = %rejection.body_text(), "Malformed query string");
        ApiError::BadRequest("Invalid query".to_string())
    }
}

impl From<SignInError> for ApiError {
    fn from(err: SignInError) -> Self {
        match err {
            SignInError::MissingCredentials => ApiError::BadRequest(err.to_string()),
            SignInError::Store(store) => ApiError::from_store(store, "Failed to sign in"),
            SignInError::Auth(auth) => auth.into(),
        }
    }
}

// ============================================================================
// Success envelope
// ============================================================================

/// `{"status":"ok", ...body}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    status: &'static str,
    #[serde(flatten)]
    body: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(body: T) -> Json<Self> {
        Json(Self { status: "ok", body })
    }
}

/// Body for responses that only report success
#[derive(Debug, Serialize)]
pub struct Empty {}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;
