//! Application setup and server configuration.

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    BoxError, Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::error::ApiError;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{actor_routes, health_handler, movie_routes, sign_in_handler};

/// Build the Axum application router
///
/// Public: `/health`, `/auth/sign-in`. Everything under `/movies` and
/// `/actors` requires a bearer token, then a per-route capability check.
pub fn build_app(
    deps: ServerDeps,
    allowed_origins: &[String],
    request_timeout: Duration,
) -> Router {
    // Clone jwt_service for middleware closure
    let jwt_service = deps.jwt_service.clone();

    let catalog = movie_routes()
        .merge(actor_routes())
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }));

    Router::new()
        .route("/health", get(health_handler))
        .route("/auth/sign-in", post(sign_in_handler))
        .merge(catalog)
        .fallback(not_found)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(deps))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(request_timeout),
        )
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

/// Errors raised by tower middleware (timeouts) as envelopes
async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return ApiError::Timeout;
    }
    tracing::error!(error = %err, "Unhandled middleware error");
    ApiError::Internal("Internal server error".to_string())
}

/// Any origin when the list is empty; otherwise only the listed ones
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(origins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use serde_json::{json, Value};

    async fn envelope(err: ApiError) -> (axum::http::StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn elapsed_timeout_becomes_408_envelope() {
        let err: BoxError = Box::new(tower::timeout::error::Elapsed::new());
        let (status, body) = envelope(handle_middleware_error(err).await).await;

        assert_eq!(status, axum::http::StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body, json!({ "status": "error", "error": "Request timed out" }));
    }

    #[tokio::test]
    async fn other_middleware_errors_are_internal() {
        let err: BoxError = "boom".into();
        let (status, body) = envelope(handle_middleware_error(err).await).await;

        assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }
}
