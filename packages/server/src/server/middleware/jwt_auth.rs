use crate::common::{AuthError, Role};
use crate::domains::auth::JwtService;
use crate::server::error::ApiError;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

/// Authenticated user information from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub role: Role,
}

/// JWT authentication middleware
///
/// Extracts JWT token from Authorization header, verifies it, and adds AuthUser to request extensions.
/// Requests without a valid token are rejected with 401 before reaching any handler.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: Request,
    next: Next,
) -> Response {
    match extract_auth_user(&request, &jwt_service) {
        Ok(user) => {
            debug!("Authenticated user: {} (role: {})", user.username, user.role);
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// Extract and verify JWT token from request
fn extract_auth_user(request: &Request, jwt_service: &JwtService) -> Result<AuthUser, AuthError> {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        // Handle both "Bearer <token>" and raw token
        .map(|raw| raw.strip_prefix("Bearer ").unwrap_or(raw).trim())
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::AuthenticationRequired)?;

    let claims = jwt_service.verify_token(token)?;

    Ok(AuthUser {
        username: claims.sub,
        role: claims.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn jwt_service() -> JwtService {
        JwtService::new(
            "test_secret",
            "test_issuer".to_string(),
            chrono::Duration::hours(1),
        )
    }

    #[test]
    fn test_extract_token_with_bearer() {
        let jwt_service = jwt_service();
        let token = jwt_service.create_token("alice", Role::Admin).unwrap();

        let request = Request::builder()
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let auth_user = extract_auth_user(&request, &jwt_service).unwrap();
        assert_eq!(auth_user.username, "alice");
        assert_eq!(auth_user.role, Role::Admin);
    }

    #[test]
    fn test_extract_token_without_bearer() {
        let jwt_service = jwt_service();
        let token = jwt_service.create_token("bob", Role::User).unwrap();

        let request = Request::builder()
            .header("authorization", token)
            .body(Body::empty())
            .unwrap();

        let auth_user = extract_auth_user(&request, &jwt_service).unwrap();
        assert_eq!(auth_user.role, Role::User);
    }

    #[test]
    fn test_no_auth_header() {
        let request = Request::builder().body(Body::empty()).unwrap();

        let result = extract_auth_user(&request, &jwt_service());
        assert!(matches!(result, Err(AuthError::AuthenticationRequired)));
    }

    #[test]
    fn test_invalid_token() {
        let request = Request::builder()
            .header("authorization", "Bearer invalid_token")
            .body(Body::empty())
            .unwrap();

        let result = extract_auth_user(&request, &jwt_service());
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
