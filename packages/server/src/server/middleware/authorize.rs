use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::AuthUser;
use crate::common::{AuthError, Caller, Capability};
use crate::server::error::ApiError;

/// Per-route capability gate.
///
/// Mounted with `route_layer(from_fn_with_state(capability, authorize))`, after
/// `jwt_auth_middleware` has attached the caller. The handler is never reached
/// on rejection.
pub async fn authorize(
    State(capability): State<Capability>,
    request: Request,
    next: Next,
) -> Response {
    let Some(user) = request.extensions().get::<AuthUser>() else {
        return ApiError::from(AuthError::AuthenticationRequired).into_response();
    };

    if let Err(err) = Caller::new(&user.username, user.role)
        .can(capability)
        .check()
    {
        return ApiError::from(err).into_response();
    }

    next.run(request).await
}
