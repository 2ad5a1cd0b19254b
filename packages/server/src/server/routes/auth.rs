use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use serde::Serialize;

use crate::domains::auth::{sign_in, SignInRequest};
use crate::kernel::ServerDeps;
use crate::server::error::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct TokenBody {
    pub token: String,
}

/// `POST /auth/sign-in` - public; exchanges credentials for a bearer token
pub async fn sign_in_handler(
    Extension(deps): Extension<ServerDeps>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> ApiResult<TokenBody> {
    let Json(request) = payload?;

    let token = sign_in(&request, deps.users.as_ref(), &deps.jwt_service).await?;

    Ok(ApiResponse::ok(TokenBody { token }))
}
