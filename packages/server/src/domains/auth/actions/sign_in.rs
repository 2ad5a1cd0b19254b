//! Sign-in action - exchange credentials for a session token

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::common::{AuthError, StoreError};
use crate::domains::auth::JwtService;
use crate::kernel::BaseUserStore;

/// Sign-in request body
#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl SignInRequest {
    /// Both fields are required and must be non-blank
    pub fn validate(&self) -> Result<(), SignInError> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(SignInError::MissingCredentials);
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum SignInError {
    #[error("username and password are required")]
    MissingCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Resolve the caller's role and issue a token carrying it
pub async fn sign_in(
    request: &SignInRequest,
    users: &dyn BaseUserStore,
    jwt_service: &JwtService,
) -> Result<String, SignInError> {
    request.validate()?;

    let role = users.find_role(&request.username, &request.password).await?;
    let token = jwt_service.create_token(&request.username, role)?;

    info!(username = %request.username, role = %role, "User signed in");
    Ok(token)
}
