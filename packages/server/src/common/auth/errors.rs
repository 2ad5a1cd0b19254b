use thiserror::Error;

use super::Role;

/// Authentication and authorization errors for the catalog API
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Insufficient permissions")]
    InsufficientRole { required: Role, actual: Role },

    #[error("Invalid or expired token")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to sign token")]
    SigningFailed(#[source] jsonwebtoken::errors::Error),
}
