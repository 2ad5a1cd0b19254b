use sqlx::PgPool;

use crate::common::{Role, StoreError};

/// Credential record. Read-only: users are provisioned outside this service.
pub struct User;

impl User {
    /// Resolve the role for an exact username/password match
    pub async fn find_role(username: &str, password: &str, pool: &PgPool) -> Result<Role, StoreError> {
        sqlx::query_scalar::<_, Role>("SELECT role FROM users WHERE username = $1 AND password = $2")
            .bind(username)
            .bind(password)
            .fetch_optional(pool)
            .await
            .map_err(StoreError::storage("users.find_role"))?
            .ok_or(StoreError::NotFound("User"))
    }
}
