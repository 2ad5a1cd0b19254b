// Server dependencies - concrete store adapters plus the bundle handed to routes

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use super::{BaseCatalogStore, BaseUserStore};
use crate::common::{ActorId, ListQuery, MovieId, Role, StoreError};
use crate::domains::actors::{Actor, ActorPatch, ActorSortColumn, NewActor};
use crate::domains::auth::{JwtService, User};
use crate::domains::movies::{Movie, MoviePatch, MovieSearch, MovieSortColumn, NewMovie};

// =============================================================================
// Postgres adapters (implement the Base* store traits over the model queries)
// =============================================================================

#[derive(Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseCatalogStore for PostgresCatalogStore {
    async fn list_movies(
        &self,
        query: &ListQuery<MovieSortColumn>,
    ) -> Result<Vec<Movie>, StoreError> {
        Movie::find_paginated(query, &self.pool).await
    }

    async fn find_movie(&self, id: MovieId) -> Result<Movie, StoreError> {
        Movie::find_by_id(id, &self.pool).await
    }

    async fn create_movie(&self, input: NewMovie) -> Result<Movie, StoreError> {
        Movie::create(input, &self.pool).await
    }

    async fn update_movie(&self, id: MovieId, patch: MoviePatch) -> Result<Movie, StoreError> {
        Movie::update(id, patch, &self.pool).await
    }

    async fn delete_movie(&self, id: MovieId) -> Result<(), StoreError> {
        Movie::delete(id, &self.pool).await
    }

    async fn search_movies(&self, search: &MovieSearch) -> Result<Vec<Movie>, StoreError> {
        Movie::search(search, &self.pool).await
    }

    async fn list_actors(
        &self,
        query: &ListQuery<ActorSortColumn>,
    ) -> Result<Vec<Actor>, StoreError> {
        Actor::find_paginated(query, &self.pool).await
    }

    async fn find_actor(&self, id: ActorId) -> Result<Actor, StoreError> {
        Actor::find_by_id(id, &self.pool).await
    }

    async fn create_actor(&self, input: NewActor) -> Result<Actor, StoreError> {
        Actor::create(input, &self.pool).await
    }

    async fn update_actor(&self, id: ActorId, patch: ActorPatch) -> Result<Actor, StoreError> {
        Actor::update(id, patch, &self.pool).await
    }

    async fn delete_actor(&self, id: ActorId) -> Result<(), StoreError> {
        Actor::delete(id, &self.pool).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(StoreError::storage("ping"))?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseUserStore for PostgresUserStore {
    async fn find_role(&self, username: &str, password: &str) -> Result<Role, StoreError> {
        User::find_role(username, password, &self.pool).await
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to handlers (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub catalog: Arc<dyn BaseCatalogStore>,
    pub users: Arc<dyn BaseUserStore>,
    /// JWT service for token creation and verification
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    pub fn new(
        catalog: Arc<dyn BaseCatalogStore>,
        users: Arc<dyn BaseUserStore>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            catalog,
            users,
            jwt_service,
        }
    }

    /// Production wiring: both stores share one pool
    pub fn postgres(pool: PgPool, jwt_service: Arc<JwtService>) -> Self {
        Self::new(
            Arc::new(PostgresCatalogStore::new(pool.clone())),
            Arc::new(PostgresUserStore::new(pool)),
            jwt_service,
        )
    }
}
