// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Handlers depend on these so routes can run against Postgres or in-memory stores.
//
// Naming convention: Base* for trait names (e.g., BaseCatalogStore, BaseUserStore)

use async_trait::async_trait;

use crate::common::{ActorId, ListQuery, MovieId, Role, StoreError};
use crate::domains::actors::{Actor, ActorPatch, ActorSortColumn, NewActor};
use crate::domains::movies::{Movie, MoviePatch, MovieSearch, MovieSortColumn, NewMovie};

// =============================================================================
// Catalog Store
// =============================================================================

/// Persistent movie/actor catalog.
///
/// Single-row operations return `StoreError::NotFound` for unknown ids.
/// Lists and searches return an empty vector when nothing matches.
#[async_trait]
pub trait BaseCatalogStore: Send + Sync {
    async fn list_movies(&self, query: &ListQuery<MovieSortColumn>)
        -> Result<Vec<Movie>, StoreError>;

    async fn find_movie(&self, id: MovieId) -> Result<Movie, StoreError>;

    /// Insert the movie and its actor links as one unit
    async fn create_movie(&self, input: NewMovie) -> Result<Movie, StoreError>;

    async fn update_movie(&self, id: MovieId, patch: MoviePatch) -> Result<Movie, StoreError>;

    async fn delete_movie(&self, id: MovieId) -> Result<(), StoreError>;

    /// Title and actor-name substring search, ordered by title ascending
    async fn search_movies(&self, search: &MovieSearch) -> Result<Vec<Movie>, StoreError>;

    async fn list_actors(&self, query: &ListQuery<ActorSortColumn>)
        -> Result<Vec<Actor>, StoreError>;

    async fn find_actor(&self, id: ActorId) -> Result<Actor, StoreError>;

    async fn create_actor(&self, input: NewActor) -> Result<Actor, StoreError>;

    async fn update_actor(&self, id: ActorId, patch: ActorPatch) -> Result<Actor, StoreError>;

    async fn delete_actor(&self, id: ActorId) -> Result<(), StoreError>;

    /// Cheap liveness check used by the health endpoint
    async fn ping(&self) -> Result<(), StoreError>;
}

// =============================================================================
// Credential Store
// =============================================================================

#[async_trait]
pub trait BaseUserStore: Send + Sync {
    /// Role for an exact username/password match, or `NotFound`
    async fn find_role(&self, username: &str, password: &str) -> Result<Role, StoreError>;
}
