// TestDependencies - in-memory implementations for testing
//
// Provides stores that can be injected into ServerDeps so routes and actions
// run without a database. Ordering, search, and cascade rules mirror the
// Postgres queries.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{BaseCatalogStore, BaseUserStore, ServerDeps};
use crate::common::{ActorId, ListQuery, MovieId, Page, Role, SortDirection, StoreError};
use crate::domains::actors::{Actor, ActorPatch, ActorSortColumn, NewActor};
use crate::domains::auth::JwtService;
use crate::domains::movies::models::normalize_actor_ids;
use crate::domains::movies::{Movie, MoviePatch, MovieSearch, MovieSortColumn, NewMovie};

// =============================================================================
// In-memory Catalog Store
// =============================================================================

#[derive(Default)]
struct CatalogState {
    last_movie_id: i32,
    last_actor_id: i32,
    /// `actor_ids` on each movie is the authoritative link set
    movies: BTreeMap<MovieId, Movie>,
    /// `movie_ids` is recomputed on every read
    actors: BTreeMap<ActorId, Actor>,
}

impl CatalogState {
    fn actor_with_movies(&self, actor: &Actor) -> Actor {
        let movie_ids = self
            .movies
            .values()
            .filter(|movie| movie.actor_ids.contains(&actor.id))
            .map(|movie| movie.id)
            .collect();
        Actor {
            movie_ids,
            ..actor.clone()
        }
    }

    fn check_actors_exist(&self, ids: &[ActorId]) -> Result<(), StoreError> {
        if ids.iter().all(|id| self.actors.contains_key(id)) {
            Ok(())
        } else {
            Err(StoreError::invalid("unknown actor id"))
        }
    }
}

pub struct InMemoryCatalogStore {
    state: Mutex<CatalogState>,
    available: AtomicBool,
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CatalogState::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate a lost database: every call fails with a storage error
    pub fn set_available(&self, available: bool) {
        self.available.store(available, AtomicOrdering::SeqCst);
    }

    fn check_available(&self, op: &'static str) -> Result<(), StoreError> {
        if self.available.load(AtomicOrdering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::storage(op)(sqlx::Error::PoolTimedOut))
        }
    }
}

fn paginate<T>(items: Vec<T>, page: &Page) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl BaseCatalogStore for InMemoryCatalogStore {
    async fn list_movies(
        &self,
        query: &ListQuery<MovieSortColumn>,
    ) -> Result<Vec<Movie>, StoreError> {
        self.check_available("movies.find_paginated")?;
        let state = self.state.lock().unwrap();

        let mut movies: Vec<Movie> = state.movies.values().cloned().collect();
        movies.sort_by(|a, b| {
            let by_column = match query.sort.column {
                MovieSortColumn::Id => a.id.cmp(&b.id),
                MovieSortColumn::Title => a.title.cmp(&b.title),
                MovieSortColumn::ReleaseDate => a.release_date.cmp(&b.release_date),
                MovieSortColumn::Rating => a.rating.cmp(&b.rating),
            };
            directed(by_column.then(a.id.cmp(&b.id)), query.sort.direction)
        });

        Ok(paginate(movies, &query.page))
    }

    async fn find_movie(&self, id: MovieId) -> Result<Movie, StoreError> {
        self.check_available("movies.find_by_id")?;
        let state = self.state.lock().unwrap();
        state
            .movies
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("Movie"))
    }

    async fn create_movie(&self, input: NewMovie) -> Result<Movie, StoreError> {
        self.check_available("movies.create")?;
        input.validate()?;
        let mut state = self.state.lock().unwrap();

        let actor_ids = normalize_actor_ids(&input.actor_ids);
        state.check_actors_exist(&actor_ids)?;

        state.last_movie_id += 1;
        let movie = Movie {
            id: MovieId::new(state.last_movie_id),
            title: input.title.trim().to_string(),
            description: input.description,
            release_date: input.release_date,
            rating: input.rating,
            actor_ids,
        };
        state.movies.insert(movie.id, movie.clone());
        Ok(movie)
    }

    async fn update_movie(&self, id: MovieId, patch: MoviePatch) -> Result<Movie, StoreError> {
        self.check_available("movies.update")?;
        patch.validate()?;
        let mut state = self.state.lock().unwrap();

        let existing = state
            .movies
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("Movie"))?;
        if let Some(actor_ids) = &patch.actor_ids {
            state.check_actors_exist(actor_ids)?;
        }

        let mut movie = patch.apply_to(existing);
        movie.title = movie.title.trim().to_string();
        state.movies.insert(id, movie.clone());
        Ok(movie)
    }

    async fn delete_movie(&self, id: MovieId) -> Result<(), StoreError> {
        self.check_available("movies.delete")?;
        let mut state = self.state.lock().unwrap();
        state
            .movies
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("Movie"))
    }

    async fn search_movies(&self, search: &MovieSearch) -> Result<Vec<Movie>, StoreError> {
        self.check_available("movies.search")?;
        let state = self.state.lock().unwrap();

        let mut movies: Vec<Movie> = state
            .movies
            .values()
            .filter(|movie| match &search.title {
                Some(term) => contains_ignore_case(&movie.title, term),
                None => true,
            })
            .filter(|movie| match &search.actor {
                Some(term) => movie.actor_ids.iter().any(|actor_id| {
                    state
                        .actors
                        .get(actor_id)
                        .is_some_and(|actor| contains_ignore_case(&actor.name, term))
                }),
                None => true,
            })
            .cloned()
            .collect();
        movies.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));

        Ok(paginate(movies, &search.page))
    }

    async fn list_actors(
        &self,
        query: &ListQuery<ActorSortColumn>,
    ) -> Result<Vec<Actor>, StoreError> {
        self.check_available("actors.find_paginated")?;
        let state = self.state.lock().unwrap();

        let mut actors: Vec<Actor> = state
            .actors
            .values()
            .map(|actor| state.actor_with_movies(actor))
            .collect();
        actors.sort_by(|a, b| {
            let by_column = match query.sort.column {
                ActorSortColumn::Id => a.id.cmp(&b.id),
                ActorSortColumn::Name => a.name.cmp(&b.name),
                // Postgres orders enum values by declaration: male < female
                ActorSortColumn::Sex => (a.sex as u8).cmp(&(b.sex as u8)),
                ActorSortColumn::BirthDate => a.birth_date.cmp(&b.birth_date),
            };
            directed(by_column.then(a.id.cmp(&b.id)), query.sort.direction)
        });

        Ok(paginate(actors, &query.page))
    }

    async fn find_actor(&self, id: ActorId) -> Result<Actor, StoreError> {
        self.check_available("actors.find_by_id")?;
        let state = self.state.lock().unwrap();
        state
            .actors
            .get(&id)
            .map(|actor| state.actor_with_movies(actor))
            .ok_or(StoreError::NotFound("Actor"))
    }

    async fn create_actor(&self, input: NewActor) -> Result<Actor, StoreError> {
        self.check_available("actors.create")?;
        input.validate()?;
        let mut state = self.state.lock().unwrap();

        state.last_actor_id += 1;
        let actor = Actor {
            id: ActorId::new(state.last_actor_id),
            name: input.name.trim().to_string(),
            sex: input.sex,
            birth_date: input.birth_date,
            movie_ids: Vec::new(),
        };
        state.actors.insert(actor.id, actor.clone());
        Ok(actor)
    }

    async fn update_actor(&self, id: ActorId, patch: ActorPatch) -> Result<Actor, StoreError> {
        self.check_available("actors.update")?;
        patch.validate()?;
        let mut state = self.state.lock().unwrap();

        let existing = state
            .actors
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("Actor"))?;
        let mut actor = patch.apply_to(existing);
        actor.name = actor.name.trim().to_string();
        state.actors.insert(id, actor.clone());
        Ok(state.actor_with_movies(&actor))
    }

    async fn delete_actor(&self, id: ActorId) -> Result<(), StoreError> {
        self.check_available("actors.delete")?;
        let mut state = self.state.lock().unwrap();

        if state.actors.remove(&id).is_none() {
            return Err(StoreError::NotFound("Actor"));
        }
        for movie in state.movies.values_mut() {
            movie.actor_ids.retain(|actor_id| *actor_id != id);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available("ping")
    }
}

// =============================================================================
// In-memory User Store
// =============================================================================

#[derive(Default)]
pub struct InMemoryUserStore {
    users: HashMap<String, (String, Role)>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, username: &str, password: &str, role: Role) -> Self {
        self.users
            .insert(username.to_string(), (password.to_string(), role));
        self
    }
}

#[async_trait]
impl BaseUserStore for InMemoryUserStore {
    async fn find_role(&self, username: &str, password: &str) -> Result<Role, StoreError> {
        match self.users.get(username) {
            Some((stored, role)) if stored == password => Ok(*role),
            _ => Err(StoreError::NotFound("User")),
        }
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub catalog: Arc<InMemoryCatalogStore>,
    pub users: Arc<InMemoryUserStore>,
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDependencies {
    /// Empty catalog, one admin (`admin`/`admin`) and one user (`user`/`user`)
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(InMemoryCatalogStore::new()),
            users: Arc::new(
                InMemoryUserStore::new()
                    .with_user("admin", "admin", Role::Admin)
                    .with_user("user", "user", Role::User),
            ),
        }
    }

    pub fn into_server_deps(self, jwt_service: Arc<JwtService>) -> ServerDeps {
        ServerDeps::new(self.catalog, self.users, jwt_service)
    }
}
