use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::{Capability, ListParams, MovieId, Page};
use crate::domains::movies::{Movie, MoviePatch, MovieSearch, MovieSortColumn, NewMovie};
use crate::kernel::ServerDeps;
use crate::server::error::{ApiError, ApiResponse, ApiResult, Empty};
use crate::server::middleware::{authorize, AuthUser};

#[derive(Debug, Serialize)]
pub struct MoviesBody {
    pub movies: Vec<Movie>,
}

#[derive(Debug, Serialize)]
pub struct MovieBody {
    pub movie: Movie,
}

/// Raw `?title=&actor=&limit=&offset=` parameters
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub title: Option<String>,
    pub actor: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Movie routes. Reads need any signed-in caller, writes need `ManageCatalog`.
pub fn movie_routes() -> Router {
    let read = Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/search", get(search_movies))
        .route("/movies/:id", get(get_movie))
        .route_layer(from_fn_with_state(Capability::ReadCatalog, authorize));

    let write = Router::new()
        .route("/movies", post(create_movie))
        .route(
            "/movies/:id",
            put(update_movie).patch(update_movie).delete(delete_movie),
        )
        .route_layer(from_fn_with_state(Capability::ManageCatalog, authorize));

    read.merge(write)
}

fn parse_id(raw: &str) -> Result<MovieId, ApiError> {
    MovieId::parse(raw).map_err(|_| ApiError::invalid_id())
}

pub async fn list_movies(
    Extension(deps): Extension<ServerDeps>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<MoviesBody> {
    let Query(params) = params?;
    let query = params.into_list_query(MovieSortColumn::default_sort())?;

    let movies = deps
        .catalog
        .list_movies(&query)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to list movies"))?;

    Ok(ApiResponse::ok(MoviesBody { movies }))
}

pub async fn get_movie(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<String>,
) -> ApiResult<MovieBody> {
    let id = parse_id(&id)?;

    let movie = deps
        .catalog
        .find_movie(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to get movie"))?;

    Ok(ApiResponse::ok(MovieBody { movie }))
}

pub async fn search_movies(
    Extension(deps): Extension<ServerDeps>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<MoviesBody> {
    let Query(params) = params?;
    let page = Page::parse(params.limit.as_deref(), params.offset.as_deref())?;
    let search = MovieSearch::new(params.title.as_deref(), params.actor.as_deref(), page);

    let movies = deps
        .catalog
        .search_movies(&search)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to search movies"))?;

    Ok(ApiResponse::ok(MoviesBody { movies }))
}

pub async fn create_movie(
    Extension(deps): Extension<ServerDeps>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NewMovie>, JsonRejection>,
) -> ApiResult<MovieBody> {
    let Json(input) = payload?;

    let movie = deps
        .catalog
        .create_movie(input)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to create movie"))?;

    info!(movie_id = %movie.id, username = %user.username, "Movie created");
    Ok(ApiResponse::ok(MovieBody { movie }))
}

/// Serves both PUT and PATCH; absent fields keep their stored values
pub async fn update_movie(
    Extension(deps): Extension<ServerDeps>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<MoviePatch>, JsonRejection>,
) -> ApiResult<MovieBody> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;

    let movie = deps
        .catalog
        .update_movie(id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to update movie"))?;

    info!(movie_id = %id, username = %user.username, "Movie updated");
    Ok(ApiResponse::ok(MovieBody { movie }))
}

pub async fn delete_movie(
    Extension(deps): Extension<ServerDeps>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Empty> {
    let id = parse_id(&id)?;

    deps.catalog
        .delete_movie(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to delete movie"))?;

    info!(movie_id = %id, username = %user.username, "Movie deleted");
    Ok(ApiResponse::ok(Empty {}))
}
