use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use crate::common::{ActorId, Capability, ListParams};
use crate::domains::actors::{Actor, ActorPatch, ActorSortColumn, NewActor};
use crate::kernel::ServerDeps;
use crate::server::error::{ApiError, ApiResponse, ApiResult, Empty};
use crate::server::middleware::{authorize, AuthUser};

#[derive(Debug, Serialize)]
pub struct ActorsBody {
    pub actors: Vec<Actor>,
}

#[derive(Debug, Serialize)]
pub struct ActorBody {
    pub actor: Actor,
}

pub fn actor_routes() -> Router {
    let read = Router::new()
        .route("/actors", get(list_actors))
        .route("/actors/:id", get(get_actor))
        .route_layer(from_fn_with_state(Capability::ReadCatalog, authorize));

    let write = Router::new()
        .route("/actors", post(create_actor))
        .route(
            "/actors/:id",
            put(update_actor).patch(update_actor).delete(delete_actor),
        )
        .route_layer(from_fn_with_state(Capability::ManageCatalog, authorize));

    read.merge(write)
}

fn parse_id(raw: &str) -> Result<ActorId, ApiError> {
    ActorId::parse(raw).map_err(|_| ApiError::invalid_id())
}

pub async fn list_actors(
    Extension(deps): Extension<ServerDeps>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<ActorsBody> {
    let Query(params) = params?;
    let query = params.into_list_query(ActorSortColumn::default_sort())?;

    let actors = deps
        .catalog
        .list_actors(&query)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to list actors"))?;

    Ok(ApiResponse::ok(ActorsBody { actors }))
}

pub async fn get_actor(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<String>,
) -> ApiResult<ActorBody> {
    let id = parse_id(&id)?;

    let actor = deps
        .catalog
        .find_actor(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to get actor"))?;

    Ok(ApiResponse::ok(ActorBody { actor }))
}

pub async fn create_actor(
    Extension(deps): Extension<ServerDeps>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NewActor>, JsonRejection>,
) -> ApiResult<ActorBody> {
    let Json(input) = payload?;

    let actor = deps
        .catalog
        .create_actor(input)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to create actor"))?;

    info!(actor_id = %actor.id, username = %user.username, "Actor created");
    Ok(ApiResponse::ok(ActorBody { actor }))
}

pub async fn update_actor(
    Extension(deps): Extension<ServerDeps>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<ActorPatch>, JsonRejection>,
) -> ApiResult<ActorBody> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;

    let actor = deps
        .catalog
        .update_actor(id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to update actor"))?;

    info!(actor_id = %id, username = %user.username, "Actor updated");
    Ok(ApiResponse::ok(ActorBody { actor }))
}

pub async fn delete_actor(
    Extension(deps): Extension<ServerDeps>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Empty> {
    let id = parse_id(&id)?;

    deps.catalog
        .delete_actor(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to delete actor"))?;

    info!(actor_id = %id, username = %user.username, "Actor deleted");
    Ok(ApiResponse::ok(Empty {}))
}
