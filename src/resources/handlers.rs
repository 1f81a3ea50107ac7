use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::AppError,
    resources::{repo_types::Resource, services::ResourceService},
    state::AppState,
};

pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_resources))
        .route("/:id", get(get_resource))
}

#[instrument(skip(resources))]
pub async fn list_resources(
    State(resources): State<ResourceService>,
) -> Result<Json<Vec<Resource>>, AppError> {
    Ok(Json(resources.list().await?))
}

#[instrument(skip(resources))]
pub async fn get_resource(
    State(resources): State<ResourceService>,
    Path(id): Path<String>,
) -> Result<Json<Resource>, AppError> {
    Ok(Json(resources.get(&id).await?))
}
