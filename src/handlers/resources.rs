use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
};
use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::Result,
    extract::{Json, Path, Query},
    models::resource::{NewResource, Resource, ResourcePatch},
    repositories::resources as resource_repo,
    response::{MessageResponse, json},
    state::AppState,
    validation::fields::require,
};

#[derive(Deserialize, Debug, Default)]
pub struct ResourceListParams {
    pub category: Option<String>,
}

#[derive(Deserialize, Debug, Validate)]
pub struct CreateResourceRequest {
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub title: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub description: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub category: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub file_url: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub link_url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateResourceRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub file_url: Option<String>,
    pub link_url: Option<String>,
    pub expected_updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct ResourcesResponse {
    pub resources: Vec<Resource>,
}

#[derive(Serialize)]
pub struct ResourceResponse {
    pub resource: Resource,
}

#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ResourceListParams>,
) -> Result<Response> {
    let category = params.category.as_deref().filter(|c| !c.is_empty());
    let resources = resource_repo::list_resources(state.backend.as_ref(), category).await?;

    Ok(json(StatusCode::OK, &ResourcesResponse { resources }))
}

#[axum::debug_handler]
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let resource = resource_repo::get_resource(state.backend.as_ref(), id).await?;
    Ok(json(StatusCode::OK, &ResourceResponse { resource }))
}

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateResourceRequest>,
) -> Result<Response> {
    require(&payload)?;

    let new_resource = NewResource {
        title: payload.title.unwrap_or_default(),
        description: payload.description,
        category: payload.category,
        file_url: payload.file_url,
        link_url: payload.link_url,
    };

    let resource = resource_repo::create_resource(state.backend.as_ref(), &new_resource).await?;
    tracing::info!("✅ Resource created: {}", resource.id);

    Ok(json(StatusCode::CREATED, &ResourceResponse { resource }))
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateResourceRequest>,
) -> Result<Response> {
    let patch = ResourcePatch {
        title: payload.title,
        description: payload.description,
        category: payload.category,
        file_url: payload.file_url,
        link_url: payload.link_url,
    };

    let resource =
        resource_repo::update_resource(state.backend.as_ref(), id, &patch, payload.expected_updated_at)
            .await?;

    Ok(json(StatusCode::OK, &ResourceResponse { resource }))
}

#[axum::debug_handler]
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    resource_repo::delete_resource(state.backend.as_ref(), id).await?;
    tracing::info!("🗑️ Resource deleted: {}", id);

    Ok(json(StatusCode::OK, &MessageResponse::new("Resource deleted")))
}
