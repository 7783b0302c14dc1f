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
    extract::{Json, Path},
    models::research::{NewResearchPublication, ResearchPublication, ResearchPublicationPatch},
    repositories::research as research_repo,
    response::{MessageResponse, json},
    state::AppState,
    validation::fields::require,
};

/// The request payload for adding a publication.
#[derive(Deserialize, Debug, Validate)]
pub struct CreatePublicationRequest {
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub title: Option<String>,
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub authors: Option<String>,
    #[serde(default, rename = "abstract")]
    #[garde(skip)]
    pub summary: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub publication_date: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub link_url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdatePublicationRequest {
    pub title: Option<String>,
    pub authors: Option<String>,
    #[serde(rename = "abstract")]
    pub summary: Option<String>,
    pub publication_date: Option<String>,
    pub pdf_url: Option<String>,
    pub link_url: Option<String>,
    pub expected_updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct PublicationsResponse {
    pub publications: Vec<ResearchPublication>,
}

#[derive(Serialize)]
pub struct PublicationResponse {
    pub publication: ResearchPublication,
}

#[axum::debug_handler]
pub async fn list(State(state): State<AppState>) -> Result<Response> {
    let publications = research_repo::list_publications(state.backend.as_ref()).await?;
    Ok(json(StatusCode::OK, &PublicationsResponse { publications }))
}

#[axum::debug_handler]
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let publication = research_repo::get_publication(state.backend.as_ref(), id).await?;
    Ok(json(StatusCode::OK, &PublicationResponse { publication }))
}

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreatePublicationRequest>,
) -> Result<Response> {
    require(&payload)?;

    let new_publication = NewResearchPublication {
        title: payload.title.unwrap_or_default(),
        authors: payload.authors.unwrap_or_default(),
        summary: payload.summary,
        publication_date: payload.publication_date,
        pdf_url: payload.pdf_url,
        link_url: payload.link_url,
    };

    let publication =
        research_repo::create_publication(state.backend.as_ref(), &new_publication).await?;
    tracing::info!("✅ Research publication created: {}", publication.id);

    Ok(json(StatusCode::CREATED, &PublicationResponse { publication }))
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePublicationRequest>,
) -> Result<Response> {
    let patch = ResearchPublicationPatch {
        title: payload.title,
        authors: payload.authors,
        summary: payload.summary,
        publication_date: payload.publication_date,
        pdf_url: payload.pdf_url,
        link_url: payload.link_url,
    };

    let publication = research_repo::update_publication(
        state.backend.as_ref(),
        id,
        &patch,
        payload.expected_updated_at,
    )
    .await?;

    Ok(json(StatusCode::OK, &PublicationResponse { publication }))
}

#[axum::debug_handler]
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    research_repo::delete_publication(state.backend.as_ref(), id).await?;
    tracing::info!("🗑️ Research publication deleted: {}", id);

    Ok(json(StatusCode::OK, &MessageResponse::new("Publication deleted")))
}
