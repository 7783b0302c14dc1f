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
    models::event::{Chapter, Event, EventPatch, NewEvent},
    repositories::events::{self as event_repo, EventFilter},
    response::{MessageResponse, json},
    state::AppState,
    validation::fields::{parse_enum, parse_flag, parse_limit, require},
};

/// Query parameters of the event listing.
#[derive(Deserialize, Debug, Default)]
pub struct EventListParams {
    pub chapter: Option<String>,
    pub featured: Option<String>,
    pub limit: Option<String>,
}

/// The request payload for creating an event.
#[derive(Deserialize, Debug, Validate)]
pub struct CreateEventRequest {
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub title: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub description: Option<String>,
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub date: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub time: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub location: Option<String>,
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub chapter: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub image_url: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub registration_url: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub featured: Option<bool>,
}

/// The request payload for updating an event.
#[derive(Deserialize, Debug, Default)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub chapter: Option<String>,
    pub image_url: Option<String>,
    pub registration_url: Option<String>,
    pub featured: Option<bool>,
    /// When set, the update only applies if the event is unchanged since.
    pub expected_updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

#[derive(Serialize)]
pub struct EventResponse {
    pub event: Event,
}

/// Lists events, optionally filtered by chapter and featured flag.
#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<EventListParams>,
) -> Result<Response> {
    let filter = EventFilter {
        chapter: params
            .chapter
            .as_deref()
            .map(parse_enum::<Chapter>)
            .transpose()?,
        featured_only: parse_flag(params.featured.as_deref()),
        limit: parse_limit(params.limit.as_deref())?,
    };

    let events = event_repo::list_events(state.backend.as_ref(), &filter).await?;
    Ok(json(StatusCode::OK, &EventsResponse { events }))
}

#[axum::debug_handler]
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let event = event_repo::get_event(state.backend.as_ref(), id).await?;
    Ok(json(StatusCode::OK, &EventResponse { event }))
}

/// Creates an event.
#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Response> {
    require(&payload)?;
    let chapter = parse_enum::<Chapter>(payload.chapter.as_deref().unwrap_or_default())?;

    let new_event = NewEvent {
        title: payload.title.unwrap_or_default(),
        description: payload.description,
        date: payload.date.unwrap_or_default(),
        time: payload.time,
        location: payload.location,
        chapter,
        image_url: payload.image_url,
        registration_url: payload.registration_url,
        featured: payload.featured.unwrap_or(false),
    };

    let event = event_repo::create_event(state.backend.as_ref(), &new_event).await?;
    tracing::info!("✅ Event created: {} ({})", event.id, event.chapter);

    Ok(json(StatusCode::CREATED, &EventResponse { event }))
}

/// Applies a partial update to an event.
#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Response> {
    let chapter = payload
        .chapter
        .as_deref()
        .map(parse_enum::<Chapter>)
        .transpose()?;

    let patch = EventPatch {
        title: payload.title,
        description: payload.description,
        date: payload.date,
        time: payload.time,
        location: payload.location,
        chapter,
        image_url: payload.image_url,
        registration_url: payload.registration_url,
        featured: payload.featured,
    };

    let event =
        event_repo::update_event(state.backend.as_ref(), id, &patch, payload.expected_updated_at)
            .await?;
    tracing::info!("✅ Event updated: {}", event.id);

    Ok(json(StatusCode::OK, &EventResponse { event }))
}

#[axum::debug_handler]
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    event_repo::delete_event(state.backend.as_ref(), id).await?;
    tracing::info!("🗑️ Event deleted: {}", id);

    Ok(json(StatusCode::OK, &MessageResponse::new("Event deleted")))
}
