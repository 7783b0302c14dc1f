use axum::{extract::State, http::StatusCode, response::Response};
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    extract::Json,
    models::contact::{ContactMessage, NewContactMessage},
    repositories::contact as contact_repo,
    response::{MessageResponse, json},
    state::AppState,
    validation::fields::require,
};

/// The request payload of the contact form.
#[derive(Deserialize, Validate)]
pub struct ContactRequest {
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub name: Option<String>,
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub email: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub subject: Option<String>,
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ContactMessagesResponse {
    pub messages: Vec<ContactMessage>,
}

/// Stores a contact form submission.
#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<Response> {
    require(&payload)?;

    let message = NewContactMessage {
        name: payload.name.unwrap_or_default(),
        email: payload.email.unwrap_or_default(),
        subject: payload.subject.filter(|s| !s.is_empty()),
        message: payload.message.unwrap_or_default(),
    };

    let stored = contact_repo::create_message(state.backend.as_ref(), &message).await?;
    tracing::info!("📨 Contact message stored: {}", stored.id);

    Ok(json(
        StatusCode::OK,
        &MessageResponse::new("Thank you for reaching out. We will get back to you soon."),
    ))
}

/// Lists contact messages, newest first.
#[axum::debug_handler]
pub async fn list(State(state): State<AppState>) -> Result<Response> {
    let messages = contact_repo::list_messages(state.backend.as_ref()).await?;
    Ok(json(StatusCode::OK, &ContactMessagesResponse { messages }))
}
