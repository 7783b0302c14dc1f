use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Serializes `body` with sonic-rs into a JSON response.
pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match sonic_rs::to_string(body) {
        Ok(body) => (status, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            tracing::error!("❌ Response serialization failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"error":"Internal server error"}"#,
            )
                .into_response()
        }
    }
}

/// A plain `{ "message": ... }` body.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
