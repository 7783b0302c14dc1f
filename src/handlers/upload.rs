use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Response,
};
use serde::Serialize;
use std::time::Duration;
use tokio::time::timeout;

use crate::{
    error::{AppError, Result},
    extract::Multipart,
    response::json,
    services::uploads::{self, UploadKind},
    state::AppState,
};

/// How long a single multipart field may take to arrive.
const FIELD_TIMEOUT: Duration = Duration::from_secs(60);

/// The response payload for a stored upload.
#[derive(Serialize)]
pub struct UploadResponse {
    /// The site-relative URL.
    pub url: String,
    /// The URL prefixed with the configured site URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_url: Option<String>,
}

/// A file field as received.
struct ReceivedFile {
    content_type: Option<String>,
    data: Bytes,
}

/// Stores an uploaded file.
///
/// Expects a `file` field and an optional `type` field selecting the upload
/// kind.
#[axum::debug_handler]
pub async fn upload(State(state): State<AppState>, Multipart(mut multipart): Multipart) -> Result<Response> {
    let mut file: Option<ReceivedFile> = None;
    let mut kind = String::new();

    loop {
        let field = match timeout(FIELD_TIMEOUT, multipart.next_field()).await {
            Ok(Ok(Some(field))) => field,
            Ok(Ok(None)) => break,
            Ok(Err(e)) => return Err(AppError::Multipart(format!("Parse error: {}", e))),
            Err(_) => return Err(AppError::Multipart("Upload timeout exceeded".into())),
        };

        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Multipart(format!("file: {}", e)))?;
                file = Some(ReceivedFile { content_type, data });
            }
            "type" => {
                kind = field
                    .text()
                    .await
                    .map_err(|e| AppError::Multipart(format!("type: {}", e)))?;
            }
            other => tracing::debug!("Ignoring multipart field: {}", other),
        }
    }

    let kind: UploadKind = kind.trim().parse()?;
    let file = file.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    tracing::debug!(
        "📋 Parsed upload - kind: {:?}, type: {:?}, size: {} bytes",
        kind,
        file.content_type,
        file.data.len()
    );

    let mime = uploads::check_file(
        kind,
        file.content_type.as_deref(),
        &file.data,
        state.config.max_upload_bytes,
    )?;
    let stored = uploads::store(&state.config, kind, &mime, &file.data).await?;

    Ok(json(
        StatusCode::OK,
        &UploadResponse {
            absolute_url: state.config.absolute_url(&stored.url),
            url: stored.url,
        },
    ))
}
