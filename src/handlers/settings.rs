use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;

use crate::{
    error::Result,
    extract::Json,
    models::settings::{SiteSettings, SiteSettingsPatch},
    repositories::settings as settings_repo,
    response::json,
    state::AppState,
};

#[derive(Serialize)]
pub struct SettingsResponse {
    pub settings: SiteSettings,
}

/// Reads the site settings; empty defaults before the first save.
#[axum::debug_handler]
pub async fn get(State(state): State<AppState>) -> Result<Response> {
    let settings = settings_repo::get_settings(state.backend.as_ref()).await?;
    Ok(json(StatusCode::OK, &SettingsResponse { settings }))
}

/// Saves the site settings.
#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Json(patch): Json<SiteSettingsPatch>,
) -> Result<Response> {
    let settings = settings_repo::save_settings(state.backend.as_ref(), &patch).await?;
    tracing::info!("⚙️ Site settings saved");

    Ok(json(StatusCode::OK, &SettingsResponse { settings }))
}
