use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::Response,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::Result,
    extract::Path,
    models::user::{AuthorizationRecord, Profile},
    repositories::users as user_repo,
    response::json,
    services::stats::{self, DashboardStats},
    state::AppState,
};

#[derive(Serialize)]
pub struct UsersResponse {
    pub users: Vec<Profile>,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub user: Profile,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub stats: DashboardStats,
}

#[axum::debug_handler]
pub async fn list(State(state): State<AppState>) -> Result<Response> {
    let users = user_repo::list_profiles(state.backend.as_ref()).await?;
    Ok(json(StatusCode::OK, &UsersResponse { users }))
}

/// Promotes a user to `admin`.
#[axum::debug_handler]
pub async fn promote(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthorizationRecord>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let user = user_repo::promote_to_admin(state.backend.as_ref(), id).await?;
    tracing::info!("⬆️ User {} promoted to {} by {}", user.id, user.role, actor.user_id);

    Ok(json(StatusCode::OK, &UserResponse { user }))
}

/// Counts shown on the admin overview.
#[axum::debug_handler]
pub async fn stats(State(state): State<AppState>) -> Result<Response> {
    let stats = stats::dashboard_stats(&state).await?;
    Ok(json(StatusCode::OK, &StatsResponse { stats }))
}
