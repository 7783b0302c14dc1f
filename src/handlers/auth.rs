use axum::{Extension, extract::State, http::StatusCode, response::Response};
use garde::Validate;
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;

use crate::{
    backend::client::BackendError,
    error::{AppError, Result},
    extract::Json,
    models::session::Identity,
    models::user::Role,
    repositories::users as user_repo,
    response::{MessageResponse, json},
    services::session,
    state::AppState,
    validation::fields::require,
};

/// The request payload for signing in.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub email: Option<String>,
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub password: Option<String>,
}

/// The request payload for registering.
#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub email: Option<String>,
    #[serde(default)]
    #[garde(required, length(min = 6))]
    pub password: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub full_name: Option<String>,
}

/// The response payload for sign-in and sign-up.
#[derive(Serialize)]
pub struct UserResponse {
    pub user: Identity,
}

/// The response payload describing the current session.
#[derive(Serialize)]
pub struct SessionResponse {
    pub user: Identity,
    /// `None` when the user has no authorization record yet.
    pub role: Option<Role>,
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    require(&payload)?;
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    tracing::info!("🔐 Login attempt for: {}", email);

    let auth_session = state
        .backend
        .sign_in(&email, &password)
        .await
        .map_err(|e| match e {
            BackendError::Unauthorized(msg) => {
                tracing::debug!("Sign-in rejected: {}", msg);
                AppError::Authentication("Invalid email or password".to_string())
            }
            other => AppError::Backend(other),
        })?;

    session::start(&state.config, &cookies, &auth_session)?;

    tracing::info!("✅ User logged in: {}", auth_session.user.id);
    Ok(json(
        StatusCode::OK,
        &UserResponse {
            user: auth_session.user,
        },
    ))
}

/// Handles user registration.
///
/// Creates the backend user and its `profiles` row with the `user` role. The
/// caller signs in separately.
#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Response> {
    require(&payload)?;
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    tracing::info!("📝 Signup attempt for: {}", email);

    let identity = state
        .backend
        .sign_up(&email, &password)
        .await
        .map_err(|e| match e {
            BackendError::Rejected {
                status, message, ..
            } if (400..500).contains(&status) => AppError::Validation(message),
            other => AppError::Backend(other),
        })?;

    user_repo::create_profile(state.backend.as_ref(), &identity, payload.full_name.as_deref()).await?;

    tracing::info!("✅ User registered: {}", identity.id);
    Ok(json(StatusCode::CREATED, &UserResponse { user: identity }))
}

/// Handles user logout.
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(identity): Extension<Identity>,
) -> Result<Response> {
    session::end(&state, &cookies).await;

    tracing::info!("👋 User logged out: {}", identity.id);
    Ok(json(StatusCode::OK, &MessageResponse::new("Logged out")))
}

/// Describes the signed-in caller.
#[axum::debug_handler]
pub async fn current_session(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response> {
    let record = user_repo::authorization_record(state.backend.as_ref(), &identity).await?;

    Ok(json(
        StatusCode::OK,
        &SessionResponse {
            user: identity,
            role: record.map(|r| r.role),
        },
    ))
}
