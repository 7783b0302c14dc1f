use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;

use crate::{
    error::AppError,
    services::authz::{self, Decision, Requirement},
    services::session,
    state::AppState,
};

/// A middleware that requires a signed-in caller.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// The downstream `Response`, or `401` without a session.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    tracing::debug!("🔐 Checking authentication...");

    let Some(identity) = session::caller(&state, &cookies, request.extensions()).await else {
        tracing::warn!("❌ No valid session for {}", request.uri().path());
        return AppError::Authentication("Not signed in".to_string()).into_response();
    };

    tracing::debug!("✅ User authenticated: {}", identity.id);
    request.extensions_mut().insert(identity);

    next.run(request).await
}

/// A middleware that requires a caller holding a privileged role.
///
/// The authorization record is re-checked here even when the gate already
/// passed the request, and handed to the handler as an extension.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// The downstream `Response`, `401` without a session or `403` without the role.
pub async fn require_privileged(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let identity = session::caller(&state, &cookies, request.extensions()).await;

    let decision =
        match authz::authorize(state.backend.as_ref(), identity.as_ref(), Requirement::Privileged).await {
            Ok(decision) => decision,
            Err(e) => return e.into_response(),
        };

    match (decision, identity) {
        (Decision::Allowed(record), Some(identity)) => {
            tracing::debug!("✅ Privileged access for {} ({})", record.user_id, record.role);
            request.extensions_mut().insert(identity);
            request.extensions_mut().insert(record);
            next.run(request).await
        }
        (Decision::DeniedInsufficientRole, _) => AppError::Forbidden.into_response(),
        _ => AppError::Authentication("Not signed in".to_string()).into_response(),
    }
}
