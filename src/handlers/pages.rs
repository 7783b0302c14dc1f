//! Page guards for the dashboard and the admin console.
//!
//! Each guard settles access before any content is fetched and answers with
//! the page context the client renders from.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    models::session::Identity,
    models::user::Role,
    response::json,
    services::authz::{self, Area, Decision, Denial, LOGIN_PATH},
    services::session,
    state::AppState,
};

/// What a guarded page is rendered with.
#[derive(Debug, Serialize)]
pub struct PageContext {
    pub area: Area,
    pub user_id: Uuid,
    pub email: Option<String>,
    pub display_name: String,
    pub role: Role,
}

/// The dashboard area a path below `/dashboard/` belongs to.
fn dashboard_area(rest: &str) -> Area {
    if rest == "admin" || rest.starts_with("admin/") {
        Area::DashboardAdmin
    } else {
        Area::Dashboard
    }
}

async fn deny(state: &AppState, cookies: &Cookies, denial: Denial) -> Response {
    match denial {
        Denial::Redirect(location) => Redirect::temporary(location).into_response(),
        Denial::SignOutAndRedirect(location) => {
            session::end(state, cookies).await;
            Redirect::temporary(location).into_response()
        }
    }
}

/// Runs the guard for `area`.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `identity` - The caller resolved by the gate, if any.
/// * `area` - The area being entered.
///
/// # Returns
///
/// The page context, or a redirect.
async fn guard(
    state: &AppState,
    cookies: &Cookies,
    identity: Option<Extension<Identity>>,
    area: Area,
) -> Response {
    let identity = match identity {
        Some(Extension(identity)) => Some(identity),
        None => session::resolve(state, cookies).await,
    };

    let Some(identity) = identity else {
        return Redirect::temporary(LOGIN_PATH).into_response();
    };

    match authz::authorize(state.backend.as_ref(), Some(&identity), area.requirement()).await {
        Ok(Decision::Allowed(record)) => json(
            StatusCode::OK,
            &PageContext {
                area,
                user_id: record.user_id,
                email: record.email,
                display_name: record.display_name,
                role: record.role,
            },
        ),
        Ok(Decision::DeniedUnauthenticated) => Redirect::temporary(LOGIN_PATH).into_response(),
        Ok(Decision::DeniedInsufficientRole) => {
            tracing::warn!("🚫 User {} turned away from {:?}", identity.id, area);
            deny(state, cookies, area.on_insufficient_role()).await
        }
        Err(e) => {
            tracing::error!("❌ Role lookup failed for {:?}: {}", area, e);
            let location = match area.on_insufficient_role() {
                Denial::Redirect(location) | Denial::SignOutAndRedirect(location) => location,
            };
            Redirect::temporary(location).into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<AppState>,
    cookies: Cookies,
    identity: Option<Extension<Identity>>,
) -> Response {
    guard(&state, &cookies, identity, Area::Dashboard).await
}

/// Any page below `/dashboard/`, including the admin section.
#[axum::debug_handler]
pub async fn dashboard_page(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(rest): Path<String>,
    identity: Option<Extension<Identity>>,
) -> Response {
    guard(&state, &cookies, identity, dashboard_area(&rest)).await
}

/// The stand-alone admin console, any page.
#[axum::debug_handler]
pub async fn admin_console(
    State(state): State<AppState>,
    cookies: Cookies,
    identity: Option<Extension<Identity>>,
) -> Response {
    guard(&state, &cookies, identity, Area::AdminConsole).await
}
