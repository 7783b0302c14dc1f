use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::{
    models::session::Identity,
    services::authz::{self, DASHBOARD_PATH, Decision, LOGIN_PATH, Requirement},
    services::session,
    state::AppState,
};

/// Prefixes that need a signed-in caller.
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/admin"];
/// Prefixes that additionally need a privileged role.
pub const PRIVILEGED_PREFIXES: &[&str] = &["/dashboard/admin"];
/// Internal asset prefixes the gate never looks at.
const SKIPPED_PREFIXES: &[&str] = &["/assets/", "/uploads/"];

/// How the gate classifies a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Static files and assets; passed through untouched.
    Skipped,
    Public,
    Protected,
    Privileged,
}

/// Segment-aware prefix match: `/dashboard` covers `/dashboard/x` but not `/dashboards`.
fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Whether the last path segment looks like a file name.
fn has_file_extension(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('.'))
}

pub fn classify(path: &str) -> PathClass {
    if SKIPPED_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) || has_file_extension(path) {
        return PathClass::Skipped;
    }

    if PRIVILEGED_PREFIXES.iter().any(|prefix| under(path, prefix)) {
        PathClass::Privileged
    } else if PROTECTED_PREFIXES.iter().any(|prefix| under(path, prefix)) {
        PathClass::Protected
    } else {
        PathClass::Public
    }
}

/// What the gate does with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Continue,
    Redirect(&'static str),
}

/// Applies the gate policy to a classified path.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `class` - The path classification.
/// * `identity` - The resolved caller, if any.
///
/// # Returns
///
/// The `GateOutcome`. Role lookup failures fail closed.
pub async fn evaluate(state: &AppState, class: PathClass, identity: Option<&Identity>) -> GateOutcome {
    match (class, identity) {
        (PathClass::Protected | PathClass::Privileged, None) => GateOutcome::Redirect(LOGIN_PATH),
        (PathClass::Privileged, Some(identity)) => {
            match authz::authorize(state.backend.as_ref(), Some(identity), Requirement::Privileged).await {
                Ok(Decision::Allowed(_)) => GateOutcome::Continue,
                Ok(_) => GateOutcome::Redirect(DASHBOARD_PATH),
                Err(e) => {
                    tracing::error!("❌ Role lookup failed in gate: {}", e);
                    GateOutcome::Redirect(DASHBOARD_PATH)
                }
            }
        }
        _ => GateOutcome::Continue,
    }
}

/// The session gate run in front of every non-static request.
///
/// Resolves the caller once (refreshing the session cookie as a side effect),
/// hands the identity to downstream handlers and redirects callers who may not
/// see the requested area.
pub async fn session_gate(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let class = classify(request.uri().path());
    if class == PathClass::Skipped {
        return next.run(request).await;
    }

    let identity = session::resolve(&state, &cookies).await;

    match evaluate(&state, class, identity.as_ref()).await {
        GateOutcome::Continue => {
            if let Some(identity) = identity {
                request.extensions_mut().insert(identity);
            }
            next.run(request).await
        }
        GateOutcome::Redirect(location) => {
            tracing::debug!("↪️ Gate redirecting {} to {}", request.uri().path(), location);
            Redirect::temporary(location).into_response()
        }
    }
}
