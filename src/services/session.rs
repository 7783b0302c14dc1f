use axum::http::Extensions;
use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

use crate::{
    backend::client::BackendError,
    config::Config,
    error::{AppError, Result},
    models::session::{AuthSession, Identity, SessionCookie},
    state::AppState,
};

/// The name of the session cookie.
pub const SESSION_COOKIE: &str = "outreach_session";
/// Access tokens this close to expiry are refreshed up front.
const EXPIRY_LEEWAY_SECS: i64 = 30;

/// Encodes the cookie payload as URL-safe base64 JSON.
pub fn encode_cookie(payload: &SessionCookie) -> Result<String> {
    let json = sonic_rs::to_string(payload)
        .map_err(|e| AppError::Internal(format!("Session serialization failed: {}", e)))?;
    Ok(general_purpose::URL_SAFE_NO_PAD.encode(json))
}

/// Decodes a cookie value; anything malformed is treated as no session.
pub fn decode_cookie(value: &str) -> Option<SessionCookie> {
    let bytes = general_purpose::URL_SAFE_NO_PAD.decode(value).ok()?;
    sonic_rs::from_slice(&bytes).ok()
}

/// Creates a secure cookie with the given name, value, and max age.
fn create_secure_cookie(config: &Config, name: &'static str, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);

    cookie.set_http_only(true);

    if config.secure_cookies {
        cookie.set_secure(true);
    }

    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::days(config.session_max_age_days));
    cookie.set_path("/");

    cookie
}

/// Reads the session cookie, if present and well-formed.
pub fn read(cookies: &Cookies) -> Option<SessionCookie> {
    cookies
        .get(SESSION_COOKIE)
        .and_then(|cookie| decode_cookie(cookie.value()))
}

/// Writes the session cookie with a fresh max-age.
pub fn store(config: &Config, cookies: &Cookies, payload: &SessionCookie) -> Result<()> {
    let value = encode_cookie(payload)?;
    cookies.add(create_secure_cookie(config, SESSION_COOKIE, value));
    Ok(())
}

/// Stores a session freshly issued by the backend.
pub fn start(config: &Config, cookies: &Cookies, session: &AuthSession) -> Result<()> {
    store(config, cookies, &SessionCookie::from(session))?;
    tracing::info!("✅ Session cookie added for user: {}", session.user.id);
    Ok(())
}

/// Expires the session cookie in the browser.
pub fn clear(cookies: &Cookies) {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_max_age(Duration::seconds(0));
    cookie.set_path("/");
    cookies.remove(cookie);
}

/// Resolves the caller behind the session cookie.
///
/// Expired access tokens are exchanged for new ones; a live session gets its
/// cookie re-issued so the expiry slides. Every failure counts as "not signed
/// in".
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
///
/// # Returns
///
/// The caller's `Identity`, or `None`.
pub async fn resolve(state: &AppState, cookies: &Cookies) -> Option<Identity> {
    let stored = read(cookies)?;

    if stored.is_expired(Utc::now(), EXPIRY_LEEWAY_SECS) {
        tracing::debug!("🔄 Access token expired, refreshing session");
        return match state.backend.refresh(&stored.refresh_token).await {
            Ok(session) => {
                if let Err(e) = store(&state.config, cookies, &SessionCookie::from(&session)) {
                    tracing::error!("❌ Failed to rewrite refreshed session cookie: {}", e);
                }
                tracing::debug!("✅ Session refreshed for user: {}", session.user.id);
                Some(session.user)
            }
            Err(e) => {
                tracing::warn!("❌ Session refresh rejected: {}", e);
                clear(cookies);
                None
            }
        };
    }

    match state.backend.user(&stored.access_token).await {
        Ok(identity) => {
            if let Err(e) = store(&state.config, cookies, &stored) {
                tracing::error!("❌ Failed to extend session cookie: {}", e);
            }
            Some(identity)
        }
        Err(BackendError::Unauthorized(msg)) => {
            tracing::warn!("❌ Session rejected by backend: {}", msg);
            clear(cookies);
            None
        }
        Err(e) => {
            tracing::error!("❌ Could not resolve session: {}", e);
            None
        }
    }
}

/// Returns the caller resolved earlier in the request, or resolves it now.
pub async fn caller(state: &AppState, cookies: &Cookies, extensions: &Extensions) -> Option<Identity> {
    match extensions.get::<Identity>() {
        Some(identity) => Some(identity.clone()),
        None => resolve(state, cookies).await,
    }
}

/// Signs the session out at the backend and expires the cookie.
pub async fn end(state: &AppState, cookies: &Cookies) {
    if let Some(stored) = read(cookies) {
        if let Err(e) = state.backend.sign_out(&stored.access_token).await {
            tracing::warn!("⚠️ Backend sign-out failed: {}", e);
        }
    }
    clear(cookies);
}
