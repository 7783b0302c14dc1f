use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The caller identity the backend reports for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The backend user ID.
    pub id: Uuid,
    /// The user's email address, when the backend knows it.
    pub email: Option<String>,
}

/// A session issued by the backend at sign-in or refresh.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: Identity,
}

/// The payload stored in the session cookie.
///
/// Held by the browser only; the server never persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCookie {
    /// The backend access token.
    pub access_token: String,
    /// The backend refresh token.
    pub refresh_token: String,
    /// The access token expiry as a Unix timestamp.
    pub expires_at: i64,
}

impl SessionCookie {
    /// Whether the access token is expired, allowing `leeway_secs` of slack.
    pub fn is_expired(&self, now: DateTime<Utc>, leeway_secs: i64) -> bool {
        self.expires_at <= now.timestamp() + leeway_secs
    }
}

impl From<&AuthSession> for SessionCookie {
    fn from(session: &AuthSession) -> Self {
        Self {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            expires_at: session.expires_at.timestamp(),
        }
    }
}
