use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::backend::query::Query;
use crate::models::session::{AuthSession, Identity};

/// The error code the backend returns when a single-row read matches nothing.
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Errors reported by the backend-as-a-service.
#[derive(Error, Debug)]
pub enum BackendError {
    /// A single-row read matched no row.
    #[error("No rows returned")]
    NoRows,

    /// The backend rejected the credentials or token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The backend answered with an error status.
    #[error("Backend rejected request ({status}): {message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response could not be understood.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// The operations the application needs from the backend-as-a-service.
///
/// Rows travel as JSON objects; the repositories turn them into models.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Exchanges email and password for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError>;

    /// Registers a new user and returns its identity.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, BackendError>;

    /// Exchanges a refresh token for a new session.
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, BackendError>;

    /// Resolves the user behind an access token.
    async fn user(&self, access_token: &str) -> Result<Identity, BackendError>;

    /// Revokes the session behind an access token.
    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;

    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, BackendError>;

    /// Reads exactly one row; `BackendError::NoRows` when nothing matches.
    async fn select_one(&self, table: &str, query: &Query) -> Result<Value, BackendError>;

    async fn count(&self, table: &str, query: &Query) -> Result<u64, BackendError>;

    /// Inserts a row and returns it as stored.
    async fn insert(&self, table: &str, row: Value) -> Result<Value, BackendError>;

    /// Applies `patch` to every matching row and returns the updated rows.
    async fn update(&self, table: &str, query: &Query, patch: Value) -> Result<Vec<Value>, BackendError>;

    /// Deletes every matching row and returns the deleted rows.
    async fn delete(&self, table: &str, query: &Query) -> Result<Vec<Value>, BackendError>;
}
