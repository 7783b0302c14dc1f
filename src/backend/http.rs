use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration as StdDuration;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::backend::client::{Backend, BackendError, NO_ROWS_CODE};
use crate::backend::query::Query;
use crate::config::Config;
use crate::models::session::{AuthSession, Identity};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";
const CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: Option<i64>,
    expires_at: Option<i64>,
    user: UserResponse,
}

#[derive(Deserialize)]
struct UserResponse {
    id: Uuid,
    email: Option<String>,
}

impl From<UserResponse> for Identity {
    fn from(user: UserResponse) -> Self {
        Identity {
            id: user.id,
            email: user.email,
        }
    }
}

impl From<TokenResponse> for AuthSession {
    fn from(token: TokenResponse) -> Self {
        let expires_at = token
            .expires_at
            .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
            .unwrap_or_else(|| Utc::now() + Duration::seconds(token.expires_in.unwrap_or(3600)));

        AuthSession {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at,
            user: token.user.into(),
        }
    }
}

/// Error payloads of both the auth and the REST dialects.
#[derive(Deserialize, Default)]
struct ErrorBody {
    code: Option<Value>,
    message: Option<String>,
    msg: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// A `Backend` that talks to the backend-as-a-service over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    anon_key: Zeroizing<String>,
    table_key: Zeroizing<String>,
}

impl HttpBackend {
    /// Creates a new `HttpBackend` from the application configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `HttpBackend`.
    pub fn new(config: &Config) -> Result<Self, BackendError> {
        let client = Client::builder()
            .connect_timeout(StdDuration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        let anon_key = config.baas_anon_key.clone();
        let table_key = config
            .baas_service_key
            .clone()
            .unwrap_or_else(|| anon_key.clone());

        Ok(Self {
            client,
            base_url: config.baas_url.clone(),
            anon_key,
            table_key,
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_request(&self, builder: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        builder
            .header("apikey", self.anon_key.as_str())
            .bearer_auth(bearer.unwrap_or(self.anon_key.as_str()))
    }

    fn table_request(&self, builder: RequestBuilder, query: &Query) -> RequestBuilder {
        builder
            .header("apikey", self.table_key.as_str())
            .bearer_auth(self.table_key.as_str())
            .query(&query.to_pairs())
    }

    async fn token(&self, grant_type: &str, body: Value) -> Result<AuthSession, BackendError> {
        let response = self
            .auth_request(
                self.client
                    .post(self.auth_url("token"))
                    .query(&[("grant_type", grant_type)])
                    .json(&body),
                None,
            )
            .send()
            .await?;

        let token: TokenResponse = parse_json(check(response).await?).await?;
        Ok(token.into())
    }
}

/// Turns an error status into a `BackendError`, passing successes through.
async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: ErrorBody = response.json().await.unwrap_or_default();
    let code = body.code.map(|code| match code {
        Value::String(code) => code,
        other => other.to_string(),
    });
    let message = body
        .message
        .or(body.msg)
        .or(body.error_description)
        .or(body.error)
        .unwrap_or_else(|| status.to_string());

    if code.as_deref() == Some(NO_ROWS_CODE) {
        return Err(BackendError::NoRows);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(BackendError::Unauthorized(message)),
        StatusCode::BAD_REQUEST if body_is_bad_grant(&message) => {
            Err(BackendError::Unauthorized(message))
        }
        _ => Err(BackendError::Rejected {
            status: status.as_u16(),
            code,
            message,
        }),
    }
}

/// The auth endpoint answers bad credentials and dead refresh tokens with 400.
fn body_is_bad_grant(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("invalid login credentials")
        || message.contains("invalid refresh token")
        || message.contains("invalid_grant")
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// Parses a `Content-Range` header such as `0-24/120` or `*/0`.
fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.parse().ok()
}

#[async_trait]
impl Backend for HttpBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        tracing::debug!("🔐 Signing in at backend: {}", email);
        self.token(
            "password",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, BackendError> {
        let response = self
            .auth_request(
                self.client
                    .post(self.auth_url("signup"))
                    .json(&serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .send()
            .await?;

        // Depending on email confirmation the backend answers with a session or a bare user.
        let mut body: Value = parse_json(check(response).await?).await?;
        let user = if body.get("user").is_some() {
            body["user"].take()
        } else {
            body
        };

        serde_json::from_value::<UserResponse>(user)
            .map(Identity::from)
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, BackendError> {
        tracing::debug!("🔄 Refreshing backend session");
        self.token(
            "refresh_token",
            serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await
    }

    async fn user(&self, access_token: &str) -> Result<Identity, BackendError> {
        let response = self
            .auth_request(self.client.get(self.auth_url("user")), Some(access_token))
            .send()
            .await?;

        let user: UserResponse = parse_json(check(response).await?).await?;
        Ok(user.into())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let response = self
            .auth_request(self.client.post(self.auth_url("logout")), Some(access_token))
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, BackendError> {
        let response = self
            .table_request(self.client.get(self.table_url(table)), query)
            .query(&[("select", "*")])
            .send()
            .await?;

        parse_json(check(response).await?).await
    }

    async fn select_one(&self, table: &str, query: &Query) -> Result<Value, BackendError> {
        let response = self
            .table_request(self.client.get(self.table_url(table)), query)
            .query(&[("select", "*")])
            .header(header::ACCEPT, SINGLE_OBJECT)
            .send()
            .await?;

        parse_json(check(response).await?).await
    }

    async fn count(&self, table: &str, query: &Query) -> Result<u64, BackendError> {
        let response = self
            .table_request(self.client.head(self.table_url(table)), query)
            .header("Prefer", "count=exact")
            .send()
            .await?;

        let response = check(response).await?;
        response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| BackendError::Decode("Missing Content-Range header".to_string()))
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, BackendError> {
        let response = self
            .table_request(self.client.post(self.table_url(table)), &Query::new())
            .header("Prefer", RETURN_REPRESENTATION)
            .header(header::ACCEPT, SINGLE_OBJECT)
            .json(&row)
            .send()
            .await?;

        parse_json(check(response).await?).await
    }

    async fn update(&self, table: &str, query: &Query, patch: Value) -> Result<Vec<Value>, BackendError> {
        let response = self
            .table_request(self.client.patch(self.table_url(table)), query)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&patch)
            .send()
            .await?;

        parse_json(check(response).await?).await
    }

    async fn delete(&self, table: &str, query: &Query) -> Result<Vec<Value>, BackendError> {
        let response = self
            .table_request(self.client.delete(self.table_url(table)), query)
            .header("Prefer", RETURN_REPRESENTATION)
            .send()
            .await?;

        parse_json(check(response).await?).await
    }
}
