//! Shared harness: an in-memory backend and helpers to drive the router.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use chrono::{Duration, Utc};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;
use zeroize::Zeroizing;

use outreach::{
    backend::client::{Backend, BackendError},
    backend::query::{Direction, Query},
    config::{Config, DEFAULT_MAX_UPLOAD_BYTES},
    models::session::{AuthSession, Identity, SessionCookie},
    models::user::Role,
    services::session::{SESSION_COOKIE, encode_cookie},
    state::AppState,
};

#[derive(Default)]
struct Store {
    tables: HashMap<String, Vec<Value>>,
    /// email -> (password, identity)
    accounts: HashMap<String, (String, Identity)>,
    access_tokens: HashMap<String, Identity>,
    refresh_tokens: HashMap<String, Identity>,
    signed_out: Vec<String>,
}

/// A backend that keeps tables and sessions in memory.
#[derive(Default)]
pub struct MemoryBackend {
    store: Mutex<Store>,
    tables_down: AtomicBool,
}

fn now_literal() -> Value {
    serde_json::to_value(Utc::now()).unwrap()
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn matches(row: &Value, query: &Query) -> bool {
    query
        .filters
        .iter()
        .all(|(column, expected)| row.get(column).map(text).as_deref() == Some(expected.as_str()))
}

fn select_rows(rows: &[Value], query: &Query) -> Vec<Value> {
    let mut selected: Vec<Value> = rows.iter().filter(|row| matches(row, query)).cloned().collect();

    if let Some((column, direction)) = &query.order {
        selected.sort_by(|a, b| {
            let a = a.get(column).map(text).unwrap_or_default();
            let b = b.get(column).map(text).unwrap_or_default();
            match direction {
                Direction::Asc => a.cmp(&b),
                Direction::Desc => b.cmp(&a),
            }
        });
    }

    if let Some(limit) = query.limit {
        selected.truncate(limit);
    }

    selected
}

impl MemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers an account. `role` creates a `profiles` row, `admin_row` an `admins` row.
    pub fn add_user(&self, email: &str, password: &str, role: Option<Role>, admin_row: bool) -> Identity {
        let identity = Identity {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        };

        let mut store = self.store.lock().unwrap();
        store
            .accounts
            .insert(email.to_string(), (password.to_string(), identity.clone()));

        if let Some(role) = role {
            store.tables.entry("profiles".to_string()).or_default().push(json!({
                "id": identity.id,
                "email": email,
                "full_name": format!("{} name", email),
                "role": role,
                "created_at": now_literal(),
            }));
        }

        if admin_row {
            store.tables.entry("admins".to_string()).or_default().push(json!({
                "id": identity.id,
                "email": email,
                "full_name": null,
                "created_at": now_literal(),
            }));
        }

        identity
    }

    /// Issues a session for `identity`; `expired` backdates the access token.
    pub fn issue_session(&self, identity: &Identity, expired: bool) -> SessionCookie {
        let access_token = format!("at-{}", Uuid::new_v4());
        let refresh_token = format!("rt-{}", Uuid::new_v4());
        let expires_at = if expired {
            Utc::now() - Duration::minutes(5)
        } else {
            Utc::now() + Duration::hours(1)
        };

        let mut store = self.store.lock().unwrap();
        if !expired {
            store.access_tokens.insert(access_token.clone(), identity.clone());
        }
        store.refresh_tokens.insert(refresh_token.clone(), identity.clone());

        SessionCookie {
            access_token,
            refresh_token,
            expires_at: expires_at.timestamp(),
        }
    }

    fn new_session(store: &mut Store, identity: Identity) -> AuthSession {
        let access_token = format!("at-{}", Uuid::new_v4());
        let refresh_token = format!("rt-{}", Uuid::new_v4());
        store.access_tokens.insert(access_token.clone(), identity.clone());
        store.refresh_tokens.insert(refresh_token.clone(), identity.clone());

        AuthSession {
            access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::hours(1),
            user: identity,
        }
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.store
            .lock()
            .unwrap()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn seed(&self, table: &str, row: Value) -> Value {
        let mut store = self.store.lock().unwrap();
        let row = Self::stamp(row);
        store.tables.entry(table.to_string()).or_default().push(row.clone());
        row
    }

    /// Makes every table call fail until switched back; auth calls keep working.
    pub fn fail_tables(&self, fail: bool) {
        self.tables_down.store(fail, Ordering::SeqCst);
    }

    fn tables_available(&self) -> Result<(), BackendError> {
        if self.tables_down.load(Ordering::SeqCst) {
            return Err(BackendError::Rejected {
                status: 503,
                code: None,
                message: "Service unavailable".to_string(),
            });
        }
        Ok(())
    }

    pub fn was_signed_out(&self, access_token: &str) -> bool {
        self.store
            .lock()
            .unwrap()
            .signed_out
            .iter()
            .any(|t| t == access_token)
    }

    fn stamp(row: Value) -> Value {
        let mut row = match row {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        row.entry("id").or_insert_with(|| json!(Uuid::new_v4()));
        row.entry("created_at").or_insert_with(now_literal);
        row.entry("updated_at").or_insert_with(now_literal);
        Value::Object(row)
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let mut store = self.store.lock().unwrap();
        let identity = match store.accounts.get(email) {
            Some((stored, identity)) if stored == password => identity.clone(),
            _ => return Err(BackendError::Unauthorized("Invalid login credentials".to_string())),
        };
        Ok(Self::new_session(&mut store, identity))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, BackendError> {
        let mut store = self.store.lock().unwrap();
        if store.accounts.contains_key(email) {
            return Err(BackendError::Rejected {
                status: 422,
                code: None,
                message: "User already registered".to_string(),
            });
        }

        let identity = Identity {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        };
        store
            .accounts
            .insert(email.to_string(), (password.to_string(), identity.clone()));
        Ok(identity)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, BackendError> {
        let mut store = self.store.lock().unwrap();
        match store.refresh_tokens.remove(refresh_token) {
            Some(identity) => Ok(Self::new_session(&mut store, identity)),
            None => Err(BackendError::Unauthorized("Invalid refresh token".to_string())),
        }
    }

    async fn user(&self, access_token: &str) -> Result<Identity, BackendError> {
        self.store
            .lock()
            .unwrap()
            .access_tokens
            .get(access_token)
            .cloned()
            .ok_or_else(|| BackendError::Unauthorized("Invalid token".to_string()))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let mut store = self.store.lock().unwrap();
        store.access_tokens.remove(access_token);
        store.signed_out.push(access_token.to_string());
        Ok(())
    }

    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, BackendError> {
        self.tables_available()?;
        Ok(select_rows(&self.rows(table), query))
    }

    async fn select_one(&self, table: &str, query: &Query) -> Result<Value, BackendError> {
        self.tables_available()?;
        let mut rows = select_rows(&self.rows(table), query);
        if rows.len() == 1 {
            Ok(rows.remove(0))
        } else {
            Err(BackendError::NoRows)
        }
    }

    async fn count(&self, table: &str, query: &Query) -> Result<u64, BackendError> {
        self.tables_available()?;
        Ok(select_rows(&self.rows(table), query).len() as u64)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, BackendError> {
        self.tables_available()?;
        Ok(self.seed(table, row))
    }

    async fn update(&self, table: &str, query: &Query, patch: Value) -> Result<Vec<Value>, BackendError> {
        self.tables_available()?;
        let mut store = self.store.lock().unwrap();
        let rows = store.tables.entry(table.to_string()).or_default();
        let mut updated = Vec::new();

        for row in rows.iter_mut().filter(|row| matches(row, query)) {
            if let (Value::Object(target), Value::Object(changes)) = (&mut *row, &patch) {
                for (column, value) in changes {
                    target.insert(column.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }

        Ok(updated)
    }

    async fn delete(&self, table: &str, query: &Query) -> Result<Vec<Value>, BackendError> {
        self.tables_available()?;
        let mut store = self.store.lock().unwrap();
        let rows = store.tables.entry(table.to_string()).or_default();
        let (deleted, kept): (Vec<Value>, Vec<Value>) =
            rows.drain(..).partition(|row| matches(row, query));
        *rows = kept;
        Ok(deleted)
    }
}

/// A router wired to a fresh in-memory backend.
pub struct TestApp {
    pub app: Router,
    pub backend: Arc<MemoryBackend>,
    pub public_dir: TempDir,
}

pub fn test_config(public_dir: &Path) -> Config {
    Config {
        baas_url: "http://baas.test".to_string(),
        baas_anon_key: Zeroizing::new("anon".to_string()),
        baas_service_key: None,
        site_url: Some("https://outreach.test".to_string()),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        public_dir: public_dir.to_path_buf(),
        upload_dir: public_dir.join("uploads"),
        session_max_age_days: 7,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        cors_origins: vec!["http://localhost:3000".to_string()],
        secure_cookies: false,
    }
}

impl TestApp {
    pub fn new() -> Self {
        let public_dir = tempfile::tempdir().unwrap();
        let backend = MemoryBackend::new();
        let state = AppState::with_backend(test_config(public_dir.path()), backend.clone());
        let app = outreach::router(state).unwrap();

        Self {
            app,
            backend,
            public_dir,
        }
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.public_dir.path().join("uploads")
    }

    /// Creates a user with the given role and a live session for them.
    pub fn sign_in_as(&self, email: &str, role: Option<Role>) -> (Identity, String) {
        let admin_row = matches!(role, Some(Role::Admin) | Some(Role::SuperAdmin));
        let identity = self.backend.add_user(email, "secret123", role, admin_row);
        let session = self.backend.issue_session(&identity, false);
        (identity, cookie_header(&session))
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// The value the response sets for the session cookie, if it touches it.
    pub fn session_cookie(&self) -> Option<String> {
        let prefix = format!("{}=", SESSION_COOKIE);
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&prefix))
            .map(|v| {
                v[prefix.len()..]
                    .split(';')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            })
    }
}

pub fn cookie_header(session: &SessionCookie) -> String {
    format!("{}={}", SESSION_COOKIE, encode_cookie(session).unwrap())
}

/// Builds a request; every request carries a client address for the rate limiter.
pub fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", "203.0.113.7");

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    request(Method::GET, uri, cookie, None)
}

/// Builds a multipart upload request.
pub fn upload_request(cookie: &str, kind: Option<&str>, file_name: &str, mime: &str, data: &[u8]) -> Request<Body> {
    let boundary = "outreach-test-boundary";
    let mut body: Vec<u8> = Vec::new();

    if let Some(kind) = kind {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\n{kind}\r\n"
            )
            .as_bytes(),
        );
    }

    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header("x-forwarded-for", "203.0.113.7")
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub const PDF: &[u8] = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n1 0 obj\n<<>>\nendobj\ntrailer\n<<>>\n%%EOF\n";
