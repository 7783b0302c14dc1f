use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod config;
pub mod error;
pub mod extract;
pub mod response;
pub mod state;

pub mod backend {
    pub mod client;
    pub mod http;
    pub mod query;
}

pub mod models {
    pub mod blog;
    pub mod contact;
    pub mod event;
    pub mod research;
    pub mod resource;
    pub mod session;
    pub mod settings;
    pub mod user;
}

pub mod repositories {
    pub mod blogs;
    pub mod contact;
    pub mod events;
    pub mod research;
    pub mod resources;
    pub mod settings;
    pub mod table;
    pub mod users;
}

pub mod services {
    pub mod authz;
    pub mod blogs;
    pub mod session;
    pub mod stats;
    pub mod uploads;
}

pub mod handlers {
    pub mod auth;
    pub mod blogs;
    pub mod contact;
    pub mod events;
    pub mod pages;
    pub mod research;
    pub mod resources;
    pub mod settings;
    pub mod upload;
    pub mod users;
}

pub mod middleware_layer {
    pub mod auth;
    pub mod gate;
    pub mod rate_limit;
}

pub mod validation {
    pub mod fields;
}

use config::Config;
use middleware_layer::{auth::require_auth, auth::require_privileged, gate::session_gate};
use state::AppState;

/// Multipart framing allowed on top of the upload size limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("⚠️ Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400))
}

/// Builds the application router.
///
/// # Arguments
///
/// * `state` - The application state.
///
/// # Returns
///
/// A `Result` containing the `Router`, ready to be served.
pub fn router(state: AppState) -> anyhow::Result<Router> {
    let public_routes = Router::new()
        .route("/api/events", get(handlers::events::list))
        .route("/api/events/{id}", get(handlers::events::get))
        .route("/api/blogs", get(handlers::blogs::list_published))
        .route("/api/blogs/{id}", get(handlers::blogs::get))
        .route("/api/resources", get(handlers::resources::list))
        .route("/api/resources/{id}", get(handlers::resources::get))
        .route("/api/research", get(handlers::research::list))
        .route("/api/research/{id}", get(handlers::research::get))
        .route("/api/settings", get(handlers::settings::get))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/signup", post(handlers::auth::signup));

    let contact_routes = middleware_layer::rate_limit::limit_contact(
        Router::new().route("/api/contact", post(handlers::contact::submit)),
    )?;

    let page_routes = Router::new()
        .route("/dashboard", get(handlers::pages::dashboard))
        .route("/dashboard/{*rest}", get(handlers::pages::dashboard_page))
        .route("/admin", get(handlers::pages::admin_console))
        .route("/admin/{*rest}", get(handlers::pages::admin_console));

    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    let authenticated_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/session", get(handlers::auth::current_session))
        .route("/api/blogs", post(handlers::blogs::create))
        .route(
            "/api/blogs/{id}",
            put(handlers::blogs::update).delete(handlers::blogs::delete),
        )
        .route(
            "/api/upload",
            post(handlers::upload::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let privileged_routes = Router::new()
        .route("/api/events", post(handlers::events::create))
        .route(
            "/api/events/{id}",
            put(handlers::events::update).delete(handlers::events::delete),
        )
        .route("/api/resources", post(handlers::resources::create))
        .route(
            "/api/resources/{id}",
            put(handlers::resources::update).delete(handlers::resources::delete),
        )
        .route("/api/research", post(handlers::research::create))
        .route(
            "/api/research/{id}",
            put(handlers::research::update).delete(handlers::research::delete),
        )
        .route("/api/admin/blogs", get(handlers::blogs::admin_list))
        .route("/api/admin/blogs/approve", post(handlers::blogs::review))
        .route("/api/admin/users", get(handlers::users::list))
        .route("/api/users/{id}/promote", post(handlers::users::promote))
        .route("/api/admin/contact", get(handlers::contact::list))
        .route("/api/admin/settings", put(handlers::settings::update))
        .route("/api/admin/stats", get(handlers::users::stats))
        .route_layer(from_fn_with_state(state.clone(), require_privileged));

    let app = Router::new()
        .merge(public_routes)
        .merge(contact_routes)
        .merge(page_routes)
        .merge(authenticated_routes)
        .merge(privileged_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .fallback_service(ServeDir::new(&state.config.public_dir))
        .layer(from_fn_with_state(state.clone(), session_gate))
        .layer(CookieManagerLayer::new())
        .layer(cors_layer(&state.config))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .with_state(state);

    Ok(app)
}
