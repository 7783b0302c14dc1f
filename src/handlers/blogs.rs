use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::Response,
};
use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    extract::{Json, Path, Query},
    models::blog::{Blog, BlogPatch, BlogStatus, NewBlog},
    models::session::Identity,
    repositories::blogs as blog_repo,
    repositories::users as user_repo,
    response::{MessageResponse, json},
    services::blogs as blog_service,
    state::AppState,
    validation::fields::{parse_enum, parse_limit, require},
};

#[derive(Deserialize, Debug, Default)]
pub struct PublishedParams {
    pub limit: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct AdminListParams {
    pub status: Option<String>,
}

/// The request payload for submitting a post.
#[derive(Deserialize, Debug, Validate)]
pub struct CreateBlogRequest {
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub title: Option<String>,
    #[serde(default)]
    #[garde(required)]
    pub content: Option<Value>,
    #[serde(default)]
    #[garde(skip)]
    pub excerpt: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub cover_image: Option<String>,
    /// Saves the post without sending it to review.
    #[serde(default)]
    #[garde(skip)]
    pub draft: Option<bool>,
}

/// The request payload for editing a post.
#[derive(Deserialize, Debug, Default)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<Value>,
    pub cover_image: Option<String>,
    pub expected_updated_at: Option<DateTime<Utc>>,
}

/// The request payload of a review decision.
#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[serde(default)]
    #[garde(required)]
    pub blog_id: Option<Uuid>,
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub status: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub rejection_reason: Option<String>,
}

#[derive(Serialize)]
pub struct BlogsResponse {
    pub blogs: Vec<Blog>,
}

#[derive(Serialize)]
pub struct BlogResponse {
    pub blog: Blog,
}

/// Lists published posts.
#[axum::debug_handler]
pub async fn list_published(
    State(state): State<AppState>,
    Query(params): Query<PublishedParams>,
) -> Result<Response> {
    let limit = parse_limit(params.limit.as_deref())?;
    let blogs = blog_repo::list_published(state.backend.as_ref(), limit).await?;

    Ok(json(StatusCode::OK, &BlogsResponse { blogs }))
}

/// Reads one post. Unpublished posts are only visible to their author and to
/// privileged callers; everyone else gets a 404.
#[axum::debug_handler]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    identity: Option<Extension<Identity>>,
) -> Result<Response> {
    let blog = blog_repo::find_blog(state.backend.as_ref(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    let caller = identity.map(|Extension(identity)| identity);

    let visible = blog_service::is_visible(&state, &blog, caller.as_ref()).await?;
    if !visible {
        return Err(AppError::NotFound);
    }

    Ok(json(StatusCode::OK, &BlogResponse { blog }))
}

/// Submits a post written by the caller.
#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateBlogRequest>,
) -> Result<Response> {
    require(&payload)?;

    let record = user_repo::authorization_record(state.backend.as_ref(), &identity).await?;
    let author_name = record
        .map(|r| r.display_name)
        .or_else(|| identity.email.clone());

    let status = if payload.draft.unwrap_or(false) {
        BlogStatus::Draft
    } else {
        BlogStatus::Pending
    };

    let blog = blog_service::submit(
        &state,
        NewBlog {
            title: payload.title.unwrap_or_default(),
            excerpt: payload.excerpt,
            content: payload.content.unwrap_or(Value::Null),
            cover_image: payload.cover_image,
            author_id: identity.id,
            author_name,
            status,
        },
    )
    .await?;

    Ok(json(StatusCode::CREATED, &BlogResponse { blog }))
}

/// Loads a post and checks the caller may change it.
async fn load_for_change(state: &AppState, id: Uuid, identity: &Identity) -> Result<Blog> {
    let blog = blog_repo::find_blog(state.backend.as_ref(), id)
        .await?
        .ok_or(AppError::NotFound)?;

    if blog.is_authored_by(identity.id) {
        return Ok(blog);
    }

    let record = user_repo::authorization_record(state.backend.as_ref(), identity).await?;
    if !blog_service::can_modify(&blog, identity, record.as_ref()) {
        tracing::warn!("🚫 User {} may not change blog {}", identity.id, blog.id);
        return Err(AppError::Forbidden);
    }

    Ok(blog)
}

/// Edits a post; authors and privileged callers only.
#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBlogRequest>,
) -> Result<Response> {
    let blog = load_for_change(&state, id, &identity).await?;

    let patch = BlogPatch {
        title: payload.title,
        excerpt: payload.excerpt,
        content: payload.content,
        cover_image: payload.cover_image,
        status: None,
    };

    let by_author = blog.is_authored_by(identity.id);
    let blog = blog_service::edit(&state, &blog, patch, by_author, payload.expected_updated_at).await?;
    tracing::info!("✅ Blog updated: {} ({})", blog.id, blog.status);

    Ok(json(StatusCode::OK, &BlogResponse { blog }))
}

#[axum::debug_handler]
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let blog = load_for_change(&state, id, &identity).await?;
    blog_repo::delete_blog(state.backend.as_ref(), blog.id).await?;
    tracing::info!("🗑️ Blog deleted: {}", blog.id);

    Ok(json(StatusCode::OK, &MessageResponse::new("Blog deleted")))
}

/// Lists every post for review, optionally filtered by status.
#[axum::debug_handler]
pub async fn admin_list(
    State(state): State<AppState>,
    Query(params): Query<AdminListParams>,
) -> Result<Response> {
    let status = params
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(parse_enum::<BlogStatus>)
        .transpose()?;

    let blogs = blog_repo::list_all(state.backend.as_ref(), status).await?;
    Ok(json(StatusCode::OK, &BlogsResponse { blogs }))
}

/// Records a review decision.
#[axum::debug_handler]
pub async fn review(
    State(state): State<AppState>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Response> {
    require(&payload)?;
    let status = parse_enum::<BlogStatus>(payload.status.as_deref().unwrap_or_default())?;
    let blog_id = payload
        .blog_id
        .ok_or_else(|| AppError::Validation("Missing required fields: blogId".to_string()))?;

    let blog = blog_service::review(&state, blog_id, status, payload.rejection_reason).await?;
    Ok(json(StatusCode::OK, &BlogResponse { blog }))
}
