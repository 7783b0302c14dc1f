use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::blog::{Blog, BlogPatch, BlogStatus, NewBlog},
    models::session::Identity,
    models::user::AuthorizationRecord,
    repositories::blogs as blog_repo,
    repositories::users as user_repo,
    state::AppState,
};

/// Builds the row patch for a review decision.
///
/// | status   | published_at       | rejection_reason |
/// |----------|--------------------|------------------|
/// | approved | kept, or now       | untouched        |
/// | rejected | cleared            | given reason     |
/// | pending  | cleared            | cleared          |
/// | draft    | cleared            | cleared          |
pub fn review_patch(
    status: BlogStatus,
    rejection_reason: Option<String>,
    published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<Value> {
    let mut patch = Map::new();
    patch.insert("status".to_string(), Value::String(status.as_str().to_string()));

    match status {
        BlogStatus::Approved => {
            let published_at = serde_json::to_value(published_at.unwrap_or(now))
                .map_err(|e| AppError::Internal(format!("Timestamp encoding failed: {}", e)))?;
            patch.insert("published_at".to_string(), published_at);
        }
        BlogStatus::Rejected => {
            patch.insert("published_at".to_string(), Value::Null);
            patch.insert(
                "rejection_reason".to_string(),
                rejection_reason.map(Value::String).unwrap_or(Value::Null),
            );
        }
        BlogStatus::Pending | BlogStatus::Draft => {
            patch.insert("published_at".to_string(), Value::Null);
            patch.insert("rejection_reason".to_string(), Value::Null);
        }
    }

    Ok(Value::Object(patch))
}

/// Records a review decision on a post.
///
/// Approving twice keeps the first publication time.
pub async fn review(
    state: &AppState,
    blog_id: Uuid,
    status: BlogStatus,
    rejection_reason: Option<String>,
) -> Result<Blog> {
    let blog = blog_repo::find_blog(state.backend.as_ref(), blog_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let patch = review_patch(status, rejection_reason, blog.published_at, Utc::now())?;
    let blog = blog_repo::apply_review(state.backend.as_ref(), blog_id, &patch).await?;

    tracing::info!("✅ Blog {} marked {}", blog.id, blog.status);
    Ok(blog)
}

/// Submits a post; drafts stay out of the review queue.
pub async fn submit(state: &AppState, blog: NewBlog) -> Result<Blog> {
    let author_id = blog.author_id;
    let blog = blog_repo::create_blog(state.backend.as_ref(), &blog).await?;

    tracing::info!("📝 Blog {} submitted by {} as {}", blog.id, author_id, blog.status);
    Ok(blog)
}

/// Whether `caller` may see `blog`.
pub fn can_view(blog: &Blog, caller: Option<&Identity>, record: Option<&AuthorizationRecord>) -> bool {
    blog.status == BlogStatus::Approved
        || caller.is_some_and(|c| blog.is_authored_by(c.id))
        || record.is_some_and(|r| r.role.is_privileged())
}

/// Whether `caller` may read `blog`.
///
/// The caller's role is only looked up when status and authorship do not
/// settle it.
pub async fn is_visible(state: &AppState, blog: &Blog, caller: Option<&Identity>) -> Result<bool> {
    match caller {
        Some(caller) if !can_view(blog, Some(caller), None) => {
            let record = user_repo::authorization_record(state.backend.as_ref(), caller).await?;
            Ok(record.is_some_and(|r| r.role.is_privileged()))
        }
        _ => Ok(can_view(blog, caller, None)),
    }
}

/// Whether `caller` may edit or delete `blog`.
pub fn can_modify(blog: &Blog, caller: &Identity, record: Option<&AuthorizationRecord>) -> bool {
    blog.is_authored_by(caller.id) || record.is_some_and(|r| r.role.is_privileged())
}

/// Edits a post. An author's edit sends a reviewed post back to review.
pub async fn edit(
    state: &AppState,
    blog: &Blog,
    mut patch: BlogPatch,
    by_author: bool,
    expected_updated_at: Option<DateTime<Utc>>,
) -> Result<Blog> {
    if by_author
        && patch.status.is_none()
        && matches!(blog.status, BlogStatus::Approved | BlogStatus::Rejected)
    {
        patch.status = Some(BlogStatus::Pending);
    }

    blog_repo::update_blog(state.backend.as_ref(), blog.id, &patch, expected_updated_at).await
}
