use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    backend::client::Backend,
    backend::query::{Direction, Query},
    error::Result,
    models::blog::{Blog, BlogPatch, BlogStatus, NewBlog},
    repositories::table::Table,
};

pub const BLOGS: Table<Blog> = Table::new("blogs").stamped();

/// Lists approved posts, newest first.
pub async fn list_published(backend: &dyn Backend, limit: Option<usize>) -> Result<Vec<Blog>> {
    let query = Query::new()
        .eq("status", BlogStatus::Approved)
        .order_by("published_at", Direction::Desc)
        .limit_opt(limit);

    BLOGS.list(backend, &query).await
}

/// Lists every post, optionally restricted to one status, newest first.
pub async fn list_all(backend: &dyn Backend, status: Option<BlogStatus>) -> Result<Vec<Blog>> {
    let query = Query::new()
        .eq_opt("status", status)
        .order_by("created_at", Direction::Desc);

    BLOGS.list(backend, &query).await
}

pub async fn find_blog(backend: &dyn Backend, id: Uuid) -> Result<Option<Blog>> {
    BLOGS.find(backend, id).await
}

pub async fn create_blog(backend: &dyn Backend, blog: &NewBlog) -> Result<Blog> {
    BLOGS.insert(backend, blog).await
}

pub async fn update_blog(
    backend: &dyn Backend,
    id: Uuid,
    patch: &BlogPatch,
    expected_updated_at: Option<DateTime<Utc>>,
) -> Result<Blog> {
    BLOGS.update(backend, id, patch, expected_updated_at).await
}

/// Writes a review decision computed by the status table.
pub async fn apply_review(backend: &dyn Backend, id: Uuid, patch: &Value) -> Result<Blog> {
    BLOGS.update(backend, id, patch, None).await
}

pub async fn delete_blog(backend: &dyn Backend, id: Uuid) -> Result<()> {
    BLOGS.delete(backend, id).await
}
