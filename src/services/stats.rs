use serde::Serialize;

use crate::{
    backend::query::Query,
    error::Result,
    models::blog::BlogStatus,
    repositories::{
        blogs::BLOGS, contact::CONTACT_MESSAGES, events::EVENTS, research::RESEARCH,
        resources::RESOURCES, users::PROFILES,
    },
    state::AppState,
};

/// Record counts shown on the admin overview.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub events: u64,
    pub pending_blogs: u64,
    pub published_blogs: u64,
    pub resources: u64,
    pub research_publications: u64,
    pub contact_messages: u64,
    pub users: u64,
}

/// Counts every collection; the independent counts run concurrently.
pub async fn dashboard_stats(state: &AppState) -> Result<DashboardStats> {
    let backend = state.backend.as_ref();
    let all = Query::new();
    let pending = Query::new().eq("status", BlogStatus::Pending);
    let published = Query::new().eq("status", BlogStatus::Approved);

    let (events, pending_blogs, published_blogs, resources, research_publications, contact_messages, users) =
        tokio::try_join!(
            EVENTS.count(backend, &all),
            BLOGS.count(backend, &pending),
            BLOGS.count(backend, &published),
            RESOURCES.count(backend, &all),
            RESEARCH.count(backend, &all),
            CONTACT_MESSAGES.count(backend, &all),
            PROFILES.count(backend, &all),
        )?;

    Ok(DashboardStats {
        events,
        pending_blogs,
        published_blogs,
        resources,
        research_publications,
        contact_messages,
        users,
    })
}
