use uuid::Uuid;

use crate::{
    backend::client::Backend,
    backend::query::{Direction, Query},
    error::Result,
    models::event::{Chapter, Event, EventPatch, NewEvent},
    repositories::table::Table,
};
use chrono::{DateTime, Utc};

pub const EVENTS: Table<Event> = Table::new("events").stamped();

/// Filters accepted by the public event listing.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub chapter: Option<Chapter>,
    pub featured_only: bool,
    pub limit: Option<usize>,
}

/// Lists events in date order.
pub async fn list_events(backend: &dyn Backend, filter: &EventFilter) -> Result<Vec<Event>> {
    let mut query = Query::new()
        .eq_opt("chapter", filter.chapter)
        .order_by("date", Direction::Asc)
        .limit_opt(filter.limit);

    if filter.featured_only {
        query = query.eq("featured", true);
    }

    EVENTS.list(backend, &query).await
}

pub async fn get_event(backend: &dyn Backend, id: Uuid) -> Result<Event> {
    EVENTS.get(backend, id).await
}

pub async fn create_event(backend: &dyn Backend, event: &NewEvent) -> Result<Event> {
    EVENTS.insert(backend, event).await
}

pub async fn update_event(
    backend: &dyn Backend,
    id: Uuid,
    patch: &EventPatch,
    expected_updated_at: Option<DateTime<Utc>>,
) -> Result<Event> {
    EVENTS.update(backend, id, patch, expected_updated_at).await
}

pub async fn delete_event(backend: &dyn Backend, id: Uuid) -> Result<()> {
    EVENTS.delete(backend, id).await
}
