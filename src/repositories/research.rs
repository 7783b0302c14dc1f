use uuid::Uuid;
use chrono::{DateTime, Utc};

use crate::{
    backend::client::Backend,
    backend::query::{Direction, Query},
    error::Result,
    models::research::{NewResearchPublication, ResearchPublication, ResearchPublicationPatch},
    repositories::table::Table,
};

pub const RESEARCH: Table<ResearchPublication> = Table::new("research_publications").stamped();

/// Lists publications, most recent first.
pub async fn list_publications(backend: &dyn Backend) -> Result<Vec<ResearchPublication>> {
    let query = Query::new().order_by("publication_date", Direction::Desc);
    RESEARCH.list(backend, &query).await
}

pub async fn get_publication(backend: &dyn Backend, id: Uuid) -> Result<ResearchPublication> {
    RESEARCH.get(backend, id).await
}

pub async fn create_publication(
    backend: &dyn Backend,
    publication: &NewResearchPublication,
) -> Result<ResearchPublication> {
    RESEARCH.insert(backend, publication).await
}

pub async fn update_publication(
    backend: &dyn Backend,
    id: Uuid,
    patch: &ResearchPublicationPatch,
    expected_updated_at: Option<DateTime<Utc>>,
) -> Result<ResearchPublication> {
    RESEARCH.update(backend, id, patch, expected_updated_at).await
}

pub async fn delete_publication(backend: &dyn Backend, id: Uuid) -> Result<()> {
    RESEARCH.delete(backend, id).await
}
