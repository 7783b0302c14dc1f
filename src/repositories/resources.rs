use uuid::Uuid;
use chrono::{DateTime, Utc};

use crate::{
    backend::client::Backend,
    backend::query::{Direction, Query},
    error::Result,
    models::resource::{NewResource, Resource, ResourcePatch},
    repositories::table::Table,
};

pub const RESOURCES: Table<Resource> = Table::new("resources").stamped();

pub async fn list_resources(backend: &dyn Backend, category: Option<&str>) -> Result<Vec<Resource>> {
    let query = Query::new()
        .eq_opt("category", category)
        .order_by("created_at", Direction::Desc);

    RESOURCES.list(backend, &query).await
}

pub async fn get_resource(backend: &dyn Backend, id: Uuid) -> Result<Resource> {
    RESOURCES.get(backend, id).await
}

pub async fn create_resource(backend: &dyn Backend, resource: &NewResource) -> Result<Resource> {
    RESOURCES.insert(backend, resource).await
}

pub async fn update_resource(
    backend: &dyn Backend,
    id: Uuid,
    patch: &ResourcePatch,
    expected_updated_at: Option<DateTime<Utc>>,
) -> Result<Resource> {
    RESOURCES.update(backend, id, patch, expected_updated_at).await
}

pub async fn delete_resource(backend: &dyn Backend, id: Uuid) -> Result<()> {
    RESOURCES.delete(backend, id).await
}
