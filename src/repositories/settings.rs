use crate::{
    backend::client::Backend,
    backend::query::Query,
    error::Result,
    models::settings::{SiteSettings, SiteSettingsPatch},
    repositories::table::{Table, decode},
};

pub const SITE_SETTINGS: Table<SiteSettings> = Table::new("site_settings").stamped();

/// Reads the settings row, falling back to empty defaults before the first save.
pub async fn get_settings(backend: &dyn Backend) -> Result<SiteSettings> {
    let mut rows = backend
        .select(SITE_SETTINGS.name(), &Query::new().limit(1))
        .await?;

    match rows.pop() {
        Some(row) => decode(SITE_SETTINGS.name(), row),
        None => Ok(SiteSettings::default()),
    }
}

/// Applies `patch` to the settings row, creating it on first save.
pub async fn save_settings(backend: &dyn Backend, patch: &SiteSettingsPatch) -> Result<SiteSettings> {
    let current = get_settings(backend).await?;

    match current.id {
        Some(id) => SITE_SETTINGS.update(backend, id, patch, None).await,
        None => {
            tracing::info!("📝 Creating site settings row");
            SITE_SETTINGS.insert(backend, patch).await
        }
    }
}
