use crate::{
    backend::client::Backend,
    backend::query::{Direction, Query},
    error::Result,
    models::contact::{ContactMessage, NewContactMessage},
    repositories::table::Table,
};

pub const CONTACT_MESSAGES: Table<ContactMessage> = Table::new("contact_messages");

pub async fn create_message(backend: &dyn Backend, message: &NewContactMessage) -> Result<ContactMessage> {
    CONTACT_MESSAGES.insert(backend, message).await
}

/// Lists messages, newest first.
pub async fn list_messages(backend: &dyn Backend) -> Result<Vec<ContactMessage>> {
    let query = Query::new().order_by("created_at", Direction::Desc);
    CONTACT_MESSAGES.list(backend, &query).await
}
