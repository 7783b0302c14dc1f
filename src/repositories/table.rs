use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::marker::PhantomData;
use uuid::Uuid;

use crate::{
    backend::client::{Backend, BackendError},
    backend::query::Query,
    error::{AppError, Result},
};

/// A typed view over one backend table keyed by `id`.
///
/// Only tables declared with `stamped()` have an `updated_at` column; updates
/// to them refresh it and may carry an optimistic concurrency check.
pub struct Table<T> {
    name: &'static str,
    stamped: bool,
    _row: PhantomData<fn() -> T>,
}

/// Decodes a backend row into a model.
pub fn decode<T: DeserializeOwned>(table: &str, row: Value) -> Result<T> {
    serde_json::from_value(row)
        .map_err(|e| AppError::Internal(format!("Malformed {} row: {}", table, e)))
}

/// Encodes a model into a JSON object for the backend.
pub fn encode<P: Serialize>(table: &str, value: &P) -> Result<serde_json::Map<String, Value>> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::Internal(format!("{} payload is not an object", table))),
        Err(e) => Err(AppError::Internal(format!("Encoding {} payload failed: {}", table, e))),
    }
}

/// Renders a timestamp the way it is serialized into rows.
fn timestamp_literal(ts: DateTime<Utc>) -> Result<String> {
    match serde_json::to_value(ts) {
        Ok(Value::String(literal)) => Ok(literal),
        _ => Err(AppError::Internal("Timestamp encoding failed".to_string())),
    }
}

impl<T: DeserializeOwned> Table<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            stamped: false,
            _row: PhantomData,
        }
    }

    /// Marks the table as carrying an `updated_at` column.
    pub const fn stamped(self) -> Self {
        Self {
            name: self.name,
            stamped: true,
            _row: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Lists the rows matching `query`.
    pub async fn list(&self, backend: &dyn Backend, query: &Query) -> Result<Vec<T>> {
        backend
            .select(self.name, query)
            .await?
            .into_iter()
            .map(|row| decode(self.name, row))
            .collect()
    }

    /// Finds the row with `id`, mapping the backend's "no rows" answer to `None`.
    pub async fn find(&self, backend: &dyn Backend, id: Uuid) -> Result<Option<T>> {
        match backend.select_one(self.name, &Query::by_id(id)).await {
            Ok(row) => decode(self.name, row).map(Some),
            Err(BackendError::NoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Gets the row with `id` or fails with `AppError::NotFound`.
    pub async fn get(&self, backend: &dyn Backend, id: Uuid) -> Result<T> {
        self.find(backend, id).await?.ok_or(AppError::NotFound)
    }

    /// Inserts a row; the backend generates the ID and timestamps.
    pub async fn insert<N: Serialize>(&self, backend: &dyn Backend, new: &N) -> Result<T> {
        let row = encode(self.name, new)?;
        let stored = backend.insert(self.name, Value::Object(row)).await?;
        decode(self.name, stored)
    }

    /// Updates the row with `id`.
    ///
    /// On a stamped table `updated_at` is refreshed, and with
    /// `expected_updated_at` the update only applies if the row was not
    /// modified since; otherwise it fails with `AppError::Conflict`. Unstamped
    /// tables ignore `expected_updated_at`.
    pub async fn update<P: Serialize>(
        &self,
        backend: &dyn Backend,
        id: Uuid,
        patch: &P,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> Result<T> {
        let expected_updated_at = expected_updated_at.filter(|_| self.stamped);

        let mut row = encode(self.name, patch)?;
        if self.stamped {
            row.insert("updated_at".to_string(), Value::String(timestamp_literal(Utc::now())?));
        }

        let mut query = Query::by_id(id);
        if let Some(expected) = expected_updated_at {
            query = query.eq("updated_at", timestamp_literal(expected)?);
        }

        let mut updated = backend.update(self.name, &query, Value::Object(row)).await?;
        if updated.is_empty() {
            if expected_updated_at.is_some() && self.find(backend, id).await?.is_some() {
                return Err(AppError::Conflict(format!(
                    "The {} record was modified by someone else",
                    self.name
                )));
            }
            return Err(AppError::NotFound);
        }

        decode(self.name, updated.swap_remove(0))
    }

    /// Deletes the row with `id`, failing with `AppError::NotFound` when absent.
    pub async fn delete(&self, backend: &dyn Backend, id: Uuid) -> Result<()> {
        let deleted = backend.delete(self.name, &Query::by_id(id)).await?;
        if deleted.is_empty() {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    pub async fn count(&self, backend: &dyn Backend, query: &Query) -> Result<u64> {
        Ok(backend.count(self.name, query).await?)
    }
}
