use std::fmt::Display;

/// The sort direction of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// A table query: equality filters, one sort column and an optional limit.
///
/// Values are kept in their textual form, which is what the backend's REST
/// dialect receives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filters: Vec<(String, String)>,
    pub order: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a query matching one row by ID.
    pub fn by_id(id: impl Display) -> Self {
        Self::new().eq("id", id)
    }

    /// Adds a `column = value` filter.
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    /// Adds a `column = value` filter when `value` is present.
    pub fn eq_opt<V: Display>(self, column: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.eq(column, value),
            None => self,
        }
    }

    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn limit_opt(self, limit: Option<usize>) -> Self {
        match limit {
            Some(limit) => self.limit(limit),
            None => self,
        }
    }

    /// Renders the query as REST query-string pairs (`col=eq.value`, `order=col.asc`, `limit=n`).
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|(column, value)| (column.clone(), format!("eq.{}", value)))
            .collect();

        if let Some((column, direction)) = &self.order {
            pairs.push(("order".to_string(), format!("{}.{}", column, direction.as_str())));
        }

        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }

        pairs
    }
}
