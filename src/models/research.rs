use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a research publication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchPublication {
    /// The unique identifier for the publication.
    pub id: Uuid,
    /// The title of the publication.
    pub title: String,
    /// The authors, as printed.
    pub authors: String,
    /// The abstract.
    #[serde(rename = "abstract")]
    pub summary: Option<String>,
    /// The publication date (ISO date).
    pub publication_date: Option<String>,
    /// The uploaded PDF, if any.
    pub pdf_url: Option<String>,
    /// An external link, if any.
    pub link_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewResearchPublication {
    pub title: String,
    pub authors: String,
    #[serde(rename = "abstract")]
    pub summary: Option<String>,
    pub publication_date: Option<String>,
    pub pdf_url: Option<String>,
    pub link_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResearchPublicationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
}
