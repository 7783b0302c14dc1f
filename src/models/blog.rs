use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The review status of a blog post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlogStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl BlogStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BlogStatus::Draft => "draft",
            BlogStatus::Pending => "pending",
            BlogStatus::Approved => "approved",
            BlogStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(BlogStatus::Draft),
            "pending" => Ok(BlogStatus::Pending),
            "approved" => Ok(BlogStatus::Approved),
            "rejected" => Ok(BlogStatus::Rejected),
            other => Err(format!("Invalid status: {}", other)),
        }
    }
}

/// Represents a blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub excerpt: Option<String>,
    /// The post body as a JSON block document.
    pub content: Value,
    pub cover_image: Option<String>,
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub status: BlogStatus,
    pub rejection_reason: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    /// Whether `user_id` wrote this post.
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

/// The columns written when a post is submitted.
#[derive(Debug, Clone, Serialize)]
pub struct NewBlog {
    pub title: String,
    pub excerpt: Option<String>,
    pub content: Value,
    pub cover_image: Option<String>,
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub status: BlogStatus,
}

/// The columns written when a post is edited.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlogPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BlogStatus>,
}
