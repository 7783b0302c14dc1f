use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The chapter an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chapter {
    #[serde(rename = "US")]
    Us,
    Bangladesh,
}

impl Chapter {
    pub fn as_str(self) -> &'static str {
        match self {
            Chapter::Us => "US",
            Chapter::Bangladesh => "Bangladesh",
        }
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chapter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "US" => Ok(Chapter::Us),
            "Bangladesh" => Ok(Chapter::Bangladesh),
            other => Err(format!("Invalid chapter: {}. Must be US or Bangladesh", other)),
        }
    }
}

/// Represents an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// The unique identifier for the event.
    pub id: Uuid,
    /// The title of the event.
    pub title: String,
    /// The description of the event.
    pub description: Option<String>,
    /// The date of the event (ISO date).
    pub date: String,
    /// The start time of the event, free-form.
    pub time: Option<String>,
    /// Where the event takes place.
    pub location: Option<String>,
    /// The chapter hosting the event.
    pub chapter: Chapter,
    /// The cover image of the event.
    pub image_url: Option<String>,
    /// Where attendees register.
    pub registration_url: Option<String>,
    /// Whether the event is featured on the home page.
    #[serde(default)]
    pub featured: bool,
    /// The timestamp when the event was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the event was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The columns written when an event is created.
#[derive(Debug, Clone, Serialize)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub time: Option<String>,
    pub location: Option<String>,
    pub chapter: Chapter,
    pub image_url: Option<String>,
    pub registration_url: Option<String>,
    pub featured: bool,
}

/// The columns written when an event is updated; absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<Chapter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}
