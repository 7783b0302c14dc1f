use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The site-wide settings row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteSettings {
    /// `None` until the row is first saved.
    pub id: Option<Uuid>,
    pub site_name: Option<String>,
    pub tagline: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    /// Network name to profile URL.
    #[serde(default)]
    pub social_links: Option<Map<String, Value>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// The columns written when settings are saved; absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteSettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<Map<String, Value>>,
}
