use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A caller's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Whether the role belongs to the privileged set (`admin`, `super_admin`).
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// A row of the `profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// The backend user ID.
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
}

/// A row of the `admins` table; its presence grants console access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRecord {
    /// The backend user ID.
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// The single authorization view of a caller, folded from both tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationRecord {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub display_name: String,
    pub role: Role,
    /// Whether an `admins` row exists; only such callers enter the console.
    #[serde(skip)]
    pub console_member: bool,
}

impl AuthorizationRecord {
    /// Folds a profile row and an admin row into one record.
    ///
    /// An admin row grants at least `admin` and console membership. Returns
    /// `None` when neither row exists.
    pub fn fold(profile: Option<Profile>, admin: Option<AdminRecord>) -> Option<Self> {
        let (user_id, profile_email, profile_name, profile_role) = match &profile {
            Some(p) => (Some(p.id), p.email.clone(), p.full_name.clone(), Some(p.role)),
            None => (None, None, None, None),
        };

        let user_id = user_id.or(admin.as_ref().map(|a| a.id))?;

        let role = match (profile_role, admin.is_some()) {
            (Some(role), true) => role.max(Role::Admin),
            (Some(role), false) => role,
            (None, true) => Role::Admin,
            (None, false) => return None,
        };

        let email = profile_email.or_else(|| admin.as_ref().and_then(|a| a.email.clone()));
        let display_name = profile_name
            .or_else(|| admin.as_ref().and_then(|a| a.full_name.clone()))
            .or_else(|| email.clone())
            .unwrap_or_else(|| "Member".to_string());

        Some(Self {
            user_id,
            email,
            display_name,
            role,
            console_member: admin.is_some(),
        })
    }
}
