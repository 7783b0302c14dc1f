//! The single source of authorization decisions.
//!
//! The session gate, the page guards and the privileged API middleware all
//! ask this module; none of them look at the role tables directly.

use serde::Serialize;

use crate::{
    backend::client::Backend,
    error::Result,
    models::session::Identity,
    models::user::AuthorizationRecord,
    repositories::users as user_repo,
};

/// What a caller must hold to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any authorization record.
    Member,
    /// A role in the privileged set.
    Privileged,
    /// A row in the `admins` table.
    ConsoleMember,
}

/// The outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed(AuthorizationRecord),
    DeniedUnauthenticated,
    DeniedInsufficientRole,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed(_))
    }
}

/// Decides whether `record` satisfies `requirement`.
pub fn decide(record: Option<AuthorizationRecord>, requirement: Requirement) -> Decision {
    match (record, requirement) {
        (None, _) => Decision::DeniedInsufficientRole,
        (Some(record), Requirement::Member) => Decision::Allowed(record),
        (Some(record), Requirement::Privileged) if record.role.is_privileged() => {
            Decision::Allowed(record)
        }
        (Some(record), Requirement::ConsoleMember) if record.console_member => {
            Decision::Allowed(record)
        }
        (Some(_), Requirement::Privileged | Requirement::ConsoleMember) => {
            Decision::DeniedInsufficientRole
        }
    }
}

/// Authorizes `caller` against `requirement`.
///
/// # Arguments
///
/// * `backend` - The backend holding the role tables.
/// * `caller` - The resolved caller, if any.
/// * `requirement` - What the caller must hold.
///
/// # Returns
///
/// A `Result` containing the `Decision`. Lookup failures are errors; callers
/// that must fail closed treat them as a denial.
pub async fn authorize(
    backend: &dyn Backend,
    caller: Option<&Identity>,
    requirement: Requirement,
) -> Result<Decision> {
    let Some(identity) = caller else {
        return Ok(Decision::DeniedUnauthenticated);
    };

    let record = user_repo::authorization_record(backend, identity).await?;
    let decision = decide(record, requirement);

    if !decision.is_allowed() {
        tracing::debug!("🚫 {:?} denied for user {}: {:?}", requirement, identity.id, decision);
    }

    Ok(decision)
}

/// The guarded page areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    /// The end-user dashboard.
    Dashboard,
    /// The admin section inside the dashboard.
    DashboardAdmin,
    /// The stand-alone admin console.
    AdminConsole,
}

/// What a page guard does with a caller it turns away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Redirect to the given path.
    Redirect(&'static str),
    /// Sign the session out, then redirect to the given path.
    SignOutAndRedirect(&'static str),
}

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const HOME_PATH: &str = "/";

impl Area {
    pub fn requirement(self) -> Requirement {
        match self {
            Area::Dashboard => Requirement::Member,
            Area::DashboardAdmin => Requirement::Privileged,
            Area::AdminConsole => Requirement::ConsoleMember,
        }
    }

    /// The fallback for a signed-in caller who does not satisfy the area.
    ///
    /// The console is stricter than the dashboard: it ends the session.
    pub fn on_insufficient_role(self) -> Denial {
        match self {
            Area::Dashboard => Denial::Redirect(HOME_PATH),
            Area::DashboardAdmin => Denial::Redirect(DASHBOARD_PATH),
            Area::AdminConsole => Denial::SignOutAndRedirect(LOGIN_PATH),
        }
    }
}
