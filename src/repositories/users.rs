use serde::Serialize;
use uuid::Uuid;

use crate::{
    backend::client::Backend,
    backend::query::{Direction, Query},
    error::{AppError, Result},
    models::session::Identity,
    models::user::{AdminRecord, AuthorizationRecord, Profile, Role},
    repositories::table::Table,
};

pub const PROFILES: Table<Profile> = Table::new("profiles");
pub const ADMINS: Table<AdminRecord> = Table::new("admins");

#[derive(Serialize)]
struct NewProfile<'a> {
    id: Uuid,
    email: Option<&'a str>,
    full_name: Option<&'a str>,
    role: Role,
}

#[derive(Serialize)]
struct NewAdmin<'a> {
    id: Uuid,
    email: Option<&'a str>,
    full_name: Option<&'a str>,
}

#[derive(Serialize)]
struct RolePatch {
    role: Role,
}

/// Resolves the unified authorization record for `identity`.
///
/// Both tables are read concurrently; see `AuthorizationRecord::fold` for how
/// they combine.
pub async fn authorization_record(
    backend: &dyn Backend,
    identity: &Identity,
) -> Result<Option<AuthorizationRecord>> {
    let (profile, admin) = tokio::try_join!(
        PROFILES.find(backend, identity.id),
        ADMINS.find(backend, identity.id),
    )?;

    let mut record = AuthorizationRecord::fold(profile, admin);
    if let Some(record) = record.as_mut() {
        if record.email.is_none() {
            record.email = identity.email.clone();
        }
    }

    Ok(record)
}

/// Creates the profile row of a newly registered user.
pub async fn create_profile(
    backend: &dyn Backend,
    identity: &Identity,
    full_name: Option<&str>,
) -> Result<Profile> {
    PROFILES
        .insert(
            backend,
            &NewProfile {
                id: identity.id,
                email: identity.email.as_deref(),
                full_name,
                role: Role::User,
            },
        )
        .await
}

/// Lists all profiles, newest first.
pub async fn list_profiles(backend: &dyn Backend) -> Result<Vec<Profile>> {
    let query = Query::new().order_by("created_at", Direction::Desc);
    PROFILES.list(backend, &query).await
}

/// Promotes a user to `admin` and makes sure the console table knows them.
///
/// A `super_admin` keeps its role.
pub async fn promote_to_admin(backend: &dyn Backend, user_id: Uuid) -> Result<Profile> {
    let profile = PROFILES.find(backend, user_id).await?.ok_or(AppError::NotFound)?;

    let profile = if profile.role == Role::User {
        PROFILES
            .update(backend, user_id, &RolePatch { role: Role::Admin }, None)
            .await?
    } else {
        profile
    };

    if ADMINS.find(backend, user_id).await?.is_none() {
        ADMINS
            .insert(
                backend,
                &NewAdmin {
                    id: user_id,
                    email: profile.email.as_deref(),
                    full_name: profile.full_name.as_deref(),
                },
            )
            .await?;
        tracing::info!("✅ Admin row created for user: {}", user_id);
    }

    Ok(profile)
}
