//! Identity synchronization service
//!
//! Explicit, caller-invoked profile→identity sync. Callers opt in (employee
//! create/update handlers) and must handle the returned result; nothing here
//! runs as an implicit save hook.
//!
//! - Profile with a linked identity: fill the identity's name/email fields
//!   only where they are empty, and force the credential unusable (the
//!   employee must reset their password after HR edits).
//! - Profile without an identity but with an email: derive a username from
//!   the email local part, disambiguate with `_1`, `_2`, ... suffixes,
//!   create the identity with an unusable credential, and link it.

use sqlx::SqliteConnection;

use crate::db::repository::{RepoResult, employee, identity};
use shared::models::{EmployeeProfile, Identity, IdentityCreate};

/// What the sync did, for the caller to act on.
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    /// Existing identity updated; credential forced unusable.
    Updated(Identity),
    /// New identity created from the profile's email and linked.
    Created(Identity),
    /// Profile has no identity and no email; nothing to sync.
    Skipped,
}

/// Username base derived from an email's local part.
pub fn username_base(email: &str) -> Option<&str> {
    match email.split('@').next() {
        Some("") | None => None,
        Some(local) => Some(local),
    }
}

/// Find a free username: `base`, then `base_1`, `base_2`, ...
pub async fn unique_username(conn: &mut SqliteConnection, base: &str) -> RepoResult<String> {
    if !identity::username_exists(&mut *conn, base).await? {
        return Ok(base.to_string());
    }
    let mut counter = 1u32;
    loop {
        let candidate = format!("{base}_{counter}");
        if !identity::username_exists(&mut *conn, &candidate).await? {
            return Ok(candidate);
        }
        counter += 1;
    }
}

/// Synchronize a profile's name/email onto its identity record, creating
/// and linking one when missing.
///
/// One-way and best-effort by contract: the caller decides whether to run
/// this inside the surrounding transaction and what to do on failure.
pub async fn sync_profile_identity(
    conn: &mut SqliteConnection,
    profile: &EmployeeProfile,
) -> RepoResult<SyncOutcome> {
    if let Some(identity_id) = profile.identity_id {
        let updated = identity::apply_profile_sync(
            &mut *conn,
            identity_id,
            &profile.first_name,
            &profile.last_name,
            &profile.email,
        )
        .await?;
        tracing::debug!(
            identity_id,
            employee_id = profile.id,
            "Synced profile fields onto linked identity"
        );
        return Ok(SyncOutcome::Updated(updated));
    }

    let Some(base) = username_base(&profile.email) else {
        return Ok(SyncOutcome::Skipped);
    };

    let username = unique_username(&mut *conn, base).await?;
    let created = identity::create(
        &mut *conn,
        IdentityCreate {
            username,
            email: profile.email.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            // No password: the account starts with an unusable credential
            password: None,
        },
    )
    .await?;

    employee::link_identity(&mut *conn, profile.id, created.id).await?;
    tracing::info!(
        identity_id = created.id,
        employee_id = profile.id,
        username = %created.username,
        "Created identity for profile"
    );

    Ok(SyncOutcome::Created(created))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_base_takes_email_local_part() {
        assert_eq!(username_base("jdoe@example.com"), Some("jdoe"));
        assert_eq!(username_base("ana.rojas@corp.cl"), Some("ana.rojas"));
        assert_eq!(username_base(""), None);
        assert_eq!(username_base("@example.com"), None);
    }
}
