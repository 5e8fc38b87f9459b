//! Identity Model
//!
//! The login account optionally linked to an employee profile. The HR core
//! only reads/writes these fields; credential policy is hash/verify plus the
//! "unusable credential" marker (a NULL password hash).

use serde::{Deserialize, Serialize};

/// Identity entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// `None` marks an unusable credential: the account exists but cannot
    /// log in until a password is set.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Identity {
    /// Whether this identity's credential is unusable (must be reset).
    pub fn has_unusable_credential(&self) -> bool {
        self.password_hash.as_deref().is_none_or(str::is_empty)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Create identity payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityCreate {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// `None` creates the account with an unusable credential.
    pub password: Option<String>,
}

/// Identity response (without credential material)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub is_active: bool,
}

impl From<Identity> for IdentityResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username,
            email: identity.email,
            first_name: identity.first_name,
            last_name: identity.last_name,
            is_admin: identity.is_admin,
            is_active: identity.is_active,
        }
    }
}
