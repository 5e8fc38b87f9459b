//! Authentication module
//!
//! JWT authentication and authorization:
//! - [`JwtService`] - token service
//! - [`CurrentUser`] - current user context
//! - [`require_auth`] - authentication middleware
//! - [`require_admin`] - admin-only middleware
//! - [`credential`] - argon2 password hashing

pub mod credential;
pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
