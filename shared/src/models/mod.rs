//! Data models
//!
//! Shared between hr-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix
//! millis, calendar dates are `chrono::NaiveDate` stored as ISO-8601 TEXT.

pub mod document;
pub mod employee;
pub mod identity;
pub mod specialty;
pub mod vacation;

// Re-exports
pub use document::*;
pub use employee::*;
pub use identity::*;
pub use specialty::*;
pub use vacation::*;
