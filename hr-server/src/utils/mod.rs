//! Utility module - common helpers and re-exported error types
//!
//! - [`AppError`] / [`ApiResponse`] - unified error/response types (from
//!   `shared::error`)
//! - [`logger`] - tracing setup
//! - [`time`] - date parsing helpers
//! - [`validation`] - input validation helpers

pub mod logger;
pub mod time;
pub mod validation;

// Re-export the unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
