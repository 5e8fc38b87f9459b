//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`auth`] - login and current-identity endpoints
//! - [`employees`] - employee profile management
//! - [`specialties`] - specialty tag management
//! - [`vacations`] - vacation ledger endpoints
//! - [`documents`] - document attachment endpoints

pub mod auth;
pub mod documents;
pub mod employees;
pub mod health;
pub mod specialties;
pub mod vacations;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};
