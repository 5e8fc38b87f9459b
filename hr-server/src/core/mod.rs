//! Core module - server configuration, state and startup
//!
//! - [`Config`] - server configuration
//! - [`AppState`] - shared application state
//! - [`Server`] - HTTP server

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::{Server, build_app, build_router};
pub use state::AppState;
