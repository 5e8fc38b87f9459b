//! HR Records Server
//!
//! JSON API server for employee records: technician profiles, vacation
//! requests, document attachments and specialty tags, with a linked login
//! identity per profile.
//!
//! # Module structure
//!
//! ```text
//! hr-server/src/
//! ├── core/          # configuration, state, server
//! ├── auth/          # JWT authentication, argon2 credentials
//! ├── services/      # identity sync, file storage
//! ├── api/           # HTTP routes and handlers
//! ├── leave/         # vacation-day accounting rules
//! ├── utils/         # logger, validation, date helpers
//! └── db/            # SQLite pool + repositories
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod leave;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{AppState, Config, Server};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and initialize logging.
pub fn setup_environment() {
    let _ = dotenv::dotenv();
    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), None);
}
