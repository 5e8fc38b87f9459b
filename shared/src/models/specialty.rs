//! Specialty Model

use serde::{Deserialize, Serialize};

/// Specialty entity (capability tag attachable to employee profiles)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Specialty {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Create specialty payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialtyCreate {
    pub name: String,
    pub description: Option<String>,
}

/// Update specialty payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialtyUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
