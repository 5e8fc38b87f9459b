//! Vacation Request Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Vacation request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum VacationStatus {
    Pending,
    Approved,
    Rejected,
    InProgress,
    Completed,
}

impl VacationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Only pending requests can still be decided.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Vacation request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VacationRequest {
    pub id: i64,
    pub employee_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Inclusive day count, derived from the date range at validation time.
    pub requested_days: i64,
    pub reason: Option<String>,
    pub status: VacationStatus,
    pub approved_by: Option<i64>,
    pub approved_at: Option<i64>,
    pub approval_comment: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create vacation request payload
///
/// `requested_days` is accepted for form compatibility but always
/// recomputed from the date range server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacationCreate {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub requested_days: Option<i64>,
    pub reason: Option<String>,
}

/// Approve/reject payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VacationDecision {
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_is_decidable() {
        assert!(VacationStatus::Pending.is_pending());
        assert!(!VacationStatus::Approved.is_pending());
        assert!(!VacationStatus::Rejected.is_pending());
        assert!(!VacationStatus::InProgress.is_pending());
        assert!(!VacationStatus::Completed.is_pending());
    }

    #[test]
    fn status_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&VacationStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::from_str::<VacationStatus>("\"completed\"").unwrap(),
            VacationStatus::Completed
        );
    }
}
