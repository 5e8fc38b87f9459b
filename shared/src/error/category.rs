//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Employee/identity errors
/// - 4xxx: Vacation errors
/// - 5xxx: Document/file errors
/// - 6xxx: Specialty errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Employee/identity errors (3xxx)
    Employee,
    /// Vacation errors (4xxx)
    Vacation,
    /// Document/file errors (5xxx)
    Document,
    /// Specialty errors (6xxx)
    Specialty,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Employee,
            4000..5000 => Self::Vacation,
            5000..6000 => Self::Document,
            6000..7000 => Self::Specialty,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Employee => "employee",
            Self::Vacation => "vacation",
            Self::Document => "document",
            Self::Specialty => "specialty",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ranges() {
        assert_eq!(ErrorCode::ValidationFailed.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::InvalidCredentials.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::PermissionDenied.category(), ErrorCategory::Permission);
        assert_eq!(ErrorCode::EmployeeNotFound.category(), ErrorCategory::Employee);
        assert_eq!(ErrorCode::VacationAlreadyDecided.category(), ErrorCategory::Vacation);
        assert_eq!(ErrorCode::DocumentNotFound.category(), ErrorCategory::Document);
        assert_eq!(ErrorCode::SpecialtyInUse.category(), ErrorCategory::Specialty);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }
}
