//! Unified error codes for the HR records service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Employee/identity errors
//! - 4xxx: Vacation errors
//! - 5xxx: Document/file errors
//! - 6xxx: Specialty errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,
    /// Credential is unusable and must be reset before login
    CredentialResetRequired = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Administrator role required
    AdminRequired = 2002,

    // ==================== 3xxx: Employee / Identity ====================
    /// Employee profile not found
    EmployeeNotFound = 3001,
    /// Employee code already exists
    EmployeeCodeExists = 3002,
    /// National ID already registered
    NationalIdExists = 3003,
    /// Identity record not found
    IdentityNotFound = 3101,
    /// Username already exists
    UsernameExists = 3102,

    // ==================== 4xxx: Vacation ====================
    /// Vacation request not found
    VacationNotFound = 4001,
    /// Vacation request has already been decided
    VacationAlreadyDecided = 4002,
    /// End date must be strictly after start date
    InvalidDateRange = 4003,
    /// Start and end dates are required
    DatesRequired = 4004,
    /// Unknown approve/reject action
    InvalidAction = 4005,

    // ==================== 5xxx: Document / File ====================
    /// Document not found
    DocumentNotFound = 5001,
    /// File too large
    FileTooLarge = 5101,
    /// Unsupported file format
    UnsupportedFileFormat = 5102,
    /// No file provided in request
    NoFileProvided = 5103,
    /// Empty file provided
    EmptyFile = 5104,
    /// No filename provided
    NoFilename = 5105,
    /// Invalid file extension
    InvalidFileExtension = 5106,
    /// Invalid/corrupted image file
    InvalidImageFile = 5107,
    /// Image processing failed
    ImageProcessingFailed = 5108,
    /// File storage failed
    FileStorageFailed = 5109,

    // ==================== 6xxx: Specialty ====================
    /// Specialty not found
    SpecialtyNotFound = 6001,
    /// Specialty name already exists
    SpecialtyNameExists = 6002,
    /// Specialty is attached to employee profiles
    SpecialtyInUse = 6003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::CredentialResetRequired => "Password must be reset before logging in",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Employee / identity
            ErrorCode::EmployeeNotFound => "Employee profile not found",
            ErrorCode::EmployeeCodeExists => "Employee code already exists",
            ErrorCode::NationalIdExists => "National ID is already registered",
            ErrorCode::IdentityNotFound => "Identity record not found",
            ErrorCode::UsernameExists => "Username already exists",

            // Vacation
            ErrorCode::VacationNotFound => "Vacation request not found",
            ErrorCode::VacationAlreadyDecided => "Vacation request has already been processed",
            ErrorCode::InvalidDateRange => "End date must be after start date",
            ErrorCode::DatesRequired => "Start and end dates are required",
            ErrorCode::InvalidAction => "Unknown action",

            // Document / file
            ErrorCode::DocumentNotFound => "Document not found",
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::InvalidFileExtension => "Invalid file extension",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "File storage failed",

            // Specialty
            ErrorCode::SpecialtyNotFound => "Specialty not found",
            ErrorCode::SpecialtyNameExists => "Specialty name already exists",
            ErrorCode::SpecialtyInUse => "Specialty is attached to employee profiles",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),
            1006 => Ok(ErrorCode::CredentialResetRequired),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),

            // Employee / identity
            3001 => Ok(ErrorCode::EmployeeNotFound),
            3002 => Ok(ErrorCode::EmployeeCodeExists),
            3003 => Ok(ErrorCode::NationalIdExists),
            3101 => Ok(ErrorCode::IdentityNotFound),
            3102 => Ok(ErrorCode::UsernameExists),

            // Vacation
            4001 => Ok(ErrorCode::VacationNotFound),
            4002 => Ok(ErrorCode::VacationAlreadyDecided),
            4003 => Ok(ErrorCode::InvalidDateRange),
            4004 => Ok(ErrorCode::DatesRequired),
            4005 => Ok(ErrorCode::InvalidAction),

            // Document / file
            5001 => Ok(ErrorCode::DocumentNotFound),
            5101 => Ok(ErrorCode::FileTooLarge),
            5102 => Ok(ErrorCode::UnsupportedFileFormat),
            5103 => Ok(ErrorCode::NoFileProvided),
            5104 => Ok(ErrorCode::EmptyFile),
            5105 => Ok(ErrorCode::NoFilename),
            5106 => Ok(ErrorCode::InvalidFileExtension),
            5107 => Ok(ErrorCode::InvalidImageFile),
            5108 => Ok(ErrorCode::ImageProcessingFailed),
            5109 => Ok(ErrorCode::FileStorageFailed),

            // Specialty
            6001 => Ok(ErrorCode::SpecialtyNotFound),
            6002 => Ok(ErrorCode::SpecialtyNameExists),
            6003 => Ok(ErrorCode::SpecialtyInUse),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            other => Err(InvalidErrorCode(other)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::NotAuthenticated,
            ErrorCode::EmployeeNotFound,
            ErrorCode::VacationAlreadyDecided,
            ErrorCode::SpecialtyNameExists,
            ErrorCode::DatabaseError,
        ];
        for code in codes {
            let value: u16 = code.into();
            assert_eq!(ErrorCode::try_from(value), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(7777), Err(InvalidErrorCode(7777)));
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::EmployeeNotFound).unwrap();
        assert_eq!(json, "3001");
        let back: ErrorCode = serde_json::from_str("3001").unwrap();
        assert_eq!(back, ErrorCode::EmployeeNotFound);
    }
}
