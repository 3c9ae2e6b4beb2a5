//! Unified error codes for the EMS backend
//!
//! This module defines all error codes used across the server and any
//! future clients. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Employee and profile errors
//! - 4xxx: Attendance errors
//! - 5xxx: Leave errors
//! - 6xxx: Salary errors
//! - 7xxx: File upload errors
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
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,
    /// Account has been deactivated
    AccountDisabled = 1006,
    /// Email address has not been verified yet
    EmailNotVerified = 1007,
    /// Submitted verification code does not match
    VerificationCodeInvalid = 1008,
    /// Verification code has expired
    VerificationCodeExpired = 1009,
    /// Email address is already verified
    EmailAlreadyVerified = 1010,
    /// Password does not meet complexity requirements
    PasswordTooWeak = 1011,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 3001,
    /// Employee code already exists
    EmployeeCodeExists = 3002,
    /// Email address already registered
    EmailExists = 3003,
    /// Employee account is inactive
    EmployeeInactive = 3004,
    /// Employee document not found
    DocumentNotFound = 3101,
    /// Company not found
    CompanyNotFound = 3201,

    // ==================== 4xxx: Attendance ====================
    /// Attendance record not found
    AttendanceNotFound = 4001,
    /// Already checked in for the day
    AlreadyCheckedIn = 4002,
    /// Already checked out for the day
    AlreadyCheckedOut = 4003,
    /// No check-in exists for the day
    NotCheckedIn = 4004,
    /// Attendance already marked for the date
    AttendanceAlreadyMarked = 4005,
    /// Invalid date range
    InvalidDateRange = 4006,

    // ==================== 5xxx: Leave ====================
    /// Leave request not found
    LeaveRequestNotFound = 5001,
    /// Leave type not found
    LeaveTypeNotFound = 5002,
    /// Not enough remaining balance for the leave type
    InsufficientLeaveBalance = 5003,
    /// Dates overlap an existing leave request
    LeaveDatesOverlap = 5004,
    /// Leave request has already been approved or rejected
    LeaveAlreadyProcessed = 5005,
    /// Leave request is not pending
    LeaveNotPending = 5006,
    /// Leave dates are invalid
    InvalidLeaveDates = 5007,
    /// Leave type name already exists
    LeaveTypeNameExists = 5101,

    // ==================== 6xxx: Salary ====================
    /// Salary amount is invalid
    SalaryInvalidAmount = 6001,

    // ==================== 7xxx: File Upload ====================
    /// File too large
    FileTooLarge = 7001,
    /// Unsupported file format
    UnsupportedFileFormat = 7002,
    /// Invalid/corrupted image file
    InvalidImageFile = 7003,
    /// No file provided in request
    NoFileProvided = 7004,
    /// Empty file provided
    EmptyFile = 7005,
    /// No filename provided
    NoFilename = 7006,
    /// File storage failed
    FileStorageFailed = 7007,
    /// Stored file not found
    FileNotFound = 7008,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Email delivery failed
    EmailSendFailed = 9006,
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
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::AccountDisabled => {
                "Your account has been deactivated. Please contact HR."
            }
            ErrorCode::EmailNotVerified => "Please verify your email before logging in",
            ErrorCode::VerificationCodeInvalid => "Invalid verification code",
            ErrorCode::VerificationCodeExpired => "Verification code has expired",
            ErrorCode::EmailAlreadyVerified => "Email is already verified",
            ErrorCode::PasswordTooWeak => {
                "Password must be at least 8 characters and include uppercase, lowercase, number and special character"
            }

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeCodeExists => "Employee code already exists",
            ErrorCode::EmailExists => "Email address already registered",
            ErrorCode::EmployeeInactive => "Employee account is inactive",
            ErrorCode::DocumentNotFound => "Document not found",
            ErrorCode::CompanyNotFound => "Company not found",

            // Attendance
            ErrorCode::AttendanceNotFound => "Attendance record not found",
            ErrorCode::AlreadyCheckedIn => "Already checked in for today",
            ErrorCode::AlreadyCheckedOut => "Already checked out for today",
            ErrorCode::NotCheckedIn => "No check-in found for today",
            ErrorCode::AttendanceAlreadyMarked => "Attendance already marked for this date",
            ErrorCode::InvalidDateRange => "Invalid date range",

            // Leave
            ErrorCode::LeaveRequestNotFound => "Leave request not found",
            ErrorCode::LeaveTypeNotFound => "Leave type not found",
            ErrorCode::InsufficientLeaveBalance => "Insufficient leave balance",
            ErrorCode::LeaveDatesOverlap => "You already have a leave request for these dates",
            ErrorCode::LeaveAlreadyProcessed => "Leave request has already been processed",
            ErrorCode::LeaveNotPending => "Only pending leave requests can be cancelled",
            ErrorCode::InvalidLeaveDates => "End date cannot be before start date",
            ErrorCode::LeaveTypeNameExists => "Leave type name already exists",

            // Salary
            ErrorCode::SalaryInvalidAmount => "Salary amount must be a non-negative number",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::FileStorageFailed => "File storage failed",
            ErrorCode::FileNotFound => "Stored file not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::EmailSendFailed => "Failed to send email",
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
            1005 => Ok(ErrorCode::SessionExpired),
            1006 => Ok(ErrorCode::AccountDisabled),
            1007 => Ok(ErrorCode::EmailNotVerified),
            1008 => Ok(ErrorCode::VerificationCodeInvalid),
            1009 => Ok(ErrorCode::VerificationCodeExpired),
            1010 => Ok(ErrorCode::EmailAlreadyVerified),
            1011 => Ok(ErrorCode::PasswordTooWeak),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),

            // Employee
            3001 => Ok(ErrorCode::EmployeeNotFound),
            3002 => Ok(ErrorCode::EmployeeCodeExists),
            3003 => Ok(ErrorCode::EmailExists),
            3004 => Ok(ErrorCode::EmployeeInactive),
            3101 => Ok(ErrorCode::DocumentNotFound),
            3201 => Ok(ErrorCode::CompanyNotFound),

            // Attendance
            4001 => Ok(ErrorCode::AttendanceNotFound),
            4002 => Ok(ErrorCode::AlreadyCheckedIn),
            4003 => Ok(ErrorCode::AlreadyCheckedOut),
            4004 => Ok(ErrorCode::NotCheckedIn),
            4005 => Ok(ErrorCode::AttendanceAlreadyMarked),
            4006 => Ok(ErrorCode::InvalidDateRange),

            // Leave
            5001 => Ok(ErrorCode::LeaveRequestNotFound),
            5002 => Ok(ErrorCode::LeaveTypeNotFound),
            5003 => Ok(ErrorCode::InsufficientLeaveBalance),
            5004 => Ok(ErrorCode::LeaveDatesOverlap),
            5005 => Ok(ErrorCode::LeaveAlreadyProcessed),
            5006 => Ok(ErrorCode::LeaveNotPending),
            5007 => Ok(ErrorCode::InvalidLeaveDates),
            5101 => Ok(ErrorCode::LeaveTypeNameExists),

            // Salary
            6001 => Ok(ErrorCode::SalaryInvalidAmount),

            // File Upload
            7001 => Ok(ErrorCode::FileTooLarge),
            7002 => Ok(ErrorCode::UnsupportedFileFormat),
            7003 => Ok(ErrorCode::InvalidImageFile),
            7004 => Ok(ErrorCode::NoFileProvided),
            7005 => Ok(ErrorCode::EmptyFile),
            7006 => Ok(ErrorCode::NoFilename),
            7007 => Ok(ErrorCode::FileStorageFailed),
            7008 => Ok(ErrorCode::FileNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::EmailSendFailed),

            _ => Err(InvalidErrorCode(value)),
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
    fn test_error_code_values() {
        // General
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::Unknown.code(), 1);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::AlreadyExists.code(), 4);

        // Auth
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::TokenExpired.code(), 1003);
        assert_eq!(ErrorCode::TokenInvalid.code(), 1004);
        assert_eq!(ErrorCode::AccountDisabled.code(), 1006);
        assert_eq!(ErrorCode::EmailNotVerified.code(), 1007);
        assert_eq!(ErrorCode::VerificationCodeInvalid.code(), 1008);
        assert_eq!(ErrorCode::VerificationCodeExpired.code(), 1009);

        // Permission
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);

        // Employee
        assert_eq!(ErrorCode::EmployeeNotFound.code(), 3001);
        assert_eq!(ErrorCode::EmployeeCodeExists.code(), 3002);
        assert_eq!(ErrorCode::EmailExists.code(), 3003);
        assert_eq!(ErrorCode::DocumentNotFound.code(), 3101);
        assert_eq!(ErrorCode::CompanyNotFound.code(), 3201);

        // Attendance
        assert_eq!(ErrorCode::AttendanceNotFound.code(), 4001);
        assert_eq!(ErrorCode::AlreadyCheckedIn.code(), 4002);
        assert_eq!(ErrorCode::AlreadyCheckedOut.code(), 4003);
        assert_eq!(ErrorCode::NotCheckedIn.code(), 4004);
        assert_eq!(ErrorCode::AttendanceAlreadyMarked.code(), 4005);

        // Leave
        assert_eq!(ErrorCode::LeaveRequestNotFound.code(), 5001);
        assert_eq!(ErrorCode::LeaveTypeNotFound.code(), 5002);
        assert_eq!(ErrorCode::InsufficientLeaveBalance.code(), 5003);
        assert_eq!(ErrorCode::LeaveDatesOverlap.code(), 5004);
        assert_eq!(ErrorCode::LeaveAlreadyProcessed.code(), 5005);
        assert_eq!(ErrorCode::LeaveTypeNameExists.code(), 5101);

        // Salary
        assert_eq!(ErrorCode::SalaryInvalidAmount.code(), 6001);

        // File Upload
        assert_eq!(ErrorCode::FileTooLarge.code(), 7001);
        assert_eq!(ErrorCode::UnsupportedFileFormat.code(), 7002);
        assert_eq!(ErrorCode::FileStorageFailed.code(), 7007);

        // System
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
        assert_eq!(ErrorCode::ConfigError.code(), 9005);
        assert_eq!(ErrorCode::EmailSendFailed.code(), 9006);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::NotFound.is_success());
        assert!(!ErrorCode::InternalError.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthenticated));
        assert_eq!(ErrorCode::try_from(4002), Ok(ErrorCode::AlreadyCheckedIn));
        assert_eq!(
            ErrorCode::try_from(5003),
            Ok(ErrorCode::InsufficientLeaveBalance)
        );
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_from_error_code_to_u16() {
        let code: u16 = ErrorCode::Success.into();
        assert_eq!(code, 0);

        let code: u16 = ErrorCode::NotAuthenticated.into();
        assert_eq!(code, 1001);

        let code: u16 = ErrorCode::InternalError.into();
        assert_eq!(code, 9001);
    }

    #[test]
    fn test_serialize() {
        let code = ErrorCode::NotFound;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "3");

        let code = ErrorCode::LeaveRequestNotFound;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "5001");

        let code = ErrorCode::Success;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "0");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("0").unwrap();
        assert_eq!(code, ErrorCode::Success);

        let code: ErrorCode = serde_json::from_str("3").unwrap();
        assert_eq!(code, ErrorCode::NotFound);

        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::AttendanceNotFound);

        let code: ErrorCode = serde_json::from_str("9001").unwrap();
        assert_eq!(code, ErrorCode::InternalError);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());

        let result: Result<ErrorCode, _> = serde_json::from_str("10000");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::NotFound), "3");
        assert_eq!(format!("{}", ErrorCode::LeaveRequestNotFound), "5001");
        assert_eq!(format!("{}", ErrorCode::InternalError), "9001");
    }

    #[test]
    fn test_message() {
        assert_eq!(
            ErrorCode::Success.message(),
            "Operation completed successfully"
        );
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(
            ErrorCode::AlreadyCheckedIn.message(),
            "Already checked in for today"
        );
        assert_eq!(
            ErrorCode::AccountDisabled.message(),
            "Your account has been deactivated. Please contact HR."
        );
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::NotAuthenticated,
            ErrorCode::PermissionDenied,
            ErrorCode::AlreadyCheckedIn,
            ErrorCode::InsufficientLeaveBalance,
            ErrorCode::InternalError,
        ];

        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            let parsed: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(code, parsed);
        }
    }

    #[test]
    fn test_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(ErrorCode::Success);
        set.insert(ErrorCode::NotFound);
        set.insert(ErrorCode::Success); // Duplicate
        assert_eq!(set.len(), 2);
        assert!(set.contains(&ErrorCode::Success));
        assert!(set.contains(&ErrorCode::NotFound));
    }
}
