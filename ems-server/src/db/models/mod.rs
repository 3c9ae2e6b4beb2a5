//! Database Models

// Serde helpers
pub mod serde_helpers;

// Organization
pub mod company;
pub mod user;

// People
pub mod employee;

// Time and absence
pub mod attendance;
pub mod leave;

// Re-exports
pub use company::{Company, CompanyId};
pub use user::{Role, User, UserId};
pub use employee::{Employee, EmployeeDocument, EmployeeId, EmployeeStatus, WorkType};
pub use attendance::{Attendance, AttendanceId, AttendanceStatus, AttendanceUpdate};
pub use leave::{LeaveRequest, LeaveRequestId, LeaveStatus, LeaveType, LeaveTypeId};
