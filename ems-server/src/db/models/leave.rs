//! Leave Models
//!
//! Leave types are defined per company; leave requests reference a type
//! and move PENDING -> APPROVED/REJECTED exactly once.

use super::serde_helpers;
use super::{CompanyId, EmployeeId, UserId};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Leave type ID type
pub type LeaveTypeId = RecordId;

/// Leave request ID type
pub type LeaveRequestId = RecordId;

/// Request lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "PENDING",
            LeaveStatus::Approved => "APPROVED",
            LeaveStatus::Rejected => "REJECTED",
        }
    }
}

/// A kind of leave with a yearly allowance, e.g. "Casual Leave".
/// Names are unique within a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveType {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<LeaveTypeId>,
    #[serde(with = "serde_helpers::record_id")]
    pub company: CompanyId,
    pub name: String,
    #[serde(default)]
    pub max_days_per_year: u32,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Leave request model matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<LeaveRequestId>,
    #[serde(with = "serde_helpers::record_id")]
    pub employee: EmployeeId,
    #[serde(with = "serde_helpers::record_id")]
    pub company: CompanyId,
    #[serde(with = "serde_helpers::record_id")]
    pub leave_type: LeaveTypeId,
    /// Calendar dates "YYYY-MM-DD", both endpoints inclusive.
    pub start_date: String,
    pub end_date: String,
    pub total_days: i64,
    pub reason: String,
    pub status: LeaveStatus,
    /// User who approved or rejected, set together with `approved_at`.
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub approved_by: Option<UserId>,
    pub approved_at: Option<i64>,
    pub comments: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}
