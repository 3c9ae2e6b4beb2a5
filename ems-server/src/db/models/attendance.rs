//! Attendance Model

use super::serde_helpers;
use super::{CompanyId, EmployeeId, UserId};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Attendance record ID type
pub type AttendanceId = RecordId;

/// Day status. Derived from worked hours at check-out unless an admin
/// set it explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AttendanceStatus {
    Present,
    Absent,
    #[serde(rename = "Half-day")]
    HalfDay,
    Leave,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::HalfDay => "Half-day",
            AttendanceStatus::Leave => "Leave",
        }
    }
}

/// One employee-day attendance record. The (employee, date) pair is
/// unique at the storage level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendance {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AttendanceId>,
    #[serde(with = "serde_helpers::record_id")]
    pub employee: EmployeeId,
    #[serde(with = "serde_helpers::record_id")]
    pub user: UserId,
    #[serde(with = "serde_helpers::record_id")]
    pub company: CompanyId,
    /// Calendar date "YYYY-MM-DD".
    pub date: String,
    /// Check-in instant, epoch milliseconds.
    pub check_in: Option<i64>,
    pub check_out: Option<i64>,
    /// Hours between check-in and check-out, two decimal places.
    #[serde(default)]
    pub working_hours: f64,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Partial update for an attendance record. `None` fields are left
/// untouched; clearing a recorded time is not supported, delete and
/// re-mark instead.
#[derive(Debug, Clone, Default)]
pub struct AttendanceUpdate {
    pub check_in: Option<i64>,
    pub check_out: Option<i64>,
    pub working_hours: Option<f64>,
    pub status: Option<AttendanceStatus>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_day_serializes_with_hyphen() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).unwrap(),
            "\"Half-day\""
        );
        let parsed: AttendanceStatus = serde_json::from_str("\"Half-day\"").unwrap();
        assert_eq!(parsed, AttendanceStatus::HalfDay);
    }

    #[test]
    fn other_statuses_use_variant_names() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Present).unwrap(),
            "\"Present\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Leave).unwrap(),
            "\"Leave\""
        );
    }
}
