//! Attendance Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Attendance, AttendanceUpdate};
use crate::utils::time::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "attendance";

/// Name of the unique (employee, date) index, defined in the schema.
pub const EMPLOYEE_DATE_INDEX: &str = "attendance_employee_date_idx";

/// Admin list filters. All fields optional.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
    pub employee: Option<RecordId>,
}

#[derive(Clone)]
pub struct AttendanceRepository {
    base: BaseRepository,
}

impl AttendanceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find attendance record by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Attendance>> {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let record: Option<Attendance> = self.base.db().select(rid).await?;
        Ok(record)
    }

    /// The one record an employee has for a given date, if any
    pub async fn find_by_employee_and_date(
        &self,
        employee: &RecordId,
        date: &str,
    ) -> RepoResult<Option<Attendance>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM attendance WHERE employee = $employee AND date = $date LIMIT 1")
            .bind(("employee", employee.clone()))
            .bind(("date", date.to_string()))
            .await?;
        let records: Vec<Attendance> = result.take(0)?;
        Ok(records.into_iter().next())
    }

    /// Full history for one employee, newest first
    pub async fn find_by_employee(&self, employee: &RecordId) -> RepoResult<Vec<Attendance>> {
        let records: Vec<Attendance> = self
            .base
            .db()
            .query("SELECT * FROM attendance WHERE employee = $employee ORDER BY date DESC")
            .bind(("employee", employee.clone()))
            .await?
            .take(0)?;
        Ok(records)
    }

    /// Records for one employee on or after a date, newest first
    pub async fn find_by_employee_since(
        &self,
        employee: &RecordId,
        since: &str,
    ) -> RepoResult<Vec<Attendance>> {
        let records: Vec<Attendance> = self
            .base
            .db()
            .query(
                "SELECT * FROM attendance WHERE employee = $employee AND date >= $since ORDER BY date DESC",
            )
            .bind(("employee", employee.clone()))
            .bind(("since", since.to_string()))
            .await?
            .take(0)?;
        Ok(records)
    }

    /// All records for one calendar date
    pub async fn find_by_date(&self, date: &str) -> RepoResult<Vec<Attendance>> {
        let records: Vec<Attendance> = self
            .base
            .db()
            .query("SELECT * FROM attendance WHERE date = $date")
            .bind(("date", date.to_string()))
            .await?
            .take(0)?;
        Ok(records)
    }

    /// Filtered admin listing, newest date first then latest check-in
    pub async fn find_filtered(&self, filter: AttendanceFilter) -> RepoResult<Vec<Attendance>> {
        let records: Vec<Attendance> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM attendance WHERE
                    ($has_start = false OR date >= $start)
                    AND ($has_end = false OR date <= $end)
                    AND ($has_status = false OR status = $status)
                    AND ($has_employee = false OR employee = $employee)
                ORDER BY date DESC, check_in DESC"#,
            )
            .bind(("has_start", filter.start_date.is_some()))
            .bind(("start", filter.start_date))
            .bind(("has_end", filter.end_date.is_some()))
            .bind(("end", filter.end_date))
            .bind(("has_status", filter.status.is_some()))
            .bind(("status", filter.status))
            .bind(("has_employee", filter.employee.is_some()))
            .bind(("employee", filter.employee))
            .await?
            .take(0)?;
        Ok(records)
    }

    /// Latest records across all employees
    pub async fn find_recent(&self, limit: usize) -> RepoResult<Vec<Attendance>> {
        let records: Vec<Attendance> = self
            .base
            .db()
            .query("SELECT * FROM attendance ORDER BY date DESC, created_at DESC LIMIT $limit")
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(records)
    }

    /// Create a new attendance record. The unique (employee, date) index
    /// turns a concurrent double insert into a Duplicate error.
    pub async fn create(&self, record: Attendance) -> RepoResult<Attendance> {
        let created: Option<Attendance> = self
            .base
            .db()
            .create(TABLE)
            .content(record)
            .await
            .map_err(|err| {
                let message = err.to_string();
                if message.contains(EMPLOYEE_DATE_INDEX) {
                    RepoError::Duplicate("Attendance record already exists for this date".into())
                } else {
                    RepoError::Database(message)
                }
            })?;
        created.ok_or_else(|| RepoError::Database("Failed to create attendance record".to_string()))
    }

    /// Apply a partial update. Present fields overwrite, absent fields
    /// keep their stored value.
    pub async fn update(&self, id: &str, data: AttendanceUpdate) -> RepoResult<Attendance> {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    check_in = IF $has_check_in THEN $check_in ELSE check_in END,
                    check_out = IF $has_check_out THEN $check_out ELSE check_out END,
                    working_hours = IF $has_working_hours THEN $working_hours ELSE working_hours END,
                    status = IF $has_status THEN $status ELSE status END,
                    notes = IF $has_notes THEN $notes ELSE notes END,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", rid))
            .bind(("has_check_in", data.check_in.is_some()))
            .bind(("check_in", data.check_in))
            .bind(("has_check_out", data.check_out.is_some()))
            .bind(("check_out", data.check_out))
            .bind(("has_working_hours", data.working_hours.is_some()))
            .bind(("working_hours", data.working_hours))
            .bind(("has_status", data.status.is_some()))
            .bind(("status", data.status))
            .bind(("has_notes", data.notes.is_some()))
            .bind(("notes", data.notes))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Attendance>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Attendance record {} not found", id)))
    }

    /// Hard delete an attendance record
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Attendance record {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", rid))
            .await?;
        Ok(true)
    }
}
