//! Leave Repository
//!
//! Covers both leave types and leave requests; they always travel
//! together in the handlers.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{LeaveRequest, LeaveStatus, LeaveType, UserId};
use crate::utils::time::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TYPE_TABLE: &str = "leave_type";
const REQUEST_TABLE: &str = "leave_request";

/// Request list filters. Date bounds apply to the start date.
#[derive(Debug, Clone, Default)]
pub struct LeaveRequestFilter {
    pub employee: Option<RecordId>,
    pub status: Option<String>,
    pub start_from: Option<String>,
    pub start_to: Option<String>,
}

#[derive(Clone)]
pub struct LeaveRepository {
    base: BaseRepository,
}

impl LeaveRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    // ------------------------------------------------------------------
    // Leave types
    // ------------------------------------------------------------------

    /// All leave types of a company ordered by name
    pub async fn find_types(&self, company: &RecordId) -> RepoResult<Vec<LeaveType>> {
        let types: Vec<LeaveType> = self
            .base
            .db()
            .query("SELECT * FROM leave_type WHERE company = $company ORDER BY name")
            .bind(("company", company.clone()))
            .await?
            .take(0)?;
        Ok(types)
    }

    /// Find leave type by id
    pub async fn find_type_by_id(&self, id: &str) -> RepoResult<Option<LeaveType>> {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let leave_type: Option<LeaveType> = self.base.db().select(rid).await?;
        Ok(leave_type)
    }

    /// Find a company's leave type by its name
    pub async fn find_type_by_name(
        &self,
        company: &RecordId,
        name: &str,
    ) -> RepoResult<Option<LeaveType>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM leave_type WHERE company = $company AND name = $name LIMIT 1")
            .bind(("company", company.clone()))
            .bind(("name", name.to_string()))
            .await?;
        let types: Vec<LeaveType> = result.take(0)?;
        Ok(types.into_iter().next())
    }

    /// Create a new leave type. Names are unique per company.
    pub async fn create_type(&self, leave_type: LeaveType) -> RepoResult<LeaveType> {
        if self
            .find_type_by_name(&leave_type.company, &leave_type.name)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Leave type '{}' already exists",
                leave_type.name
            )));
        }

        let created: Option<LeaveType> = self
            .base
            .db()
            .create(TYPE_TABLE)
            .content(leave_type)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create leave type".to_string()))
    }

    // ------------------------------------------------------------------
    // Leave requests
    // ------------------------------------------------------------------

    /// Create a new leave request
    pub async fn create(&self, request: LeaveRequest) -> RepoResult<LeaveRequest> {
        let created: Option<LeaveRequest> = self
            .base
            .db()
            .create(REQUEST_TABLE)
            .content(request)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create leave request".to_string()))
    }

    /// Find leave request by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<LeaveRequest>> {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let request: Option<LeaveRequest> = self.base.db().select(rid).await?;
        Ok(request)
    }

    /// Filtered listing, newest request first
    pub async fn find_filtered(&self, filter: LeaveRequestFilter) -> RepoResult<Vec<LeaveRequest>> {
        let requests: Vec<LeaveRequest> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM leave_request WHERE
                    ($has_employee = false OR employee = $employee)
                    AND ($has_status = false OR status = $status)
                    AND ($has_from = false OR start_date >= $from)
                    AND ($has_to = false OR start_date <= $to)
                ORDER BY created_at DESC"#,
            )
            .bind(("has_employee", filter.employee.is_some()))
            .bind(("employee", filter.employee))
            .bind(("has_status", filter.status.is_some()))
            .bind(("status", filter.status))
            .bind(("has_from", filter.start_from.is_some()))
            .bind(("from", filter.start_from))
            .bind(("has_to", filter.start_to.is_some()))
            .bind(("to", filter.start_to))
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// Whether the employee already has a non-rejected request touching
    /// the inclusive date range.
    pub async fn overlapping_exists(
        &self,
        employee: &RecordId,
        start_date: &str,
        end_date: &str,
    ) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT * FROM leave_request WHERE
                    employee = $employee
                    AND status != 'REJECTED'
                    AND start_date <= $end
                    AND end_date >= $start
                LIMIT 1"#,
            )
            .bind(("employee", employee.clone()))
            .bind(("start", start_date.to_string()))
            .bind(("end", end_date.to_string()))
            .await?;
        let requests: Vec<LeaveRequest> = result.take(0)?;
        Ok(!requests.is_empty())
    }

    /// Latest requests across all employees
    pub async fn find_recent(&self, limit: usize) -> RepoResult<Vec<LeaveRequest>> {
        let requests: Vec<LeaveRequest> = self
            .base
            .db()
            .query("SELECT * FROM leave_request ORDER BY created_at DESC LIMIT $limit")
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// Record the approve/reject decision
    pub async fn update_status(
        &self,
        id: &str,
        status: LeaveStatus,
        approved_by: UserId,
        comments: Option<String>,
    ) -> RepoResult<LeaveRequest> {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    status = $status,
                    approved_by = $approved_by,
                    approved_at = $now,
                    comments = IF $has_comments THEN $comments ELSE comments END,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", rid))
            .bind(("status", status))
            .bind(("approved_by", approved_by))
            .bind(("has_comments", comments.is_some()))
            .bind(("comments", comments))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<LeaveRequest>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Leave request {} not found", id)))
    }

    /// Hard delete a leave request
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Leave request {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", rid))
            .await?;
        Ok(true)
    }
}
