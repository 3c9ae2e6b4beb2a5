//! Leave API Handlers
//!
//! Requests reference a per-company leave type and move
//! PENDING -> APPROVED/REJECTED exactly once. Balances are never
//! stored; they are recomputed from the approved history of the
//! calendar year on every check.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::Datelike;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};
use surrealdb::RecordId;

use crate::api::{Pagination, paginate, pagination};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Employee, LeaveRequest, LeaveStatus, LeaveType, User};
use crate::db::repository::{
    EmployeeRepository, LeaveRepository, UserRepository, leave::LeaveRequestFilter,
};
use crate::domain::leave::{remaining_balance, total_days};
use crate::utils::time::{current_year, now_millis, parse_date, year_bounds};

/// Leave request with the employee, type and approver joined in
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub employee: Option<LeaveEmployee>,
    pub leave_type: Option<LeaveTypeInfo>,
    pub start_date: String,
    pub end_date: String,
    pub total_days: i64,
    pub reason: String,
    pub status: LeaveStatus,
    pub approved_by: Option<LeaveApprover>,
    pub approved_at: Option<i64>,
    pub comments: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveEmployee {
    #[serde(rename = "_id")]
    pub id: String,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveTypeInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub max_days_per_year: u32,
}

/// A leave type as served by the types endpoints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveTypeRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub max_days_per_year: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl LeaveTypeRecord {
    fn build(leave_type: &LeaveType) -> AppResult<Self> {
        let id = leave_type
            .id
            .clone()
            .ok_or_else(|| AppError::database("Leave type record missing id"))?;
        Ok(Self {
            id: id.to_string(),
            name: leave_type.name.clone(),
            max_days_per_year: leave_type.max_days_per_year,
            created_at: leave_type.created_at,
            updated_at: leave_type.updated_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct LeaveApprover {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
}

/// Per-type balance for one employee and calendar year
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalance {
    pub leave_type: String,
    pub total_allowed: u32,
    pub used: i64,
    pub remaining: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestList {
    pub leave_requests: Vec<LeaveRecord>,
    pub pagination: Pagination,
}

/// Yearly request counts plus per-type usage
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveStatistics {
    pub total_requests: usize,
    pub pending_requests: usize,
    pub approved_requests: usize,
    pub rejected_requests: usize,
    pub leaves_by_type: Vec<LeaveTypeUsage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveTypeUsage {
    pub leave_type: String,
    pub count: usize,
    pub total_days: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyLeaveRequest {
    pub leave_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MyLeavesQuery {
    pub status: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub status: Option<String>,
    pub employee_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLeaveStatusRequest {
    pub status: String,
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeaveTypeRequest {
    pub name: Option<String>,
    pub max_days_per_year: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

fn profile_missing_error() -> AppError {
    AppError::with_message(ErrorCode::EmployeeNotFound, "Employee profile not found")
}

fn request_missing_error() -> AppError {
    AppError::with_message(ErrorCode::LeaveRequestNotFound, "Leave request not found")
}

fn build_record(
    record: &LeaveRequest,
    employee: Option<&Employee>,
    leave_type: Option<&LeaveType>,
    approver: Option<&User>,
) -> AppResult<LeaveRecord> {
    let id = record
        .id
        .clone()
        .ok_or_else(|| AppError::database("Leave request missing id"))?;
    let employee = employee
        .map(|e| -> AppResult<LeaveEmployee> {
            let id = e
                .id
                .clone()
                .ok_or_else(|| AppError::database("Employee record missing id"))?;
            Ok(LeaveEmployee {
                id: id.to_string(),
                employee_code: e.employee_code.clone(),
                first_name: e.first_name.clone(),
                last_name: e.last_name.clone(),
                department: e.department.clone(),
            })
        })
        .transpose()?;
    let leave_type = leave_type
        .map(|t| -> AppResult<LeaveTypeInfo> {
            let id = t
                .id
                .clone()
                .ok_or_else(|| AppError::database("Leave type record missing id"))?;
            Ok(LeaveTypeInfo {
                id: id.to_string(),
                name: t.name.clone(),
                max_days_per_year: t.max_days_per_year,
            })
        })
        .transpose()?;
    let approved_by = approver
        .map(|u| -> AppResult<LeaveApprover> {
            let id = u
                .id
                .clone()
                .ok_or_else(|| AppError::database("User record missing id"))?;
            Ok(LeaveApprover {
                id: id.to_string(),
                email: u.email.clone(),
            })
        })
        .transpose()?;

    Ok(LeaveRecord {
        id: id.to_string(),
        employee,
        leave_type,
        start_date: record.start_date.clone(),
        end_date: record.end_date.clone(),
        total_days: record.total_days,
        reason: record.reason.clone(),
        status: record.status.clone(),
        approved_by,
        approved_at: record.approved_at,
        comments: record.comments.clone(),
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}

/// Join one request against its employee, type and approver
async fn populate_one(state: &ServerState, record: &LeaveRequest) -> AppResult<LeaveRecord> {
    let employees = EmployeeRepository::new(state.db.clone());
    let leaves = LeaveRepository::new(state.db.clone());
    let users = UserRepository::new(state.db.clone());

    let employee = employees.find_by_id(&record.employee.to_string()).await?;
    let leave_type = leaves.find_type_by_id(&record.leave_type.to_string()).await?;
    let approver = match &record.approved_by {
        Some(approver) => users.find_by_id(&approver.to_string()).await?,
        None => None,
    };
    build_record(
        record,
        employee.as_ref(),
        leave_type.as_ref(),
        approver.as_ref(),
    )
}

/// Join many requests with one scan per related table
async fn populate_many(
    state: &ServerState,
    company: &RecordId,
    records: &[LeaveRequest],
) -> AppResult<Vec<LeaveRecord>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let leaves = LeaveRepository::new(state.db.clone());
    let users = UserRepository::new(state.db.clone());

    let employee_map: HashMap<String, Employee> = employees
        .find_all()
        .await?
        .into_iter()
        .filter_map(|e| {
            let key = e.id.as_ref()?.to_string();
            Some((key, e))
        })
        .collect();
    let type_map: HashMap<String, LeaveType> = leaves
        .find_types(company)
        .await?
        .into_iter()
        .filter_map(|t| {
            let key = t.id.as_ref()?.to_string();
            Some((key, t))
        })
        .collect();
    let user_map: HashMap<String, User> = users
        .find_all()
        .await?
        .into_iter()
        .filter_map(|u| {
            let key = u.id.as_ref()?.to_string();
            Some((key, u))
        })
        .collect();

    records
        .iter()
        .map(|record| {
            build_record(
                record,
                employee_map.get(&record.employee.to_string()),
                type_map.get(&record.leave_type.to_string()),
                record
                    .approved_by
                    .as_ref()
                    .and_then(|id| user_map.get(&id.to_string())),
            )
        })
        .collect()
}

/// Approved days per leave type for one employee and year
async fn used_days_by_type(
    state: &ServerState,
    employee: &RecordId,
    year: i32,
) -> AppResult<HashMap<String, i64>> {
    let leaves = LeaveRepository::new(state.db.clone());
    let (from, to) = year_bounds(year);
    let approved = leaves
        .find_filtered(LeaveRequestFilter {
            employee: Some(employee.clone()),
            status: Some(LeaveStatus::Approved.as_str().to_string()),
            start_from: Some(from),
            start_to: Some(to),
        })
        .await?;

    let mut used: HashMap<String, i64> = HashMap::new();
    for request in &approved {
        *used.entry(request.leave_type.to_string()).or_default() += request.total_days;
    }
    Ok(used)
}

/// Balance rows for every leave type of the company, current usage
/// taken from the approved requests of `year`.
pub(crate) async fn balance_rows(
    state: &ServerState,
    employee: &RecordId,
    company: &RecordId,
    year: i32,
) -> AppResult<Vec<LeaveBalance>> {
    let leaves = LeaveRepository::new(state.db.clone());
    let types = leaves.find_types(company).await?;
    let used_by_type = used_days_by_type(state, employee, year).await?;

    types
        .into_iter()
        .map(|leave_type| {
            let id = leave_type
                .id
                .as_ref()
                .ok_or_else(|| AppError::database("Leave type record missing id"))?;
            let used = used_by_type.get(&id.to_string()).copied().unwrap_or(0);
            Ok(LeaveBalance {
                leave_type: leave_type.name.clone(),
                total_allowed: leave_type.max_days_per_year,
                used,
                remaining: remaining_balance(leave_type.max_days_per_year, used),
            })
        })
        .collect()
}

/// Submit a leave request
pub async fn apply(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<ApplyLeaveRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<LeaveRecord>>)> {
    let (Some(type_name), Some(start_str), Some(end_str), Some(reason)) = (
        req.leave_type.as_deref().filter(|s| !s.trim().is_empty()),
        req.start_date.as_deref().filter(|s| !s.is_empty()),
        req.end_date.as_deref().filter(|s| !s.is_empty()),
        req.reason.as_deref().filter(|s| !s.trim().is_empty()),
    ) else {
        return Err(AppError::validation("All fields are required"));
    };

    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_user(&user.id)
        .await?
        .ok_or_else(profile_missing_error)?;
    let employee_id = employee
        .id
        .clone()
        .ok_or_else(|| AppError::database("Employee record missing id"))?;

    let leaves = LeaveRepository::new(state.db.clone());
    let leave_type = leaves
        .find_type_by_name(&employee.company, type_name)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::LeaveTypeNotFound, "Leave type not found")
        })?;
    let type_id = leave_type
        .id
        .clone()
        .ok_or_else(|| AppError::database("Leave type record missing id"))?;

    let (Some(start), Some(end)) = (parse_date(start_str), parse_date(end_str)) else {
        return Err(AppError::with_message(
            ErrorCode::InvalidLeaveDates,
            "Invalid date format. Use YYYY-MM-DD",
        ));
    };
    let total = total_days(start, end);
    if total <= 0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidLeaveDates,
            "End date must be after start date",
        ));
    }

    // Hold the per-employee lock across the read-then-insert window.
    let lock = state.leave_lock(&employee_id.to_string());
    let _guard = lock.lock().await;

    if leaves
        .overlapping_exists(&employee_id, start_str, end_str)
        .await?
    {
        return Err(AppError::with_message(
            ErrorCode::LeaveDatesOverlap,
            "You already have a leave request for these dates",
        ));
    }

    let used = used_days_by_type(&state, &employee_id, start.year())
        .await?
        .get(&type_id.to_string())
        .copied()
        .unwrap_or(0);
    let remaining = remaining_balance(leave_type.max_days_per_year, used);
    if total > remaining {
        return Err(AppError::with_message(
            ErrorCode::InsufficientLeaveBalance,
            format!("Insufficient leave balance. Available: {} days", remaining),
        ));
    }

    let now = now_millis();
    let record = leaves
        .create(LeaveRequest {
            id: None,
            employee: employee_id.clone(),
            company: employee.company.clone(),
            leave_type: type_id,
            start_date: start_str.to_string(),
            end_date: end_str.to_string(),
            total_days: total,
            reason: reason.to_string(),
            status: LeaveStatus::Pending,
            approved_by: None,
            approved_at: None,
            comments: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    let data = populate_one(&state, &record).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Leave request submitted successfully",
            data,
        )),
    ))
}

/// The signed-in employee's requests, newest first
pub async fn my_leaves(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<MyLeavesQuery>,
) -> AppResult<Json<ApiResponse<Vec<LeaveRecord>>>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_user(&user.id)
        .await?
        .ok_or_else(profile_missing_error)?;
    let employee_id = employee
        .id
        .clone()
        .ok_or_else(|| AppError::database("Employee record missing id"))?;

    let (start_from, start_to) = match query.year {
        Some(year) => {
            let (from, to) = year_bounds(year);
            (Some(from), Some(to))
        }
        None => (None, None),
    };
    let leaves = LeaveRepository::new(state.db.clone());
    let records = leaves
        .find_filtered(LeaveRequestFilter {
            employee: Some(employee_id),
            status: query.status.map(|s| s.to_uppercase()),
            start_from,
            start_to,
        })
        .await?;

    let data = populate_many(&state, &user.company, &records).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Leave requests retrieved successfully",
        data,
    )))
}

/// Per-type balance for the current year
pub async fn my_balance(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<LeaveBalance>>>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_user(&user.id)
        .await?
        .ok_or_else(profile_missing_error)?;
    let employee_id = employee
        .id
        .clone()
        .ok_or_else(|| AppError::database("Employee record missing id"))?;

    let data = balance_rows(&state, &employee_id, &user.company, current_year()).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Leave balance retrieved successfully",
        data,
    )))
}

/// Withdraw an own request while it is still pending
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_user(&user.id)
        .await?
        .ok_or_else(profile_missing_error)?;
    let employee_id = employee
        .id
        .clone()
        .ok_or_else(|| AppError::database("Employee record missing id"))?;

    let leaves = LeaveRepository::new(state.db.clone());
    let record = leaves
        .find_by_id(&id)
        .await?
        .ok_or_else(request_missing_error)?;

    if record.employee != employee_id {
        return Err(AppError::permission_denied(
            "Not authorized to cancel this leave request",
        ));
    }
    if record.status != LeaveStatus::Pending {
        return Err(AppError::with_message(
            ErrorCode::LeaveNotPending,
            "Only pending leave requests can be cancelled",
        ));
    }

    leaves.delete(&id).await?;
    Ok(Json(ApiResponse::ok_with_message(
        "Leave request cancelled successfully",
    )))
}

/// All requests with filters (ADMIN/HR). Date bounds apply to the
/// start date.
pub async fn all_requests(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<LeaveListQuery>,
) -> AppResult<Json<ApiResponse<LeaveRequestList>>> {
    let employee = query
        .employee_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|id| {
            id.parse()
                .map_err(|_| AppError::validation("Invalid employee id"))
        })
        .transpose()?;
    let leaves = LeaveRepository::new(state.db.clone());
    let records = leaves
        .find_filtered(LeaveRequestFilter {
            employee,
            status: query.status.map(|s| s.to_uppercase()),
            start_from: query.start_date,
            start_to: query.end_date,
        })
        .await?;

    let (page, limit) = paginate(query.page, query.limit, 50);
    let total = records.len();
    let page_records: Vec<LeaveRequest> = records
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    let data = LeaveRequestList {
        leave_requests: populate_many(&state, &user.company, &page_records).await?,
        pagination: pagination(page, limit, total),
    };
    Ok(Json(ApiResponse::success_with_message(
        "Leave requests retrieved successfully",
        data,
    )))
}

/// Approve or reject a pending request (ADMIN/HR). The transition is
/// one-way; processed requests stay as decided.
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateLeaveStatusRequest>,
) -> AppResult<Json<ApiResponse<LeaveRecord>>> {
    let new_status = match req.status.as_str() {
        "APPROVED" => LeaveStatus::Approved,
        "REJECTED" => LeaveStatus::Rejected,
        _ => {
            return Err(AppError::validation(
                "Invalid status. Must be APPROVED or REJECTED",
            ));
        }
    };

    let leaves = LeaveRepository::new(state.db.clone());
    let record = leaves
        .find_by_id(&id)
        .await?
        .ok_or_else(request_missing_error)?;
    if record.status != LeaveStatus::Pending {
        return Err(AppError::with_message(
            ErrorCode::LeaveAlreadyProcessed,
            "This leave request has already been processed",
        ));
    }

    let updated = leaves
        .update_status(&id, new_status.clone(), user.id.clone(), req.comments)
        .await?;

    let data = populate_one(&state, &updated).await?;
    Ok(Json(ApiResponse::success_with_message(
        format!(
            "Leave request {} successfully",
            new_status.as_str().to_lowercase()
        ),
        data,
    )))
}

/// Request counts and per-type usage for a year (ADMIN/HR)
pub async fn statistics(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<ApiResponse<LeaveStatistics>>> {
    let year = query.year.unwrap_or_else(current_year);
    let (from, to) = year_bounds(year);

    let leaves = LeaveRepository::new(state.db.clone());
    let records = leaves
        .find_filtered(LeaveRequestFilter {
            employee: None,
            status: None,
            start_from: Some(from),
            start_to: Some(to),
        })
        .await?;

    let mut pending = 0;
    let mut approved = 0;
    let mut rejected = 0;
    let mut by_type: HashMap<String, (usize, i64)> = HashMap::new();
    for record in &records {
        match record.status {
            LeaveStatus::Pending => pending += 1,
            LeaveStatus::Approved => approved += 1,
            LeaveStatus::Rejected => rejected += 1,
        }
        let entry = by_type.entry(record.leave_type.to_string()).or_default();
        entry.0 += 1;
        entry.1 += record.total_days;
    }

    // Name-ordered rows, restricted to types that saw requests.
    let leaves_by_type = leaves
        .find_types(&user.company)
        .await?
        .into_iter()
        .filter_map(|leave_type| {
            let key = leave_type.id.as_ref()?.to_string();
            let (count, days) = by_type.get(&key).copied()?;
            Some(LeaveTypeUsage {
                leave_type: leave_type.name,
                count,
                total_days: days,
            })
        })
        .collect();

    let data = LeaveStatistics {
        total_requests: records.len(),
        pending_requests: pending,
        approved_requests: approved,
        rejected_requests: rejected,
        leaves_by_type,
    };
    Ok(Json(ApiResponse::success_with_message(
        "Leave statistics retrieved successfully",
        data,
    )))
}

/// Leave types of the caller's company
pub async fn list_types(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<LeaveTypeRecord>>>> {
    let leaves = LeaveRepository::new(state.db.clone());
    let types = leaves
        .find_types(&user.company)
        .await?
        .iter()
        .map(LeaveTypeRecord::build)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(ApiResponse::success_with_message(
        "Leave types retrieved successfully",
        types,
    )))
}

/// Create a leave type (ADMIN/HR). Names are unique per company.
pub async fn create_type(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<CreateLeaveTypeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<LeaveTypeRecord>>)> {
    let (Some(name), Some(max_days)) = (
        req.name.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        req.max_days_per_year,
    ) else {
        return Err(AppError::validation(
            "Name and maxDaysPerYear are required",
        ));
    };

    let leaves = LeaveRepository::new(state.db.clone());
    if leaves
        .find_type_by_name(&user.company, name)
        .await?
        .is_some()
    {
        return Err(AppError::with_message(
            ErrorCode::LeaveTypeNameExists,
            format!("Leave type '{}' already exists", name),
        ));
    }

    let now = now_millis();
    let created = leaves
        .create_type(LeaveType {
            id: None,
            company: user.company.clone(),
            name: name.to_string(),
            max_days_per_year: max_days,
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Leave type created successfully",
            LeaveTypeRecord::build(&created)?,
        )),
    ))
}
