//! Attendance API Handlers
//!
//! One record per employee per calendar day, keyed on the server's
//! local date. Check-out derives worked hours and the day status from
//! the recorded times; admins can mark or correct any record.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use http::{StatusCode, header};
use serde::{Deserialize, Serialize};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::api::{Pagination, paginate, pagination};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Attendance, AttendanceStatus, AttendanceUpdate, Employee, User};
use crate::db::repository::{
    AttendanceRepository, EmployeeRepository, UserRepository, attendance::AttendanceFilter,
};
use crate::domain::attendance::{status_for_hours, working_hours};
use crate::utils::csv::to_csv;
use crate::utils::time::{format_time_of_day, now_millis, parse_date, today_string};

const ATTENDANCE_CSV_HEADER: &[&str] = &[
    "Employee Code",
    "Employee Name",
    "Department",
    "Date",
    "Check In",
    "Check Out",
    "Working Hours",
    "Status",
    "Notes",
];

const EMPLOYEES_CSV_HEADER: &[&str] = &[
    "Employee Code",
    "First Name",
    "Last Name",
    "Email",
    "Department",
    "Designation",
    "Join Date",
    "Phone",
    "Status",
];

/// Attendance record with the employee and account joined in
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub employee: Option<AttendanceEmployee>,
    pub user: Option<AttendanceUser>,
    pub date: String,
    pub check_in: Option<i64>,
    pub check_out: Option<i64>,
    pub working_hours: f64,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEmployee {
    #[serde(rename = "_id")]
    pub id: String,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
}

#[derive(Debug, Serialize)]
pub struct AttendanceUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct AttendanceList {
    pub attendance: Vec<AttendanceRecord>,
    pub pagination: Pagination,
}

/// Status counts over a filtered range. Key casing follows the stored
/// status values.
#[derive(Debug, Serialize)]
pub struct AttendanceSummary {
    pub total: usize,
    #[serde(rename = "Present")]
    pub present: usize,
    #[serde(rename = "Absent")]
    pub absent: usize,
    #[serde(rename = "Half-day")]
    pub half_day: usize,
    #[serde(rename = "Leave")]
    pub leave: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotesRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
    pub employee_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    pub employee_id: Option<String>,
    pub date: Option<String>,
    pub check_in: Option<i64>,
    pub check_out: Option<i64>,
    pub status: Option<AttendanceStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceRequest {
    pub check_in: Option<i64>,
    pub check_out: Option<i64>,
    pub status: Option<AttendanceStatus>,
    pub notes: Option<String>,
}

fn profile_missing_error() -> AppError {
    AppError::with_message(ErrorCode::EmployeeNotFound, "Employee profile not found")
}

fn record_missing_error() -> AppError {
    AppError::with_message(ErrorCode::AttendanceNotFound, "Attendance record not found")
}

fn build_record(
    record: &Attendance,
    employee: Option<&Employee>,
    account: Option<&User>,
) -> AppResult<AttendanceRecord> {
    let id = record
        .id
        .clone()
        .ok_or_else(|| AppError::database("Attendance record missing id"))?;
    let employee = employee
        .map(|e| -> AppResult<AttendanceEmployee> {
            let id = e
                .id
                .clone()
                .ok_or_else(|| AppError::database("Employee record missing id"))?;
            Ok(AttendanceEmployee {
                id: id.to_string(),
                employee_code: e.employee_code.clone(),
                first_name: e.first_name.clone(),
                last_name: e.last_name.clone(),
                department: e.department.clone(),
            })
        })
        .transpose()?;
    let user = account
        .map(|u| -> AppResult<AttendanceUser> {
            let id = u
                .id
                .clone()
                .ok_or_else(|| AppError::database("User record missing id"))?;
            Ok(AttendanceUser {
                id: id.to_string(),
                email: u.email.clone(),
            })
        })
        .transpose()?;

    Ok(AttendanceRecord {
        id: id.to_string(),
        employee,
        user,
        date: record.date.clone(),
        check_in: record.check_in,
        check_out: record.check_out,
        working_hours: record.working_hours,
        status: record.status.clone(),
        notes: record.notes.clone(),
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}

/// Join one record against its employee and account
async fn populate_one(state: &ServerState, record: &Attendance) -> AppResult<AttendanceRecord> {
    let employees = EmployeeRepository::new(state.db.clone());
    let users = UserRepository::new(state.db.clone());
    let employee = employees.find_by_id(&record.employee.to_string()).await?;
    let account = users.find_by_id(&record.user.to_string()).await?;
    build_record(record, employee.as_ref(), account.as_ref())
}

/// Join many records with one scan over employees and accounts
async fn populate_many(
    state: &ServerState,
    records: &[Attendance],
) -> AppResult<Vec<AttendanceRecord>> {
    let employees = EmployeeRepository::new(state.db.clone());
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
    let account_map: HashMap<String, User> = users
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
                account_map.get(&record.user.to_string()),
            )
        })
        .collect()
}

fn filter_from_query(query: &AttendanceListQuery) -> AppResult<AttendanceFilter> {
    let employee = query
        .employee_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|id| {
            id.parse()
                .map_err(|_| AppError::validation("Invalid employee id"))
        })
        .transpose()?;
    Ok(AttendanceFilter {
        start_date: query.start_date.clone(),
        end_date: query.end_date.clone(),
        status: query.status.clone(),
        employee,
    })
}

/// Check in for today
pub async fn check_in(
    State(state): State<ServerState>,
    user: CurrentUser,
    body: Option<Json<NotesRequest>>,
) -> AppResult<Json<ApiResponse<AttendanceRecord>>> {
    let notes = body.and_then(|Json(b)| b.notes);

    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_user(&user.id)
        .await?
        .ok_or_else(profile_missing_error)?;
    let employee_id = employee
        .id
        .clone()
        .ok_or_else(|| AppError::database("Employee record missing id"))?;

    let attendance = AttendanceRepository::new(state.db.clone());
    let date = today_string();
    let existing = attendance
        .find_by_employee_and_date(&employee_id, &date)
        .await?;

    let now = now_millis();
    let record = match existing {
        Some(record) if record.check_in.is_some() => {
            return Err(AppError::with_message(
                ErrorCode::AlreadyCheckedIn,
                "Already checked in today",
            ));
        }
        // A day marked in advance (e.g. Absent) gains the real times.
        Some(record) => {
            let id = record
                .id
                .clone()
                .ok_or_else(|| AppError::database("Attendance record missing id"))?;
            attendance
                .update(
                    &id.to_string(),
                    AttendanceUpdate {
                        check_in: Some(now),
                        status: Some(AttendanceStatus::Present),
                        notes: notes.clone(),
                        ..AttendanceUpdate::default()
                    },
                )
                .await?
        }
        // The unique (employee, date) index turns a concurrent double
        // check-in into a duplicate error here.
        None => {
            attendance
                .create(Attendance {
                    id: None,
                    employee: employee_id.clone(),
                    user: user.id.clone(),
                    company: employee.company.clone(),
                    date,
                    check_in: Some(now),
                    check_out: None,
                    working_hours: 0.0,
                    status: AttendanceStatus::Present,
                    notes,
                    created_at: now,
                    updated_at: now,
                })
                .await?
        }
    };

    let data = populate_one(&state, &record).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Checked in successfully",
        data,
    )))
}

/// Check out for today, deriving worked hours and the day status
pub async fn check_out(
    State(state): State<ServerState>,
    user: CurrentUser,
    body: Option<Json<NotesRequest>>,
) -> AppResult<Json<ApiResponse<AttendanceRecord>>> {
    let notes = body.and_then(|Json(b)| b.notes);

    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_user(&user.id)
        .await?
        .ok_or_else(profile_missing_error)?;
    let employee_id = employee
        .id
        .clone()
        .ok_or_else(|| AppError::database("Employee record missing id"))?;

    let attendance = AttendanceRepository::new(state.db.clone());
    let record = attendance
        .find_by_employee_and_date(&employee_id, &today_string())
        .await?;

    let Some(record) = record.filter(|r| r.check_in.is_some()) else {
        return Err(AppError::with_message(
            ErrorCode::NotCheckedIn,
            "No check-in record found for today",
        ));
    };
    if record.check_out.is_some() {
        return Err(AppError::with_message(
            ErrorCode::AlreadyCheckedOut,
            "Already checked out today",
        ));
    }
    let check_in_at = record
        .check_in
        .ok_or_else(|| AppError::database("Attendance record missing check-in"))?;
    let id = record
        .id
        .clone()
        .ok_or_else(|| AppError::database("Attendance record missing id"))?;

    let now = now_millis();
    let hours = working_hours(check_in_at, now);
    let updated = attendance
        .update(
            &id.to_string(),
            AttendanceUpdate {
                check_out: Some(now),
                working_hours: Some(hours),
                status: Some(status_for_hours(hours)),
                notes,
                ..AttendanceUpdate::default()
            },
        )
        .await?;

    let data = populate_one(&state, &updated).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Checked out successfully",
        data,
    )))
}

/// Today's record for the signed-in employee, `null` before check-in
pub async fn today(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Option<AttendanceRecord>>>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_user(&user.id)
        .await?
        .ok_or_else(profile_missing_error)?;
    let employee_id = employee
        .id
        .clone()
        .ok_or_else(|| AppError::database("Employee record missing id"))?;

    let attendance = AttendanceRepository::new(state.db.clone());
    let record = attendance
        .find_by_employee_and_date(&employee_id, &today_string())
        .await?;

    let data = match &record {
        Some(record) => Some(populate_one(&state, record).await?),
        None => None,
    };
    Ok(Json(ApiResponse::success_with_message(
        "Today's attendance retrieved successfully",
        data,
    )))
}

/// The signed-in employee's attendance history, newest first
pub async fn my_attendance(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<AttendanceList>>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_user(&user.id)
        .await?
        .ok_or_else(profile_missing_error)?;
    let employee_id = employee
        .id
        .clone()
        .ok_or_else(|| AppError::database("Employee record missing id"))?;

    let attendance = AttendanceRepository::new(state.db.clone());
    let records = attendance.find_by_employee(&employee_id).await?;

    let (page, limit) = paginate(query.page, query.limit, 10);
    let total = records.len();
    let page_records: Vec<Attendance> = records
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    let data = AttendanceList {
        attendance: populate_many(&state, &page_records).await?,
        pagination: pagination(page, limit, total),
    };
    Ok(Json(ApiResponse::success_with_message(
        "Attendance history retrieved successfully",
        data,
    )))
}

/// All attendance records with filters (ADMIN/HR)
pub async fn all_attendance(
    State(state): State<ServerState>,
    Query(query): Query<AttendanceListQuery>,
) -> AppResult<Json<ApiResponse<AttendanceList>>> {
    let filter = filter_from_query(&query)?;
    let attendance = AttendanceRepository::new(state.db.clone());
    let records = attendance.find_filtered(filter).await?;

    let (page, limit) = paginate(query.page, query.limit, 20);
    let total = records.len();
    let page_records: Vec<Attendance> = records
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    let data = AttendanceList {
        attendance: populate_many(&state, &page_records).await?,
        pagination: pagination(page, limit, total),
    };
    Ok(Json(ApiResponse::success_with_message(
        "All attendance records retrieved successfully",
        data,
    )))
}

/// Status counts over an optional date range (ADMIN/HR)
pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<AttendanceListQuery>,
) -> AppResult<Json<ApiResponse<AttendanceSummary>>> {
    let attendance = AttendanceRepository::new(state.db.clone());
    let records = attendance
        .find_filtered(AttendanceFilter {
            start_date: query.start_date.clone(),
            end_date: query.end_date.clone(),
            status: None,
            employee: None,
        })
        .await?;

    let mut summary = AttendanceSummary {
        total: records.len(),
        present: 0,
        absent: 0,
        half_day: 0,
        leave: 0,
    };
    for record in &records {
        match record.status {
            AttendanceStatus::Present => summary.present += 1,
            AttendanceStatus::Absent => summary.absent += 1,
            AttendanceStatus::HalfDay => summary.half_day += 1,
            AttendanceStatus::Leave => summary.leave += 1,
        }
    }

    Ok(Json(ApiResponse::success_with_message(
        "Attendance summary retrieved successfully",
        summary,
    )))
}

fn csv_response(filename: String, content: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        content,
    )
        .into_response()
}

/// Export filtered attendance records as CSV (ADMIN/HR)
pub async fn export_attendance_csv(
    State(state): State<ServerState>,
    Query(query): Query<AttendanceListQuery>,
) -> AppResult<Response> {
    let filter = filter_from_query(&query)?;
    let attendance = AttendanceRepository::new(state.db.clone());
    let records = attendance.find_filtered(filter).await?;

    let employees = EmployeeRepository::new(state.db.clone());
    let employee_map: HashMap<String, Employee> = employees
        .find_all()
        .await?
        .into_iter()
        .filter_map(|e| {
            let key = e.id.as_ref()?.to_string();
            Some((key, e))
        })
        .collect();

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            let employee = employee_map.get(&record.employee.to_string());
            let name = employee.map(|e| e.full_name()).unwrap_or_default();
            vec![
                employee.map(|e| e.employee_code.clone()).unwrap_or_default(),
                name,
                employee.map(|e| e.department.clone()).unwrap_or_default(),
                record.date.clone(),
                record
                    .check_in
                    .map(format_time_of_day)
                    .unwrap_or_else(|| "N/A".to_string()),
                record
                    .check_out
                    .map(format_time_of_day)
                    .unwrap_or_else(|| "N/A".to_string()),
                record.working_hours.to_string(),
                record.status.as_str().to_string(),
                record.notes.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let content = to_csv(ATTENDANCE_CSV_HEADER, &rows);
    Ok(csv_response(
        format!("attendance_{}.csv", now_millis()),
        content,
    ))
}

/// Export the employee roster as CSV, ordered by code (ADMIN/HR)
pub async fn export_employees_csv(
    State(state): State<ServerState>,
) -> AppResult<Response> {
    let employees = EmployeeRepository::new(state.db.clone());
    let users = UserRepository::new(state.db.clone());

    let roster = employees.find_all_by_code().await?;
    let account_map: HashMap<String, User> = users
        .find_all()
        .await?
        .into_iter()
        .filter_map(|u| {
            let key = u.id.as_ref()?.to_string();
            Some((key, u))
        })
        .collect();

    let rows: Vec<Vec<String>> = roster
        .iter()
        .map(|e| {
            let email = account_map
                .get(&e.user.to_string())
                .map(|u| u.email.clone())
                .unwrap_or_default();
            vec![
                e.employee_code.clone(),
                e.first_name.clone(),
                e.last_name.clone(),
                email,
                e.department.clone(),
                e.designation.clone(),
                e.joining_date.clone(),
                e.phone.clone(),
                e.status.as_str().to_string(),
            ]
        })
        .collect();

    let content = to_csv(EMPLOYEES_CSV_HEADER, &rows);
    Ok(csv_response(
        format!("employees_{}.csv", now_millis()),
        content,
    ))
}

/// Create a record for any employee and date (ADMIN/HR)
pub async fn mark(
    State(state): State<ServerState>,
    Json(req): Json<MarkAttendanceRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AttendanceRecord>>)> {
    let (Some(employee_id), Some(date), Some(status)) = (
        req.employee_id.as_deref().filter(|s| !s.is_empty()),
        req.date.as_deref().filter(|s| !s.is_empty()),
        req.status,
    ) else {
        return Err(AppError::validation(
            "Employee ID, date, and status are required",
        ));
    };
    if parse_date(date).is_none() {
        return Err(AppError::validation("Invalid date format. Use YYYY-MM-DD"));
    }

    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_id(employee_id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::EmployeeNotFound, "Employee not found"))?;
    let employee_record_id = employee
        .id
        .clone()
        .ok_or_else(|| AppError::database("Employee record missing id"))?;

    let attendance = AttendanceRepository::new(state.db.clone());
    if attendance
        .find_by_employee_and_date(&employee_record_id, date)
        .await?
        .is_some()
    {
        return Err(AppError::with_message(
            ErrorCode::AttendanceAlreadyMarked,
            "Attendance record already exists for this date",
        ));
    }

    let hours = match (req.check_in, req.check_out) {
        (Some(check_in), Some(check_out)) => working_hours(check_in, check_out),
        _ => 0.0,
    };
    let now = now_millis();
    let record = attendance
        .create(Attendance {
            id: None,
            employee: employee_record_id,
            user: employee.user.clone(),
            company: employee.company.clone(),
            date: date.to_string(),
            check_in: req.check_in,
            check_out: req.check_out,
            working_hours: hours,
            status,
            notes: req.notes,
            created_at: now,
            updated_at: now,
        })
        .await?;

    let data = populate_one(&state, &record).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Attendance marked successfully",
            data,
        )),
    ))
}

/// Correct a record (ADMIN/HR). Hours are recomputed when both times
/// are known; an explicit status wins over the derived one.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAttendanceRequest>,
) -> AppResult<Json<ApiResponse<AttendanceRecord>>> {
    let attendance = AttendanceRepository::new(state.db.clone());
    let current = attendance
        .find_by_id(&id)
        .await?
        .ok_or_else(record_missing_error)?;

    let check_in = req.check_in.or(current.check_in);
    let check_out = req.check_out.or(current.check_out);
    let recomputed = match (check_in, check_out) {
        (Some(start), Some(end)) if req.check_in.is_some() || req.check_out.is_some() => {
            Some(working_hours(start, end))
        }
        _ => None,
    };
    let status = req
        .status
        .or_else(|| recomputed.map(status_for_hours));

    let updated = attendance
        .update(
            &id,
            AttendanceUpdate {
                check_in: req.check_in,
                check_out: req.check_out,
                working_hours: recomputed,
                status,
                notes: req.notes,
            },
        )
        .await?;

    let data = populate_one(&state, &updated).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Attendance updated successfully",
        data,
    )))
}

/// Remove a record (ADMIN/HR)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let attendance = AttendanceRepository::new(state.db.clone());
    attendance
        .find_by_id(&id)
        .await?
        .ok_or_else(record_missing_error)?;
    attendance.delete(&id).await?;

    Ok(Json(ApiResponse::ok_with_message(
        "Attendance deleted successfully",
    )))
}
