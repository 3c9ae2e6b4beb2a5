//! Dashboard API Handlers
//!
//! Read-only rollups over the attendance, leave and profile stores.
//! Every figure is recomputed at request time; these are advisory
//! numbers, not transactional data.

use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use chrono::Duration;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::api::leave::{LeaveBalance, balance_rows};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    Attendance, AttendanceStatus, Employee, LeaveRequest, LeaveStatus, LeaveType,
};
use crate::db::repository::{
    AttendanceRepository, EmployeeRepository, LeaveRepository, leave::LeaveRequestFilter,
};
use crate::domain::attendance::attendance_rate;
use crate::domain::money::{to_decimal, to_f64};
use crate::domain::salary::derive;
use crate::utils::time::{current_year, format_date, today, today_string, year_bounds};

/// Employee dashboard payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDashboard {
    pub stats: EmployeeStats,
    pub leave_balance: Vec<LeaveBalance>,
    pub recent_activities: EmployeeActivities,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStats {
    pub attendance_rate: u32,
    pub leaves_remaining: i64,
    pub pending_leaves: usize,
    pub net_salary: f64,
}

#[derive(Debug, Serialize)]
pub struct EmployeeActivities {
    pub attendance: Vec<ActivityAttendance>,
    pub leaves: Vec<ActivityLeave>,
}

/// Admin dashboard payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub stats: AdminStats,
    pub recent_activities: AdminActivities,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_employees: usize,
    pub present_today: usize,
    pub absent_today: usize,
    pub pending_leaves: usize,
    pub approved_leaves: usize,
    pub total_payroll: f64,
    pub average_salary: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminActivities {
    pub attendance: Vec<ActivityAttendance>,
    pub leave_requests: Vec<ActivityLeave>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEmployee {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub employee_code: String,
    pub department: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityAttendance {
    #[serde(rename = "_id")]
    pub id: String,
    pub employee: Option<ActivityEmployee>,
    pub date: String,
    pub check_in: Option<i64>,
    pub check_out: Option<i64>,
    pub working_hours: f64,
    pub status: AttendanceStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLeave {
    #[serde(rename = "_id")]
    pub id: String,
    pub employee: Option<ActivityEmployee>,
    pub leave_type: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub total_days: i64,
    pub status: LeaveStatus,
    pub created_at: i64,
}

fn profile_missing_error() -> AppError {
    AppError::with_message(ErrorCode::EmployeeNotFound, "Employee profile not found")
}

fn activity_employee(employee: &Employee) -> AppResult<ActivityEmployee> {
    let id = employee
        .id
        .clone()
        .ok_or_else(|| AppError::database("Employee record missing id"))?;
    Ok(ActivityEmployee {
        id: id.to_string(),
        first_name: employee.first_name.clone(),
        last_name: employee.last_name.clone(),
        employee_code: employee.employee_code.clone(),
        department: employee.department.clone(),
    })
}

fn attendance_activity(
    record: &Attendance,
    employee: Option<&Employee>,
) -> AppResult<ActivityAttendance> {
    let id = record
        .id
        .clone()
        .ok_or_else(|| AppError::database("Attendance record missing id"))?;
    Ok(ActivityAttendance {
        id: id.to_string(),
        employee: employee.map(activity_employee).transpose()?,
        date: record.date.clone(),
        check_in: record.check_in,
        check_out: record.check_out,
        working_hours: record.working_hours,
        status: record.status.clone(),
    })
}

fn leave_activity(
    record: &LeaveRequest,
    employee: Option<&Employee>,
    leave_type: Option<&LeaveType>,
) -> AppResult<ActivityLeave> {
    let id = record
        .id
        .clone()
        .ok_or_else(|| AppError::database("Leave request missing id"))?;
    Ok(ActivityLeave {
        id: id.to_string(),
        employee: employee.map(activity_employee).transpose()?,
        leave_type: leave_type.map(|t| t.name.clone()),
        start_date: record.start_date.clone(),
        end_date: record.end_date.clone(),
        total_days: record.total_days,
        status: record.status.clone(),
        created_at: record.created_at,
    })
}

/// Stats for the signed-in employee: trailing 30-day attendance rate,
/// leave balances, pending requests, derived net salary, recent rows
pub async fn employee_stats(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<EmployeeDashboard>>> {
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
    let window_start = format_date(today() - Duration::days(30));
    let recent_window = attendance
        .find_by_employee_since(&employee_id, &window_start)
        .await?;
    let statuses: Vec<AttendanceStatus> =
        recent_window.iter().map(|r| r.status.clone()).collect();
    let rate = attendance_rate(&statuses);

    let balance = balance_rows(&state, &employee_id, &user.company, current_year()).await?;
    let leaves_remaining: i64 = balance.iter().map(|row| row.remaining).sum();

    let leaves = LeaveRepository::new(state.db.clone());
    let pending = leaves
        .find_filtered(LeaveRequestFilter {
            employee: Some(employee_id.clone()),
            status: Some(LeaveStatus::Pending.as_str().to_string()),
            start_from: None,
            start_to: None,
        })
        .await?
        .len();

    let net_salary = derive(
        employee.basic_salary,
        &employee.allowances,
        &employee.deductions,
    )
    .net_salary;

    let recent_attendance = attendance
        .find_by_employee(&employee_id)
        .await?
        .iter()
        .take(5)
        .map(|record| attendance_activity(record, Some(&employee)))
        .collect::<AppResult<Vec<ActivityAttendance>>>()?;

    let type_map: HashMap<String, LeaveType> = leaves
        .find_types(&user.company)
        .await?
        .into_iter()
        .filter_map(|t| {
            let key = t.id.as_ref()?.to_string();
            Some((key, t))
        })
        .collect();
    let recent_leaves = leaves
        .find_filtered(LeaveRequestFilter {
            employee: Some(employee_id),
            status: None,
            start_from: None,
            start_to: None,
        })
        .await?
        .iter()
        .take(3)
        .map(|record| {
            leave_activity(
                record,
                Some(&employee),
                type_map.get(&record.leave_type.to_string()),
            )
        })
        .collect::<AppResult<Vec<ActivityLeave>>>()?;

    let data = EmployeeDashboard {
        stats: EmployeeStats {
            attendance_rate: rate,
            leaves_remaining,
            pending_leaves: pending,
            net_salary,
        },
        leave_balance: balance,
        recent_activities: EmployeeActivities {
            attendance: recent_attendance,
            leaves: recent_leaves,
        },
    };
    Ok(Json(ApiResponse::success_with_message(
        "Dashboard statistics retrieved successfully",
        data,
    )))
}

/// Company-wide stats (ADMIN/HR): headcount, today's presence, leave
/// counts, payroll totals, recent rows
pub async fn admin_stats(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<AdminDashboard>>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let roster = employees.find_all().await?;
    let total_employees = roster.len();

    let attendance = AttendanceRepository::new(state.db.clone());
    let present_today = attendance
        .find_by_date(&today_string())
        .await?
        .iter()
        .filter(|r| r.status == AttendanceStatus::Present)
        .count();
    let absent_today = total_employees.saturating_sub(present_today);

    let leaves = LeaveRepository::new(state.db.clone());
    let pending_leaves = leaves
        .find_filtered(LeaveRequestFilter {
            employee: None,
            status: Some(LeaveStatus::Pending.as_str().to_string()),
            start_from: None,
            start_to: None,
        })
        .await?
        .len();
    let (year_start, year_end) = year_bounds(current_year());
    let approved_leaves = leaves
        .find_filtered(LeaveRequestFilter {
            employee: None,
            status: Some(LeaveStatus::Approved.as_str().to_string()),
            start_from: Some(year_start),
            start_to: Some(year_end),
        })
        .await?
        .len();

    let mut total_payroll = Decimal::ZERO;
    for employee in &roster {
        let totals = derive(
            employee.basic_salary,
            &employee.allowances,
            &employee.deductions,
        );
        total_payroll += to_decimal(totals.net_salary);
    }
    let average_salary = if total_employees > 0 {
        (total_payroll / Decimal::from(total_employees))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };

    let employee_map: HashMap<String, Employee> = roster
        .into_iter()
        .filter_map(|e| {
            let key = e.id.as_ref()?.to_string();
            Some((key, e))
        })
        .collect();
    let recent_attendance = attendance
        .find_recent(10)
        .await?
        .iter()
        .map(|record| attendance_activity(record, employee_map.get(&record.employee.to_string())))
        .collect::<AppResult<Vec<ActivityAttendance>>>()?;

    let type_map: HashMap<String, LeaveType> = leaves
        .find_types(&user.company)
        .await?
        .into_iter()
        .filter_map(|t| {
            let key = t.id.as_ref()?.to_string();
            Some((key, t))
        })
        .collect();
    let recent_leave_requests = leaves
        .find_recent(5)
        .await?
        .iter()
        .map(|record| {
            leave_activity(
                record,
                employee_map.get(&record.employee.to_string()),
                type_map.get(&record.leave_type.to_string()),
            )
        })
        .collect::<AppResult<Vec<ActivityLeave>>>()?;

    let data = AdminDashboard {
        stats: AdminStats {
            total_employees,
            present_today,
            absent_today,
            pending_leaves,
            approved_leaves,
            total_payroll: to_f64(total_payroll),
            average_salary: to_f64(average_salary),
        },
        recent_activities: AdminActivities {
            attendance: recent_attendance,
            leave_requests: recent_leave_requests,
        },
    };
    Ok(Json(ApiResponse::success_with_message(
        "Admin dashboard statistics retrieved successfully",
        data,
    )))
}
