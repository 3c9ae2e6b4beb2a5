//! Salary API Handlers
//!
//! There is no salary table. Every figure is derived on read from the
//! compensation fields of the employee profile, so an update to any
//! component is visible in all derived views immediately.

use std::collections::{BTreeMap, HashMap};

use axum::Json;
use axum::extract::{Path, Query, State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::api::{Pagination, paginate, pagination};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Employee, User};
use crate::db::repository::{EmployeeRepository, UserRepository};
use crate::domain::money::{to_decimal, to_f64};
use crate::domain::salary::{
    Allowances, AllowancesPatch, CURRENCY, Deductions, DeductionsPatch, MonthlySalary,
    SalaryTotals, derive, monthly_history,
};
use crate::utils::time::current_year;

/// One employee's derived salary breakdown
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryBreakdown {
    pub employee_id: String,
    pub employee_name: String,
    pub employee_code: String,
    pub department: String,
    pub designation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub basic_salary: f64,
    pub allowances: Allowances,
    pub deductions: Deductions,
    #[serde(flatten)]
    pub totals: SalaryTotals,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct SalaryList {
    pub salaries: Vec<SalaryBreakdown>,
    pub pagination: Pagination,
}

/// Company-wide payroll rollup
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryStatistics {
    pub total_employees: usize,
    pub total_payroll: f64,
    pub average_salary: f64,
    pub department_wise_payroll: BTreeMap<String, f64>,
    pub currency: String,
}

/// Partial salary update. Absent keys keep their stored values;
/// unknown keys are rejected.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateSalaryRequest {
    pub basic_salary: Option<f64>,
    pub allowances: Option<AllowancesPatch>,
    pub deductions: Option<DeductionsPatch>,
}

#[derive(Debug, Deserialize)]
pub struct SalaryListQuery {
    pub department: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

fn profile_missing_error() -> AppError {
    AppError::with_message(ErrorCode::EmployeeNotFound, "Employee profile not found")
}

fn breakdown(employee: &Employee, email: Option<String>) -> AppResult<SalaryBreakdown> {
    let id = employee
        .id
        .clone()
        .ok_or_else(|| AppError::database("Employee record missing id"))?;
    let totals = derive(
        employee.basic_salary,
        &employee.allowances,
        &employee.deductions,
    );
    Ok(SalaryBreakdown {
        employee_id: id.to_string(),
        employee_name: employee.full_name(),
        employee_code: employee.employee_code.clone(),
        department: employee.department.clone(),
        designation: employee.designation.clone(),
        email,
        basic_salary: employee.basic_salary,
        allowances: employee.allowances,
        deductions: employee.deductions,
        totals,
        currency: CURRENCY.to_string(),
    })
}

/// The signed-in employee's salary breakdown
pub async fn my_salary(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<SalaryBreakdown>>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_user(&user.id)
        .await?
        .ok_or_else(profile_missing_error)?;

    let data = breakdown(&employee, None)?;
    Ok(Json(ApiResponse::success_with_message(
        "Salary details retrieved successfully",
        data,
    )))
}

/// Twelve month rows synthesized from the current figures
pub async fn my_history(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<ApiResponse<Vec<MonthlySalary>>>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_user(&user.id)
        .await?
        .ok_or_else(profile_missing_error)?;

    let year = query.year.unwrap_or_else(current_year);
    let data = monthly_history(
        year,
        employee.basic_salary,
        &employee.allowances,
        &employee.deductions,
    );
    Ok(Json(ApiResponse::success_with_message(
        "Salary history retrieved successfully",
        data,
    )))
}

/// Salary rows for every employee, ordered by code (ADMIN/HR)
pub async fn all_salaries(
    State(state): State<ServerState>,
    Query(query): Query<SalaryListQuery>,
) -> AppResult<Json<ApiResponse<SalaryList>>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let roster = match query.department.as_deref().filter(|s| !s.is_empty()) {
        Some(department) => employees.find_by_department(department).await?,
        None => employees.find_all_by_code().await?,
    };

    let (page, limit) = paginate(query.page, query.limit, 50);
    let total = roster.len();
    let page_rows: Vec<Employee> = roster
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    let users = UserRepository::new(state.db.clone());
    let account_map: HashMap<String, User> = users
        .find_all()
        .await?
        .into_iter()
        .filter_map(|u| {
            let key = u.id.as_ref()?.to_string();
            Some((key, u))
        })
        .collect();

    let salaries = page_rows
        .iter()
        .map(|employee| {
            let email = account_map
                .get(&employee.user.to_string())
                .map(|u| u.email.clone());
            breakdown(employee, email)
        })
        .collect::<AppResult<Vec<SalaryBreakdown>>>()?;

    let data = SalaryList {
        salaries,
        pagination: pagination(page, limit, total),
    };
    Ok(Json(ApiResponse::success_with_message(
        "Salary data retrieved successfully",
        data,
    )))
}

fn invalid_amount_error() -> AppError {
    AppError::with_message(
        ErrorCode::SalaryInvalidAmount,
        "Salary amounts cannot be negative",
    )
}

fn has_negative(req: &UpdateSalaryRequest) -> bool {
    req.basic_salary.is_some_and(|v| v < 0.0)
        || req.allowances.as_ref().is_some_and(|a| {
            [a.hra, a.transport, a.medical, a.other]
                .iter()
                .flatten()
                .any(|v| *v < 0.0)
        })
        || req.deductions.as_ref().is_some_and(|d| {
            [d.tax, d.provident_fund, d.insurance, d.other]
                .iter()
                .flatten()
                .any(|v| *v < 0.0)
        })
}

/// Merge a partial salary update into an employee profile (ADMIN/HR)
pub async fn update_salary(
    State(state): State<ServerState>,
    Path(employee_id): Path<String>,
    Json(req): Json<UpdateSalaryRequest>,
) -> AppResult<Json<ApiResponse<SalaryBreakdown>>> {
    if has_negative(&req) {
        return Err(invalid_amount_error());
    }

    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_id(&employee_id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::EmployeeNotFound, "Employee not found"))?;

    let basic_salary = req.basic_salary.unwrap_or(employee.basic_salary);
    let mut allowances = employee.allowances;
    if let Some(patch) = &req.allowances {
        patch.apply(&mut allowances);
    }
    let mut deductions = employee.deductions;
    if let Some(patch) = &req.deductions {
        patch.apply(&mut deductions);
    }

    let updated = employees
        .update_salary(&employee_id, basic_salary, allowances, deductions)
        .await?;

    let data = breakdown(&updated, None)?;
    Ok(Json(ApiResponse::success_with_message(
        "Salary updated successfully",
        data,
    )))
}

/// Payroll totals and department split (ADMIN/HR)
pub async fn statistics(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<SalaryStatistics>>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let roster = employees.find_all().await?;

    let mut total_payroll = Decimal::ZERO;
    let mut by_department: BTreeMap<String, Decimal> = BTreeMap::new();
    for employee in &roster {
        let totals = derive(
            employee.basic_salary,
            &employee.allowances,
            &employee.deductions,
        );
        let net = to_decimal(totals.net_salary);
        total_payroll += net;
        if !employee.department.is_empty() {
            *by_department
                .entry(employee.department.clone())
                .or_default() += net;
        }
    }

    let average = if roster.is_empty() {
        Decimal::ZERO
    } else {
        total_payroll / Decimal::from(roster.len())
    };
    let data = SalaryStatistics {
        total_employees: roster.len(),
        total_payroll: to_f64(total_payroll),
        average_salary: to_f64(average),
        department_wise_payroll: by_department
            .into_iter()
            .map(|(department, net)| (department, to_f64(net)))
            .collect(),
        currency: CURRENCY.to_string(),
    };
    Ok(Json(ApiResponse::success_with_message(
        "Salary statistics retrieved successfully",
        data,
    )))
}
