//! Profile API Handlers
//!
//! Profiles are owner-or-admin: employees manage their own contact
//! details and documents, ADMIN/HR additionally edit placement and
//! compensation. Responses always carry the full profile with the
//! owning account joined in and the salary totals derived.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Multipart, Path, State};
use serde::{Deserialize, Serialize};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    Employee, EmployeeDocument, EmployeeStatus, Role, User, WorkType,
};
use crate::db::repository::{EmployeeRepository, UserRepository};
use crate::domain::salary::{self, Allowances, AllowancesPatch, Deductions, DeductionsPatch, SalaryTotals};
use crate::utils::time::now_millis;

/// Account summary joined onto profile payloads
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub role: Role,
    pub is_email_verified: bool,
}

impl ProfileUser {
    fn build(user: &User) -> AppResult<Self> {
        let id = user
            .id
            .clone()
            .ok_or_else(|| AppError::database("User record missing id"))?;
        Ok(Self {
            id: id.to_string(),
            email: user.email.clone(),
            role: user.role.clone(),
            is_email_verified: user.is_verified,
        })
    }
}

/// Full employee profile as served by the API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    #[serde(rename = "_id")]
    pub id: String,
    /// `null` when the owning account no longer exists
    pub user: Option<ProfileUser>,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub profile_image: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub department: String,
    pub designation: String,
    pub joining_date: String,
    pub work_type: WorkType,
    pub employment_type: Option<String>,
    pub work_location: Option<String>,
    pub reporting_to: Option<String>,
    pub status: EmployeeStatus,
    pub basic_salary: f64,
    pub allowances: Allowances,
    pub deductions: Deductions,
    /// Derived from the stored figures, never persisted
    pub salary: SalaryTotals,
    pub documents: Vec<EmployeeDocument>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl EmployeeResponse {
    fn build(employee: &Employee, user: Option<&User>) -> AppResult<Self> {
        let id = employee
            .id
            .clone()
            .ok_or_else(|| AppError::database("Employee record missing id"))?;
        Ok(Self {
            id: id.to_string(),
            user: user.map(ProfileUser::build).transpose()?,
            employee_code: employee.employee_code.clone(),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            phone: employee.phone.clone(),
            profile_image: employee.profile_image.clone(),
            address: employee.address.clone(),
            city: employee.city.clone(),
            state: employee.state.clone(),
            zip_code: employee.zip_code.clone(),
            country: employee.country.clone(),
            date_of_birth: employee.date_of_birth.clone(),
            gender: employee.gender.clone(),
            emergency_contact_name: employee.emergency_contact_name.clone(),
            emergency_contact_phone: employee.emergency_contact_phone.clone(),
            department: employee.department.clone(),
            designation: employee.designation.clone(),
            joining_date: employee.joining_date.clone(),
            work_type: employee.work_type.clone(),
            employment_type: employee.employment_type.clone(),
            work_location: employee.work_location.clone(),
            reporting_to: employee.reporting_to.as_ref().map(|r| r.to_string()),
            status: employee.status.clone(),
            basic_salary: employee.basic_salary,
            allowances: employee.allowances.clone(),
            deductions: employee.deductions.clone(),
            salary: salary::derive(
                employee.basic_salary,
                &employee.allowances,
                &employee.deductions,
            ),
            documents: employee.documents.clone(),
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        })
    }
}

/// Profile update payload. Unknown keys are rejected so misspelled
/// fields fail loudly instead of silently dropping an edit.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub joining_date: Option<String>,
    pub employment_type: Option<String>,
    pub work_location: Option<String>,
    pub reporting_to: Option<String>,
    pub basic_salary: Option<f64>,
    pub allowances: Option<AllowancesPatch>,
    pub deductions: Option<DeductionsPatch>,
}

fn find_employee_error() -> AppError {
    AppError::with_message(ErrorCode::EmployeeNotFound, "Employee not found")
}

/// Join the owning account onto a profile
async fn with_account(state: &ServerState, employee: &Employee) -> AppResult<EmployeeResponse> {
    let users = UserRepository::new(state.db.clone());
    let account = users.find_by_id(&employee.user.to_string()).await?;
    EmployeeResponse::build(employee, account.as_ref())
}

/// Get the signed-in user's own profile
pub async fn my_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<EmployeeResponse>>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees.find_by_user(&user.id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::EmployeeNotFound, "Employee profile not found")
    })?;

    let data = with_account(&state, &employee).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Profile retrieved successfully",
        data,
    )))
}

/// List every employee with account details (ADMIN/HR)
pub async fn all_employees(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<EmployeeResponse>>>> {
    if !user.role.is_admin() {
        return Err(AppError::permission_denied(
            "Access denied. Admin or HR role required.",
        ));
    }

    let employees = EmployeeRepository::new(state.db.clone());
    let users = UserRepository::new(state.db.clone());

    let all = employees.find_all().await?;
    let accounts: HashMap<String, User> = users
        .find_all()
        .await?
        .into_iter()
        .filter_map(|u| {
            let key = u.id.as_ref()?.to_string();
            Some((key, u))
        })
        .collect();

    let mut data = Vec::with_capacity(all.len());
    for employee in &all {
        let account = accounts.get(&employee.user.to_string());
        data.push(EmployeeResponse::build(employee, account)?);
    }

    Ok(Json(ApiResponse::success_with_message(
        "Employees retrieved successfully",
        data,
    )))
}

/// Get one employee's profile (owner or ADMIN/HR)
pub async fn get_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(employee_id): Path<String>,
) -> AppResult<Json<ApiResponse<EmployeeResponse>>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_id(&employee_id)
        .await?
        .ok_or_else(find_employee_error)?;

    if !user.role.is_admin() && employee.user != user.id {
        return Err(AppError::permission_denied(
            "You don't have permission to view this profile",
        ));
    }

    let data = with_account(&state, &employee).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Profile retrieved successfully",
        data,
    )))
}

/// Update a profile. Contact fields are owner-editable; placement and
/// compensation fields only apply for ADMIN/HR and are silently ignored
/// otherwise.
pub async fn update_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(employee_id): Path<String>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<EmployeeResponse>>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let mut employee = employees
        .find_by_id(&employee_id)
        .await?
        .ok_or_else(find_employee_error)?;

    let is_admin = user.role.is_admin();
    if !is_admin && employee.user != user.id {
        return Err(AppError::permission_denied(
            "You don't have permission to update this profile",
        ));
    }

    if let Some(v) = req.phone {
        employee.phone = v;
    }
    if let Some(v) = req.address {
        employee.address = Some(v);
    }
    if let Some(v) = req.city {
        employee.city = Some(v);
    }
    if let Some(v) = req.state {
        employee.state = Some(v);
    }
    if let Some(v) = req.zip_code {
        employee.zip_code = Some(v);
    }
    if let Some(v) = req.country {
        employee.country = Some(v);
    }
    if let Some(v) = req.emergency_contact_name {
        employee.emergency_contact_name = Some(v);
    }
    if let Some(v) = req.emergency_contact_phone {
        employee.emergency_contact_phone = Some(v);
    }

    if is_admin {
        if let Some(v) = req.first_name {
            employee.first_name = v;
        }
        if let Some(v) = req.last_name {
            employee.last_name = v;
        }
        if let Some(v) = req.date_of_birth {
            employee.date_of_birth = Some(v);
        }
        if let Some(v) = req.gender {
            employee.gender = Some(v);
        }
        if let Some(v) = req.department {
            employee.department = v;
        }
        if let Some(v) = req.designation {
            employee.designation = v;
        }
        if let Some(v) = req.joining_date {
            employee.joining_date = v;
        }
        if let Some(v) = req.employment_type {
            employee.employment_type = Some(v);
        }
        if let Some(v) = req.work_location {
            employee.work_location = Some(v);
        }
        if let Some(v) = req.reporting_to {
            employee.reporting_to = if v.is_empty() {
                None
            } else {
                Some(v.parse().map_err(|_| {
                    AppError::validation("Invalid reporting employee id")
                })?)
            };
        }
        if let Some(v) = req.basic_salary {
            if v < 0.0 {
                return Err(AppError::with_message(
                    ErrorCode::SalaryInvalidAmount,
                    "Basic salary cannot be negative",
                ));
            }
            employee.basic_salary = v;
        }
        if let Some(patch) = &req.allowances {
            patch.apply(&mut employee.allowances);
        }
        if let Some(patch) = &req.deductions {
            patch.apply(&mut employee.deductions);
        }
    }

    let record_id = employee
        .id
        .clone()
        .ok_or_else(|| AppError::database("Employee record missing id"))?;
    let updated = employees.replace(&record_id, employee).await?;

    let data = with_account(&state, &updated).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Profile updated successfully",
        data,
    )))
}

/// Read one multipart upload: the named file field plus any text fields.
async fn read_multipart(
    multipart: &mut Multipart,
    file_field: &str,
) -> AppResult<(Option<(String, Vec<u8>)>, HashMap<String, String>)> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut texts = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string());
        if name.as_deref() == Some(file_field) {
            let file_name = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_default();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Failed to read upload: {}", e)))?;
            file = Some((file_name, data.to_vec()));
        } else if let Some(name) = name {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::validation(format!("Failed to read field: {}", e)))?;
            texts.insert(name, value);
        }
    }

    Ok((file, texts))
}

/// Upload a profile picture (owner or ADMIN/HR)
pub async fn upload_picture(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(employee_id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<EmployeeResponse>>> {
    let (file, _) = read_multipart(&mut multipart, "image").await?;
    let Some((file_name, data)) = file else {
        return Err(AppError::with_message(
            ErrorCode::NoFileProvided,
            "Please upload an image file",
        ));
    };

    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_id(&employee_id)
        .await?
        .ok_or_else(find_employee_error)?;

    if !user.role.is_admin() && employee.user != user.id {
        return Err(AppError::permission_denied(
            "You don't have permission to update this profile picture",
        ));
    }

    let stored = state.storage.store_profile_picture(&data, &file_name)?;
    let updated = employees.set_profile_image(&employee_id, &stored.url).await?;

    tracing::info!(employee = %employee_id, file = %stored.file_name, "Profile picture updated");

    let data = with_account(&state, &updated).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Profile picture uploaded successfully",
        data,
    )))
}

/// Attach a document to a profile (owner or ADMIN/HR)
pub async fn upload_document(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(employee_id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<EmployeeResponse>>> {
    let (file, texts) = read_multipart(&mut multipart, "document").await?;
    let Some((file_name, data)) = file else {
        return Err(AppError::with_message(
            ErrorCode::NoFileProvided,
            "Please upload a document file",
        ));
    };
    let Some(doc_type) = texts.get("type").filter(|t| !t.is_empty()) else {
        return Err(AppError::validation("Please provide document type"));
    };

    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_id(&employee_id)
        .await?
        .ok_or_else(find_employee_error)?;

    if !user.role.is_admin() && employee.user != user.id {
        return Err(AppError::permission_denied(
            "You don't have permission to upload documents",
        ));
    }

    let stored = state.storage.store_document(&data, &file_name)?;
    let document = EmployeeDocument {
        id: Uuid::new_v4().to_string(),
        doc_type: doc_type.clone(),
        name: file_name,
        url: stored.url,
        uploaded_at: now_millis(),
    };
    let updated = employees.add_document(&employee_id, document).await?;

    let data = with_account(&state, &updated).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Document uploaded successfully",
        data,
    )))
}

/// Remove a document from a profile (owner or ADMIN/HR)
///
/// Only the record is removed. Stored files are content-addressed and
/// may back documents on other profiles, so the blob stays on disk.
pub async fn delete_document(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((employee_id, document_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<EmployeeResponse>>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_id(&employee_id)
        .await?
        .ok_or_else(find_employee_error)?;

    if !user.role.is_admin() && employee.user != user.id {
        return Err(AppError::permission_denied(
            "You don't have permission to delete documents",
        ));
    }

    if employee.document(&document_id).is_none() {
        return Err(AppError::with_message(
            ErrorCode::DocumentNotFound,
            "Document not found",
        ));
    }

    let updated = employees.remove_document(&employee_id, &document_id).await?;

    let data = with_account(&state, &updated).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Document deleted successfully",
        data,
    )))
}
