//! Authentication API Handlers
//!
//! Registration creates an unverified account plus its employee profile
//! in one step; signin only succeeds after the email OTP has been
//! confirmed. Sessions are JWT in an HTTP-only `token` cookie.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::db::models::{Employee, EmployeeStatus, Role, User};
use crate::db::repository::{EmployeeRepository, UserRepository, user::UserCreate};
use crate::db::schema;
use crate::utils::time::{now_millis, today_string};
use crate::utils::validation::{email_is_valid, normalize_email, password_issue};

/// Verification OTP lifetime (10 minutes)
const OTP_TTL_MILLIS: i64 = 10 * 60 * 1000;

/// Flat response time for credential checks, so a failed lookup is not
/// distinguishable from a failed password by latency.
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub employee_id: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub role: Role,
    pub is_email_verified: bool,
    pub email_sent: bool,
    pub employee: SignupEmployee,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupEmployee {
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResendVerificationRequest {
    pub email: Option<String>,
}

/// Account payload returned by signin and `/me`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub role: Role,
    pub is_email_verified: bool,
    /// `null` when no employee profile exists for the account
    pub employee: Option<EmployeeInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub department: String,
    pub designation: String,
    pub profile_image: Option<String>,
    pub status: EmployeeStatus,
}

impl EmployeeInfo {
    fn from_employee(employee: &Employee) -> AppResult<Self> {
        let id = employee
            .id
            .clone()
            .ok_or_else(|| AppError::database("Employee record missing id"))?;
        Ok(Self {
            id: id.to_string(),
            employee_code: employee.employee_code.clone(),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            phone: employee.phone.clone(),
            department: employee.department.clone(),
            designation: employee.designation.clone(),
            profile_image: employee.profile_image.clone(),
            status: employee.status.clone(),
        })
    }
}

fn build_user_info(user: &User, employee: Option<&Employee>) -> AppResult<UserInfo> {
    let id = user
        .id
        .clone()
        .ok_or_else(|| AppError::database("User record missing id"))?;
    Ok(UserInfo {
        id: id.to_string(),
        email: user.email.clone(),
        role: user.role.clone(),
        is_email_verified: user.is_verified,
        employee: employee.map(EmployeeInfo::from_employee).transpose()?,
    })
}

/// Treat empty strings the same as absent fields
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn generate_otp() -> String {
    rand::thread_rng().gen_range(100000..1000000).to_string()
}

fn parse_role(role: &str) -> AppResult<Role> {
    match role {
        "ADMIN" => Ok(Role::Admin),
        "HR" => Ok(Role::Hr),
        "EMPLOYEE" => Ok(Role::Employee),
        _ => Err(AppError::validation(
            "Invalid role. Must be ADMIN, HR, or EMPLOYEE",
        )),
    }
}

/// Register a new account with its employee profile
pub async fn signup(
    State(state): State<ServerState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SignupResponse>>)> {
    let (Some(employee_code), Some(email), Some(password)) = (
        non_empty(&req.employee_id),
        non_empty(&req.email),
        non_empty(&req.password),
    ) else {
        return Err(AppError::validation(
            "Employee ID, email, and password are required",
        ));
    };

    if let Some(issue) = password_issue(password) {
        return Err(AppError::with_message(ErrorCode::PasswordTooWeak, issue));
    }
    if !email_is_valid(email) {
        return Err(AppError::validation("Please provide a valid email address"));
    }
    let role = match non_empty(&req.role) {
        Some(role) => parse_role(role)?,
        None => Role::Employee,
    };

    let email = normalize_email(email);
    let users = UserRepository::new(state.db.clone());
    let employees = EmployeeRepository::new(state.db.clone());

    if users.find_by_email(&email).await?.is_some() {
        return Err(AppError::with_message(
            ErrorCode::EmailExists,
            "User with this email already exists",
        ));
    }
    if employees.find_by_code(employee_code).await?.is_some() {
        return Err(AppError::with_message(
            ErrorCode::EmployeeCodeExists,
            "Employee ID already exists",
        ));
    }

    let company = schema::default_company(&state.db).await?;
    let company_id = company
        .id
        .ok_or_else(|| AppError::database("Company record missing id"))?;

    let otp = generate_otp();
    let now = now_millis();
    let user = users
        .create(UserCreate {
            company: company_id.clone(),
            email,
            password: password.to_string(),
            role,
            verification_code: otp.clone(),
            verification_expires_at: now + OTP_TTL_MILLIS,
        })
        .await?;
    let user_id = user
        .id
        .clone()
        .ok_or_else(|| AppError::database("User record missing id"))?;

    let first_name = non_empty(&req.first_name).unwrap_or_default();
    let employee = employees
        .create(Employee::new(
            user_id.clone(),
            company_id,
            employee_code.to_string(),
            first_name.to_string(),
            non_empty(&req.last_name).unwrap_or_default().to_string(),
            non_empty(&req.phone).unwrap_or_default().to_string(),
            non_empty(&req.department).unwrap_or_default().to_string(),
            non_empty(&req.designation).unwrap_or_default().to_string(),
            today_string(),
            now,
        ))
        .await?;

    // Registration still succeeds when the mail transport is down; the
    // user can request a fresh OTP from the verification page.
    let display_name = if first_name.is_empty() { "User" } else { first_name };
    let email_sent = match state
        .mailer
        .send_verification_code(&user.email, display_name, &otp)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(email = %user.email, "Verification email failed: {}", e.message);
            false
        }
    };

    let message = if email_sent {
        "Registration successful! Please check your email to verify your account."
    } else {
        "Registration successful! However, we couldn't send the verification email. Please try 'Resend OTP' on the verification page."
    };

    let data = SignupResponse {
        id: user_id.to_string(),
        email: user.email.clone(),
        role: user.role,
        is_email_verified: false,
        email_sent,
        employee: SignupEmployee {
            employee_code: employee.employee_code,
            first_name: employee.first_name,
            last_name: employee.last_name,
        },
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(message, data)),
    ))
}

/// Confirm an email address with the OTP sent at signup
pub async fn verify_email(
    State(state): State<ServerState>,
    Json(req): Json<VerifyEmailRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let (Some(email), Some(otp)) = (non_empty(&req.email), non_empty(&req.otp)) else {
        return Err(AppError::validation("Email and OTP are required"));
    };

    let users = UserRepository::new(state.db.clone());
    let user = users.find_by_email(&normalize_email(email)).await?;

    // One error for unknown email, wrong code and expired code alike.
    let valid = user.as_ref().is_some_and(|u| {
        u.verification_code.as_deref() == Some(otp)
            && u.verification_expires_at.is_some_and(|at| at > now_millis())
    });
    let Some(user) = user.filter(|_| valid) else {
        return Err(AppError::with_message(
            ErrorCode::VerificationCodeInvalid,
            "Invalid or expired OTP",
        ));
    };

    let user_id = user
        .id
        .clone()
        .ok_or_else(|| AppError::database("User record missing id"))?;
    users.mark_verified(&user_id).await?;

    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees.find_by_user(&user_id).await?;
    let display_name = employee
        .as_ref()
        .map(|e| e.first_name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("User");
    if let Err(e) = state.mailer.send_welcome(&user.email, display_name).await {
        tracing::warn!(email = %user.email, "Welcome email failed: {}", e.message);
    }

    Ok(Json(ApiResponse::ok_with_message(
        "Email verified successfully! You can now log in.",
    )))
}

/// Sign in with email and password, setting the session cookie
pub async fn signin(
    State(state): State<ServerState>,
    Json(req): Json<SigninRequest>,
) -> AppResult<Response> {
    let (Some(email), Some(password)) = (non_empty(&req.email), non_empty(&req.password)) else {
        return Err(AppError::validation("Email and password are required"));
    };

    let users = UserRepository::new(state.db.clone());
    let user = users.find_by_email(&normalize_email(email)).await?;

    tokio::time::sleep(std::time::Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let Some(user) = user else {
        return Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            "Invalid email or password",
        ));
    };
    if !user.is_active {
        return Err(AppError::with_message(
            ErrorCode::AccountDisabled,
            "Your account has been deactivated. Please contact HR.",
        ));
    }
    if !user.is_verified {
        return Err(AppError::with_message(
            ErrorCode::EmailNotVerified,
            "Please verify your email before logging in",
        ));
    }
    let password_ok = user
        .verify_password(password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !password_ok {
        return Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            "Invalid email or password",
        ));
    }

    let user_id = user
        .id
        .clone()
        .ok_or_else(|| AppError::database("User record missing id"))?;
    let token = state
        .jwt_service
        .generate_token(&user_id.to_string())
        .map_err(|e| AppError::internal(format!("Failed to issue token: {}", e)))?;
    let cookie = state
        .jwt_service
        .build_auth_cookie(&token, state.config.is_production());

    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees.find_by_user(&user_id).await?;
    let data = build_user_info(&user, employee.as_ref())?;

    tracing::info!(email = %user.email, "User signed in");

    let mut response =
        Json(ApiResponse::success_with_message("Login successful", data)).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::internal(format!("Invalid cookie value: {}", e)))?,
    );
    Ok(response)
}

/// Clear the session cookie
pub async fn logout(State(state): State<ServerState>) -> AppResult<Response> {
    let cookie = JwtService::build_logout_cookie(state.config.is_production());
    let mut response =
        Json(ApiResponse::ok_with_message("Logged out successfully")).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::internal(format!("Invalid cookie value: {}", e)))?,
    );
    Ok(response)
}

/// Return the signed-in account with its employee summary
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    let users = UserRepository::new(state.db.clone());
    let account = users.find_by_id(&user.id.to_string()).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::NotAuthenticated,
            "User not found. Please log in again",
        )
    })?;

    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees.find_by_user(&user.id).await?;
    let data = build_user_info(&account, employee.as_ref())?;

    Ok(Json(ApiResponse::success_with_message(
        "User fetched successfully",
        data,
    )))
}

/// Issue a fresh verification OTP for an unverified account
pub async fn resend_verification(
    State(state): State<ServerState>,
    Json(req): Json<ResendVerificationRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let Some(email) = non_empty(&req.email) else {
        return Err(AppError::validation("Email is required"));
    };

    let users = UserRepository::new(state.db.clone());
    let user = users
        .find_by_email(&normalize_email(email))
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    if user.is_verified {
        return Err(AppError::with_message(
            ErrorCode::EmailAlreadyVerified,
            "Email is already verified",
        ));
    }

    let user_id = user
        .id
        .clone()
        .ok_or_else(|| AppError::database("User record missing id"))?;
    let otp = generate_otp();
    users
        .set_verification_code(&user_id, &otp, now_millis() + OTP_TTL_MILLIS)
        .await?;

    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees.find_by_user(&user_id).await?;
    let display_name = employee
        .as_ref()
        .map(|e| e.first_name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("User");

    // Unlike signup, a resend that cannot be delivered is an error.
    state
        .mailer
        .send_verification_code(&user.email, display_name, &otp)
        .await?;

    Ok(Json(ApiResponse::ok_with_message(
        "Verification OTP sent successfully to your email",
    )))
}
