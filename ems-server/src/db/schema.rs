//! Schema definitions and seed data
//!
//! Tables stay schemaless; only the uniqueness guarantees the handlers
//! rely on are defined here. Seeding is idempotent and gives a fresh
//! install one company with the three standard leave types.

use crate::db::models::{Company, LeaveType};
use crate::utils::time::now_millis;
use shared::error::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Default leave allowances seeded for a new company.
pub const DEFAULT_LEAVE_TYPES: [(&str, u32); 3] = [
    ("Casual Leave", 8),
    ("Annual Leave", 15),
    ("Emergency Leave", 3),
];

/// Define unique indexes. Safe to run on every startup.
pub async fn define(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS user_email_idx ON user FIELDS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS employee_code_idx ON employee FIELDS employee_code UNIQUE;
        DEFINE INDEX IF NOT EXISTS attendance_employee_date_idx ON attendance FIELDS employee, date UNIQUE;
        DEFINE INDEX IF NOT EXISTS leave_type_company_name_idx ON leave_type FIELDS company, name UNIQUE;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define indexes: {e}")))?;
    Ok(())
}

/// The single company every account belongs to, created on first use.
/// Signup calls this too, so a wiped database heals itself without a
/// separate migration step.
pub async fn default_company(db: &Surreal<Db>) -> Result<Company, AppError> {
    let mut result = db
        .query("SELECT * FROM company LIMIT 1")
        .await
        .map_err(|e| AppError::database(format!("Failed to read companies: {e}")))?;
    let companies: Vec<Company> = result
        .take(0)
        .map_err(|e| AppError::database(format!("Failed to read companies: {e}")))?;

    match companies.into_iter().next() {
        Some(company) => Ok(company),
        None => {
            let mut company = Company::new("Default Company".to_string(), now_millis());
            company.email = Some("admin@company.com".to_string());
            company.phone = Some("1234567890".to_string());
            company.address = Some("Default Address".to_string());
            let created: Option<Company> = db
                .create("company")
                .content(company)
                .await
                .map_err(|e| AppError::database(format!("Failed to seed company: {e}")))?;
            let company = created.ok_or_else(|| AppError::database("Failed to seed company"))?;
            tracing::info!("Seeded default company");
            Ok(company)
        }
    }
}

/// Create the default company and its leave types when missing.
pub async fn seed(db: &Surreal<Db>) -> Result<(), AppError> {
    let now = now_millis();

    let company = default_company(db).await?;
    let company_id = company
        .id
        .ok_or_else(|| AppError::database("Seeded company has no id"))?;

    let mut result = db
        .query("SELECT * FROM leave_type WHERE company = $company")
        .bind(("company", company_id.clone()))
        .await
        .map_err(|e| AppError::database(format!("Failed to read leave types: {e}")))?;
    let existing: Vec<LeaveType> = result
        .take(0)
        .map_err(|e| AppError::database(format!("Failed to read leave types: {e}")))?;

    if existing.is_empty() {
        for (name, max_days) in DEFAULT_LEAVE_TYPES {
            let leave_type = LeaveType {
                id: None,
                company: company_id.clone(),
                name: name.to_string(),
                max_days_per_year: max_days,
                created_at: now,
                updated_at: now,
            };
            let _: Option<LeaveType> = db
                .create("leave_type")
                .content(leave_type)
                .await
                .map_err(|e| AppError::database(format!("Failed to seed leave types: {e}")))?;
        }
        tracing::info!("Seeded default leave types");
    }

    Ok(())
}
