//! Employee Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Employee, EmployeeDocument};
use crate::domain::salary::{Allowances, Deductions};
use crate::utils::time::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "employee";

#[derive(Clone)]
pub struct EmployeeRepository {
    base: BaseRepository,
}

impl EmployeeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find employee by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Employee>> {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let employee: Option<Employee> = self.base.db().select(rid).await?;
        Ok(employee)
    }

    /// Find the employee profile belonging to a user account
    pub async fn find_by_user(&self, user_id: &RecordId) -> RepoResult<Option<Employee>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM employee WHERE user = $user LIMIT 1")
            .bind(("user", user_id.clone()))
            .await?;
        let employees: Vec<Employee> = result.take(0)?;
        Ok(employees.into_iter().next())
    }

    /// Find employee by its unique code
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Employee>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM employee WHERE employee_code = $code LIMIT 1")
            .bind(("code", code.to_string()))
            .await?;
        let employees: Vec<Employee> = result.take(0)?;
        Ok(employees.into_iter().next())
    }

    /// All employees, newest profile first
    pub async fn find_all(&self) -> RepoResult<Vec<Employee>> {
        let employees: Vec<Employee> = self
            .base
            .db()
            .query("SELECT * FROM employee ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(employees)
    }

    /// All employees ordered by code, for exports and payroll listings
    pub async fn find_all_by_code(&self) -> RepoResult<Vec<Employee>> {
        let employees: Vec<Employee> = self
            .base
            .db()
            .query("SELECT * FROM employee ORDER BY employee_code")
            .await?
            .take(0)?;
        Ok(employees)
    }

    /// All employees of one department ordered by code
    pub async fn find_by_department(&self, department: &str) -> RepoResult<Vec<Employee>> {
        let employees: Vec<Employee> = self
            .base
            .db()
            .query("SELECT * FROM employee WHERE department = $department ORDER BY employee_code")
            .bind(("department", department.to_string()))
            .await?
            .take(0)?;
        Ok(employees)
    }

    /// Create a new employee profile
    pub async fn create(&self, employee: Employee) -> RepoResult<Employee> {
        if self.find_by_code(&employee.employee_code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Employee code '{}' already exists",
                employee.employee_code
            )));
        }

        let created: Option<Employee> = self.base.db().create(TABLE).content(employee).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create employee".to_string()))
    }

    /// Persist an already merged profile. Profile updates touch twenty-odd
    /// optional fields, so callers fetch, merge in Rust and store the whole
    /// document back, the same write shape the rest of the stack expects.
    pub async fn replace(&self, id: &RecordId, mut employee: Employee) -> RepoResult<Employee> {
        employee.id = None;
        employee.updated_at = now_millis();

        let updated: Option<Employee> = self
            .base
            .db()
            .update(id.clone())
            .content(employee)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))
    }

    /// Point the profile at a newly stored picture
    pub async fn set_profile_image(&self, id: &str, image_path: &str) -> RepoResult<Employee> {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET profile_image = $image, updated_at = $now RETURN AFTER")
            .bind(("thing", rid))
            .bind(("image", image_path.to_string()))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Employee>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))
    }

    /// Append an uploaded document to the profile
    pub async fn add_document(&self, id: &str, doc: EmployeeDocument) -> RepoResult<Employee> {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET documents += $doc, updated_at = $now RETURN AFTER")
            .bind(("thing", rid))
            .bind(("doc", doc))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Employee>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))
    }

    /// Drop one document from the profile by its embedded id
    pub async fn remove_document(&self, id: &str, document_id: &str) -> RepoResult<Employee> {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    documents = documents[WHERE id != $document_id],
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", rid))
            .bind(("document_id", document_id.to_string()))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Employee>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))
    }

    /// Overwrite the salary figures with fully resolved values. Callers
    /// merge partial input against the stored figures first.
    pub async fn update_salary(
        &self,
        id: &str,
        basic_salary: f64,
        allowances: Allowances,
        deductions: Deductions,
    ) -> RepoResult<Employee> {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    basic_salary = $basic_salary,
                    allowances = $allowances,
                    deductions = $deductions,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", rid))
            .bind(("basic_salary", basic_salary))
            .bind(("allowances", allowances))
            .bind(("deductions", deductions))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Employee>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))
    }
}
