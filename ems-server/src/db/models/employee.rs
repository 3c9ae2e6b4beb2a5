//! Employee Model
//!
//! Profile data for one staff member: personal and contact details, job
//! placement, the salary figures the pay endpoints derive from, and any
//! uploaded documents. One profile per user account.

use super::serde_helpers;
use super::{CompanyId, UserId};
use crate::domain::salary::{Allowances, Deductions};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Employee ID type
pub type EmployeeId = RecordId;

/// Where the employee normally works from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum WorkType {
    Office,
    Remote,
    Hybrid,
}

impl Default for WorkType {
    fn default() -> Self {
        WorkType::Office
    }
}

/// Employment status served on the profile. New profiles start `ACTIVE`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "ACTIVE",
            EmployeeStatus::Inactive => "INACTIVE",
        }
    }
}

impl Default for EmployeeStatus {
    fn default() -> Self {
        EmployeeStatus::Active
    }
}

/// A document attached to an employee's profile. Stored and served in
/// camelCase so the record round-trips through the API unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDocument {
    /// Random UUID, unique within the owning employee.
    pub id: String,
    /// Caller-supplied category, e.g. "ID Proof" or "Certificate".
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Display name, taken from the uploaded file name.
    pub name: String,
    /// Serving path of the stored file.
    pub url: String,
    pub uploaded_at: i64,
}

/// Employee model matching SurrealDB schema
///
/// The personal fields past `phone` are absent on profiles created at
/// signup and appear once the profile is edited, so they stay optional
/// here rather than defaulting to empty strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<EmployeeId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: UserId,
    #[serde(with = "serde_helpers::record_id")]
    pub company: CompanyId,
    pub employee_code: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Calendar date "YYYY-MM-DD".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub designation: String,
    /// Calendar date "YYYY-MM-DD".
    pub joining_date: String,
    #[serde(default)]
    pub work_type: WorkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_location: Option<String>,
    /// Profile of the person this employee reports to.
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub reporting_to: Option<EmployeeId>,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[serde(default)]
    pub basic_salary: f64,
    #[serde(default)]
    pub allowances: Allowances,
    #[serde(default)]
    pub deductions: Deductions,
    #[serde(default)]
    pub documents: Vec<EmployeeDocument>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Employee {
    /// Minimal profile created at signup. Everything else is filled in
    /// later through profile updates.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user: UserId,
        company: CompanyId,
        employee_code: String,
        first_name: String,
        last_name: String,
        phone: String,
        department: String,
        designation: String,
        joining_date: String,
        now: i64,
    ) -> Self {
        Self {
            id: None,
            user,
            company,
            employee_code,
            first_name,
            last_name,
            phone,
            profile_image: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            country: None,
            date_of_birth: None,
            gender: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            department,
            designation,
            joining_date,
            work_type: WorkType::default(),
            employment_type: None,
            work_location: None,
            reporting_to: None,
            status: EmployeeStatus::default(),
            basic_salary: 0.0,
            allowances: Allowances::default(),
            deductions: Deductions::default(),
            documents: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Find a document by its UUID.
    pub fn document(&self, document_id: &str) -> Option<&EmployeeDocument> {
        self.documents.iter().find(|d| d.id == document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Employee {
        Employee::new(
            "user:u1".parse().unwrap(),
            "company:c1".parse().unwrap(),
            "EMP001".into(),
            "Asha".into(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            "2024-01-01".into(),
            0,
        )
    }

    #[test]
    fn work_type_uses_plain_variant_names() {
        assert_eq!(serde_json::to_string(&WorkType::Office).unwrap(), "\"Office\"");
        assert_eq!(serde_json::to_string(&WorkType::Hybrid).unwrap(), "\"Hybrid\"");
    }

    #[test]
    fn status_is_screaming_case() {
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::Active).unwrap(),
            "\"ACTIVE\""
        );
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::Inactive).unwrap(),
            "\"INACTIVE\""
        );
    }

    #[test]
    fn full_name_trims_missing_parts() {
        assert_eq!(sample().full_name(), "Asha");
    }

    #[test]
    fn new_profile_defaults() {
        let employee = sample();
        assert_eq!(employee.work_type, WorkType::Office);
        assert_eq!(employee.status, EmployeeStatus::Active);
        assert_eq!(employee.basic_salary, 0.0);
        assert!(employee.documents.is_empty());
        assert!(employee.address.is_none());
    }

    #[test]
    fn document_lookup_by_id() {
        let mut employee = sample();
        employee.documents.push(EmployeeDocument {
            id: "doc-1".into(),
            doc_type: "ID Proof".into(),
            name: "passport.pdf".into(),
            url: "/uploads/documents/abc.pdf".into(),
            uploaded_at: 10,
        });
        assert!(employee.document("doc-1").is_some());
        assert!(employee.document("doc-2").is_none());
    }

    #[test]
    fn document_serializes_type_key() {
        let doc = EmployeeDocument {
            id: "doc-1".into(),
            doc_type: "Certificate".into(),
            name: "degree.pdf".into(),
            url: "/uploads/documents/x.pdf".into(),
            uploaded_at: 5,
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["type"], "Certificate");
        assert_eq!(json["uploadedAt"], 5);
        assert!(json.get("doc_type").is_none());
        assert!(json.get("uploaded_at").is_none());
    }

    #[test]
    fn optional_fields_stay_off_the_wire_until_set() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("gender").is_none());
        assert!(json.get("reporting_to").is_none());

        let mut employee = sample();
        employee.gender = Some("Female".into());
        let json = serde_json::to_value(employee).unwrap();
        assert_eq!(json["gender"], "Female");
    }
}
