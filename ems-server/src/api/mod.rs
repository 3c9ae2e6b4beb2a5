//! HTTP API modules
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`auth`] - signup, email verification, signin, session
//! - [`profile`] - employee profiles and document management
//! - [`attendance`] - daily check-in/out, admin records, CSV exports
//! - [`leave`] - leave types, applications, approval workflow
//! - [`salary`] - salary breakdowns, history, payroll statistics
//! - [`dashboard`] - aggregated employee and admin dashboards
//! - [`files`] - serving of uploaded files

pub mod auth;
pub mod health;

pub mod attendance;
pub mod dashboard;
pub mod files;
pub mod leave;
pub mod profile;
pub mod salary;

// Re-export common types for handlers
pub use shared::{ApiResponse, AppResult};

use serde::Serialize;

/// Pagination block attached to every paged listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_records: usize,
    pub has_more: bool,
}

/// Normalize page/limit query values
pub(crate) fn paginate(
    page: Option<usize>,
    limit: Option<usize>,
    default_limit: usize,
) -> (usize, usize) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(default_limit).max(1);
    (page, limit)
}

pub(crate) fn pagination(page: usize, limit: usize, total: usize) -> Pagination {
    Pagination {
        current_page: page,
        total_pages: total.div_ceil(limit),
        total_records: total,
        has_more: page * limit < total,
    }
}
