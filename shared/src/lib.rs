//! Shared types for the EMS backend
//!
//! Common types used across crates: error codes, the application error
//! type, and the unified API response envelope.

pub mod error;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
