//! EMS Server - Employee Management System backend
//!
//! # Overview
//!
//! Single-binary HTTP server covering the daily HR loop:
//!
//! - **Accounts** (`api::auth`): signup with email OTP verification, JWT sessions
//! - **Profiles** (`api::profile`): employee records, pictures, documents
//! - **Attendance** (`api::attendance`): daily check-in/out, admin corrections, CSV exports
//! - **Leave** (`api::leave`): typed allowances, balance checks, approval workflow
//! - **Salary** (`api::salary`): figures derived on read from the profile
//! - **Dashboards** (`api::dashboard`): employee and admin rollups
//!
//! State lives in an embedded SurrealDB under the work directory; no
//! external services are required beyond an optional SMTP relay.
//!
//! # Module structure
//!
//! ```text
//! ems-server/src/
//! ├── core/          # config, shared state, server lifecycle
//! ├── auth/          # JWT sessions, route guards
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # embedded SurrealDB models and repositories
//! ├── domain/        # pure business rules (hours, balances, salary)
//! ├── services/      # HTTP stack, mail, file storage
//! └── utils/         # time, csv, validation, logging helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod domain;
pub mod services;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Prepare the process environment: `.env`, work directory tree,
/// logging (daily rolling files in production, stdout otherwise).
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    if config.is_production() {
        let logs_dir = config.logs_dir();
        init_logger_with_file(None, logs_dir.to_str());
    } else {
        init_logger();
    }

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ______ __  ___ _____
   / ____//  |/  // ___/
  / __/  / /|_/ / \__ \
 / /___ / /  / / ___/ /
/_____//_/  /_/ /____/
    "#
    );
}
