use std::path::{Path, PathBuf};

use crate::auth::JwtConfig;
use crate::services::MailConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/ems | server state root (database, logs, uploads) |
/// | HTTP_PORT | 5000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | JWT_SECRET | generated in dev | token signing key, min 32 chars |
/// | JWT_EXPIRATION_MINUTES | 1440 | token lifetime |
/// | SMTP_HOST | unset | mail relay; unset disables outbound email |
/// | SMTP_PORT | 587 | mail relay port |
/// | SMTP_USERNAME / SMTP_PASSWORD | empty | relay credentials |
/// | SMTP_FROM | no-reply address | From header on outbound mail |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/ems HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory holding `database/`, `logs/` and `uploads/`
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT settings
    pub jwt: JwtConfig,
    /// SMTP relay settings
    pub mail: MailConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/ems".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            jwt: JwtConfig::default(),
            mail: MailConfig::from_env(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the parts that differ per test run
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn work_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir)
    }

    pub fn database_dir(&self) -> PathBuf {
        self.work_dir_path().join("database")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.work_dir_path().join("logs")
    }

    /// Create the work directory tree. Upload subdirectories are created
    /// by [`crate::services::FileStorage`].
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        for dir in [
            self.work_dir_path(),
            self.database_dir(),
            self.logs_dir(),
            self.work_dir_path().join("uploads"),
        ] {
            ensure_dir(&dir)?;
        }
        Ok(())
    }
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
