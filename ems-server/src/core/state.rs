use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use shared::{AppError, AppResult};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::{FileStorage, HttpService, MailService};

/// Shared server state, one instance per process
///
/// Handlers receive a clone per request; every field is either cheap to
/// clone or reference counted.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | immutable configuration |
/// | db | embedded SurrealDB handle |
/// | http | HTTP server and cached router |
/// | jwt_service | token signing and validation |
/// | mailer | outbound email |
/// | storage | uploaded file store |
/// | leave_locks | per-employee write locks for leave applications |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub http: HttpService,
    pub jwt_service: Arc<JwtService>,
    pub mailer: Arc<MailService>,
    pub storage: FileStorage,
    /// Serializes leave applications per employee so two concurrent
    /// requests cannot both pass the balance and overlap checks.
    leave_locks: Arc<DashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ServerState {
    /// Initialize the full service stack:
    ///
    /// 1. work directory structure (`database/`, `logs/`, `uploads/`)
    /// 2. embedded database at `work_dir/database/ems.db` (schema + seed)
    /// 3. file storage, mail, JWT services
    /// 4. late router initialization (needs the state itself)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {}", e)))?;

        let db_path = config.database_dir().join("ems.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        let storage = FileStorage::new(&config.work_dir_path())?;
        let mailer = Arc::new(MailService::from_config(&config.mail)?);
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let http = HttpService::new(config.clone());

        let state = Self {
            config: config.clone(),
            db: db_service.db,
            http: http.clone(),
            jwt_service,
            mailer,
            storage,
            leave_locks: Arc::new(DashMap::new()),
        };

        // Late initialization; the router layers capture the state
        http.initialize(state.clone());

        Ok(state)
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn work_dir(&self) -> PathBuf {
        self.config.work_dir_path()
    }

    /// Lock guarding leave writes for one employee. Locks are created on
    /// first use and live for the process lifetime; the set of employees
    /// is small enough that they are never reaped.
    pub fn leave_lock(&self, employee_key: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.leave_locks
            .entry(employee_key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn leave_lock_is_shared_per_employee() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
        let state = ServerState::initialize(&config).await.unwrap();

        let a1 = state.leave_lock("employee-a");
        let a2 = state.leave_lock("employee-a");
        let b = state.leave_lock("employee-b");

        assert!(Arc::ptr_eq(&a1, &a2));
        assert!(!Arc::ptr_eq(&a1, &b));

        // Holding one employee's lock leaves the other free
        let _guard = a1.lock().await;
        assert!(b.try_lock().is_ok());
        assert!(a2.try_lock().is_err());
    }
}
