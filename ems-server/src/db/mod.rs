//! Database Module
//!
//! Embedded SurrealDB over RocksDB. The service owns the connection
//! handle; repositories clone it freely.

pub mod models;
pub mod repository;
pub mod schema;

use shared::error::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "ems";
const DATABASE: &str = "ems";

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at the given path, define indexes
    /// and seed defaults.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        schema::define(&db).await?;
        schema::seed(&db).await?;

        tracing::info!("Database ready at {}", db_path);

        Ok(Self { db })
    }
}
