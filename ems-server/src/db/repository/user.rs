//! User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{CompanyId, Role, User};
use crate::utils::time::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// New account payload. The model struct never serializes its secret
/// fields, so account creation goes through this dedicated shape with a
/// raw password that is hashed inside the repository.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub company: CompanyId,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub verification_code: String,
    pub verification_expires_at: i64,
}

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let user: Option<User> = self.base.db().select(rid).await?;
        Ok(user)
    }

    /// Find user by email. Emails are stored lowercased.
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// All accounts, for joining user details onto employee listings.
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let mut result = self.base.db().query("SELECT * FROM user").await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users)
    }

    /// Create a new user account, unverified and pending its first OTP
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User '{}' already exists",
                data.email
            )));
        }

        let password_hash = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    company = $company,
                    email = $email,
                    password_hash = $password_hash,
                    role = $role,
                    is_active = true,
                    is_verified = false,
                    verification_code = $verification_code,
                    verification_expires_at = $verification_expires_at,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("company", data.company))
            .bind(("email", data.email))
            .bind(("password_hash", password_hash))
            .bind(("role", data.role))
            .bind(("verification_code", data.verification_code))
            .bind(("verification_expires_at", data.verification_expires_at))
            .bind(("now", now_millis()))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Store a fresh verification OTP with its expiry instant.
    pub async fn set_verification_code(
        &self,
        id: &RecordId,
        code: &str,
        expires_at: i64,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query(
                r#"UPDATE $thing SET
                    verification_code = $code,
                    verification_expires_at = $expires_at,
                    updated_at = $now"#,
            )
            .bind(("thing", id.clone()))
            .bind(("code", code.to_string()))
            .bind(("expires_at", expires_at))
            .bind(("now", now_millis()))
            .await?;
        Ok(())
    }

    /// Mark the account verified and clear the pending OTP.
    pub async fn mark_verified(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query(
                r#"UPDATE $thing SET
                    is_verified = true,
                    verification_code = NONE,
                    verification_expires_at = NONE,
                    updated_at = $now"#,
            )
            .bind(("thing", id.clone()))
            .bind(("now", now_millis()))
            .await?;
        Ok(())
    }
}
