//! User repository for database operations.

use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::entities::{NewUser, User};
use crate::types::StoreResult;

const USER_COLUMNS: &str =
    "id, username, password_hash, name, email, phone, address, created_at";

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user.
    ///
    /// Uniqueness is left entirely to the table constraints; a violation
    /// comes back as [`crate::StoreError::Conflict`] naming the column.
    pub async fn create(&self, new_user: &NewUser) -> StoreResult<User> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, name, email, phone, address, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(new_user.name.as_deref())
        .bind(new_user.email.as_deref())
        .bind(new_user.phone.as_deref())
        .bind(new_user.address.as_deref())
        .bind(now.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(user_id = id, "inserted user row");

        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(User::from_row(&row)?)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(User::from_row).transpose()?)
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(User::from_row).transpose()?)
    }

    /// Get user count
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
