//! # Session Repository
//!
//! Sign-in state and company profile, persisted in the SQLite key-value store
//! under the keys `user` and `companyInfo`.
//!
//! ```text
//! login(email, password)
//!   │  users table (email, case-insensitive)
//!   │  argon2 verify (blocking pool)
//!   ▼
//! Session::sign_in ──► key_value_store["user"] = JSON
//!
//! update_company(profile)
//!   │  Session::update_company (name required)
//!   ▼
//! key_value_store["companyInfo"] = JSON
//! ```
//!
//! Unreadable blobs are treated as absent, so a corrupted store degrades to
//! "signed out, default company" rather than failing.

use autoparts_core::session::{Session, COMPANY_KEY, USER_KEY};
use autoparts_core::{CompanyProfile, User};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::seed::verify_password;
use crate::tables::SharedTables;

#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
    tables: SharedTables,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool, tables: SharedTables) -> Self {
        SessionRepository { pool, tables }
    }

    /// Loads the stored session, falling back to defaults.
    pub async fn restore(&self) -> DbResult<Session> {
        let user = self.get_blob(USER_KEY).await?;
        let company = self.get_blob(COMPANY_KEY).await?;
        Ok(Session::restore(user.as_deref(), company.as_deref()))
    }

    /// Checks the credentials and stores the user as signed in.
    pub async fn login(&self, email: &str, password: &str) -> DbResult<User> {
        let email = email.trim().to_lowercase();
        let record = {
            let tables = self.tables.read().await;
            tables
                .users
                .iter()
                .find(|record| record.user.email.to_lowercase() == email)
                .cloned()
        };
        let Some(record) = record else {
            warn!(email = %email, "Login attempt for unknown email");
            return Err(DbError::AuthFailed);
        };

        let password = password.to_string();
        let hash = record.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| DbError::Internal(e.to_string()))?;
        if !valid {
            warn!(email = %email, "Login attempt with wrong password");
            return Err(DbError::AuthFailed);
        }

        let mut session = self.restore().await?;
        session.sign_in(record.user.clone());
        if let Some(blob) = session.user_blob()? {
            self.put_blob(USER_KEY, &blob).await?;
        }

        info!(user_id = %record.user.id, role = ?record.user.role, "User signed in");
        Ok(record.user)
    }

    /// Forgets the signed-in user. The company profile is kept.
    pub async fn logout(&self) -> DbResult<()> {
        self.remove_blob(USER_KEY).await?;
        info!("User signed out");
        Ok(())
    }

    /// Looks up an account by id.
    pub async fn user(&self, id: &str) -> DbResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|record| record.user.id == id)
            .map(|record| record.user.clone())
            .ok_or_else(|| DbError::not_found("User", id))
    }

    pub async fn company(&self) -> DbResult<CompanyProfile> {
        Ok(self.restore().await?.company)
    }

    /// Validates and stores a new company profile.
    pub async fn update_company(&self, profile: CompanyProfile) -> DbResult<CompanyProfile> {
        let mut session = self.restore().await?;
        session.update_company(profile)?;
        self.put_blob(COMPANY_KEY, &session.company_blob()?).await?;

        info!(name = %session.company.name, "Company profile updated");
        Ok(session.company)
    }

    // =========================================================================
    // Key-value store
    // =========================================================================

    async fn get_blob(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM key_value_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    async fn put_blob(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, "Storing blob");
        sqlx::query(
            r#"
            INSERT INTO key_value_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_blob(&self, key: &str) -> DbResult<()> {
        debug!(key = %key, "Removing blob");
        sqlx::query("DELETE FROM key_value_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
