//! PostgreSQL implementation of the user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{MailUser, NewMailUser};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::truncate::{truncate_domain, truncate_url};

const USER_COLUMNS: &str = "id, email, registration_site, registration_url, registration_domain, \
     registered_at, received_email_count, leak_count, third_party_leak_count";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    registration_site: String,
    registration_url: String,
    registration_domain: String,
    registered_at: DateTime<Utc>,
    received_email_count: i32,
    leak_count: i32,
    third_party_leak_count: i32,
}

impl From<UserRow> for MailUser {
    fn from(r: UserRow) -> Self {
        let mut user = MailUser::new(
            r.id,
            r.email,
            r.registration_site,
            r.registration_url,
            r.registration_domain,
            r.registered_at,
        );
        user.received_email_count = r.received_email_count;
        user.leak_count = r.leak_count;
        user.third_party_leak_count = r.third_party_leak_count;
        user
    }
}

/// PostgreSQL repository for issued addresses.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewMailUser) -> Result<MailUser, AppError> {
        let sql = format!(
            "INSERT INTO users (email, registration_site, registration_url, registration_domain) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        let row: UserRow = sqlx::query_as(&sql)
            .bind(&new_user.email)
            .bind(&new_user.registration_site)
            .bind(truncate_url(&new_user.registration_url))
            .bind(truncate_domain(&new_user.registration_domain))
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<MailUser>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(email)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<MailUser>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(exists)
    }

    async fn increment_received(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET received_email_count = received_email_count + 1 WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User not found", json!({ "id": id })));
        }
        Ok(())
    }
}
