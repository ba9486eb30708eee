//! PostgreSQL implementation of the link group repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{LinkGroup, NewLinkGroup};
use crate::domain::repositories::LinkGroupRepository;
use crate::error::AppError;
use crate::utils::truncate::{truncate_domain, truncate_url};

#[derive(sqlx::FromRow)]
struct LinkGroupRow {
    id: i64,
    sender_domain: String,
    sender_address: String,
    recipient_id: i64,
    urls: Vec<String>,
}

impl From<LinkGroupRow> for LinkGroup {
    fn from(r: LinkGroupRow) -> Self {
        LinkGroup::new(r.id, r.sender_domain, r.sender_address, r.recipient_id, r.urls)
    }
}

/// PostgreSQL repository for pending link groups.
pub struct PgLinkGroupRepository {
    pool: Arc<PgPool>,
}

impl PgLinkGroupRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkGroupRepository for PgLinkGroupRepository {
    async fn create(&self, group: NewLinkGroup) -> Result<LinkGroup, AppError> {
        let urls: Vec<String> = group.urls.iter().map(|u| truncate_url(u)).collect();

        let row: LinkGroupRow = sqlx::query_as(
            r#"
            INSERT INTO link_groups (recipient_id, sender_domain, sender_address, urls)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sender_domain, sender_address, recipient_id, urls
            "#,
        )
        .bind(group.origin.recipient_id)
        .bind(truncate_domain(&group.origin.sender_domain))
        .bind(&group.origin.sender_address)
        .bind(&urls)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn fetch_random(&self) -> Result<Option<LinkGroup>, AppError> {
        let row: Option<LinkGroupRow> = sqlx::query_as(
            r#"
            SELECT id, sender_domain, sender_address, recipient_id, urls
            FROM link_groups
            ORDER BY random()
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<LinkGroup>, AppError> {
        let row: Option<LinkGroupRow> = sqlx::query_as(
            "SELECT id, sender_domain, sender_address, recipient_id, urls FROM link_groups WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM link_groups WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
