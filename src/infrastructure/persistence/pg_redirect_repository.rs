//! PostgreSQL implementation of the redirect repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::MessageOrigin;
use crate::domain::repositories::{RedirectHop, RedirectRepository};
use crate::error::AppError;
use crate::utils::truncate::truncate_domain;

#[derive(sqlx::FromRow)]
struct HopRow {
    requested_url: String,
    position: i32,
    url: String,
    url_domain: String,
    organization: Option<String>,
    final_status: Option<i32>,
    sender_domain: String,
    sender_address: String,
    recipient_id: i64,
}

/// PostgreSQL repository for redirect hops.
pub struct PgRedirectRepository {
    pool: Arc<PgPool>,
}

impl PgRedirectRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RedirectRepository for PgRedirectRepository {
    async fn record_hops(&self, hops: Vec<RedirectHop>) -> Result<(), AppError> {
        if hops.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for hop in &hops {
            sqlx::query(
                r#"
                INSERT INTO redirects
                    (recipient_id, sender_domain, sender_address, requested_url, position,
                     url, url_domain, organization, final_status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(hop.origin.recipient_id)
            .bind(truncate_domain(&hop.origin.sender_domain))
            .bind(&hop.origin.sender_address)
            .bind(&hop.requested_url)
            .bind(hop.position)
            .bind(&hop.url)
            .bind(truncate_domain(&hop.url_domain))
            .bind(&hop.organization)
            .bind(hop.final_status)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn hops_for(&self, requested_url: &str) -> Result<Vec<RedirectHop>, AppError> {
        let rows: Vec<HopRow> = sqlx::query_as(
            r#"
            SELECT requested_url, position, url, url_domain, organization, final_status,
                   sender_domain, sender_address, recipient_id
            FROM redirects
            WHERE requested_url = $1
            ORDER BY id
            "#,
        )
        .bind(requested_url)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| RedirectHop {
                requested_url: r.requested_url,
                position: r.position,
                url: r.url,
                url_domain: r.url_domain,
                organization: r.organization,
                final_status: r.final_status,
                origin: MessageOrigin::new(r.sender_domain, r.sender_address, r.recipient_id),
            })
            .collect())
    }
}
