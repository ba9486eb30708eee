//! PostgreSQL implementation of the leak repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{LeakRecord, LeakSource};
use crate::domain::repositories::LeakRepository;
use crate::error::AppError;
use crate::utils::truncate::{truncate_domain, truncate_url};

#[derive(sqlx::FromRow)]
struct LeakRow {
    url: String,
    source: String,
    encoding: String,
    is_redirect: bool,
    is_intentional: bool,
    sender_domain: String,
    sender_address: String,
    recipient_id: i64,
    url_domain: String,
    organization: Option<String>,
}

fn parse_source(s: &str) -> LeakSource {
    match s {
        "media" => LeakSource::Media,
        "import" => LeakSource::Import,
        "link" => LeakSource::Link,
        "link-post" => LeakSource::LinkPost,
        "link-request" => LeakSource::LinkRequest,
        "link-referrer" => LeakSource::LinkReferrer,
        _ => LeakSource::Image,
    }
}

/// PostgreSQL repository for leak records.
///
/// Inserts and counter updates share one transaction.
pub struct PgLeakRepository {
    pool: Arc<PgPool>,
}

impl PgLeakRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeakRepository for PgLeakRepository {
    async fn record_leak(&self, leak: LeakRecord) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO leaked_emails
                (recipient_id, sender_domain, sender_address, url, url_domain, organization,
                 source, encoding, is_redirect, is_intentional)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(leak.recipient_id)
        .bind(truncate_domain(&leak.sender_domain))
        .bind(&leak.sender_address)
        .bind(truncate_url(&leak.url))
        .bind(truncate_domain(&leak.url_domain))
        .bind(&leak.organization)
        .bind(leak.source.as_str())
        .bind(&leak.encoding_name)
        .bind(leak.is_redirect)
        .bind(leak.is_intentional)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE users
            SET leak_count = leak_count + 1,
                third_party_leak_count = third_party_leak_count + CASE WHEN $2 THEN 1 ELSE 0 END
            WHERE id = $1
            "#,
        )
        .bind(leak.recipient_id)
        .bind(leak.is_third_party())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_for_recipient(&self, recipient_id: i64) -> Result<Vec<LeakRecord>, AppError> {
        let rows: Vec<LeakRow> = sqlx::query_as(
            r#"
            SELECT url, source, encoding, is_redirect, is_intentional, sender_domain,
                   sender_address, recipient_id, url_domain, organization
            FROM leaked_emails
            WHERE recipient_id = $1
            ORDER BY id
            "#,
        )
        .bind(recipient_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| LeakRecord {
                url: r.url,
                source: parse_source(&r.source),
                encoding_name: r.encoding,
                is_redirect: r.is_redirect,
                is_intentional: r.is_intentional,
                sender_domain: r.sender_domain,
                sender_address: r.sender_address,
                recipient_id: r.recipient_id,
                url_domain: r.url_domain,
                organization: r.organization,
            })
            .collect())
    }
}
