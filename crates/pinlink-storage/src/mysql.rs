use crate::{
    now_millis, timestamp_from_millis, CreateOutcome, LinkAdmin, LinkRecord, LinkStore, Result,
    StorageError,
};
use async_trait::async_trait;
use jiff::Timestamp;
use pinlink_core::Slug;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use tracing::{debug, trace};

/// DDL for the `links` table.
pub const LINKS_DDL: &str = include_str!("../ddl/mysql/links.sql");

/// Relational implementation of [`LinkStore`] backed by MySQL.
///
/// One row per slug in `links`, keyed on `slug` with a binary collation so
/// slugs stay case sensitive. Timestamps are epoch milliseconds. Creation
/// is a plain insert; the primary key rejects duplicates.
#[derive(Debug, Clone)]
pub struct MySqlLinkStore {
    pool: MySqlPool,
}

impl MySqlLinkStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `links` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(LINKS_DDL)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn exists(&self, slug: &Slug) -> Result<bool> {
        let exists = sqlx::query("SELECT 1 FROM links WHERE slug = ? LIMIT 1")
            .bind(slug.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .is_some();
        Ok(exists)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Configuration(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn record_from_row(row: &MySqlRow) -> Result<LinkRecord> {
    let slug: String = row.try_get("slug").map_err(map_sqlx_error)?;
    let target_url: String = row.try_get("target_url").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let expires_at: Option<i64> = row.try_get("expires_at").map_err(map_sqlx_error)?;
    let visit_count: u64 = row.try_get("hit_count").map_err(map_sqlx_error)?;
    let pinned: bool = row.try_get("pinned").map_err(map_sqlx_error)?;

    Ok(LinkRecord {
        slug: Slug::new_unchecked(slug),
        target_url,
        created_at: timestamp_from_millis(created_at)?,
        expires_at: expires_at.map(timestamp_from_millis).transpose()?,
        visit_count,
        pinned,
    })
}

#[async_trait]
impl LinkStore for MySqlLinkStore {
    async fn try_create(&self, slug: &Slug, target_url: &str) -> Result<CreateOutcome> {
        let created_at = now_millis();
        let millis = created_at.as_millisecond();

        let result = sqlx::query(
            r#"
            INSERT INTO links (slug, target_url, created_at, expires_at, hit_count, pinned, updated_at)
            VALUES (?, ?, ?, NULL, 0, 0, ?)
            "#,
        )
        .bind(slug.as_str())
        .bind(target_url)
        .bind(millis)
        .bind(millis)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                debug!(slug = %slug, "created link in MySQL");
                Ok(CreateOutcome::Created(LinkRecord::new(
                    slug.clone(),
                    target_url,
                    created_at,
                )))
            }
            Err(err) if is_unique_violation(&err) => {
                trace!(slug = %slug, "slug already taken in MySQL");
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn fetch(&self, slug: &Slug) -> Result<Option<LinkRecord>> {
        trace!(slug = %slug, "fetching link from MySQL");
        let row = sqlx::query(
            r#"
            SELECT slug, target_url, created_at, expires_at, hit_count, pinned
            FROM links
            WHERE slug = ?
            LIMIT 1
            "#,
        )
        .bind(slug.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn increment_visits(&self, slug: &Slug) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE links
            SET hit_count = hit_count + 1, updated_at = ?
            WHERE slug = ?
            "#,
        )
        .bind(now_millis().as_millisecond())
        .bind(slug.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn list_pinned_active(&self) -> Result<Vec<LinkRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT slug, target_url, created_at, expires_at, hit_count, pinned
            FROM links
            WHERE pinned = 1
              AND (expires_at IS NULL OR expires_at > ?)
            ORDER BY slug
            "#,
        )
        .bind(Timestamp::now().as_millisecond())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(record_from_row).collect()
    }
}

#[async_trait]
impl LinkAdmin for MySqlLinkStore {
    async fn set_pinned(&self, slug: &Slug, pinned: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE links SET pinned = ?, updated_at = ? WHERE slug = ?")
            .bind(pinned)
            .bind(now_millis().as_millisecond())
            .bind(slug.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        // MySQL may report zero affected rows when nothing changed
        if result.rows_affected() > 0 {
            return Ok(true);
        }
        self.exists(slug).await
    }

    async fn set_expiration(&self, slug: &Slug, expires_at: Option<Timestamp>) -> Result<bool> {
        let result = sqlx::query("UPDATE links SET expires_at = ?, updated_at = ? WHERE slug = ?")
            .bind(expires_at.map(|ts| ts.as_millisecond()))
            .bind(now_millis().as_millisecond())
            .bind(slug.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        self.exists(slug).await
    }
}
