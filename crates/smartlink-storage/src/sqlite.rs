use async_trait::async_trait;
use jiff::Timestamp;
use smartlink_core::repository::{LinkRecord, Repository, Result};
use smartlink_core::{ShortCode, StorageError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::debug;

const SCHEMA: &str = include_str!("../ddl/sqlite/links.sql");

/// SQLite implementation of the repository contract.
///
/// Timestamps are stored as integer nanoseconds since the Unix epoch, so
/// records read back exactly as they were written. Each
/// operation is a single SQL statement, which SQLite executes atomically, so
/// concurrent increments never lose updates and a sweep never exposes a
/// partially deleted row.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database at `database_url` and applies
    /// the schema.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let repository = Self::new(pool);
        repository.migrate().await?;
        Ok(repository)
    }

    /// Opens a private in-memory database with the schema applied.
    ///
    /// The pool holds exactly one connection that is never recycled, because
    /// every SQLite in-memory connection owns a separate database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(map_sqlx_error)?;

        let repository = Self::new(pool);
        repository.migrate().await?;
        Ok(repository)
    }

    /// Creates the `links` table and its index if they do not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("sqlite schema applied");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn parse_timestamp(column: &str, nanos: i64) -> Result<Timestamp> {
    Timestamp::from_nanosecond(i128::from(nanos)).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{nanos}': {e}"))
    })
}

/// Converts a timestamp to the stored representation. Fails outside the
/// years 1677-2262 that fit in an `i64` of nanoseconds.
fn encode_timestamp(column: &str, ts: Timestamp) -> Result<i64> {
    i64::try_from(ts.as_nanosecond())
        .map_err(|_| StorageError::InvalidData(format!("{column} timestamp out of range: {ts}")))
}

fn parse_clicks(clicks: i64) -> Result<u64> {
    u64::try_from(clicks)
        .map_err(|_| StorageError::InvalidData(format!("negative click count: {clicks}")))
}

fn row_to_record(row: &SqliteRow) -> Result<LinkRecord> {
    let id: String = row.try_get("id").map_err(map_sqlx_error)?;
    let original: String = row.try_get("original").map_err(map_sqlx_error)?;
    let clicks: i64 = row.try_get("clicks").map_err(map_sqlx_error)?;
    let expires_at: Option<i64> = row.try_get("expires_at").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(LinkRecord {
        id: ShortCode::new_unchecked(id),
        original,
        clicks: parse_clicks(clicks)?,
        expires_at: expires_at
            .map(|nanos| parse_timestamp("expires_at", nanos))
            .transpose()?,
        created_at: parse_timestamp("created_at", created_at)?,
    })
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

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert(&self, record: LinkRecord) -> Result<()> {
        let clicks = i64::try_from(record.clicks).map_err(|_| {
            StorageError::InvalidData(format!("click count out of range: {}", record.clicks))
        })?;
        let expires_at = record
            .expires_at
            .map(|ts| encode_timestamp("expires_at", ts))
            .transpose()?;
        let created_at = encode_timestamp("created_at", record.created_at)?;

        let result = sqlx::query(
            r#"
            INSERT INTO links (id, original, clicks, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.as_str())
        .bind(&record.original)
        .bind(clicks)
        .bind(expires_at)
        .bind(created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(record.id.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, original, clicks, expires_at, created_at
            FROM links
            WHERE id = ?
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<u64> {
        let clicks: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE links
            SET clicks = clicks + 1
            WHERE id = ?
            RETURNING clicks
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match clicks {
            Some(clicks) => parse_clicks(clicks),
            None => Err(StorageError::NotFound(code.to_string())),
        }
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        let result = sqlx::query("DELETE FROM links WHERE id = ?")
            .bind(code.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: Timestamp) -> Result<u64> {
        let now = encode_timestamp("now", now)?;
        let result = sqlx::query(
            r#"
            DELETE FROM links
            WHERE expires_at IS NOT NULL
              AND expires_at < ?
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
