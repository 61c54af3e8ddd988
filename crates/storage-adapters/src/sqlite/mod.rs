//! # SQLite backend
//!
//! Implements every port on a single [`SqliteStore`] wrapping a sqlx pool.
//! Unique and foreign-key constraint failures are classified into
//! [`StoreOutcome`] variants; every other database failure becomes
//! `DomainError::Internal`.

mod admin;
mod forums;
mod path_index;
mod posts;
mod rows;
mod threads;
mod users;
mod votes;

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use domains::{DomainError, DomainResult, StoreOutcome};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

/// Failures while opening the store. Runtime failures are `DomainError`s.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database connection failed: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("schema migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Pool tuning for file-backed databases.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            max_connections: 8,
            busy_timeout: Duration::from_millis(5000),
        }
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url` and runs migrations.
    ///
    /// In-memory databases live as long as their connection, so they are
    /// pinned to one connection that is never recycled.
    pub async fn connect(url: &str, settings: &StoreSettings) -> Result<Self, StoreError> {
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let mut options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(settings.busy_timeout);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(settings.max_connections)
        };
        let pool = pool_options.connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
            tracing::error!("Migration failed: {}", e);
            e
        })?;

        tracing::info!(in_memory, "Database connected and migrated successfully");
        Ok(Self { pool })
    }

    /// A fresh, private in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:", &StoreSettings::default()).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Canonical form of a case-insensitive key.
pub(crate) fn key(value: &str) -> String {
    value.to_lowercase()
}

pub(crate) fn internal(err: sqlx::Error) -> DomainError {
    tracing::error!(error = %err, "database failure");
    DomainError::Internal(err.to_string())
}

/// Turns constraint violations into outcomes; anything else is an error.
pub(crate) fn classify<T>(result: Result<T, sqlx::Error>) -> DomainResult<StoreOutcome<T>> {
    match result {
        Ok(value) => Ok(StoreOutcome::Applied(value)),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Ok(StoreOutcome::UniqueViolation),
        Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
            Ok(StoreOutcome::ForeignKeyViolation)
        }
        Err(err) => Err(internal(err)),
    }
}

/// Like [`classify`] for UPDATEs: touching no row is `NotFound`.
pub(crate) fn updated(
    result: Result<sqlx::sqlite::SqliteQueryResult, sqlx::Error>,
) -> DomainResult<StoreOutcome<()>> {
    Ok(match classify(result)? {
        StoreOutcome::Applied(done) if done.rows_affected() == 0 => StoreOutcome::NotFound,
        outcome => outcome.map(|_| ()),
    })
}

/// Timestamps are stored as fixed-width RFC 3339 text so that string
/// comparison in SQL matches chronological order.
pub(crate) fn encode_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_time(text: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DomainError::Internal(format!("malformed timestamp {text:?}: {e}")))
}
