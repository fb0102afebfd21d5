//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//! It follows the Repository pattern to provide clean abstractions over database operations.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ CLI / demo   │
//! └──────┬───────┘
//!        │
//!        ↓
//! ┌──────────────┐
//! │ Repositories │  (db::handlers - one per table, plus reports)
//! └──────┬───────┘
//!        │
//!        ↓
//! ┌──────────────┐
//! │   Models     │  (db::models - database records)
//! └──────┬───────┘
//!        │
//!        ↓
//! ┌──────────────┐
//! │  PostgreSQL  │  (constraints, cascades and defaults live here)
//! └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations for CRUD operations and the example reports
//! - [`models`]: Database record structures matching table schemas
//! - [`schema`]: Relationship and unique-index metadata mirroring the migrations
//! - [`errors`]: Database-specific error types
//!
//! # Transactions
//!
//! Repositories borrow a `&mut PgConnection`, so the caller decides the transaction scope:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let customer = Customers::new(&mut tx).create(&request).await?;
//! Students::new(&mut tx).create(&student_for(customer.id)).await?;
//! tx.commit().await?;
//! ```
//!
//! Constraint violations are never pre-checked in Rust: the write is attempted and the
//! PostgreSQL error is classified into a [`errors::DbError`] variant.
//!
//! # Migrations
//!
//! Migrations live in the `migrations/` directory as reversible `.up.sql` / `.down.sql` pairs:
//!
//! ```ignore
//! trainctl::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
pub mod schema;

use crate::config::{Config, PoolSettings};
use crate::errors::Error;
use errors::DbError;
use log::LevelFilter;
use sqlx::postgres::PgPoolOptions;
use sqlx::{ConnectOptions, PgPool};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Build pool options from the configured settings
fn pool_options(settings: &PoolSettings) -> PgPoolOptions {
    let secs_or_never = |secs: u64| (secs > 0).then(|| Duration::from_secs(secs));

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(secs_or_never(settings.idle_timeout_secs))
        .max_lifetime(secs_or_never(settings.max_lifetime_secs))
}

/// Whether a failed connect attempt is worth repeating
fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::Tls(_) => true,
        // Class 08 is "connection exception"; 57P03 is "cannot_connect_now" (server starting up)
        sqlx::Error::Database(db_err) => db_err
            .code()
            .is_some_and(|code| code.starts_with("08") || code == "57P03"),
        _ => false,
    }
}

/// Connect to the configured database.
///
/// When `database.retry.enabled` is set, transient connection failures are retried up to
/// `max_attempts` times with `delay` between attempts. Everything else fails immediately.
#[instrument(skip_all, fields(url = %config.database.redacted_url()), err)]
pub async fn connect(config: &Config) -> Result<PgPool, Error> {
    let connect_options = config
        .database
        .connect_options()?
        .log_slow_statements(LevelFilter::Warn, config.slow_statement_threshold());

    let retry = &config.database.retry;
    let max_attempts = if retry.enabled { retry.max_attempts.max(1) } else { 1 };

    let mut attempt = 1;
    loop {
        match pool_options(&config.database.pool).connect_with(connect_options.clone()).await {
            Ok(pool) => {
                info!(attempt, "Connected to database");
                return Ok(pool);
            }
            Err(e) if attempt < max_attempts && is_transient(&e) => {
                warn!(
                    attempt,
                    max_attempts,
                    "Database connection failed, retrying in {}: {e}",
                    humantime::format_duration(retry.delay)
                );
                tokio::time::sleep(retry.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(DbError::from(e).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetrySettings;

    #[test]
    fn test_transient_errors() {
        let refused = sqlx::Error::Io(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"));
        assert!(is_transient(&refused));
        assert!(is_transient(&sqlx::Error::PoolTimedOut));
        assert!(!is_transient(&sqlx::Error::RowNotFound));
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_connection_string_without_retrying() {
        let mut config = Config::default();
        config.database.url = "Host=localhost;Nonsense=1".to_string();
        config.database.retry = RetrySettings {
            enabled: true,
            max_attempts: 5,
            delay: Duration::from_secs(60),
        };

        // Would take minutes if the parse error were retried
        let result = tokio::time::timeout(Duration::from_secs(5), connect(&config)).await;
        assert!(matches!(result, Ok(Err(Error::BadRequest { .. }))));
    }

    #[tokio::test]
    async fn test_connect_gives_up_after_max_attempts() {
        let mut config = Config::default();
        // Port 1 on loopback refuses immediately
        config.database.url = "postgres://postgres@127.0.0.1:1/trainingdb".to_string();
        config.database.pool.acquire_timeout_secs = 2;
        config.database.retry = RetrySettings {
            enabled: true,
            max_attempts: 2,
            delay: Duration::from_millis(10),
        };

        let result = connect(&config).await;
        assert!(matches!(result, Err(Error::Database(DbError::Other(_)))));
    }
}
