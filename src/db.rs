use std::future::Future;
use std::time::Duration;

use backoff::future::retry_notify;
use backoff::{Error as BackoffError, ExponentialBackoffBuilder};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::error::{is_write_contention, AppError, AppResult};

/// Opens the connection pool. Works with any URL sea-orm understands (Postgres, SQLite).
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let backend = database_url.split(':').next().unwrap_or("unknown");
    info!("Connecting to database ({})", backend);

    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(10)
        .connect_timeout(Duration::from_secs(10))
        // Statement logging is too chatty at info; request tracing covers it.
        .sqlx_logging(false);

    let conn = Database::connect(options).await?;
    info!("Database connection pool established");
    Ok(conn)
}

/// Applies every pending versioned migration.
pub async fn migrate(conn: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(conn, None).await?;
    info!("Database schema is up to date");
    Ok(())
}

fn contention_notify_handler(err: AppError, duration: Duration) {
    warn!("Transaction hit write contention: {}. Retrying in {}ms", err, duration.as_millis());
}

fn classify(err: AppError) -> BackoffError<AppError> {
    match err {
        AppError::Database(db_err) if is_write_contention(&db_err) => BackoffError::transient(AppError::Database(db_err)),
        other => BackoffError::permanent(other),
    }
}

/// Runs `operation` again when its transaction lost a write race, so the losing request
/// re-reads committed state instead of failing with a database error.
pub async fn retry_on_contention<T, F, Fut>(mut operation: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let backoff = ExponentialBackoffBuilder::new()
        .with_initial_interval(Duration::from_millis(10))
        .with_max_interval(Duration::from_millis(200))
        .with_max_elapsed_time(Some(Duration::from_secs(2)))
        .build();

    retry_notify(
        backoff,
        || {
            let attempt = operation();
            async move { attempt.await.map_err(classify) }
        },
        contention_notify_handler,
    )
    .await
}
