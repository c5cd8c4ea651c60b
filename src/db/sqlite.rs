use std::{str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

/// How long a writer waits for another connection's write lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates the SQLite connection pool and brings the schema up to date
///
/// The database file is created if it does not exist and opened in WAL mode so
/// several connections can write in turn. An in-memory URL gets a single
/// connection, since every SQLite connection would otherwise open its own
/// empty database.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let max_connections = if in_memory { 1 } else { max_connections.max(1) };

    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    if in_memory {
        // Closing the only connection would drop the whole database.
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!(
        database_url = %database_url,
        max_connections,
        "Database ready"
    );

    Ok(pool)
}

/// Opens a fresh, migrated in-memory database
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    create_pool("sqlite::memory:", 1).await
}
