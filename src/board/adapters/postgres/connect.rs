//! Connection pool construction and blocking-work helpers.
//!
//! Diesel connections are synchronous, so every database call is offloaded
//! to a dedicated thread via [`tokio::task::spawn_blocking`], keeping the
//! async executor's worker threads free. The r2d2 pool bounds outstanding
//! borrows; callers beyond the bound queue until a connection is returned,
//! and dropping a pooled connection returns it on every exit path.

use crate::board::ports::{StoreError, StoreResult};
use crate::board::services::StartupError;
use crate::config::DatabaseConfig;
use diesel::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};

/// `PostgreSQL` connection pool type used by board adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection type for internal use.
pub(super) type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Builds a bounded connection pool and probes connectivity with a trivial
/// round-trip query before returning.
///
/// # Errors
///
/// Returns [`StartupError::PoolBuild`] when the pool cannot be constructed
/// or the probe fails.
pub fn build_pool(config: &DatabaseConfig) -> Result<PgPool, StartupError> {
    let manager = ConnectionManager::<PgConnection>::new(config.url());
    let pool = Pool::builder()
        .max_size(config.pool_size)
        .build(manager)
        .map_err(|err| StartupError::PoolBuild(err.to_string()))?;

    let mut conn = pool
        .get()
        .map_err(|err| StartupError::PoolBuild(err.to_string()))?;
    probe(&mut conn).map_err(|err| StartupError::PoolBuild(err.to_string()))?;

    tracing::info!(
        host = %config.host,
        database = %config.database,
        pool_size = config.pool_size,
        "connection pool ready"
    );
    Ok(pool)
}

/// Executes `SELECT 1` on the given connection.
pub(super) fn probe(conn: &mut PgConnection) -> QueryResult<()> {
    diesel::sql_query("SELECT 1").execute(conn)?;
    Ok(())
}

/// Runs a blocking database operation on a dedicated thread pool.
pub(super) async fn run_blocking<F, T>(f: F) -> StoreResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::connectivity(format!("task join error: {e}")))?
}

/// Obtains a connection from the pool.
pub(super) fn get_conn(pool: &PgPool) -> StoreResult<PooledConn> {
    pool.get()
        .map_err(|e| StoreError::connectivity(e.to_string()))
}
