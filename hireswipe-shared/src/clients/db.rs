use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// `checkout_timeout` bounds how long a caller waits for a free connection.
pub fn create_pool(
    database_url: &str,
    max_size: u32,
    checkout_timeout: Duration,
) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .connection_timeout(checkout_timeout)
        .min_idle(Some(max_size.min(2)))
        .test_on_check_out(true)
        .build(manager)?;

    tracing::info!(max_size, checkout_timeout_ms = checkout_timeout.as_millis() as u64, "database connection pool created");
    Ok(pool)
}
