pub mod config;
pub mod insert;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use config::{ConfigError, DbAuth, DbConfig};
pub use insert::{INSERT_CHUNK_ROWS, append_frame};

/// Opens the run's single connection pool.
///
/// One connection is enough: the run is strictly sheet-sequential.
pub async fn connect(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(1)
        .connect_with(config.connect_options())
        .await
}
