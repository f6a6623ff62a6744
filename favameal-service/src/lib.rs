use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub mod error;
pub mod meals;
pub mod models;
pub mod restaurants;
pub mod schema;
pub mod views;

pub use error::ServiceError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Outcome of flipping a favorite marker.
#[derive(Debug, Clone, PartialEq)]
pub enum Toggled<T> {
    Created(T),
    Removed,
}

pub fn establish_connection(database_url: &str) -> ConnectionResult<PgConnection> {
    PgConnection::establish(database_url)
}

pub fn build_pool(database_url: &str) -> Result<DbPool, PoolError> {
    Pool::builder().build(ConnectionManager::new(database_url))
}

/// Applies pending migrations and returns how many ran.
pub fn run_migrations(conn: &mut PgConnection) -> Result<usize, ServiceError> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(ServiceError::Migration)?;
    for version in &applied {
        tracing::info!(%version, "applied migration");
    }
    Ok(applied.len())
}
