//! Runtime logging control: a global minimum level, a SQL statement
//! logging toggle, and durable per-service level overrides.
//!
//! Overrides are written through to a [`store::LevelStore`] and
//! activated immediately via the in-memory [`registry::LevelRegistry`],
//! so a change takes effect without a restart and survives one.

pub mod config;
pub mod error;
pub mod level;
pub mod registry;
pub mod service;
pub mod store;
pub mod store_memory;
pub mod store_sqlite;

pub use {
    config::{GlobalLogConfig, SharedLogConfig},
    error::{Error, Result},
    level::Level,
    registry::{LevelRegistry, ServiceLogger},
    service::{LogControlService, LogPatch, LogSnapshot, LoggerInstaller, NoopInstaller, PatchOutcome},
    store::{LevelOverride, LevelStore},
};

/// Run database migrations for the control crate.
///
/// Creates the `log_configs` table. Call at application startup when
/// using [`store_sqlite::SqliteStore::with_pool`].
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .set_ignore_missing(true)
        .run(pool)
        .await?;
    Ok(())
}
