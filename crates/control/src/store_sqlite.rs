//! SQLite-backed level store using sqlx.

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    sqlx::{Row, SqlitePool, sqlite::SqlitePoolOptions},
};

use crate::{
    error::{Error, Result},
    level::Level,
    store::{LevelOverride, LevelStore},
};

/// SQLite-backed persistence for per-service level overrides.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a store with its own connection pool and run migrations.
    ///
    /// For shared pools, use [`SqliteStore::with_pool`] after calling
    /// [`crate::run_migrations`].
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        crate::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a store using an existing pool (migrations must already
    /// have been run).
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LevelStore for SqliteStore {
    async fn get(&self, service_name: &str) -> Result<Level> {
        let row = sqlx::query("SELECT log_level FROM log_configs WHERE service_name = ?")
            .bind(service_name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => row.get::<String, _>("log_level").parse(),
            None => Err(Error::override_not_found(service_name)),
        }
    }

    async fn upsert(&self, service_name: &str, level: Level) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO log_configs (service_name, log_level, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(service_name) DO UPDATE
             SET log_level = excluded.log_level, updated_at = excluded.updated_at",
        )
        .bind(service_name)
        .bind(level.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<LevelOverride>> {
        let rows = sqlx::query(
            "SELECT service_name, log_level, created_at, updated_at
             FROM log_configs
             ORDER BY service_name",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut overrides = Vec::with_capacity(rows.len());
        for row in rows {
            overrides.push(LevelOverride {
                service_name: row.get("service_name"),
                level: row.get::<String, _>("log_level").parse()?,
                created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
                updated_at: parse_timestamp(&row.get::<String, _>("updated_at"))?,
            });
        }
        Ok(overrides)
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::message(format!("bad timestamp in log_configs: {e}")))
}
