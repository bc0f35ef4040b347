//! Persistence trait for per-service level overrides.

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

use crate::{error::Result, level::Level};

/// One persisted override row. At most one exists per service name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelOverride {
    pub service_name: String,
    pub level: Level,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Durable mapping from service name to log level. The single source
/// of truth for overrides; survives restart.
#[async_trait]
pub trait LevelStore: Send + Sync {
    /// Stored level for `service_name`. [`crate::Error::OverrideNotFound`]
    /// when no row exists.
    async fn get(&self, service_name: &str) -> Result<Level>;

    /// Create-or-update keyed on `service_name`. The first insert sets
    /// `created_at`; every write sets `updated_at`.
    async fn upsert(&self, service_name: &str, level: Level) -> Result<()>;

    /// Every persisted override, ordered by service name. Used to warm
    /// the registry at startup.
    async fn load_all(&self) -> Result<Vec<LevelOverride>>;
}
