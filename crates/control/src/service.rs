//! Orchestration of log-control reads and bulk updates.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    config::GlobalLogConfig,
    error::{Error, Result},
    level::Level,
    registry::LevelRegistry,
    store::LevelStore,
};

/// Installs a freshly derived default logger configuration.
///
/// The binary backs this with a `tracing_subscriber` reload handle so
/// the process-wide filter is swapped atomically; tests use a
/// recording fake.
pub trait LoggerInstaller: Send + Sync {
    fn install(&self, global: Level, sql_enabled: bool) -> Result<()>;
}

/// Installer that does nothing, for embedders that manage their own
/// subscriber stack.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInstaller;

impl LoggerInstaller for NoopInstaller {
    fn install(&self, _global: Level, _sql_enabled: bool) -> Result<()> {
        Ok(())
    }
}

/// One bulk update. Any subset of fields may be present, but not none
/// of them.
#[derive(Debug, Clone, Default)]
pub struct LogPatch {
    pub level: Option<String>,
    pub filter: Option<String>,
    pub sql_enabled: Option<bool>,
    /// Ordered `(service name, level string)` pairs. Duplicates are
    /// applied in order; the last one wins.
    pub service_log_level: Vec<(String, String)>,
}

impl LogPatch {
    fn is_empty(&self) -> bool {
        self.level.as_deref().unwrap_or("").is_empty()
            && self.filter.as_deref().unwrap_or("").is_empty()
            && self.sql_enabled.is_none()
            && self.service_log_level.is_empty()
    }
}

/// Current effective global settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSnapshot {
    pub level: Level,
    pub sql_enabled: bool,
}

/// What a successful patch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    pub level: Level,
    pub sql_enabled: bool,
    /// Per-service pairs actually applied, in request order.
    pub applied: Vec<(String, Level)>,
}

/// Validates patches, writes through to the durable store, and
/// activates changes in the registry so they take effect immediately.
pub struct LogControlService {
    store: Arc<dyn LevelStore>,
    registry: LevelRegistry,
    config: Arc<dyn GlobalLogConfig>,
    installer: Arc<dyn LoggerInstaller>,
}

impl LogControlService {
    pub fn new(
        store: Arc<dyn LevelStore>,
        registry: LevelRegistry,
        config: Arc<dyn GlobalLogConfig>,
        installer: Arc<dyn LoggerInstaller>,
    ) -> Self {
        Self {
            store,
            registry,
            config,
            installer,
        }
    }

    /// Current global level and SQL flag. Read-only.
    pub fn snapshot(&self) -> Result<LogSnapshot> {
        Ok(LogSnapshot {
            level: self.config.log_level()?,
            sql_enabled: self.config.sql_enabled()?,
        })
    }

    /// Effective override level for one service.
    ///
    /// Registry hit first; on miss, falls back to the store and
    /// repopulates the registry. This read-through heals a registry
    /// left stale by a crash between a durable write and its
    /// activation.
    pub async fn service_level(&self, service_name: &str) -> Result<Level> {
        if let Ok(level) = self.registry.get_level(service_name) {
            return Ok(level);
        }
        let level = self.store.get(service_name).await?;
        self.registry.set_level(service_name, level);
        Ok(level)
    }

    /// Apply a bulk update.
    ///
    /// Fields are processed in a fixed order regardless of request
    /// field order: global level, SQL flag, then the per-service list.
    /// List entries are applied independently and fail fast — entries
    /// before a bad one stay applied, with no rollback.
    pub async fn apply_patch(&self, patch: &LogPatch) -> Result<PatchOutcome> {
        if patch.is_empty() {
            return Err(Error::EmptyPatch);
        }

        let global = match patch.level.as_deref().filter(|raw| !raw.is_empty()) {
            Some(raw) => {
                let level: Level = raw.parse()?;
                self.config.set_log_level(level)?;
                info!(level = level.as_str(), "global log level updated");
                Some(level)
            },
            None => None,
        };

        if let Some(enabled) = patch.sql_enabled {
            self.config.set_sql_enabled(enabled)?;
            info!(enabled, "sql statement logging toggled");
        }

        let mut applied = Vec::with_capacity(patch.service_log_level.len());
        for (index, (service, raw)) in patch.service_log_level.iter().enumerate() {
            if service.is_empty() {
                return Err(Error::InvalidServiceName { index });
            }
            let level: Level = raw.parse().map_err(|_| Error::InvalidServiceLevel {
                index,
                service: service.clone(),
                value: raw.clone(),
            })?;

            // Durable write first: a crash here leaves the registry
            // stale, healed by the next read-through.
            self.store.upsert(service, level).await?;
            self.registry.set_level(service, level);
            debug!(service = %service, level = level.as_str(), "service log level updated");

            // Echo the level back out of the registry.
            applied.push((service.clone(), self.registry.get_level(service)?));
        }

        // Reinstall the default logger when either input to the derived
        // filter changed. Service-only patches leave it alone.
        if global.is_some() || patch.sql_enabled.is_some() {
            self.installer
                .install(self.config.log_level()?, self.config.sql_enabled()?)?;
        }

        Ok(PatchOutcome {
            level: self.config.log_level()?,
            sql_enabled: self.config.sql_enabled()?,
            applied,
        })
    }

    /// Seed the registry from every persisted override. Returns how
    /// many services were restored.
    pub async fn warm_registry(&self) -> Result<usize> {
        let overrides = self.store.load_all().await?;
        for o in &overrides {
            self.registry.set_level(&o.service_name, o.level);
        }
        Ok(overrides.len())
    }

    #[must_use]
    pub fn registry(&self) -> &LevelRegistry {
        &self.registry
    }
}
