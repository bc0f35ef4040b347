//! In-memory, process-wide map from service name to an active logger
//! handle. A level change here is visible to every holder of the
//! handle on the next threshold check — no storage round-trip.

use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};

use dashmap::DashMap;

use crate::{
    error::{Error, Result},
    level::Level,
};

/// Shared handle for one service's effective log level.
///
/// Cheap to clone; all clones observe the same level. Reads and writes
/// go through an atomic, so a reader never sees a torn value.
#[derive(Debug, Clone)]
pub struct ServiceLogger {
    level: Arc<AtomicU8>,
}

impl ServiceLogger {
    fn new(level: Level) -> Self {
        Self {
            level: Arc::new(AtomicU8::new(level.as_u8())),
        }
    }

    #[must_use]
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Whether a record at `level` passes this service's threshold.
    /// This is the check embedding log call sites run per record; the
    /// control service itself only writes thresholds.
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    fn set(&self, level: Level) {
        self.level.store(level.as_u8(), Ordering::Relaxed);
    }
}

/// Registry of per-service logger handles.
///
/// Handles are created lazily on first reference and live for the
/// process lifetime. Distinct service names never contend on a shared
/// lock; the map is sharded.
#[derive(Clone, Default)]
pub struct LevelRegistry {
    handles: Arc<DashMap<String, ServiceLogger>>,
}

impl LevelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `service_name`, created at `initial` if it has never
    /// been referenced. Embedding log call sites hold one of these and
    /// ask it [`ServiceLogger::enabled`] per record.
    pub fn handle(&self, service_name: &str, initial: Level) -> ServiceLogger {
        self.handles
            .entry(service_name.to_string())
            .or_insert_with(|| ServiceLogger::new(initial))
            .clone()
    }

    /// Update the threshold, creating the handle if needed. Never fails.
    pub fn set_level(&self, service_name: &str, level: Level) {
        self.handles
            .entry(service_name.to_string())
            .or_insert_with(|| ServiceLogger::new(level))
            .set(level);
    }

    /// Current threshold for a service that has been referenced before.
    pub fn get_level(&self, service_name: &str) -> Result<Level> {
        self.handles
            .get(service_name)
            .map(|handle| handle.level())
            .ok_or_else(|| Error::service_not_found(service_name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
