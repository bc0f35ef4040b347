//! Read/write surface over the application's global logging settings.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::{error::Result, level::Level};

/// Global minimum level and SQL statement logging flag, owned by the
/// application configuration.
///
/// Implementations persist however they see fit; this crate only
/// requires that a mutation is visible to subsequent reads immediately.
pub trait GlobalLogConfig: Send + Sync {
    fn log_level(&self) -> Result<Level>;
    fn sql_enabled(&self) -> Result<bool>;
    fn set_log_level(&self, level: Level) -> Result<()>;
    fn set_sql_enabled(&self, enabled: bool) -> Result<()>;
}

/// In-process implementation backed by atomics.
#[derive(Debug)]
pub struct SharedLogConfig {
    level: AtomicU8,
    sql_enabled: AtomicBool,
}

impl SharedLogConfig {
    #[must_use]
    pub fn new(level: Level, sql_enabled: bool) -> Self {
        Self {
            level: AtomicU8::new(level.as_u8()),
            sql_enabled: AtomicBool::new(sql_enabled),
        }
    }
}

impl Default for SharedLogConfig {
    fn default() -> Self {
        Self::new(Level::Info, false)
    }
}

impl GlobalLogConfig for SharedLogConfig {
    fn log_level(&self) -> Result<Level> {
        Ok(Level::from_u8(self.level.load(Ordering::Relaxed)))
    }

    fn sql_enabled(&self) -> Result<bool> {
        Ok(self.sql_enabled.load(Ordering::Relaxed))
    }

    fn set_log_level(&self, level: Level) -> Result<()> {
        self.level.store(level.as_u8(), Ordering::Relaxed);
        Ok(())
    }

    fn set_sql_enabled(&self, enabled: bool) -> Result<()> {
        self.sql_enabled.store(enabled, Ordering::Relaxed);
        Ok(())
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_info_without_sql() {
        let config = SharedLogConfig::default();
        assert_eq!(config.log_level().unwrap(), Level::Info);
        assert!(!config.sql_enabled().unwrap());
    }

    #[test]
    fn writes_are_immediately_visible() {
        let config = SharedLogConfig::default();
        config.set_log_level(Level::Error).unwrap();
        config.set_sql_enabled(true).unwrap();
        assert_eq!(config.log_level().unwrap(), Level::Error);
        assert!(config.sql_enabled().unwrap());
    }
}
