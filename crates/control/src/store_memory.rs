//! In-memory store for tests and embedded use.

use std::{collections::HashMap, sync::Mutex};

use {async_trait::async_trait, chrono::Utc};

use crate::{
    error::{Error, Result},
    level::Level,
    store::{LevelOverride, LevelStore},
};

/// In-memory store backed by `HashMap`. No persistence.
#[derive(Default)]
pub struct MemoryStore {
    overrides: Mutex<HashMap<String, LevelOverride>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LevelStore for MemoryStore {
    async fn get(&self, service_name: &str) -> Result<Level> {
        let overrides = self.overrides.lock().unwrap_or_else(|e| e.into_inner());
        overrides
            .get(service_name)
            .map(|o| o.level)
            .ok_or_else(|| Error::override_not_found(service_name))
    }

    async fn upsert(&self, service_name: &str, level: Level) -> Result<()> {
        let mut overrides = self.overrides.lock().unwrap_or_else(|e| e.into_inner());
        let now = Utc::now();
        overrides
            .entry(service_name.to_string())
            .and_modify(|o| {
                o.level = level;
                o.updated_at = now;
            })
            .or_insert_with(|| LevelOverride {
                service_name: service_name.to_string(),
                level,
                created_at: now,
                updated_at: now,
            });
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<LevelOverride>> {
        let overrides = self.overrides.lock().unwrap_or_else(|e| e.into_inner());
        let mut all: Vec<_> = overrides.values().cloned().collect();
        all.sort_by(|a, b| a.service_name.cmp(&b.service_name));
        Ok(all)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_after_write() {
        let store = MemoryStore::new();
        for level in Level::ALL {
            store.upsert("svc", level).await.unwrap();
            assert_eq!(store.get("svc").await.unwrap(), level);
        }
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get("nope").await.unwrap_err();
        assert!(matches!(err, Error::OverrideNotFound { service } if service == "nope"));
    }

    #[tokio::test]
    async fn upsert_keeps_one_row_per_service() {
        let store = MemoryStore::new();
        store.upsert("auth", Level::Info).await.unwrap();
        store.upsert("auth", Level::Error).await.unwrap();

        let all = store.load_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].level, Level::Error);
    }

    #[tokio::test]
    async fn upsert_preserves_created_at() {
        let store = MemoryStore::new();
        store.upsert("auth", Level::Info).await.unwrap();
        let before = store.load_all().await.unwrap()[0].clone();

        store.upsert("auth", Level::Warn).await.unwrap();
        let after = store.load_all().await.unwrap()[0].clone();

        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn load_all_is_ordered_by_name() {
        let store = MemoryStore::new();
        store.upsert("zeta", Level::Warn).await.unwrap();
        store.upsert("alpha", Level::Debug).await.unwrap();

        let all = store.load_all().await.unwrap();
        assert_eq!(all[0].service_name, "alpha");
        assert_eq!(all[1].service_name, "zeta");
    }
}
