//! Tenant-scoped store accessor.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::config::StoreSettings;
use crate::errors::StoreResult;
use crate::events::StoreEvent;
use crate::keys::{DatasetName, KeySpace};
use crate::record::TenantRecord;
use crate::storage::{FileStorage, MemoryStorage, StorageFacility};
use crate::tenant::TenantId;

/// One namespaced key belonging to a tenant, as reported by [`TenantStore::inspect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    pub key: String,
    pub dataset: String,
    /// Number of records when the stored value is a JSON array.
    pub records: Option<usize>,
}

/// Typed, tenant-scoped access to a shared storage facility.
///
/// Construct one per process and share it behind an `Arc`. Reads never fail:
/// a missing or malformed value comes back as the caller's default.
pub struct TenantStore {
    storage: Arc<dyn StorageFacility>,
    keys: KeySpace,
    seed_sentinel: String,
    events: broadcast::Sender<StoreEvent>,
}

impl TenantStore {
    pub fn new(storage: Arc<dyn StorageFacility>, settings: &StoreSettings) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            storage,
            keys: KeySpace::new(settings.prefix.clone()),
            seed_sentinel: settings.seed_sentinel.clone(),
            events,
        }
    }

    /// Store over a fresh [`MemoryStorage`] with default settings.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), &StoreSettings::default())
    }

    /// Pick the storage facility the settings ask for.
    pub fn from_settings(settings: &StoreSettings) -> StoreResult<Self> {
        let storage: Arc<dyn StorageFacility> = match (&settings.path, settings.quota_bytes) {
            (Some(path), _) => Arc::new(FileStorage::open(path)?),
            (None, Some(quota)) => Arc::new(MemoryStorage::with_quota(quota)),
            (None, None) => Arc::new(MemoryStorage::new()),
        };
        Ok(Self::new(storage, settings))
    }

    pub fn keys(&self) -> &KeySpace {
        &self.keys
    }

    pub fn storage(&self) -> &Arc<dyn StorageFacility> {
        &self.storage
    }

    pub fn seed_sentinel(&self) -> &str {
        &self.seed_sentinel
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Read and deserialize a dataset, distinguishing absent (`Ok(None)`)
    /// from malformed (`Err`).
    pub fn try_read<T>(&self, dataset: &DatasetName, tenant: &TenantId) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let key = self.keys.dataset_key(dataset, tenant);
        match self.storage.get(&key) {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Read a dataset, falling back to `default` when it is missing or unreadable.
    pub fn read<T>(&self, dataset: &DatasetName, tenant: &TenantId, default: T) -> T
    where
        T: DeserializeOwned,
    {
        match self.try_read(dataset, tenant) {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::debug!(%dataset, %tenant, "no stored value, using default");
                default
            }
            Err(err) => {
                tracing::warn!(%dataset, %tenant, error = %err, "stored value is malformed, using default");
                default
            }
        }
    }

    /// Serialize `value` and store it, overwriting whatever was there.
    pub fn write<T>(&self, dataset: &DatasetName, tenant: &TenantId, value: &T) -> StoreResult<()>
    where
        T: Serialize + ?Sized,
    {
        let key = self.keys.dataset_key(dataset, tenant);
        self.put(key, serde_json::to_string(value)?)
    }

    pub fn read_records<R: TenantRecord>(&self, tenant: &TenantId) -> Vec<R> {
        self.read(&R::DATASET, tenant, Vec::new())
    }

    pub fn write_records<R: TenantRecord>(&self, tenant: &TenantId, records: &[R]) -> StoreResult<()> {
        self.write(&R::DATASET, tenant, records)
    }

    /// Number of records stored for a dataset; 0 when absent, malformed or
    /// not an array.
    pub fn record_count(&self, dataset: &DatasetName, tenant: &TenantId) -> usize {
        let key = self.keys.dataset_key(dataset, tenant);
        self.storage
            .get(&key)
            .as_deref()
            .and_then(array_len)
            .unwrap_or(0)
    }

    /// Raw value of the tenant's seed flag.
    pub fn seed_flag(&self, tenant: &TenantId) -> Option<String> {
        self.storage.get(&self.keys.seeded_key(tenant))
    }

    pub fn is_seeded(&self, tenant: &TenantId) -> bool {
        self.seed_flag(tenant).as_deref() == Some(self.seed_sentinel.as_str())
    }

    pub fn mark_seeded(&self, tenant: &TenantId) -> StoreResult<()> {
        let key = self.keys.seeded_key(tenant);
        self.put(key, self.seed_sentinel.clone())
    }

    /// List every key owned by `tenant` with its record count, sorted by key.
    pub fn inspect(&self, tenant: &TenantId) -> Vec<KeyReport> {
        let mut reports: Vec<KeyReport> = self
            .storage
            .keys()
            .into_iter()
            .filter_map(|key| {
                let (dataset, owner) = self.keys.parse(&key)?;
                if owner != tenant.as_str() {
                    return None;
                }
                let dataset = dataset.to_string();
                let records = self.storage.get(&key).as_deref().and_then(array_len);
                Some(KeyReport { key, dataset, records })
            })
            .collect();
        reports.sort_by(|a, b| a.key.cmp(&b.key));
        reports
    }

    /// Remove every key owned by `tenant`, seed flag included.
    ///
    /// Returns how many keys were removed. Keys that fail to delete are
    /// logged and skipped.
    pub fn clear_tenant(&self, tenant: &TenantId) -> usize {
        let mut removed = 0;
        for key in self.storage.keys() {
            if !self.keys.belongs_to(&key, tenant) {
                continue;
            }
            match self.storage.remove(&key) {
                Ok(true) => {
                    removed += 1;
                    let _ = self.events.send(StoreEvent::Removed { key });
                }
                Ok(false) => {}
                Err(err) => tracing::warn!(%key, error = %err, "failed to remove key"),
            }
        }
        tracing::info!(%tenant, removed, "cleared tenant data");
        removed
    }

    fn put(&self, key: String, raw: String) -> StoreResult<()> {
        self.storage.set(&key, raw)?;
        tracing::debug!(%key, "stored value");
        let _ = self.events.send(StoreEvent::Written { key });
        Ok(())
    }
}

fn array_len(raw: &str) -> Option<usize> {
    match serde_json::from_str::<serde_json::Value>(raw).ok()? {
        serde_json::Value::Array(items) => Some(items.len()),
        _ => None,
    }
}
