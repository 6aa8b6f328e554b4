//! oss-core: tenant-scoped storage primitives for oss365.
//!
//! Everything persisted by the academy client lives in one shared,
//! string-keyed storage facility. This crate owns the pieces that keep
//! tenants apart inside that facility:
//!
//! - [`TenantId`] and [`DatasetName`], validated identifiers
//! - [`KeySpace`], the namespacer turning `(dataset, tenant)` into a key
//! - [`StorageFacility`] with in-memory and file-backed implementations
//! - [`TenantStore`], the typed accessor with default-value fallback
//! - [`StoreConfig`] / [`StoreSettings`] for configuration

pub mod config;
pub mod errors;
pub mod events;
pub mod keys;
pub mod record;
pub mod storage;
pub mod store;
pub mod tenant;

pub use config::{load_env_config, StoreConfig, StoreConfigSnapshot, StoreSettings};
pub use errors::{StoreError, StoreResult};
pub use events::StoreEvent;
pub use keys::{namespaced_key, DatasetName, KeySpace, DEFAULT_PREFIX, SEEDED_DATASET};
pub use record::TenantRecord;
pub use storage::{FileStorage, MemoryStorage, StorageFacility};
pub use store::{KeyReport, TenantStore};
pub use tenant::TenantId;
