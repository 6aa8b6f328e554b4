//! # Store configuration
//!
//! Configuration is a plain string key/value store, the same shape the
//! rest of the application uses for `app.set()` / `app.get()`. Typed
//! settings are read out of a snapshot once at startup.
//!
//! ```rust
//! use oss_core::{StoreConfig, StoreSettings};
//! let mut config = StoreConfig::new();
//! config.set("store.prefix", "oss365");
//! config.set("seed.policy", "fill-empty");
//!
//! let settings = StoreSettings::from_snapshot(&config.snapshot()).unwrap();
//! assert_eq!(settings.prefix, "oss365");
//! ```
//!
//! ## Environment overrides
//! [`load_env_config`] maps prefixed environment variables onto dotted
//! keys: `OSS365__STORE__PREFIX=demo` becomes `store.prefix = demo`.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::errors::{StoreError, StoreResult};
use crate::keys::DEFAULT_PREFIX;

pub const KEY_PREFIX: &str = "store.prefix";
pub const KEY_SEED_SENTINEL: &str = "store.seed_sentinel";
pub const KEY_QUOTA_BYTES: &str = "store.quota_bytes";
pub const KEY_PATH: &str = "store.path";
pub const KEY_SEED_POLICY: &str = "seed.policy";

/// Value written to the seed flag once a tenant has been seeded.
pub const DEFAULT_SEED_SENTINEL: &str = "1";

#[derive(Debug, Default)]
pub struct StoreConfig {
    values: HashMap<String, String>,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn snapshot(&self) -> StoreConfigSnapshot {
        StoreConfigSnapshot::new(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StoreConfigSnapshot {
    map: HashMap<String, String>,
}

impl StoreConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }
}

/// Load `<prefix>SECTION__NAME` environment variables as `section.name`.
pub fn load_env_config(config: &mut StoreConfig, prefix: &str) {
    load_vars(config, prefix, std::env::vars());
}

fn load_vars<I>(config: &mut StoreConfig, prefix: &str, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in vars {
        if let Some(stripped) = key.strip_prefix(prefix) {
            let normalized = stripped.to_lowercase().replace("__", ".");
            config.set(normalized, value);
        }
    }
}

/// Typed store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Key namespace prefix.
    pub prefix: String,
    /// Value the seed flag is set to.
    pub seed_sentinel: String,
    /// Byte quota for the in-memory facility.
    pub quota_bytes: Option<usize>,
    /// Use file-backed storage at this path instead of memory.
    pub path: Option<PathBuf>,
    /// Raw seed policy name, interpreted by the seeding crate.
    pub seed_policy: Option<String>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            seed_sentinel: DEFAULT_SEED_SENTINEL.to_string(),
            quota_bytes: None,
            path: None,
            seed_policy: None,
        }
    }
}

impl StoreSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: &StoreConfigSnapshot) -> StoreResult<Self> {
        let mut settings = Self::default();

        if let Some(prefix) = snapshot.get(KEY_PREFIX) {
            if prefix.is_empty() || prefix.contains(':') {
                return Err(StoreError::config(format!("{KEY_PREFIX} must be non-empty and must not contain ':'")));
            }
            settings.prefix = prefix.to_string();
        }

        if let Some(sentinel) = snapshot.get(KEY_SEED_SENTINEL) {
            if sentinel.is_empty() {
                return Err(StoreError::config(format!("{KEY_SEED_SENTINEL} must be non-empty")));
            }
            settings.seed_sentinel = sentinel.to_string();
        }

        if let Some(raw) = snapshot.get(KEY_QUOTA_BYTES) {
            let quota = snapshot
                .get_usize(KEY_QUOTA_BYTES)
                .ok_or_else(|| StoreError::config(format!("{KEY_QUOTA_BYTES} is not a number: {raw}")))?;
            settings.quota_bytes = Some(quota);
        }

        settings.path = snapshot.get(KEY_PATH).filter(|p| !p.is_empty()).map(PathBuf::from);
        settings.seed_policy = snapshot.get_string(KEY_SEED_POLICY);

        Ok(settings)
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_quota_bytes(mut self, quota: usize) -> Self {
        self.quota_bytes = Some(quota);
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}
