//! Storage key namespacing.
//!
//! Every persisted value lives under `<prefix>:<dataset>-<tenant>`. Dataset
//! names never contain `-` or `:`, so the first `-` after the prefix always
//! separates dataset from tenant and two different pairs can never produce
//! the same key.

use std::borrow::Cow;
use std::fmt;

use crate::errors::{StoreError, StoreResult};
use crate::tenant::TenantId;

/// Default key prefix shared by every oss365 key.
pub const DEFAULT_PREFIX: &str = "oss365";

/// Reserved dataset token used by the per-tenant seed flag.
pub const SEEDED_DATASET: &str = "seeded";

/// A logical dataset name such as `students` or `branches`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetName(Cow<'static, str>);

impl DatasetName {
    /// Validate a dataset name: non-empty, `[a-z0-9_]` only, not reserved.
    pub fn new(name: impl Into<String>) -> StoreResult<Self> {
        let name = name.into();
        if !is_valid_dataset(&name) {
            return Err(StoreError::InvalidDataset(name));
        }
        Ok(Self(Cow::Owned(name)))
    }

    /// Wrap a compile-time dataset name without re-validating it.
    ///
    /// Used for the closed dataset set, whose names are covered by tests.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn seeded() -> Self {
        Self::from_static(SEEDED_DATASET)
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DatasetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn is_valid_dataset(name: &str) -> bool {
    !name.is_empty()
        && name != SEEDED_DATASET
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Build `<prefix>:<dataset>-<tenant>`.
pub fn namespaced_key(prefix: &str, dataset: &DatasetName, tenant: &TenantId) -> String {
    format!("{}:{}-{}", prefix, dataset.as_str(), tenant.as_str())
}

/// Key construction helpers bound to one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    prefix: String,
}

impl Default for KeySpace {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl KeySpace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn dataset_key(&self, dataset: &DatasetName, tenant: &TenantId) -> String {
        namespaced_key(&self.prefix, dataset, tenant)
    }

    /// Key of the per-tenant seed flag: `<prefix>:seeded-<tenant>`.
    pub fn seeded_key(&self, tenant: &TenantId) -> String {
        namespaced_key(&self.prefix, &DatasetName::seeded(), tenant)
    }

    /// Split a key back into `(dataset, tenant)`.
    ///
    /// Returns `None` for keys outside this prefix or not shaped like a
    /// namespaced key. The seed flag parses with dataset `seeded`.
    pub fn parse<'k>(&self, key: &'k str) -> Option<(&'k str, &'k str)> {
        let rest = key.strip_prefix(self.prefix.as_str())?.strip_prefix(':')?;
        let (dataset, tenant) = rest.split_once('-')?;
        let dataset_ok = dataset == SEEDED_DATASET || is_valid_dataset(dataset);
        if !dataset_ok || tenant.trim().is_empty() {
            return None;
        }
        Some((dataset, tenant))
    }

    /// True when `key` is a namespaced key owned by `tenant`.
    pub fn belongs_to(&self, key: &str, tenant: &TenantId) -> bool {
        matches!(self.parse(key), Some((_, t)) if t == tenant.as_str())
    }
}
