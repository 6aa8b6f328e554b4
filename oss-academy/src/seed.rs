//! Idempotent per-tenant seeding.
//!
//! The first time a tenant is bootstrapped every dataset receives its
//! starter collection and the tenant's seed flag is set. Once the flag
//! holds the sentinel, seeding never runs again for that tenant unless the
//! coordinator explicitly asks for a [`SeedOrchestrator::reseed`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use oss_core::{StoreError, StoreSettings, TenantId, TenantStore};
use parking_lot::Mutex;

use crate::samples::SampleSet;
use crate::Dataset;

/// What to do with datasets that already hold records when seeding runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// Replace every dataset with its starter collection.
    #[default]
    Overwrite,
    /// Only write datasets that are currently empty or unreadable.
    FillEmpty,
}

impl FromStr for SeedPolicy {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overwrite" => Ok(SeedPolicy::Overwrite),
            "fill-empty" => Ok(SeedPolicy::FillEmpty),
            other => Err(StoreError::config(format!("unknown seed policy: {other}"))),
        }
    }
}

impl fmt::Display for SeedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeedPolicy::Overwrite => "overwrite",
            SeedPolicy::FillEmpty => "fill-empty",
        })
    }
}

/// Result of a seeding request. Seeding never panics or returns an error
/// to its caller; failures are reported here and logged.
#[derive(Debug)]
pub enum SeedOutcome {
    /// No tenant id was supplied; nothing was written.
    MissingTenant,
    /// The tenant's flag was already set; nothing was written.
    AlreadySeeded,
    /// Starter data was written and the flag is set.
    Seeded { datasets: usize, records: usize },
    /// A write failed. The flag was not set, so the next bootstrap retries.
    /// `dataset` is `None` when the failing write was the flag itself.
    Failed {
        dataset: Option<Dataset>,
        error: StoreError,
    },
}

impl SeedOutcome {
    pub fn wrote_data(&self) -> bool {
        matches!(self, SeedOutcome::Seeded { datasets, .. } if *datasets > 0)
    }
}

pub struct SeedOrchestrator {
    store: Arc<TenantStore>,
    policy: SeedPolicy,
    // One lock per tenant so check-then-set of the flag cannot interleave.
    locks: Mutex<HashMap<TenantId, Arc<Mutex<()>>>>,
}

impl SeedOrchestrator {
    pub fn new(store: Arc<TenantStore>) -> Self {
        Self {
            store,
            policy: SeedPolicy::default(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_policy(mut self, policy: SeedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build an orchestrator using the `seed.policy` setting.
    pub fn from_settings(store: Arc<TenantStore>, settings: &StoreSettings) -> Result<Self, StoreError> {
        let policy = match settings.seed_policy.as_deref() {
            Some(raw) => raw.parse()?,
            None => SeedPolicy::default(),
        };
        Ok(Self::new(store).with_policy(policy))
    }

    pub fn store(&self) -> &Arc<TenantStore> {
        &self.store
    }

    pub fn policy(&self) -> SeedPolicy {
        self.policy
    }

    /// The datasets this orchestrator seeds, in write order.
    pub fn datasets(&self) -> &'static [Dataset] {
        &Dataset::ALL
    }

    /// Seed `tenant_id` unless it has been seeded before.
    ///
    /// An empty id is a caller bug (auth not resolved yet); it is logged and
    /// ignored.
    pub fn seed_if_needed(&self, tenant_id: &str) -> SeedOutcome {
        match TenantId::new(tenant_id) {
            Ok(tenant) => self.seed_tenant(&tenant),
            Err(_) => {
                tracing::error!("seed requested without a tenant id, skipping");
                SeedOutcome::MissingTenant
            }
        }
    }

    pub fn seed_tenant(&self, tenant: &TenantId) -> SeedOutcome {
        self.with_tenant_lock(tenant, || {
            if self.store.is_seeded(tenant) {
                tracing::debug!(%tenant, "tenant already seeded");
                return SeedOutcome::AlreadySeeded;
            }
            self.write_and_flag(tenant, today())
        })
    }

    /// Write the starter data even though the flag is set.
    ///
    /// Used when the flag survived but the datasets did not (storage was
    /// partially cleared).
    pub fn reseed(&self, tenant: &TenantId) -> SeedOutcome {
        self.with_tenant_lock(tenant, || {
            tracing::warn!(%tenant, "reseeding tenant with flag already set");
            self.write_and_flag(tenant, today())
        })
    }

    fn write_and_flag(&self, tenant: &TenantId, today: NaiveDate) -> SeedOutcome {
        let samples = SampleSet::build(tenant, today);
        let mut datasets = 0;
        let mut records = 0;

        for &dataset in self.datasets() {
            let name = dataset.name();
            if self.policy == SeedPolicy::FillEmpty && self.store.record_count(&name, tenant) > 0 {
                tracing::debug!(%tenant, %dataset, "dataset has records, keeping them");
                continue;
            }
            match samples.write_dataset(&self.store, tenant, dataset) {
                Ok(written) => {
                    datasets += 1;
                    records += written;
                }
                Err(error) => {
                    tracing::error!(%tenant, %dataset, %error, "seeding failed, flag left unset");
                    return SeedOutcome::Failed {
                        dataset: Some(dataset),
                        error,
                    };
                }
            }
        }

        if !self.store.is_seeded(tenant) {
            if let Err(error) = self.store.mark_seeded(tenant) {
                tracing::error!(%tenant, %error, "failed to set seed flag");
                // Data is in place; the next bootstrap sees the flag unset and
                // seeds again, which is safe under either policy.
                return SeedOutcome::Failed { dataset: None, error };
            }
        }

        tracing::info!(%tenant, datasets, records, policy = %self.policy, "seeded tenant");
        SeedOutcome::Seeded { datasets, records }
    }

    fn with_tenant_lock<T>(&self, tenant: &TenantId, f: impl FnOnce() -> T) -> T {
        let lock = self
            .locks
            .lock()
            .entry(tenant.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let out = {
            let _guard = lock.lock();
            f()
        };

        // Handles are only cloned under the map lock, so a count of two (map
        // plus ours) means nobody else is waiting on this tenant.
        let mut locks = self.locks.lock();
        if Arc::strong_count(&lock) == 2 {
            locks.remove(tenant);
        }
        out
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
