//! Per-dataset bindings.
//!
//! A binding ties one dataset to whatever tenant the coordinator has made
//! ready. It holds the dataset's value in memory, reads storage only when
//! it enters `Loaded`, and writes through on `save`.

use std::sync::Arc;

use oss_core::{DatasetName, StoreEvent, TenantId, TenantRecord, TenantStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::phase::{BootstrapPhase, PhaseWatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// Tenant not known yet; the value is the default and nothing was read.
    Unresolved,
    /// Value was read from the tenant's key; saves persist.
    Loaded,
    /// Settled without a tenant; the value is the default and saves are dropped.
    Empty,
}

pub struct DatasetBinding<T> {
    dataset: DatasetName,
    store: Arc<TenantStore>,
    phases: PhaseWatch,
    events: broadcast::Receiver<StoreEvent>,
    default: T,
    value: T,
    state: BindingState,
    tenant: Option<TenantId>,
}

/// Binding over a record collection.
pub type CollectionBinding<R> = DatasetBinding<Vec<R>>;

impl<T> DatasetBinding<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(dataset: DatasetName, store: Arc<TenantStore>, phases: PhaseWatch, default: T) -> Self {
        let events = store.subscribe();
        let mut binding = Self {
            dataset,
            store,
            phases,
            events,
            value: default.clone(),
            default,
            state: BindingState::Unresolved,
            tenant: None,
        };
        binding.sync();
        binding
    }

    pub fn dataset(&self) -> &DatasetName {
        &self.dataset
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == BindingState::Unresolved
    }

    pub fn tenant(&self) -> Option<&TenantId> {
        self.tenant.as_ref()
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Bring the binding in line with the coordinator's current phase.
    ///
    /// Reads storage on entry to `Loaded` (new tenant, or coming back from
    /// another state) and when another writer has replaced this binding's
    /// key since the last sync.
    pub fn sync(&mut self) -> BindingState {
        match self.phases.current() {
            BootstrapPhase::Ready(tenant) => {
                let same_tenant = self.tenant.as_ref() == Some(&tenant);
                if self.state != BindingState::Loaded || !same_tenant {
                    self.load(tenant);
                } else if self.key_changed(&tenant) {
                    tracing::debug!(dataset = %self.dataset, %tenant, "stored value changed, rereading");
                    self.load(tenant);
                }
            }
            BootstrapPhase::Unauthenticated => self.reset(BindingState::Empty),
            _ => self.reset(BindingState::Unresolved),
        }
        self.state
    }

    /// Wait for the next phase change and sync to it. `None` once the
    /// coordinator is gone.
    pub async fn changed(&mut self) -> Option<BindingState> {
        self.phases.changed().await?;
        Some(self.sync())
    }

    /// Wait until the binding is `Loaded`. Returns `false` if the
    /// coordinator went away first.
    pub async fn wait_loaded(&mut self) -> bool {
        while self.sync() != BindingState::Loaded {
            if self.changed().await.is_none() {
                return false;
            }
        }
        true
    }

    /// Replace the value and persist it for the bound tenant.
    ///
    /// The in-memory value is updated even if the write fails; there is no
    /// rollback. The binding syncs to the current phase first, so a save is
    /// dropped unless the bound tenant is still the ready one. Returns whether
    /// the value was accepted.
    pub fn save(&mut self, value: T) -> bool {
        let state = self.sync();
        let Some(tenant) = self.tenant.as_ref().filter(|_| state == BindingState::Loaded) else {
            tracing::debug!(dataset = %self.dataset, state = ?state, "save without a tenant dropped");
            return false;
        };

        if let Err(err) = self.store.write(&self.dataset, tenant, &value) {
            tracing::warn!(dataset = %self.dataset, %tenant, error = %err, "failed to persist, keeping in-memory value");
        }
        self.value = value;
        true
    }

    /// Modify the current value in place and save it.
    pub fn update<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        self.sync();
        let mut next = self.value.clone();
        f(&mut next);
        self.save(next)
    }

    fn load(&mut self, tenant: TenantId) {
        // Anything queued so far is covered by the read below.
        self.drain_events();
        self.value = self.store.read(&self.dataset, &tenant, self.default.clone());
        tracing::debug!(dataset = %self.dataset, %tenant, "binding loaded");
        self.tenant = Some(tenant);
        self.state = BindingState::Loaded;
    }

    fn reset(&mut self, state: BindingState) {
        if self.state == state && self.tenant.is_none() {
            return;
        }
        self.value = self.default.clone();
        self.tenant = None;
        self.state = state;
    }

    fn key_changed(&mut self, tenant: &TenantId) -> bool {
        let key = self.store.keys().dataset_key(&self.dataset, tenant);
        let mut changed = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => changed |= event.key() == key,
                Err(TryRecvError::Lagged(_)) => changed = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        changed
    }

    fn drain_events(&mut self) {
        while let Ok(_) | Err(TryRecvError::Lagged(_)) = self.events.try_recv() {}
    }
}

impl<R: TenantRecord> DatasetBinding<Vec<R>> {
    /// Binding over `R`'s dataset with an empty collection as default.
    pub fn records(store: Arc<TenantStore>, phases: PhaseWatch) -> Self {
        Self::new(R::DATASET, store, phases, Vec::new())
    }

    /// Insert `record`, replacing any record with the same id.
    ///
    /// Records stamped with a different tenant are refused.
    pub fn upsert(&mut self, record: R) -> bool {
        self.sync();
        match self.tenant.as_ref() {
            Some(tenant) if tenant.as_str() == record.tenant_id() => {}
            _ => {
                tracing::warn!(
                    dataset = %self.dataset,
                    record_tenant = record.tenant_id(),
                    "refusing record for another tenant"
                );
                return false;
            }
        }
        self.update(|records| match records.iter().position(|r| r.id() == record.id()) {
            Some(index) => records[index] = record,
            None => records.push(record),
        })
    }

    /// Remove the record with `id`. Returns whether one was removed and saved.
    pub fn remove(&mut self, id: &str) -> bool {
        self.sync();
        if !self.value.iter().any(|r| r.id() == id) {
            return false;
        }
        self.update(|records| records.retain(|r| r.id() != id))
    }

    pub fn find(&self, id: &str) -> Option<&R> {
        self.value.iter().find(|r| r.id() == id)
    }
}
