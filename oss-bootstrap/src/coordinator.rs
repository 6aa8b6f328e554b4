use std::sync::Arc;

use oss_academy::{SeedOrchestrator, SeedOutcome};
use oss_core::{DatasetName, TenantId, TenantRecord, TenantStore};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::auth::AuthState;
use crate::binding::CollectionBinding;
use crate::phase::{BootstrapPhase, PhaseWatch};

/// What the coordinator found when it looked at a tenant's storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub tenant: TenantId,
    pub flag_set: bool,
    pub total_records: usize,
}

impl Decision {
    /// Seed when the flag is missing, or when it is set but every dataset is
    /// empty (storage wiped underneath a surviving flag).
    pub fn needs_seed(&self) -> bool {
        !self.flag_set || self.total_records == 0
    }
}

/// Drives a session from "auth unknown" to "tenant data readable".
///
/// One coordinator per process, shared behind an `Arc`. It is restarted
/// from `WaitingForAuth` on every auth change, so readiness is never
/// carried over from one tenant to the next.
pub struct BootstrapCoordinator {
    store: Arc<TenantStore>,
    seeder: Arc<SeedOrchestrator>,
    datasets: Vec<DatasetName>,
    phase: watch::Sender<BootstrapPhase>,
}

impl BootstrapCoordinator {
    pub fn new(seeder: Arc<SeedOrchestrator>) -> Self {
        let (phase, _) = watch::channel(BootstrapPhase::WaitingForAuth);
        Self {
            store: seeder.store().clone(),
            datasets: seeder.datasets().iter().map(|d| d.name()).collect(),
            seeder,
            phase,
        }
    }

    pub fn store(&self) -> &Arc<TenantStore> {
        &self.store
    }

    pub fn phase(&self) -> BootstrapPhase {
        self.phase.borrow().clone()
    }

    pub fn phases(&self) -> PhaseWatch {
        PhaseWatch::new(self.phase.subscribe())
    }

    /// A binding for one record dataset, driven by this coordinator.
    pub fn bind<R: TenantRecord>(&self) -> CollectionBinding<R> {
        CollectionBinding::<R>::records(self.store.clone(), self.phases())
    }

    /// Read the seed flag and the total record count over every dataset.
    pub fn decide(&self, tenant: &TenantId) -> Decision {
        let total_records = self
            .datasets
            .iter()
            .map(|dataset| self.store.record_count(dataset, tenant))
            .sum();
        Decision {
            tenant: tenant.clone(),
            flag_set: self.store.is_seeded(tenant),
            total_records,
        }
    }

    /// Run one full pass for `auth` and return the phase it ended in.
    pub async fn bootstrap(&self, auth: &AuthState) -> BootstrapPhase {
        self.bootstrap_pass(auth, || false).await
    }

    /// Follow the auth signal until its sender is dropped.
    pub async fn run(self: Arc<Self>, mut auth: watch::Receiver<AuthState>) {
        loop {
            let state = auth.borrow_and_update().clone();
            self.bootstrap_pass(&state, || auth.has_changed().unwrap_or(false))
                .await;

            if auth.changed().await.is_err() {
                tracing::debug!("auth signal closed, bootstrap coordinator stopping");
                break;
            }
        }
    }

    pub fn spawn(self: Arc<Self>, auth: watch::Receiver<AuthState>) -> JoinHandle<()> {
        tokio::spawn(self.run(auth))
    }

    async fn bootstrap_pass<F>(&self, auth: &AuthState, superseded: F) -> BootstrapPhase
    where
        F: Fn() -> bool,
    {
        self.set_phase(BootstrapPhase::WaitingForAuth);
        if auth.is_loading {
            return BootstrapPhase::WaitingForAuth;
        }

        let Some(tenant) = auth.tenant_id.clone() else {
            self.set_phase(BootstrapPhase::Unauthenticated);
            return BootstrapPhase::Unauthenticated;
        };

        self.set_phase(BootstrapPhase::Deciding(tenant.clone()));
        let decision = self.decide(&tenant);
        tracing::debug!(
            %tenant,
            flag_set = decision.flag_set,
            total_records = decision.total_records,
            "bootstrap decision"
        );

        if decision.needs_seed() {
            self.set_phase(BootstrapPhase::Seeding(tenant.clone()));
            let outcome = if decision.flag_set {
                self.seeder.reseed(&tenant)
            } else {
                self.seeder.seed_tenant(&tenant)
            };
            if let SeedOutcome::Failed { error, .. } = &outcome {
                // Still become ready: consumers see whatever is stored and
                // the next bootstrap retries.
                tracing::warn!(%tenant, %error, "seeding failed, continuing with stored data");
            }
        }

        // Let consumers of the freshly written keys get scheduled before
        // anyone is told the tenant is ready.
        tokio::task::yield_now().await;

        if superseded() {
            tracing::debug!(%tenant, "auth changed during bootstrap, restarting");
            return self.phase();
        }

        let ready = BootstrapPhase::Ready(tenant);
        self.set_phase(ready.clone());
        ready
    }

    fn set_phase(&self, phase: BootstrapPhase) {
        self.phase.send_if_modified(|current| {
            if *current == phase {
                return false;
            }
            match &phase {
                BootstrapPhase::Ready(tenant) => tracing::info!(%tenant, "tenant data ready"),
                other => tracing::debug!(phase = %other, "bootstrap phase"),
            }
            *current = phase;
            true
        });
    }
}
