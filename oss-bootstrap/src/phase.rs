use std::fmt;

use oss_core::TenantId;
use tokio::sync::watch;

/// Where the bootstrap coordinator is for the current session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BootstrapPhase {
    /// Auth has not settled yet.
    #[default]
    WaitingForAuth,
    /// Auth settled without a tenant. Never becomes ready on its own; the
    /// host is expected to send the user to sign in.
    Unauthenticated,
    /// Inspecting the seed flag and record counts.
    Deciding(TenantId),
    /// Writing starter data.
    Seeding(TenantId),
    /// Data for the tenant is in storage and safe to read.
    Ready(TenantId),
}

impl BootstrapPhase {
    pub fn is_ready(&self) -> bool {
        matches!(self, BootstrapPhase::Ready(_))
    }

    pub fn ready_tenant(&self) -> Option<&TenantId> {
        match self {
            BootstrapPhase::Ready(tenant) => Some(tenant),
            _ => None,
        }
    }

    pub fn tenant(&self) -> Option<&TenantId> {
        match self {
            BootstrapPhase::Deciding(t) | BootstrapPhase::Seeding(t) | BootstrapPhase::Ready(t) => Some(t),
            BootstrapPhase::WaitingForAuth | BootstrapPhase::Unauthenticated => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BootstrapPhase::WaitingForAuth => "waiting_for_auth",
            BootstrapPhase::Unauthenticated => "unauthenticated",
            BootstrapPhase::Deciding(_) => "deciding",
            BootstrapPhase::Seeding(_) => "seeding",
            BootstrapPhase::Ready(_) => "ready",
        }
    }
}

impl fmt::Display for BootstrapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tenant() {
            Some(tenant) => write!(f, "{}({})", self.name(), tenant),
            None => f.write_str(self.name()),
        }
    }
}

/// Subscriber handle for the coordinator's phase.
#[derive(Debug, Clone)]
pub struct PhaseWatch {
    rx: watch::Receiver<BootstrapPhase>,
}

impl PhaseWatch {
    pub(crate) fn new(rx: watch::Receiver<BootstrapPhase>) -> Self {
        Self { rx }
    }

    pub fn current(&self) -> BootstrapPhase {
        self.rx.borrow().clone()
    }

    /// Wait for the next phase change. `None` once the coordinator is gone.
    pub async fn changed(&mut self) -> Option<BootstrapPhase> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until the coordinator reports `Ready` and return its tenant.
    /// Returns immediately if it already is. `None` once the coordinator is gone.
    pub async fn wait_ready(&mut self) -> Option<TenantId> {
        let phase = self.rx.wait_for(BootstrapPhase::is_ready).await.ok()?;
        phase.ready_tenant().cloned()
    }
}
