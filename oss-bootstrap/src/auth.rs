use oss_core::TenantId;
use tokio::sync::watch;

/// What the auth layer currently knows about the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub is_loading: bool,
    pub tenant_id: Option<TenantId>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self::loading()
    }
}

impl AuthState {
    /// Session not resolved yet.
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            tenant_id: None,
        }
    }

    pub fn signed_in(tenant: TenantId) -> Self {
        Self {
            is_loading: false,
            tenant_id: Some(tenant),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            is_loading: false,
            tenant_id: None,
        }
    }

    /// Build from the raw fields an auth provider exposes. An empty tenant
    /// string is treated as no tenant.
    pub fn from_parts(is_loading: bool, tenant_id: Option<&str>) -> Self {
        Self {
            is_loading,
            tenant_id: TenantId::from_optional(tenant_id),
        }
    }

    pub fn is_settled(&self) -> bool {
        !self.is_loading
    }
}

/// Publisher side of the auth/tenant signal.
///
/// Owned by the auth layer. Consumers only ever hold receivers and never
/// write auth state.
#[derive(Debug)]
pub struct AuthSignal {
    tx: watch::Sender<AuthState>,
}

impl Default for AuthSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthSignal {
    /// A signal that starts out loading.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(AuthState::loading());
        Self { tx }
    }

    /// Publish a new state. Publishing the current state again is ignored,
    /// so subscribers do not restart for nothing.
    pub fn publish(&self, state: AuthState) {
        self.tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            tracing::debug!(
                is_loading = state.is_loading,
                tenant = ?state.tenant_id.as_ref().map(TenantId::as_str),
                "auth state changed"
            );
            *current = state;
            true
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }
}
