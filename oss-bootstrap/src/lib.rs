//! oss-bootstrap: getting a tenant's data in place before anything reads it.
//!
//! The auth layer resolves the current tenant asynchronously while dataset
//! consumers want to read storage synchronously. Instead of every consumer
//! guessing when it is safe to read, one [`BootstrapCoordinator`] watches
//! the [`AuthSignal`], seeds the tenant if needed and publishes a
//! [`BootstrapPhase`]. [`DatasetBinding`]s only read once that phase is
//! `Ready`.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use oss_academy::{SeedOrchestrator, Student};
//! use oss_bootstrap::{AuthSignal, AuthState, BootstrapCoordinator};
//! use oss_core::{TenantId, TenantStore};
//!
//! # async fn demo() {
//! let store = Arc::new(TenantStore::in_memory());
//! let coordinator = Arc::new(BootstrapCoordinator::new(Arc::new(SeedOrchestrator::new(store))));
//! let auth = AuthSignal::new();
//! coordinator.clone().spawn(auth.subscribe());
//!
//! let mut students = coordinator.bind::<Student>();
//! auth.publish(AuthState::signed_in(TenantId::new("t-1").unwrap()));
//! students.wait_loaded().await;
//! assert!(!students.value().is_empty());
//! # }
//! ```

pub mod auth;
pub mod binding;
pub mod coordinator;
pub mod phase;

pub use auth::{AuthSignal, AuthState};
pub use binding::{BindingState, CollectionBinding, DatasetBinding};
pub use coordinator::{BootstrapCoordinator, Decision};
pub use phase::{BootstrapPhase, PhaseWatch};
