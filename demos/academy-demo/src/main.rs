//! Signs in as a few tenants in turn and prints what the bootstrap left in
//! storage for each of them.
//!
//! ```bash
//! OSS365__STORE__PATH=/tmp/oss365.json cargo run -p academy-demo -- t-1 t-2
//! ```

mod config;

use std::sync::Arc;

use anyhow::Result;
use oss_academy::{SeedOrchestrator, Student};
use oss_bootstrap::{AuthSignal, AuthState, BootstrapCoordinator, BootstrapPhase, PhaseWatch};
use oss_core::{TenantId, TenantStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let settings = config::load_settings()?;
    let store = Arc::new(TenantStore::from_settings(&settings)?);
    let seeder = Arc::new(SeedOrchestrator::from_settings(store.clone(), &settings)?);
    tracing::info!(prefix = %settings.prefix, policy = %seeder.policy(), "store ready");

    let coordinator = Arc::new(BootstrapCoordinator::new(seeder));
    let auth = AuthSignal::new();
    let task = coordinator.clone().spawn(auth.subscribe());

    let mut students = coordinator.bind::<Student>();
    let mut phases = coordinator.phases();

    for raw in config::tenants() {
        let tenant = TenantId::new(raw)?;

        auth.publish(AuthState::loading());
        auth.publish(AuthState::signed_in(tenant.clone()));
        if !wait_for_tenant(&mut phases, &tenant).await {
            break;
        }
        students.sync();

        println!("[academy-demo] tenant {tenant}: {} students", students.value().len());
        for report in store.inspect(&tenant) {
            match report.records {
                Some(n) => println!("  {:<40} {n} records", report.key),
                None => println!("  {:<40} (flag)", report.key),
            }
        }
    }

    auth.publish(AuthState::signed_out());
    drop(auth);
    task.await?;

    Ok(())
}

async fn wait_for_tenant(phases: &mut PhaseWatch, tenant: &TenantId) -> bool {
    loop {
        if phases.current() == BootstrapPhase::Ready(tenant.clone()) {
            return true;
        }
        if phases.changed().await.is_none() {
            return false;
        }
    }
}
