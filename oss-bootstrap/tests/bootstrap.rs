use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use oss_academy::{
    Belt, Branch, Championship, ClassSession, Dataset, Payment, SeedOrchestrator, Student, Teacher,
};
use oss_bootstrap::{
    AuthSignal, AuthState, BindingState, BootstrapCoordinator, BootstrapPhase, CollectionBinding,
};
use oss_core::{
    MemoryStorage, StorageFacility, StoreResult, StoreSettings, TenantId, TenantRecord, TenantStore,
};

/// Memory storage that counts reads.
#[derive(Default)]
struct CountingStorage {
    inner: MemoryStorage,
    reads: AtomicUsize,
}

impl StorageFacility for CountingStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: String) -> StoreResult<()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        self.inner.remove(key)
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }
}

fn tenant(id: &str) -> TenantId {
    TenantId::new(id).unwrap()
}

fn start() -> (Arc<BootstrapCoordinator>, AuthSignal) {
    let store = Arc::new(TenantStore::in_memory());
    let coordinator = Arc::new(BootstrapCoordinator::new(Arc::new(SeedOrchestrator::new(store))));
    let auth = AuthSignal::new();
    coordinator.clone().spawn(auth.subscribe());
    (coordinator, auth)
}

async fn loaded<R: TenantRecord>(binding: &mut CollectionBinding<R>) {
    let ok = tokio::time::timeout(Duration::from_secs(2), binding.wait_loaded())
        .await
        .expect("timeout waiting for binding");
    assert!(ok, "coordinator went away");
}

async fn ready_for(coordinator: &BootstrapCoordinator, expected: &TenantId) {
    let mut phases = coordinator.phases();
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if phases.current() == BootstrapPhase::Ready(expected.clone()) {
                return;
            }
            phases.changed().await.expect("coordinator went away");
        }
    })
    .await
    .expect("timeout waiting for ready");
}

/// Scenario 5: while auth is loading the binding reports loading and
/// never touches storage.
#[tokio::test]
async fn binding_does_not_read_while_auth_is_loading() {
    let storage = Arc::new(CountingStorage::default());
    let facility: Arc<dyn StorageFacility> = storage.clone();
    let store = Arc::new(TenantStore::new(facility, &StoreSettings::default()));
    let coordinator = Arc::new(BootstrapCoordinator::new(Arc::new(SeedOrchestrator::new(store))));
    let auth = AuthSignal::new();
    coordinator.clone().spawn(auth.subscribe());

    let mut students = coordinator.bind::<Student>();
    tokio::task::yield_now().await;

    assert_eq!(students.sync(), BindingState::Unresolved);
    assert!(students.is_loading());
    assert!(students.value().is_empty());
    assert_eq!(storage.reads.load(Ordering::SeqCst), 0);

    auth.publish(AuthState::signed_in(tenant("t-1")));
    loaded(&mut students).await;

    assert!(storage.reads.load(Ordering::SeqCst) > 0);
    assert_eq!(students.value().len(), 5);
}

/// Every binding that sees `Ready` reads a non-empty seeded collection.
#[tokio::test]
async fn ready_means_every_dataset_is_readable() {
    let (coordinator, auth) = start();
    let mut phases = coordinator.phases();

    auth.publish(AuthState::signed_in(tenant("t-1")));
    let ready = tokio::time::timeout(Duration::from_secs(2), phases.wait_ready())
        .await
        .unwrap();
    assert_eq!(ready, Some(tenant("t-1")));

    let counts = [
        (Dataset::Branches, coordinator.bind::<Branch>().value().len()),
        (Dataset::Teachers, coordinator.bind::<Teacher>().value().len()),
        (Dataset::Students, coordinator.bind::<Student>().value().len()),
        (Dataset::Championships, coordinator.bind::<Championship>().value().len()),
        (Dataset::Classes, coordinator.bind::<ClassSession>().value().len()),
        (Dataset::Payments, coordinator.bind::<Payment>().value().len()),
    ];
    for (dataset, count) in counts {
        assert!(count > 0, "{dataset} empty after ready");
    }
}

#[tokio::test]
async fn switching_tenant_rereads_for_the_new_tenant() {
    let (coordinator, auth) = start();
    let mut students = coordinator.bind::<Student>();

    auth.publish(AuthState::signed_in(tenant("t-1")));
    loaded(&mut students).await;
    assert!(students.value().iter().all(|s| s.tenant_id == "t-1"));
    let t1_ids: Vec<String> = students.value().iter().map(|s| s.id.clone()).collect();

    auth.publish(AuthState::signed_in(tenant("t-2")));
    ready_for(&coordinator, &tenant("t-2")).await;
    assert_eq!(students.sync(), BindingState::Loaded);

    assert_eq!(students.tenant(), Some(&tenant("t-2")));
    assert!(students.value().iter().all(|s| s.tenant_id == "t-2"));

    let t1_stored: Vec<String> = coordinator
        .store()
        .read_records::<Student>(&tenant("t-1"))
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(t1_ids, t1_stored);
}

#[tokio::test]
async fn signing_out_empties_bindings_and_drops_saves() {
    let (coordinator, auth) = start();
    let mut branches = coordinator.bind::<Branch>();

    auth.publish(AuthState::signed_in(tenant("t-1")));
    loaded(&mut branches).await;
    let stored_before = coordinator.store().inspect(&tenant("t-1"));

    auth.publish(AuthState::signed_out());
    let mut phases = coordinator.phases();
    tokio::time::timeout(Duration::from_secs(2), async {
        while phases.current() != BootstrapPhase::Unauthenticated {
            phases.changed().await.unwrap();
        }
    })
    .await
    .unwrap();

    assert_eq!(branches.sync(), BindingState::Empty);
    assert!(branches.value().is_empty());
    assert!(!branches.save(vec![Branch::new("t-1", "Ghost", "Nowhere")]));
    assert_eq!(coordinator.store().inspect(&tenant("t-1")), stored_before);
}

#[tokio::test]
async fn stale_binding_cannot_save_after_sign_out() {
    let (coordinator, auth) = start();
    let mut branches = coordinator.bind::<Branch>();

    auth.publish(AuthState::signed_in(tenant("t-1")));
    loaded(&mut branches).await;
    let stored_before = coordinator.store().read_records::<Branch>(&tenant("t-1"));

    auth.publish(AuthState::signed_out());
    let mut phases = coordinator.phases();
    tokio::time::timeout(Duration::from_secs(2), async {
        while phases.current() != BootstrapPhase::Unauthenticated {
            phases.changed().await.unwrap();
        }
    })
    .await
    .unwrap();

    // No sync in between: the binding still thinks it is loaded for t-1.
    assert!(!branches.save(vec![Branch::new("t-1", "Ghost", "Nowhere")]));
    assert_eq!(branches.state(), BindingState::Empty);
    assert!(branches.value().is_empty());
    assert_eq!(
        coordinator.store().read_records::<Branch>(&tenant("t-1")),
        stored_before
    );
}

#[tokio::test]
async fn stale_binding_saves_into_the_new_tenant_after_a_switch() {
    let (coordinator, auth) = start();
    let mut branches = coordinator.bind::<Branch>();

    auth.publish(AuthState::signed_in(tenant("t-1")));
    loaded(&mut branches).await;
    let t1_before = coordinator.store().read_records::<Branch>(&tenant("t-1"));

    auth.publish(AuthState::signed_in(tenant("t-2")));
    ready_for(&coordinator, &tenant("t-2")).await;

    assert!(branches.update(|b| b.push(Branch::new("t-2", "Annex", "Santos"))));
    assert_eq!(branches.tenant(), Some(&tenant("t-2")));
    assert_eq!(coordinator.store().read_records::<Branch>(&tenant("t-2")).len(), 3);
    assert_eq!(coordinator.store().read_records::<Branch>(&tenant("t-1")), t1_before);
}

#[tokio::test]
async fn saves_persist_and_reach_sibling_bindings() {
    let (coordinator, auth) = start();
    let mut editor = coordinator.bind::<Student>();
    let mut viewer = coordinator.bind::<Student>();

    auth.publish(AuthState::signed_in(tenant("t-1")));
    loaded(&mut editor).await;
    loaded(&mut viewer).await;

    let today = chrono_today();
    let newcomer = Student::new("t-1", "Carla Nunes", today, Belt::White, "b-1", today);
    assert!(editor.upsert(newcomer.clone()));
    assert_eq!(editor.value().len(), 6);

    assert_eq!(viewer.sync(), BindingState::Loaded);
    assert_eq!(viewer.find(&newcomer.id), Some(&newcomer));
    assert_eq!(
        coordinator.store().read_records::<Student>(&tenant("t-1")).len(),
        6
    );

    assert!(editor.remove(&newcomer.id));
    assert!(!editor.remove(&newcomer.id));
    viewer.sync();
    assert_eq!(viewer.value().len(), 5);
}

#[tokio::test]
async fn records_for_another_tenant_are_refused() {
    let (coordinator, auth) = start();
    let mut branches = coordinator.bind::<Branch>();

    auth.publish(AuthState::signed_in(tenant("t-1")));
    loaded(&mut branches).await;

    assert!(!branches.upsert(Branch::new("t-2", "Intruder", "Elsewhere")));
    assert_eq!(branches.value().len(), 2);
    assert!(coordinator
        .store()
        .read_records::<Branch>(&tenant("t-2"))
        .is_empty());
}

#[tokio::test]
async fn rapid_tenant_changes_settle_on_the_last_one() {
    let (coordinator, auth) = start();

    auth.publish(AuthState::signed_in(tenant("t-1")));
    auth.publish(AuthState::loading());
    auth.publish(AuthState::signed_in(tenant("t-2")));

    ready_for(&coordinator, &tenant("t-2")).await;
    assert!(coordinator.store().is_seeded(&tenant("t-2")));
}

#[tokio::test]
async fn coordinator_stops_when_auth_signal_is_dropped() {
    let store = Arc::new(TenantStore::in_memory());
    let coordinator = Arc::new(BootstrapCoordinator::new(Arc::new(SeedOrchestrator::new(store))));
    let auth = AuthSignal::new();
    let handle = coordinator.clone().spawn(auth.subscribe());

    drop(auth);
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("coordinator did not stop")
        .unwrap();
}

fn chrono_today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}
