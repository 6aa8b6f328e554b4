use std::collections::BTreeMap;
use std::sync::Arc;

use oss_academy::{Dataset, SeedOrchestrator, SeedOutcome, Student, Teacher};
use oss_core::{StoreSettings, TenantId, TenantRecord, TenantStore};

fn setup() -> (Arc<TenantStore>, Arc<SeedOrchestrator>) {
    let store = Arc::new(TenantStore::in_memory());
    let seeder = Arc::new(SeedOrchestrator::new(store.clone()));
    (store, seeder)
}

fn tenant(id: &str) -> TenantId {
    TenantId::new(id).unwrap()
}

fn snapshot(store: &TenantStore, tenant: &TenantId) -> BTreeMap<String, Option<String>> {
    store
        .inspect(tenant)
        .into_iter()
        .map(|report| {
            let raw = store.storage().get(&report.key);
            (report.key, raw)
        })
        .collect()
}

/// Scenario 1: a never-seeded tenant gets records and the flag.
#[test]
fn first_seed_writes_students_and_flag() {
    let (store, seeder) = setup();
    let t1 = tenant("t-1");
    assert_eq!(store.storage().get("oss365:seeded-t-1"), None);

    seeder.seed_if_needed("t-1");

    assert!(store.record_count(&Dataset::Students.name(), &t1) >= 1);
    assert_eq!(store.storage().get("oss365:seeded-t-1").as_deref(), Some("1"));
}

/// Scenario 2 and idempotence: a second call changes nothing.
#[test]
fn second_seed_leaves_counts_and_content_unchanged() {
    let (store, seeder) = setup();
    let t1 = tenant("t-1");

    seeder.seed_if_needed("t-1");
    let counts: Vec<usize> = Dataset::ALL
        .iter()
        .map(|d| store.record_count(&d.name(), &t1))
        .collect();
    let before = snapshot(&store, &t1);

    assert!(matches!(seeder.seed_if_needed("t-1"), SeedOutcome::AlreadySeeded));

    let after_counts: Vec<usize> = Dataset::ALL
        .iter()
        .map(|d| store.record_count(&d.name(), &t1))
        .collect();
    assert_eq!(counts, after_counts);
    assert_eq!(before, snapshot(&store, &t1));
    assert_eq!(store.seed_flag(&t1).as_deref(), Some("1"));
}

/// Scenario 3 and isolation: tenants never see each other's records.
#[test]
fn tenants_are_isolated() {
    let (store, seeder) = setup();
    let (t1, t2) = (tenant("t-1"), tenant("t-2"));

    seeder.seed_if_needed("t-2");
    let t2_before = snapshot(&store, &t2);

    seeder.seed_if_needed("t-1");

    let students = store.read_records::<Student>(&t1);
    assert!(!students.is_empty());
    assert!(students.iter().all(|s| s.tenant_id() == "t-1"));
    assert!(!students.iter().any(|s| s.tenant_id() == "t-2"));
    assert_eq!(t2_before, snapshot(&store, &t2));
}

/// Scenario 4: nothing written reads as the empty default.
#[test]
fn unwritten_dataset_reads_as_empty() {
    let (store, _) = setup();
    let teachers: Vec<Teacher> = store.read_records(&tenant("t-3"));
    assert!(teachers.is_empty());
}

#[test]
fn corrupted_dataset_reads_as_default() {
    let (store, seeder) = setup();
    let t1 = tenant("t-1");
    seeder.seed_if_needed("t-1");

    let key = store.keys().dataset_key(&Dataset::Teachers.name(), &t1);
    let raw = store.storage().get(&key).unwrap();
    store
        .storage()
        .set(&key, raw[..raw.len() / 2].to_string())
        .unwrap();

    assert!(store.read_records::<Teacher>(&t1).is_empty());
    let fallback = vec![Teacher::new("t-1", "Fallback", "f@x", oss_academy::Belt::Blue, "b")];
    assert_eq!(
        store.read(&Dataset::Teachers.name(), &t1, fallback.clone()),
        fallback
    );
}

/// The flag persists with the data, so a reloaded store never reseeds.
#[test]
fn seed_is_not_repeated_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let settings = StoreSettings::default().with_path(dir.path().join("oss365.json"));
    let t1 = tenant("t-1");

    let store = Arc::new(TenantStore::from_settings(&settings).unwrap());
    let first = SeedOrchestrator::new(store.clone()).seed_if_needed("t-1");
    assert!(first.wrote_data());
    let before = snapshot(&store, &t1);
    drop(store);

    let reopened = Arc::new(TenantStore::from_settings(&settings).unwrap());
    assert!(reopened.is_seeded(&t1));
    let second = SeedOrchestrator::new(reopened.clone()).seed_if_needed("t-1");
    assert!(matches!(second, SeedOutcome::AlreadySeeded));
    assert_eq!(snapshot(&reopened, &t1), before);
    assert_eq!(reopened.read_records::<Student>(&t1).len(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_seeds_for_one_tenant_write_once() {
    let (store, seeder) = setup();
    let mut events = store.subscribe();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let seeder = seeder.clone();
            tokio::task::spawn_blocking(move || seeder.seed_if_needed("t-1"))
        })
        .collect();

    let mut seeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            SeedOutcome::Seeded { .. } => seeded += 1,
            SeedOutcome::AlreadySeeded => {}
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
    assert_eq!(seeded, 1);

    // Six dataset writes plus the flag, exactly once.
    let mut writes = 0;
    while events.try_recv().is_ok() {
        writes += 1;
    }
    assert_eq!(writes, Dataset::ALL.len() + 1);
}
