use charge_console::charge::Charge;
use charge_console::charge::ChargePatch;
use charge_console::charge::ChargeStatus;
use charge_console::charge::seed_charges;
use charge_console::store::ChargeStore;
use charge_console::store::FileStorage;
use charge_console::store::MemoryStorage;
use charge_console::store::STORAGE_KEY;
use charge_console::store::StoreError;
use chrono::NaiveDate;
use std::cell::RefCell;
use std::rc::Rc;

fn new_charge(id: &str) -> Charge {
    Charge {
        charge_id: id.to_string(),
        charge_amount: 60.0,
        paid_amount: 0.0,
        student_id: "stu_105".to_string(),
        date_charged: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
        status: ChargeStatus::Unpaid,
    }
}

#[test]
fn empty_storage_falls_back_to_seed_data() {
    let store = ChargeStore::open(MemoryStorage::new());
    assert_eq!(store.list(), seed_charges().as_slice());
}

#[test]
fn corrupt_storage_falls_back_to_seed_data() {
    let store = ChargeStore::open(MemoryStorage::new().with_value(STORAGE_KEY, "{not json"));
    assert_eq!(store.list().len(), 5);
}

#[test]
fn stored_list_wins_over_seed_data() {
    let json = serde_json::to_string(&vec![new_charge("chg_100")]).unwrap();
    let store = ChargeStore::open(MemoryStorage::new().with_value(STORAGE_KEY, json));
    assert_eq!(store.list().len(), 1);
    assert!(store.contains("chg_100"));
}

#[test]
fn every_mutation_notifies_once_then_persists() {
    let mut store = ChargeStore::open(MemoryStorage::new());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    store.subscribe(move |charges| log.borrow_mut().push(charges.len()));

    store.add(new_charge("chg_006")).unwrap();
    store
        .update(
            "chg_006",
            &ChargePatch {
                paid_amount: Some(60.0),
                status: Some(ChargeStatus::Paid),
                ..Default::default()
            },
        )
        .unwrap();
    store.delete("chg_001").unwrap();
    store.reset_to_seed_data().unwrap();

    assert_eq!(*seen.borrow(), vec![6, 6, 5, 5]);
    let saved: Vec<Charge> =
        serde_json::from_str(store.storage().get(STORAGE_KEY).unwrap()).unwrap();
    assert_eq!(saved, seed_charges());
}

#[test]
fn missing_ids_change_nothing_and_notify_no_one() {
    let mut store = ChargeStore::open(MemoryStorage::new());
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    store.subscribe(move |_| *counter.borrow_mut() += 1);

    assert!(matches!(store.delete("chg_999"), Err(StoreError::NotFound(id)) if id == "chg_999"));
    assert!(matches!(
        store.update("chg_999", &ChargePatch::default()),
        Err(StoreError::NotFound(_))
    ));
    assert_eq!(*calls.borrow(), 0);
    assert_eq!(store.list().len(), 5);
    assert!(store.storage().get(STORAGE_KEY).is_none());
}

#[test]
fn unsubscribed_listener_stops_hearing() {
    let mut store = ChargeStore::open(MemoryStorage::new());
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let id = store.subscribe(move |_| *counter.borrow_mut() += 1);

    store.delete("chg_002").unwrap();
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.delete("chg_003").unwrap();

    assert_eq!(*calls.borrow(), 1);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn file_storage_survives_reopen() {
    let dir = std::env::temp_dir().join(format!("charge-console-reopen-{}", std::process::id()));
    let mut store = ChargeStore::open(FileStorage::new(&dir));
    store.add(new_charge("chg_042")).unwrap();
    drop(store);

    let reopened = ChargeStore::open(FileStorage::new(&dir));
    assert_eq!(reopened.list().len(), 6);
    assert_eq!(reopened.get("chg_042"), Some(&new_charge("chg_042")));
    let _ = std::fs::remove_dir_all(&dir);
}
