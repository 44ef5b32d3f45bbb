/// Habit store workflows on a real SQLite file
use habit_ledger::*;
use tempfile::NamedTempFile;

fn sqlite_store(file: &NamedTempFile, slot: &str) -> HabitStore<SqliteSlots> {
    let slots = SqliteSlots::new(file.path().to_path_buf()).expect("Failed to open database");
    HabitStore::new(slots, StoreConfig::with_slot(slot))
}

fn habit(title: &str, target: u32) -> Habit {
    Habit::create(NewHabit {
        title: title.to_string(),
        description: None,
        target: Some(target),
    })
    .expect("valid habit")
}

fn assert_invariants<S: KeyValueStore>(store: &HabitStore<S>) {
    let habits = store.load_all();
    for h in &habits {
        assert_eq!(h.is_completed, h.status == HabitStatus::Completed);
        if let Some(target) = h.target {
            assert!(target >= 1);
        }
        let mut seen = Vec::new();
        for d in h.completed_dates.iter() {
            assert!(!seen.contains(d), "duplicate date {}", d);
            seen.push(*d);
        }
    }
    for (i, a) in habits.iter().enumerate() {
        assert!(habits[i + 1..].iter().all(|b| b.id != a.id));
    }
}

#[test]
fn test_full_habit_lifecycle_persists() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let store = sqlite_store(&temp_file, "habits");

    let run = habit("Run", 2);
    let read = habit("Read", 21);
    store.add(run.clone());
    store.add(read.clone());
    assert_invariants(&store);

    // caller loop: fetch, toggle, write back
    let first = toggle_completion_for_date(&store.get(&run.id).unwrap(), parse_date("2024-03-01").unwrap());
    store.update(&first.habit);
    let second = toggle_completion_for_date(&store.get(&run.id).unwrap(), parse_date("2024-03-02").unwrap());
    store.update(&second.habit);
    assert!(second.target_reached);

    // the user confirms
    store.mark_completed(&run.id);
    store.mark_archived(&read.id);
    assert_invariants(&store);

    // a second handle on the same file sees everything
    let reopened = sqlite_store(&temp_file, "habits");
    let habits = reopened.load_all();
    assert_eq!(habits.len(), 2);
    assert_eq!(habits[0].status, HabitStatus::Completed);
    assert_eq!(compute_progress_percent(&habits[0]), 100);
    assert_eq!(habits[1].status, HabitStatus::Archived);
    assert!(!habits[1].is_completed);
}

#[test]
fn test_deleted_habit_stays_deleted() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = sqlite_store(&temp_file, "habits");
    let gone = habit("Gone", 3);
    store.add(gone.clone());
    store.add(habit("Kept", 3));

    store.remove(&gone.id);
    store.update(&gone);
    store.mark_completed(&gone.id);
    store.mark_archived(&gone.id);

    let habits = store.load_all();
    assert_eq!(habits.len(), 1);
    assert!(habits.iter().all(|h| h.id != gone.id));
}

#[test]
fn test_unknown_id_leaves_payload_identical() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = sqlite_store(&temp_file, "habits");
    store.add(habit("One", 3));
    store.add(habit("Two", 3));

    let before = store.medium().get("habits").unwrap();
    store.mark_archived(&HabitId::from("does-not-exist"));
    store.mark_completed(&HabitId::from("does-not-exist"));
    store.remove(&HabitId::from("does-not-exist"));
    assert_eq!(store.medium().get("habits").unwrap(), before);
}

#[test]
fn test_slots_isolate_stores_in_one_file() {
    let temp_file = NamedTempFile::new().unwrap();
    let first = sqlite_store(&temp_file, "test-run-a");
    first.add(habit("A", 3));

    let second = sqlite_store(&temp_file, "test-run-b");
    assert!(second.load_all().is_empty());
    second.add(habit("B", 3));

    assert_eq!(first.load_all().len(), 1);
    assert_eq!(second.load_all()[0].title, "B");
}

#[test]
fn test_legacy_payload_on_disk() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = sqlite_store(&temp_file, "habits");
    store
        .medium()
        .set(
            "habits",
            r#"[{"id":"1","title":"Yoga","status":"new","createdAt":"2023-02-01T07:00:00.000Z","completedDates":["2023-02-01","2023-02-01"],"target":0}]"#,
        )
        .unwrap();

    let habits = store.load_all();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].status, HabitStatus::Active);
    assert_eq!(habits[0].target, Some(21));
    assert_eq!(habits[0].completed_count(), 1);
    assert_invariants(&store);

    assert_eq!(store.migrate_in_place().unwrap(), 1);
    let raw = store.medium().get("habits").unwrap().unwrap();
    assert!(raw.contains("\"isCompleted\":false"));
}

#[test]
fn test_corrupt_payload_degrades_to_empty() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = sqlite_store(&temp_file, "habits");
    store.medium().set("habits", "not json at all").unwrap();

    assert!(store.load_all().is_empty());

    // mutations refuse to overwrite what they could not read
    store.add(habit("Fresh", 5));
    assert!(store.load_all().is_empty());
    assert_eq!(
        store.medium().get("habits").unwrap().as_deref(),
        Some("not json at all")
    );

    store.save_all(&[habit("Fresh", 5)]);
    assert_eq!(store.load_all().len(), 1);
}

#[test]
fn test_damaged_record_outlives_later_writes() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = sqlite_store(&temp_file, "habits");
    store
        .medium()
        .set(
            "habits",
            r#"[{"id":"old","title":"Journal","status":"active","createdAt":"2023-01-01","completedDates":[]}]"#,
        )
        .unwrap();
    assert!(store.load_all().is_empty());

    let fresh = habit("Fresh", 5);
    store.add(fresh.clone());
    store.mark_archived(&fresh.id);
    assert_eq!(store.migrate_in_place().unwrap(), 0);

    let raw = store.medium().get("habits").unwrap().unwrap();
    assert!(raw.contains(r#""createdAt":"2023-01-01""#), "{}", raw);
    assert_eq!(store.load_all().len(), 1);
}

#[test]
fn test_old_snapshot_does_not_reopen_archived_habit() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = sqlite_store(&temp_file, "habits");
    let snapshot = habit("Swim", 10);
    store.add(snapshot.clone());
    store.mark_archived(&snapshot.id);

    let outcome = store.try_update(&snapshot).unwrap();
    assert_eq!(
        outcome,
        Mutation::Rejected {
            from: HabitStatus::Archived,
            to: HabitStatus::Active
        }
    );

    let reopened = sqlite_store(&temp_file, "habits");
    assert_eq!(reopened.get(&snapshot.id).unwrap().status, HabitStatus::Archived);
    assert_invariants(&reopened);
}

#[test]
fn test_store_without_medium_is_inert() {
    let store = HabitStore::new(UnavailableSlots, StoreConfig::default());
    let h = habit("Nowhere", 3);
    store.add(h.clone());
    store.mark_completed(&h.id);
    store.remove(&h.id);
    assert!(store.load_all().is_empty());
    assert!(store.get(&h.id).is_none());
}
