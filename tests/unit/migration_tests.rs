/// Stored-record migration through the public API
use habit_ledger::*;
use serde_json::{json, Value};

fn raw_samples() -> Vec<Value> {
    vec![
        json!({"status": "new", "completedDates": []}),
        json!({"id": "a", "title": "A", "status": "completed", "createdAt": "2023-05-05T05:05:05.000Z", "completedDates": ["2023-05-06"]}),
        json!({"id": "b", "title": "B", "status": "archived", "createdAt": "2023-05-05T05:05:05.000Z", "completedDates": [], "target": 9}),
        json!({"id": "c", "title": "C", "status": "active", "createdAt": "2023-05-05T05:05:05.000Z", "completedDates": [], "isCompleted": true}),
        json!({"target": ""}),
        json!([1, 2, 3]),
        json!(null),
    ]
}

#[test]
fn test_migration_idempotence() {
    for raw in raw_samples() {
        let once = migrate_record(raw);
        let twice = migrate_record(once.clone());
        assert_eq!(twice, once);
    }
}

#[test]
fn test_legacy_new_record_upgrade() {
    let migrated = migrate_record(json!({"status": "new", "completedDates": []}));
    assert_eq!(
        migrated,
        json!({"status": "active", "completedDates": [], "isCompleted": false, "target": 21})
    );
}

#[test]
fn test_normalize_repairs_flag_mismatch() {
    let habit = normalize(raw_samples().remove(3)).unwrap();
    assert_eq!(habit.status, HabitStatus::Active);
    assert!(!habit.is_completed);
    // current-schema record without target keeps none
    assert_eq!(habit.target, None);
}

#[test]
fn test_normalize_is_stable() {
    for raw in raw_samples() {
        if let Ok(habit) = normalize(raw) {
            let again = normalize(serde_json::to_value(&habit).unwrap()).unwrap();
            assert_eq!(again, habit);
        }
    }
}

#[test]
fn test_parse_collection_reports_versions() {
    let payload = serde_json::to_string(&raw_samples()).unwrap();
    let loaded = parse_collection(&payload).unwrap();

    let ids: Vec<_> = loaded.habits.iter().map(|h| h.id.to_string()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(loaded.upgraded, 2);
    assert_eq!(loaded.dropped.len(), 4);
    assert_eq!(SchemaVersion::detect(&json!({"isCompleted": false})), SchemaVersion::Current);
}
