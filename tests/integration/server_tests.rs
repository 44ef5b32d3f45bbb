/// MCP server driven end to end, one JSON-RPC line at a time
use habit_ledger::*;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

fn call_line(id: u64, tool: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": tool, "arguments": arguments}
    })
    .to_string()
}

async fn call<S: KeyValueStore>(server: &mut McpServer<S>, id: u64, tool: &str, arguments: Value) -> (bool, String) {
    let response = server
        .process_line(&call_line(id, tool, arguments))
        .await
        .expect("tools/call always answers");
    let result = serde_json::to_value(&response).unwrap()["result"].clone();
    (
        result["isError"].as_bool().unwrap(),
        result["content"][0]["text"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_server_on_sqlite_file() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let server = HabitTrackerServer::new(temp_file.path().to_path_buf(), StoreConfig::default())
        .await
        .expect("Failed to create server");

    assert!(server.store().load_all().is_empty());
    assert_eq!(server.store().config().slot_key, DEFAULT_SLOT_KEY);
}

#[tokio::test]
async fn test_create_toggle_complete_flow() {
    let store = HabitStore::new(MemorySlots::new(), StoreConfig::with_slot("flow-test"));
    let mut server = McpServer::new(HabitTrackerServer::with_store(store));

    let (is_error, message) = call(&mut server, 1, "habit_create", json!({"title": "Stretch", "target": 2})).await;
    assert!(!is_error, "{}", message);

    let listing = call(&mut server, 2, "habit_list", json!({})).await.1;
    assert!(listing.contains("Stretch"));

    let (_, week_err) = call(&mut server, 3, "habit_week", json!({"habit_id": "unknown"})).await;
    assert!(week_err.contains("not found"));

    let id = {
        let line = listing
            .lines()
            .find(|l| l.trim_start().starts_with("ID: "))
            .expect("listing includes ids");
        line.trim_start().trim_start_matches("ID: ").to_string()
    };

    let (_, first) = call(&mut server, 4, "habit_toggle", json!({"habit_id": id, "date": "2024-08-01"})).await;
    assert!(!first.contains("reached your target"));
    let (_, second) = call(&mut server, 5, "habit_toggle", json!({"habit_id": id, "date": "2024-08-02"})).await;
    assert!(second.contains("reached your target"), "{}", second);

    let (is_error, _) = call(&mut server, 6, "habit_complete", json!({"habit_id": id})).await;
    assert!(!is_error);

    // completed habits cannot be archived
    let (is_error, message) = call(&mut server, 7, "habit_archive", json!({"habit_id": id})).await;
    assert!(is_error);
    assert!(message.contains("completed"));

    let completed = call(&mut server, 8, "habit_list", json!({"filter": "completed"})).await.1;
    assert!(completed.contains("Stretch"));
    assert!(completed.contains("Completed: 1"));

    let (is_error, _) = call(&mut server, 9, "habit_delete", json!({"habit_id": id})).await;
    assert!(!is_error);
    let empty = call(&mut server, 10, "habit_list", json!({})).await.1;
    assert!(empty.contains("Create your first habit"));
}

#[tokio::test]
async fn test_templates_and_unknown_tool() {
    let store = HabitStore::new(MemorySlots::new(), StoreConfig::default());
    let mut server = McpServer::new(HabitTrackerServer::with_store(store));

    let (is_error, templates) = call(&mut server, 1, "habit_templates", json!({})).await;
    assert!(!is_error);
    assert!(templates.contains("Drink water"));

    let (is_error, message) = call(&mut server, 2, "habit_create", json!({"template": "Read"})).await;
    assert!(!is_error, "{}", message);

    let (is_error, message) = call(&mut server, 3, "habit_fly", json!({})).await;
    assert!(is_error);
    assert!(message.contains("Unknown tool"));
}

#[test]
fn test_blocking_round_trip_with_tokio_test() {
    let store = HabitStore::new(MemorySlots::new(), StoreConfig::default());
    let mut server = McpServer::new(HabitTrackerServer::with_store(store));

    let response = tokio_test::block_on(server.process_line(
        r#"{"jsonrpc":"2.0","id":"ping-1","method":"ping"}"#,
    ))
    .unwrap();
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["id"], "ping-1");
    assert_eq!(value["result"], json!({}));

    let wrong_version = tokio_test::block_on(server.process_line(
        r#"{"jsonrpc":"1.0","id":2,"method":"ping"}"#,
    ))
    .unwrap();
    assert!(wrong_version.error.is_some());
}
