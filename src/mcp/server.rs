/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin, one per line
/// 2. Dispatches tool calls to the habit tools
/// 3. Writes JSON-RPC responses to stdout

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::mcp::protocol::*;
use crate::storage::KeyValueStore;
use crate::tools::{self, ToolError};
use crate::{HabitTrackerServer, ServerError};

/// MCP server that handles communication with the client
pub struct McpServer<S: KeyValueStore> {
    /// The underlying habit tracker server
    habit_tracker: HabitTrackerServer<S>,
    /// Whether the client finished the handshake
    initialized: bool,
}

impl<S: KeyValueStore> McpServer<S> {
    pub fn new(habit_tracker: HabitTrackerServer<S>) -> Self {
        Self {
            habit_tracker,
            initialized: false,
        }
    }

    /// Whether the client has sent `notifications/initialized`
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::failure(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::failure(
                request.id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version '{}'", request.jsonrpc),
            ));
        }

        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        Some(self.handle_request(request).await)
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        if request.method == "notifications/initialized" {
            self.initialized = true;
            info!("MCP client finished initialization");
        } else {
            debug!("Ignoring notification {}", request.method);
        }
    }

    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            _ => JsonRpcResponse::failure(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
            ),
        }
    }

    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION,
            capabilities: json!({ "tools": { "listChanged": false } }),
            server_info: ServerInfo {
                name: "Habit Ledger",
                version: env!("CARGO_PKG_VERSION"),
            },
        };

        JsonRpcResponse::from_serializable(request.id, &result)
    }

    fn handle_tools_list(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tools = vec![
            tool_definition::<tools::CreateHabitParams>(
                "habit_create",
                "Create a new habit, optionally from a predefined template",
            ),
            tool_definition::<tools::ListHabitsParams>(
                "habit_list",
                "List habits with progress toward their target, filtered by status",
            ),
            tool_definition::<tools::ToggleParams>(
                "habit_toggle",
                "Mark a habit done on a day, or undo it if already marked",
            ),
            tool_definition::<tools::HabitActionParams>(
                "habit_complete",
                "Mark an active habit as completed",
            ),
            tool_definition::<tools::HabitActionParams>(
                "habit_archive",
                "Archive an active habit",
            ),
            tool_definition::<tools::HabitActionParams>(
                "habit_delete",
                "Delete a habit permanently",
            ),
            tool_definition::<tools::WeekParams>(
                "habit_week",
                "Show which of the recent days a habit was done",
            ),
            ToolDefinition {
                name: "habit_templates".to_string(),
                description: "List predefined habits to start from".to_string(),
                input_schema: json!({"type": "object", "properties": {}}),
            },
        ];

        JsonRpcResponse::success(request.id, json!({ "tools": tools }))
    }

    fn handle_tools_call(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::failure(
                        request.id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                    );
                }
            },
            None => {
                return JsonRpcResponse::failure(
                    request.id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                );
            }
        };

        let store = self.habit_tracker.store();
        let args = tool_params.arguments;

        let result = match tool_params.name.as_str() {
            "habit_create" => call(args, |p| tools::create_habit(store, p), |r| r.message.clone()),
            "habit_list" => call(args, |p| tools::list_habits(store, p), |r| r.render()),
            "habit_toggle" => call(args, |p| tools::toggle_habit(store, p), |r| r.message.clone()),
            "habit_complete" => {
                call(args, |p| tools::complete_habit(store, p), |r| r.message.clone())
            }
            "habit_archive" => {
                call(args, |p| tools::archive_habit(store, p), |r| r.message.clone())
            }
            "habit_delete" => call(args, |p| tools::delete_habit(store, p), |r| r.message.clone()),
            "habit_week" => call(args, |p| tools::habit_week(store, p), |r| r.message.clone()),
            "habit_templates" => ToolCallResult::success(tools::list_templates().message),
            _ => ToolCallResult::error(format!("Unknown tool: {}", tool_params.name)),
        };

        JsonRpcResponse::from_serializable(request.id, &result)
    }
}

/// Describe a tool whose arguments deserialize into `P`
fn tool_definition<P: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let input_schema = serde_json::to_value(schema_for!(P))
        .unwrap_or_else(|_| json!({"type": "object"}));

    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

/// Decode `args` into the tool's parameters, run it, and render the outcome
fn call<P, R, F, T>(args: Map<String, Value>, run: F, text: T) -> ToolCallResult
where
    P: DeserializeOwned,
    R: Serialize,
    F: FnOnce(P) -> Result<R, ToolError>,
    T: FnOnce(&R) -> String,
{
    let params: P = match serde_json::from_value(Value::Object(args)) {
        Ok(params) => params,
        Err(e) => return ToolCallResult::error(format!("Invalid arguments: {}", e)),
    };

    match run(params) {
        Ok(response) => ToolCallResult::success(text(&response)),
        Err(e) => ToolCallResult::error(e.to_string()),
    }
}
