/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads line-delimited JSON-RPC requests
/// 2. Dispatches tool calls to the habit tools
/// 3. Writes JSON-RPC responses back, one per line
///
/// Requests are handled one at a time, so a check-in and the streak
/// recompute that follows it never interleave with another request.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, ToolError};
use crate::{HabitTrackerServer, ServerError};

/// MCP server that handles communication with a client
pub struct McpServer {
    /// The underlying habit tracker server
    habit_tracker: HabitTrackerServer,
    /// Whether the client has sent its initialized notification
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(habit_tracker: HabitTrackerServer) -> Self {
        Self {
            habit_tracker,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer).await
    }

    /// Serve requests from `reader` until it reaches end of input
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.handle_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        // Write response + newline
                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub async fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        if request.is_notification() {
            self.handle_notification(&request.method);
            return None;
        }

        Some(self.handle_request(request))
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "notifications/initialized" | "initialized" => {
                self.initialized = true;
                info!("MCP client initialized");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    /// Handle a JSON-RPC request
    fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.unwrap_or(Value::Null);

        if request.jsonrpc != "2.0" {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version '{}'", request.jsonrpc),
                None,
            );
        }

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        to_response(id, result)
    }

    /// Handle tools/call request
    fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        debug!("Calling tool {}", tool_params.name);
        let result = self.call_tool(&tool_params.name, tool_params.arguments);
        to_response(id, result)
    }

    /// Run one tool against the tracker
    fn call_tool(&self, name: &str, args: Map<String, Value>) -> ToolCallResult {
        let storage = self.habit_tracker.storage();
        let analytics = self.habit_tracker.analytics();
        // One "today" per request
        let today = self.habit_tracker.today();

        match name {
            "habit_create" => {
                into_tool_result(parse_args(args).and_then(|p| tools::create_habit(storage, p)))
            }
            "habit_update" => {
                into_tool_result(parse_args(args).and_then(|p| tools::update_habit(storage, p)))
            }
            "habit_delete" => {
                into_tool_result(parse_args(args).and_then(|p| tools::delete_habit(storage, p)))
            }
            "habit_list" => {
                into_tool_result(parse_args(args).and_then(|p| tools::list_habits(storage, p)))
            }
            "habit_toggle" => into_tool_result(
                parse_args(args).and_then(|p| tools::toggle_habit(storage, analytics, today, p)),
            ),
            "habit_note" => into_tool_result(
                parse_args(args).and_then(|p| tools::note_habit(storage, analytics, today, p)),
            ),
            "habit_status" => into_tool_result(
                parse_args(args)
                    .and_then(|p| tools::get_habit_status(storage, analytics, today, p)),
            ),
            "habit_detail" => into_tool_result(
                parse_args(args)
                    .and_then(|p| tools::get_habit_detail(storage, analytics, today, p)),
            ),
            "habit_stats" => into_tool_result(tools::get_overall_stats(storage, analytics, today)),
            "habit_heatmap" => into_tool_result(
                parse_args(args).and_then(|p| tools::get_heatmap(storage, analytics, today, p)),
            ),
            "habit_recalculate" => {
                into_tool_result(tools::recalculate_streaks(storage, analytics, today))
            }
            _ => ToolCallResult::error(
                format!("Unknown tool: {}", name),
                error_codes::METHOD_NOT_FOUND,
            ),
        }
    }
}

fn to_response<T: Serialize>(id: Value, result: T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to serialize result: {}", e),
            None,
        ),
    }
}

/// Deserialize tool arguments into the tool's params type
fn parse_args<T: DeserializeOwned>(args: Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| ToolError::InvalidArgument(e.to_string()))
}

/// Turn a tool response into MCP content
///
/// The response's `message` becomes the text content and the remaining
/// fields become the structured content.
fn into_tool_result<T: Serialize>(result: Result<T, ToolError>) -> ToolCallResult {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            warn!("Tool call failed: {}", e);
            return ToolCallResult::error(e.to_string(), tool_error_to_json_rpc_code(&e));
        }
    };

    match serde_json::to_value(response) {
        Ok(Value::Object(mut fields)) => {
            let text = match fields.remove("message") {
                Some(Value::String(text)) => text,
                _ => String::new(),
            };
            ToolCallResult::success(text, Some(Value::Object(fields)))
        }
        Ok(other) => ToolCallResult::success(other.to_string(), None),
        Err(e) => ToolCallResult::error(
            format!("Failed to serialize response: {}", e),
            error_codes::INTERNAL_ERROR,
        ),
    }
}

fn habit_id_schema() -> Value {
    json!({"type": "string", "description": "ID of the habit"})
}

fn date_schema() -> Value {
    json!({"type": "string", "description": "Date as YYYY-MM-DD (optional, defaults to today)"})
}

/// Every tool this server offers
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "habit_create".to_string(),
            description: "Create a new habit to track".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Name of the habit (1-100 characters)"},
                    "description": {"type": "string", "description": "Optional longer description"},
                    "category": {"type": "string", "description": "health, productivity, mindfulness, fitness, learning or other (default)"},
                    "frequency": {"type": "string", "description": "daily (default) or weekly"},
                    "target_frequency": {"type": "integer", "minimum": 1, "maximum": 10, "description": "Completions per day or per week (default 1)"},
                    "color": {"type": "string", "description": "Hex colour like #6366f1"},
                    "icon": {"type": "string", "description": "Optional emoji"}
                },
                "required": ["name"]
            }),
        },
        ToolDefinition {
            name: "habit_update".to_string(),
            description: "Edit a habit, or archive/restore it with is_active".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "habit_id": habit_id_schema(),
                    "name": {"type": "string"},
                    "description": {"type": "string", "description": "Empty string clears it"},
                    "category": {"type": "string"},
                    "frequency": {"type": "string"},
                    "target_frequency": {"type": "integer", "minimum": 1, "maximum": 10},
                    "color": {"type": "string"},
                    "icon": {"type": "string", "description": "Empty string clears it"},
                    "is_active": {"type": "boolean", "description": "false archives, true restores"}
                },
                "required": ["habit_id"]
            }),
        },
        ToolDefinition {
            name: "habit_delete".to_string(),
            description: "Delete a habit (history is kept)".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {"habit_id": habit_id_schema()},
                "required": ["habit_id"]
            }),
        },
        ToolDefinition {
            name: "habit_list".to_string(),
            description: "List habits with their current and best streaks".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "category": {"type": "string", "description": "Filter by category - optional"},
                    "active_only": {"type": "boolean", "description": "Show only active habits (default: true)"},
                    "sort_by": {"type": "string", "description": "created (default), name, streak or longest"}
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "habit_toggle".to_string(),
            description: "Check a habit in (or undo the check-in) for today or a past date".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "habit_id": habit_id_schema(),
                    "date": date_schema()
                },
                "required": ["habit_id"]
            }),
        },
        ToolDefinition {
            name: "habit_note".to_string(),
            description: "Attach a note to a habit's day, or clear it with an empty note".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "habit_id": habit_id_schema(),
                    "date": date_schema(),
                    "note": {"type": "string", "description": "Up to 500 characters"}
                },
                "required": ["habit_id"]
            }),
        },
        ToolDefinition {
            name: "habit_status".to_string(),
            description: "Show which habits are done for a day, with weekly goal progress".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {"date": date_schema()},
                "required": []
            }),
        },
        ToolDefinition {
            name: "habit_detail".to_string(),
            description: "Streaks, completion rate and recent history for one habit".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {"habit_id": habit_id_schema()},
                "required": ["habit_id"]
            }),
        },
        ToolDefinition {
            name: "habit_stats".to_string(),
            description: "Overall dashboard stats across active habits".to_string(),
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
        },
        ToolDefinition {
            name: "habit_heatmap".to_string(),
            description: "Calendar heatmap of daily completion levels (0-4)".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "days": {"type": "integer", "minimum": 1, "maximum": 366, "description": "Days to show, ending today (default 84)"}
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "habit_recalculate".to_string(),
            description: "Recompute every habit's cached streaks from its history".to_string(),
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
        },
    ]
}
