/// JSON-RPC 2.0 framing and MCP payload types
///
/// Requests and responses travel as one JSON object per line. Tool results
/// carry a text rendering for people plus `structuredContent` for programs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::storage::StorageError;
use crate::tools::ToolError;

/// MCP revision this server speaks
pub const MCP_VERSION: &str = "2024-11-05";

/// Incoming JSON-RPC message
///
/// Notifications carry no `id`.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// Must be "2.0"
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Outgoing JSON-RPC message; exactly one of `result` and `error` is set
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    /// Echoes the request id, or null when the request could not be parsed
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// `params` of a tools/call request
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    /// e.g. "habit_toggle"
    pub name: String,
    /// Missing arguments are treated as an empty object
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// `result` of a tools/call request
///
/// Tool failures are reported here with `is_error` set rather than as a
/// JSON-RPC error, so the client model can read them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    pub is_error: bool,
    /// Machine-readable copy of the tool's response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ToolContent {
    /// Always "text" here
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// One entry of the tools/list result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema of the tool's arguments
    pub input_schema: Value,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// The tool set is fixed, so this is always false
    pub list_changed: bool,
}

/// `result` of the initialize handshake
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

// JSON-RPC error codes
pub mod error_codes {
    // Reserved by JSON-RPC 2.0
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    // Application codes, -32000 to -32099
    /// Unknown habit id, or no log for the requested day
    pub const HABIT_NOT_FOUND: i32 = -32001;
    /// A value failed domain validation
    pub const VALIDATION_ERROR: i32 = -32003;
    /// SQLite failed or the schema could not be prepared
    pub const STORAGE_ERROR: i32 = -32004;
}

impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data,
            }),
        }
    }
}

impl ToolCallResult {
    /// Text for the user plus an optional structured copy
    pub fn success(text: String, data: Option<Value>) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text,
            }],
            is_error: false,
            structured_content: data,
        }
    }

    /// Failed tool call; the code lets clients tell failure kinds apart
    pub fn error(error_message: String, code: i32) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text: format!("Error: {}", error_message),
            }],
            is_error: true,
            structured_content: Some(serde_json::json!({ "code": code })),
        }
    }
}

/// Map storage errors to JSON-RPC error codes
pub fn storage_error_to_json_rpc_code(error: &StorageError) -> i32 {
    match error {
        StorageError::HabitNotFound { .. } => error_codes::HABIT_NOT_FOUND,
        StorageError::LogNotFound { .. } => error_codes::HABIT_NOT_FOUND,
        StorageError::Query(_) => error_codes::STORAGE_ERROR,
        StorageError::Connection(_) => error_codes::STORAGE_ERROR,
        StorageError::Migration(_) => error_codes::STORAGE_ERROR,
    }
}

/// Map tool errors to JSON-RPC error codes
pub fn tool_error_to_json_rpc_code(error: &ToolError) -> i32 {
    match error {
        ToolError::Storage(inner) => storage_error_to_json_rpc_code(inner),
        ToolError::Domain(_) => error_codes::VALIDATION_ERROR,
        ToolError::InvalidArgument(_) => error_codes::INVALID_PARAMS,
    }
}
