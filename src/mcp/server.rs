//! MCP server: routes JSON-RPC requests to the tool registry.
//!
//! Requests are handled concurrently, one task each, while a single writer
//! task owns the output stream so responses never interleave.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::transport::{MessageReader, MessageWriter, TransportError};
use super::types::{
    error_codes, CallToolRequest, CallToolResult, Implementation, InitializeRequest,
    InitializeResult, InvokeToolResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult, RequestId, ServerCapabilities, ToolsCapability, JSON_RPC_VERSION,
};
use crate::tools::{ToolCallInput, ToolError, ToolRegistry};

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "metasploit-mcp-server";

/// Supported MCP protocol versions, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

/// Picks the client's requested version when supported, else the newest one.
pub fn negotiate_protocol_version(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|version| {
            SUPPORTED_PROTOCOL_VERSIONS
                .iter()
                .find(|&&v| v == version)
                .copied()
        })
        .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0])
}

/// Maps a dispatch failure onto a protocol-level error.
pub fn tool_error_to_rpc(error: &ToolError) -> JsonRpcError {
    match error {
        ToolError::UnknownOperation(name) => {
            JsonRpcError::new(error_codes::METHOD_NOT_FOUND, error.to_string(), None)
                .with_data(json!({ "operation": name }))
        }
        ToolError::InvalidArguments { field, reason } => {
            JsonRpcError::invalid_params(error.to_string())
                .with_data(json!({ "field": field, "reason": reason }))
        }
    }
}

pub struct McpServer {
    registry: ToolRegistry,
    server_info: Implementation,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            server_info: Implementation::new(SERVER_NAME, env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve until `reader` reaches end of input.
    ///
    /// In-flight requests are allowed to finish and their responses are
    /// flushed before this returns.
    pub async fn serve<R, W>(
        self: Arc<Self>,
        mut reader: MessageReader<R>,
        mut writer: MessageWriter<W>,
    ) -> Result<(), TransportError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        let writer_task = tokio::spawn(async move {
            while let Some(response) = rx.recv().await {
                writer.write_message(&response).await?;
            }
            Ok::<(), TransportError>(())
        });

        let read_outcome = loop {
            let raw = match reader.next_message().await {
                Ok(Some(raw)) => raw,
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            };

            let server = Arc::clone(&self);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_line(&raw).await {
                    if tx.send(response).is_err() {
                        warn!("Response dropped: output writer has stopped");
                    }
                }
            });
        };

        match &read_outcome {
            Ok(()) => debug!("Input closed, waiting for in-flight requests"),
            Err(e) => warn!("Input failed, draining in-flight requests: {}", e),
        }
        drop(tx);
        let write_outcome = writer_task
            .await
            .map_err(|e| TransportError::io(format!("Writer task failed: {}", e)))?;

        read_outcome.and(write_outcome)
    }

    /// Handle one raw input line. Lines that are not UTF-8 get a parse error.
    pub async fn handle_line(&self, raw: &[u8]) -> Option<JsonRpcResponse> {
        match std::str::from_utf8(raw) {
            Ok(text) => self.handle_message(text).await,
            Err(e) => {
                warn!("Discarding undecodable message: {}", e);
                Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(format!("Parse error: {}", e)),
                ))
            }
        }
    }

    /// Handle one raw line. Returns `None` for notifications.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Discarding malformed message: {}", e);
                return Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(format!("Parse error: {}", e)),
                ));
            }
        };

        let id = value
            .get("id")
            .cloned()
            .and_then(|id| serde_json::from_value::<RequestId>(id).ok());

        if !value.is_object() {
            return Some(JsonRpcResponse::error(
                None,
                JsonRpcError::invalid_request("Request must be a JSON object"),
            ));
        }

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_request(format!("Invalid request: {}", e)),
                ))
            }
        };

        if request.jsonrpc != JSON_RPC_VERSION {
            return Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request(format!(
                    "Unsupported jsonrpc version: {}",
                    request.jsonrpc
                )),
            ));
        }

        self.handle_request(request).await
    }

    /// Handle one parsed request. Returns `None` for notifications.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            debug!(method = %request.method, "Received notification");
            return None;
        };

        let outcome = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params),
            "ping" => Ok(json!({})),
            "tools/list" => to_result(&ListToolsResult {
                tools: self.registry.list(),
            }),
            "tools/invoke" => self.handle_invoke(request.params).await,
            "tools/call" => self.handle_call(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn handle_initialize(
        &self,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, JsonRpcError> {
        let request: InitializeRequest = match params {
            Some(params) => serde_json::from_value(params)
                .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))?,
            None => InitializeRequest::default(),
        };

        let protocol_version = negotiate_protocol_version(request.protocol_version.as_deref());
        if let Some(client) = &request.client_info {
            info!(
                client = %client.name,
                client_version = %client.version,
                protocol_version,
                "Client initialized"
            );
        }

        to_result(&InitializeResult {
            protocol_version: protocol_version.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
            },
            server_info: self.server_info.clone(),
        })
    }

    async fn handle_invoke(
        &self,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, JsonRpcError> {
        let result = self.dispatch(params).await?;
        to_result(&InvokeToolResult { result })
    }

    async fn handle_call(
        &self,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, JsonRpcError> {
        let result = self.dispatch(params).await?;
        to_result(&CallToolResult::from(result))
    }

    async fn dispatch(
        &self,
        params: Option<serde_json::Value>,
    ) -> Result<crate::tools::ExecutionResult, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
        let call: CallToolRequest = serde_json::from_value(params)
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))?;

        self.registry
            .invoke(ToolCallInput::new(call.name, call.arguments))
            .await
            .map_err(|e| {
                debug!("Dispatch rejected: {}", e);
                tool_error_to_rpc(&e)
            })
    }
}

fn to_result<T: Serialize>(value: &T) -> Result<serde_json::Value, JsonRpcError> {
    serde_json::to_value(value)
        .map_err(|e| JsonRpcError::internal_error(format!("Failed to serialize result: {}", e)))
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer")
            .field("server_info", &self.server_info)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate_protocol_version() {
        assert_eq!(negotiate_protocol_version(Some("2024-11-05")), "2024-11-05");
        assert_eq!(negotiate_protocol_version(Some("2025-03-26")), "2025-03-26");
        assert_eq!(negotiate_protocol_version(Some("1999-01-01")), "2025-06-18");
        assert_eq!(negotiate_protocol_version(None), "2025-06-18");
    }

    #[test]
    fn test_tool_error_codes() {
        let unknown = tool_error_to_rpc(&ToolError::UnknownOperation("nope".into()));
        assert_eq!(unknown.code, error_codes::METHOD_NOT_FOUND);
        assert_eq!(unknown.data, Some(json!({ "operation": "nope" })));

        let invalid = tool_error_to_rpc(&ToolError::InvalidArguments {
            field: "target".into(),
            reason: "missing required field".into(),
        });
        assert_eq!(invalid.code, error_codes::INVALID_PARAMS);
        assert_eq!(invalid.message, "invalid argument 'target': missing required field");
        assert_eq!(invalid.data.unwrap()["field"], "target");
    }
}
