// MCP server: newline-delimited JSON-RPC over stdio

use crate::codec::{Frame, RequestCodec};
use crate::protocol::{
    methods, CallToolParams, InitializeParams, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo, ToolsCapability,
    JSONRPC_VERSION, PROTOCOL_VERSION,
};
use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use futures_util::StreamExt;
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::FramedRead;

/// Upper bound for a single request line.
const MAX_LINE_LENGTH: usize = 8 * 1024 * 1024;

pub struct McpServer {
    registry: ToolRegistry,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, info: ServerInfo) -> Self {
        Self { registry, info }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve on the process's stdin/stdout until stdin closes.
    pub async fn start(&self) -> Result<()> {
        tracing::info!(
            "{} {} running on stdio with {} tools",
            self.info.name,
            self.info.version,
            self.registry.len()
        );
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Handle requests from `reader` one line at a time, writing one response
    /// line per request to `writer`. Returns on EOF.
    ///
    /// Undecodable or over-long lines are answered with a parse error and do
    /// not end the session; only I/O failures do.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut frames = FramedRead::new(reader, RequestCodec::new(MAX_LINE_LENGTH));

        while let Some(frame) = frames.next().await {
            let frame = frame.context("Failed to read request from input")?;
            let response = match frame {
                Frame::Line(line) => {
                    if line.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }
                    self.handle_bytes(&line).await
                }
                Frame::TooLong => {
                    tracing::warn!("Discarding request longer than {} bytes", MAX_LINE_LENGTH);
                    Some(JsonRpcResponse::error(
                        Value::Null,
                        JsonRpcError::parse_error("request line too long"),
                    ))
                }
            };

            if let Some(response) = response {
                write_response(&mut writer, &response).await?;
            }
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    }

    /// Decode one line and dispatch it. `None` means nothing is written back.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        self.handle_bytes(line.as_bytes()).await
    }

    /// Same as [`handle_line`](Self::handle_line) for raw input; invalid
    /// UTF-8 is reported as a parse error.
    pub async fn handle_bytes(&self, line: &[u8]) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_slice(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Received malformed JSON: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(e),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request(format!("Invalid Request: {}", e)),
            )),
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request(format!(
                    "Unsupported jsonrpc version: {}",
                    request.jsonrpc
                )),
            ));
        }

        let outcome = match request.method.as_str() {
            methods::INITIALIZE => self.initialize(request.params),
            methods::PING => Ok(serde_json::json!({})),
            methods::LIST_TOOLS => to_result(&ListToolsResult {
                tools: self.registry.list_schemas(),
            }),
            methods::CALL_TOOL => self.call_tool(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => {
                tracing::debug!(method = %request.method, code = error.code, "{}", error.message);
                JsonRpcResponse::error(id, error)
            }
        })
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            methods::INITIALIZED => tracing::info!("Client initialized"),
            methods::CANCELLED => tracing::debug!("Client cancelled a request"),
            other => tracing::debug!(method = other, "Ignoring notification"),
        }
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        if let Some(params) = params {
            match serde_json::from_value::<InitializeParams>(params) {
                Ok(InitializeParams {
                    protocol_version,
                    client_info,
                    ..
                }) => {
                    let client = client_info
                        .map(|c| format!("{} {}", c.name, c.version))
                        .unwrap_or_else(|| "unknown client".to_string());
                    tracing::info!(%protocol_version, "Initializing session for {}", client);
                }
                Err(e) => tracing::warn!("Unrecognized initialize params: {}", e),
            }
        }

        to_result(&InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: self.info.clone(),
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
        let params: CallToolParams = serde_json::from_value(params)
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))?;

        let arguments = params
            .arguments
            .ok_or_else(|| JsonRpcError::invalid_params("Arguments are required"))?;

        let tool = self.registry.get(&params.name).ok_or_else(|| {
            JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name))
        })?;

        tracing::debug!(tool = %params.name, "Calling tool");
        let result = tool
            .execute(arguments)
            .await
            .map_err(|e| JsonRpcError::invalid_params(format!("{:#}", e)))?;

        if result.is_error() {
            tracing::debug!(tool = %params.name, "Tool reported an error");
        }

        to_result(&result)
    }
}

fn to_result<T: Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value)
        .map_err(|e| JsonRpcError::internal_error(format!("Failed to serialize result: {}", e)))
}

async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(response).context("Failed to serialize response")?;
    line.push('\n');
    writer
        .write_all(line.as_bytes())
        .await
        .context("Failed to write response")?;
    writer.flush().await.context("Failed to flush output")?;
    Ok(())
}
