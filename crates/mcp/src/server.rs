// MCP server: newline-delimited JSON-RPC over stdio

use crate::protocol::*;
use anyhow::Result;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::bytes::BytesMut;
use tokio_util::codec::{Decoder, FramedRead, LinesCodec, LinesCodecError};
use toolhub_core::{Dispatcher, ExecutionStatus, ResourceStore};

/// Longest accepted request line, in bytes
pub const DEFAULT_MAX_LINE_LENGTH: usize = 4 * 1024 * 1024;

/// One newline-delimited frame read from the client
#[derive(Debug)]
enum Frame {
    Line(String),
    Malformed(LinesCodecError),
}

/// `LinesCodec` that yields undecodable or oversized lines as frames, not
/// errors. `FramedRead` ends the stream after a decoder error.
struct RequestCodec(LinesCodec);

impl Decoder for RequestCodec {
    type Item = Frame;
    type Error = LinesCodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, LinesCodecError> {
        Ok(into_frame(self.0.decode(buf)))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, LinesCodecError> {
        Ok(into_frame(self.0.decode_eof(buf)))
    }
}

fn into_frame(decoded: Result<Option<String>, LinesCodecError>) -> Option<Frame> {
    match decoded {
        Ok(line) => line.map(Frame::Line),
        Err(err) => Some(Frame::Malformed(err)),
    }
}

pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
    resources: Arc<ResourceStore>,
    max_line_length: usize,
}

impl McpServer {
    pub fn new(dispatcher: Arc<Dispatcher>, resources: Arc<ResourceStore>) -> Self {
        Self {
            dispatcher,
            resources,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Serve requests on stdin/stdout until stdin closes
    pub async fn start(&self) -> Result<()> {
        tracing::info!("MCP server listening on stdio");
        self.run(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve requests from `reader`, writing one response line per request
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let codec = RequestCodec(LinesCodec::new_with_max_length(self.max_line_length));
        let mut frames = FramedRead::new(reader, codec);

        while let Some(frame) = frames.next().await {
            let response = match frame? {
                Frame::Line(line) if line.trim().is_empty() => continue,
                Frame::Line(line) => self.handle_message(&line),
                Frame::Malformed(err) => {
                    tracing::warn!("Discarding unreadable request line: {}", err);
                    Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()))
                }
            };

            if let Some(response) = response {
                let mut out = serde_json::to_vec(&response)?;
                out.push(b'\n');
                writer.write_all(&out).await?;
                writer.flush().await?;
            }
        }

        tracing::info!("Input closed, MCP server stopping");
        Ok(())
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request),
            Err(err) => {
                tracing::warn!("Failed to parse request: {}", err);
                Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()))
            }
        }
    }

    pub fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            tracing::debug!("Received notification {}", request.method);
            return None;
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request()));
        }

        let response = match self.dispatch(&request.method, request.params) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        };
        Some(response)
    }

    fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value, JsonRpcError> {
        match method {
            "initialize" => self.initialize(params),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => to_result(ListToolsResult {
                tools: self
                    .dispatcher
                    .list_tools()
                    .into_iter()
                    .map(ToolSchema::from)
                    .collect(),
            }),
            "tools/call" => self.call_tool(parse_params(params)?),
            "resources/list" => to_result(ListResourcesResult {
                resources: self.resources.list().iter().map(ResourceSchema::from).collect(),
            }),
            "resources/read" => self.read_resource(parse_params(params)?),
            _ => Err(JsonRpcError::method_not_found(method)),
        }
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        if let Some(params) = params {
            if let Ok(init) = serde_json::from_value::<InitializeParams>(params) {
                tracing::info!(
                    "Client {} {} connected (protocol {})",
                    init.client_info.name,
                    init.client_info.version,
                    init.protocol_version
                );
            }
        }

        to_result(InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ListChangedCapability { list_changed: false }),
                resources: Some(ListChangedCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "toolhub-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        })
    }

    fn call_tool(&self, params: CallToolParams) -> Result<Value, JsonRpcError> {
        let record = self
            .dispatcher
            .execute(&params.name, params.arguments)
            .map_err(|err| JsonRpcError::invalid_params(err.to_string()))?;

        let meta = serde_json::json!({
            "execution_id": record.execution_id,
            "duration_ms": record.duration_ms,
        });

        let result = match (record.status, record.result, record.error_message) {
            (ExecutionStatus::Success, Some(result), _) => CallToolResult {
                content: vec![ToolContent::text(pretty(&result)?)],
                is_error: None,
                meta: Some(meta),
            },
            (_, _, message) => CallToolResult {
                content: vec![ToolContent::error(
                    message.unwrap_or_else(|| "execution did not complete".to_string()),
                )],
                is_error: Some(true),
                meta: Some(meta),
            },
        };

        to_result(result)
    }

    fn read_resource(&self, params: ReadResourceParams) -> Result<Value, JsonRpcError> {
        let resource = self
            .resources
            .get(&params.uri)
            .ok_or_else(|| JsonRpcError::invalid_params(format!("Resource not found: {}", params.uri)))?;

        let text = match &resource.content {
            Some(Value::String(text)) => text.clone(),
            Some(other) => pretty(other)?,
            None => String::new(),
        };

        to_result(ReadResourceResult {
            contents: vec![ResourceContents {
                uri: resource.uri,
                mime_type: resource.mime_type,
                text,
            }],
        })
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, JsonRpcError> {
    let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
    serde_json::from_value(params).map_err(|err| JsonRpcError::invalid_params(err.to_string()))
}

fn to_result(value: impl Serialize) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|err| JsonRpcError::internal_error(err.to_string()))
}

fn pretty(value: &Value) -> Result<String, JsonRpcError> {
    serde_json::to_string_pretty(value).map_err(|err| JsonRpcError::internal_error(err.to_string()))
}
