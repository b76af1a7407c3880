//! MCP tool server exposing `analyze_image_tool` over stdin/stdout.
//!
//! Supported methods: `initialize`, `ping`, `tools/list`, `tools/call`.
//! Notifications are accepted and ignored. Requests are handled one at a
//! time in arrival order.

pub mod protocol;

use std::path::Path;

use serde::Deserialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, instrument, warn};

use crate::backend::ImageAnalyzer;
use crate::error::Result;
use protocol::{
    INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR, RpcRequest,
    RpcResponse, envelope_problem, reply_id,
};

/// Name the server registers under.
pub const SERVER_NAME: &str = "image_analysis_service";
pub const TOOL_NAME: &str = "analyze_image_tool";
pub const TOOL_DESCRIPTION: &str = "调用视觉模型API服务分析网页设计图内容，并返回AI的分析结果";

/// Protocol revision answered when the client asks for one we don't know.
pub const LATEST_PROTOCOL_VERSION: &str = "2024-11-05";
const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2025-03-26", "2025-06-18"];

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeImageArgs {
    image_path: String,
}

/// Tool server over any analyzer.
///
/// ```no_run
/// use design_lens::{AnalysisClient, AnalysisConfig, ToolServer};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AnalysisClient::new(AnalysisConfig::from_env()?)?;
/// ToolServer::new(client).serve_stdio().await?;
/// # Ok(())
/// # }
/// ```
pub struct ToolServer<A> {
    analyzer: A,
}

impl<A: ImageAnalyzer> ToolServer<A> {
    pub fn new(analyzer: A) -> Self {
        Self { analyzer }
    }

    /// Serve on the process's stdin and stdout until stdin closes.
    pub async fn serve_stdio(&self) -> Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve newline-delimited JSON-RPC from `reader` to `writer` until EOF.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(server = SERVER_NAME, "Tool server listening on stdio");
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(line).await {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
                writer.flush().await?;
            }
        }

        info!("Input closed, tool server stopping");
        Ok(())
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<RpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Unparseable message");
                return Some(RpcResponse::failure(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = reply_id(&value);
        if let Some(problem) = envelope_problem(&value) {
            warn!(problem, "Invalid request envelope");
            return Some(RpcResponse::failure(
                id,
                INVALID_REQUEST,
                format!("Invalid request: {}", problem),
            ));
        }

        let request: RpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Malformed request");
                return Some(RpcResponse::failure(
                    id,
                    INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ));
            }
        };

        self.handle_request(request).await
    }

    #[instrument(name = "rpc", skip(self, request), fields(method = %request.method))]
    async fn handle_request(&self, request: RpcRequest) -> Option<RpcResponse> {
        if request.is_notification() {
            debug!("Notification received");
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize(request.params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": [tool_definition()] })),
            "tools/call" => self.call_tool(request.params).await,
            other => {
                warn!(method = other, "Unknown method");
                Err((METHOD_NOT_FOUND, format!("Method not found: {}", other)))
            }
        };

        Some(match outcome {
            Ok(result) => RpcResponse::success(id, result),
            Err((code, message)) => RpcResponse::failure(id, code, message),
        })
    }

    fn initialize(&self, params: Option<&Value>) -> Value {
        let requested = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str);
        let version = match requested {
            Some(v) if SUPPORTED_PROTOCOL_VERSIONS.contains(&v) => v,
            _ => LATEST_PROTOCOL_VERSION,
        };
        info!(protocol_version = version, "Client initialized");

        json!({
            "protocolVersion": version,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> std::result::Result<Value, (i64, String)> {
        let params: ToolCallParams = serde_json::from_value(params.unwrap_or(Value::Null))
            .map_err(|e| (INVALID_PARAMS, format!("Invalid tools/call params: {}", e)))?;

        if params.name != TOOL_NAME {
            return Err((INVALID_PARAMS, format!("Unknown tool: {}", params.name)));
        }

        let args: AnalyzeImageArgs =
            serde_json::from_value(params.arguments.unwrap_or(Value::Null)).map_err(|e| {
                (
                    INVALID_PARAMS,
                    format!("{} requires a string image_path: {}", TOOL_NAME, e),
                )
            })?;

        info!(image_path = %args.image_path, "Analyzing image");
        match self
            .analyzer
            .analyze_or_message(Path::new(&args.image_path))
            .await
        {
            Ok(text) => Ok(tool_result(text, false)),
            Err(e) => {
                error!(error = %e, "Image analysis failed");
                Ok(tool_result(e.to_string(), true))
            }
        }
    }
}

fn tool_definition() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": TOOL_DESCRIPTION,
        "inputSchema": {
            "type": "object",
            "properties": {
                "image_path": {
                    "type": "string",
                    "description": "要分析的图片绝对路径",
                },
            },
            "required": ["image_path"],
        },
    })
}

fn tool_result(text: String, is_error: bool) -> Value {
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error,
    })
}
