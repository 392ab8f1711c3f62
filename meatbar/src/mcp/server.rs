//! MCP server over stdio
//!
//! Reads one JSON-RPC message per line and writes one response per request.
//! Notifications are consumed without a reply.

use super::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use super::tools::ToolHandler;
use anyhow::Result;
use meatbar_core::{EventStore, Tracker};
use serde_json::{json, Value};
use std::io::{BufRead, Write};
use tracing::{debug, info};

const PROTOCOL_VERSION: &str = "2024-11-05";

pub struct McpServer<S> {
    tools: ToolHandler<S>,
}

impl<S: EventStore> McpServer<S> {
    pub fn new(tracker: Tracker<S>) -> Self {
        Self {
            tools: ToolHandler::new(tracker),
        }
    }

    /// Serve on the process's stdin and stdout until EOF
    pub fn run_stdio(&self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.run(stdin.lock(), stdout.lock())
    }

    /// Serve requests from `reader` until EOF, writing responses to `writer`
    pub fn run<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> Result<()> {
        info!("MCP server started");

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            debug!(request = line, "Received MCP message");

            if let Some(response) = self.process_message(line) {
                serde_json::to_writer(&mut writer, &response)?;
                writer.write_all(b"\n")?;
                writer.flush()?;
            }
        }

        info!("MCP server shutting down");
        Ok(())
    }

    fn process_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(format!("Invalid JSON: {}", e)),
                ))
            }
        };

        if request.id.is_none() {
            debug!(method = %request.method, "Ignoring notification");
            return None;
        }

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                request.id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "serverInfo": {
                        "name": "meatbar",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                    "capabilities": { "tools": {} },
                }),
            ),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => {
                JsonRpcResponse::success(request.id, json!({ "tools": self.tools.list_tools() }))
            }
            "tools/call" => self.call_tool(request.id, &request.params),
            other => JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(other)),
        };
        Some(response)
    }

    fn call_tool(&self, id: Option<Value>, params: &Value) -> JsonRpcResponse {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(id, JsonRpcError::invalid_params("missing 'name' field"));
        };
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        debug!(tool = name, "Calling tool");
        match self.tools.execute(name, arguments) {
            Ok(output) => JsonRpcResponse::success(id, output.to_value()),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::invalid_params(e.to_string())),
        }
    }
}
