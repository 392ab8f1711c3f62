//! Tools exposed to MCP clients: recording a consumption and listing people.

use meatbar_core::{EventStore, Tracker};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Tool description returned by `tools/list`
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Text result of a tool call.
///
/// Failures inside a tool are results with `is_error` set, not protocol
/// errors, so the client can show them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    fn text(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn error(text: String) -> Self {
        Self {
            text,
            is_error: true,
        }
    }

    /// MCP `CallToolResult` body
    pub fn to_value(&self) -> Value {
        json!({
            "content": [{ "type": "text", "text": self.text }],
            "isError": self.is_error,
        })
    }
}

/// A call the handler cannot dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    UnknownTool(String),
    InvalidArguments(String),
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolError::UnknownTool(name) => write!(f, "Unknown tool: {}", name),
            ToolError::InvalidArguments(msg) => write!(f, "Invalid arguments: {}", msg),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AddConsumptionArgs {
    #[serde(default)]
    person_name: String,
    #[serde(rename = "type", default)]
    bar_type: String,
    #[serde(default)]
    eaten_at: String,
}

/// Dispatches tool calls to the tracker
pub struct ToolHandler<S> {
    tracker: Tracker<S>,
}

impl<S: EventStore> ToolHandler<S> {
    pub fn new(tracker: Tracker<S>) -> Self {
        Self { tracker }
    }

    pub fn list_tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "add_consumption",
                title: "Add Consumption",
                description: "Add a new consumption record",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "person_name": {
                            "type": "string",
                            "description": "Name of the person (e.g. Bob)"
                        },
                        "type": {
                            "type": "string",
                            "description": "Type of meat bar (e.g. beef, bison, lamb)"
                        },
                        "eaten_at": {
                            "type": "string",
                            "description": "ISO-8601 date string (e.g. 2025-01-01T12:00:00Z)"
                        }
                    },
                    "required": ["person_name", "type", "eaten_at"]
                }),
            },
            Tool {
                name: "get_all_users",
                title: "Get All Users",
                description: "Get all users",
                input_schema: json!({ "type": "object", "properties": {} }),
            },
        ]
    }

    pub fn execute(&self, name: &str, arguments: Value) -> Result<ToolOutput, ToolError> {
        match name {
            "add_consumption" => {
                let args: AddConsumptionArgs = serde_json::from_value(arguments)
                    .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
                Ok(self.add_consumption(args))
            }
            "get_all_users" => Ok(self.get_all_users()),
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    fn add_consumption(&self, args: AddConsumptionArgs) -> ToolOutput {
        match self
            .tracker
            .add_consumption(&args.person_name, &args.bar_type, &args.eaten_at)
        {
            Ok(id) => ToolOutput::text(format!(
                "Successfully recorded consumption. ID: {}",
                id.id
            )),
            Err(e) => ToolOutput::error(format!("Error adding consumption: {}", e)),
        }
    }

    fn get_all_users(&self) -> ToolOutput {
        let rendered = self
            .tracker
            .list_people()
            .map_err(|e| e.to_string())
            .and_then(|people| serde_json::to_string_pretty(&people).map_err(|e| e.to_string()));

        match rendered {
            Ok(text) => ToolOutput::text(text),
            Err(e) => ToolOutput::error(format!("Error getting users: {}", e)),
        }
    }
}
