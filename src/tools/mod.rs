//! Agent tool layer.
//!
//! One [`MotionAction`] per mode, plus formatters that serialise the tool
//! definitions into each provider's native schema (OpenAI function-calling,
//! Anthropic tool-use, Google function declarations).

mod params;
mod prompts;

pub use params::params_for;
pub use prompts::description;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, instrument, warn};

use crate::api::MotionApi;
use crate::error::{MotionError, ValidationError, Violation};
use crate::input::{self, MODE};
use crate::modes::{self, Mode};

// ── Tool definitions ────────────────────────────────────────────────────────

/// JSON-Schema-like parameter definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParam {
    pub name: String,
    pub description: String,
    /// JSON Schema type: "string", "integer", "boolean", "array", "object".
    #[serde(rename = "type")]
    pub param_type: String,
    pub required: bool,
    /// Nested fields of an "object" parameter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ToolParam>,
}

impl ToolParam {
    pub fn new(name: &str, description: &str, param_type: &str, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type: param_type.into(),
            required,
            properties: Vec::new(),
        }
    }

    pub fn object(name: &str, description: &str, required: bool, properties: Vec<ToolParam>) -> Self {
        Self {
            properties,
            ..Self::new(name, description, "object", required)
        }
    }
}

/// What the agent sees of one mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDef {
    pub mode: Mode,
    pub name: String,
    pub description: &'static str,
    pub parameters: Vec<ToolParam>,
}

impl ToolDef {
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            mode,
            name: mode.title(),
            description: prompts::description(mode),
            parameters: params::params_for(mode),
        }
    }
}

/// Definitions for every registered mode, in registry order.
pub fn all_tool_defs() -> Vec<ToolDef> {
    modes::all_modes().into_iter().map(ToolDef::for_mode).collect()
}

// ── Actions ─────────────────────────────────────────────────────────────────

/// A callable tool bound to one mode.
///
/// `run` never fails: every error is turned into text the agent can act on.
#[derive(Debug, Clone)]
pub struct MotionAction {
    def: ToolDef,
    api: Arc<MotionApi>,
}

impl MotionAction {
    pub fn new(mode: Mode, api: Arc<MotionApi>) -> Self {
        Self {
            def: ToolDef::for_mode(mode),
            api,
        }
    }

    pub fn mode(&self) -> Mode {
        self.def.mode
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn description(&self) -> &'static str {
        self.def.description
    }

    pub fn def(&self) -> &ToolDef {
        &self.def
    }

    /// Run the tool with the agent's arguments.
    #[instrument(skip(self, args), fields(tool = %self.def.name))]
    pub fn run(&self, args: &Value) -> String {
        match self.try_run(args) {
            Ok(output) => output,
            Err(err) => {
                warn!(error = %err, "tool call failed");
                handle_error(&err)
            }
        }
    }

    /// Like [`run`](Self::run), without rendering the error.
    pub fn try_run(&self, args: &Value) -> Result<String, MotionError> {
        let mut map = match args {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            other => {
                return Err(ValidationError {
                    mode: Some(self.mode()),
                    violations: vec![Violation::new(
                        "input",
                        format!("expected a JSON object, got {other}"),
                    )],
                }
                .into());
            }
        };
        map.insert(MODE.into(), json!(self.mode().as_str()));
        let input = input::validate_args(&Value::Object(map))?;
        debug!(mode = %input.mode(), "input validated");
        self.api.run(&input)
    }
}

/// Turn an error into the text returned to the agent.
pub fn handle_error(error: &MotionError) -> String {
    format!(
        "The following errors occurred during tool execution: {error}. \
         Please fix any validation errors you can. Otherwise, please try another tool."
    )
}

// ── Provider-specific formatters ────────────────────────────────────────────

/// Parameters for a tool, building a JSON Schema `properties` / `required`.
fn params_to_json_schema(params: &[ToolParam]) -> (Value, Value) {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for p in params {
        let mut prop = Map::new();
        prop.insert("type".into(), json!(p.param_type));
        prop.insert("description".into(), json!(p.description));

        // Arrays need an items schema
        if p.param_type == "array" {
            prop.insert("items".into(), json!({"type": "string"}));
        }
        if p.param_type == "object" {
            let (nested, nested_required) = params_to_json_schema(&p.properties);
            prop.insert("properties".into(), nested);
            prop.insert("required".into(), nested_required);
        }

        properties.insert(p.name.clone(), Value::Object(prop));
        if p.required {
            required.push(json!(p.name));
        }
    }

    (Value::Object(properties), Value::Array(required))
}

fn object_schema(def: &ToolDef) -> Value {
    let (properties, required) = params_to_json_schema(&def.parameters);
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// OpenAI / OpenAI-compatible function-calling format.
///
/// ```json
/// { "type": "function", "function": { "name", "description", "parameters": { … } } }
/// ```
pub fn tools_openai(defs: &[ToolDef]) -> Vec<Value> {
    defs.iter()
        .map(|t| {
            json!({
                "type": "function",
                "function": {
                    "name": t.name,
                    "description": t.description,
                    "parameters": object_schema(t),
                }
            })
        })
        .collect()
}

/// Anthropic tool-use format.
///
/// ```json
/// { "name", "description", "input_schema": { … } }
/// ```
pub fn tools_anthropic(defs: &[ToolDef]) -> Vec<Value> {
    defs.iter()
        .map(|t| {
            json!({
                "name": t.name,
                "description": t.description,
                "input_schema": object_schema(t),
            })
        })
        .collect()
}

/// Google Gemini function-declaration format.
///
/// ```json
/// { "name", "description", "parameters": { … } }
/// ```
pub fn tools_google(defs: &[ToolDef]) -> Vec<Value> {
    defs.iter()
        .map(|t| {
            json!({
                "name": t.name,
                "description": t.description,
                "parameters": object_schema(t),
            })
        })
        .collect()
}

// ── Wire types ──────────────────────────────────────────────────────────────

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// The result of executing a tool, injected back into the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub id: String,
    pub name: String,
    pub result: String,
    pub is_error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::StubTransport;

    fn action(mode: Mode, stub: &StubTransport) -> MotionAction {
        MotionAction::new(mode, Arc::new(MotionApi::with_transport(stub.clone())))
    }

    // ── definitions ─────────────────────────────────────────────────

    #[test]
    fn test_every_mode_has_a_definition() {
        let defs = all_tool_defs();
        assert_eq!(defs.len(), 20);
        for def in &defs {
            assert_eq!(def.name, def.mode.title());
            assert!(def.description.starts_with("Useful when you need"));
        }
    }

    #[test]
    fn test_create_params_nest_required_fields() {
        let params = params_for(Mode::TaskCreate);
        assert_eq!(params.len(), 1);
        let post = &params[0];
        assert_eq!(post.name, "task_post");
        assert!(post.required);
        assert!(post.properties.iter().any(|p| p.name == "workspaceId" && p.required));
        assert!(post.properties.iter().any(|p| p.name == "dueDate" && !p.required));
    }

    #[test]
    fn test_unstructured_modes_take_no_params() {
        assert!(params_for(Mode::UsersList).is_empty());
        assert!(params_for(Mode::SchedulesGet).is_empty());
    }

    // ── run ─────────────────────────────────────────────────────────

    #[test]
    fn test_run_injects_mode() {
        let stub = StubTransport::new([json!({"id": "t1", "name": "Write"})]);
        let out = action(Mode::TaskRetrieve, &stub).run(&json!({"task_id": "t1"}));
        assert_eq!(out, r#"{"id":"t1","name":"Write"}"#);
        assert_eq!(stub.sent()[0].path, "/tasks/t1");
    }

    #[test]
    fn test_run_overrides_a_foreign_mode() {
        let stub = StubTransport::default();
        let out = action(Mode::TaskDelete, &stub)
            .run(&json!({"mode": "task.list", "task_id": "t1"}));
        assert_eq!(out, "Task deleted successfully");
    }

    #[test]
    fn test_run_reports_validation_errors() {
        let stub = StubTransport::default();
        let out = action(Mode::TaskCreate, &stub).run(&json!({"task_post": {"name": "x"}}));
        assert!(out.starts_with("The following errors occurred during tool execution:"));
        assert!(out.contains("task_post -> workspaceId"));
        assert!(out.contains("field required"));
        assert!(out.ends_with("Otherwise, please try another tool."));
        assert!(stub.sent().is_empty());
    }

    #[test]
    fn test_run_reports_not_implemented() {
        let stub = StubTransport::default();
        let out = action(Mode::SchedulesGet, &stub).run(&Value::Null);
        assert!(out.contains("not yet implemented"));
        assert!(stub.sent().is_empty());
    }

    #[test]
    fn test_run_rejects_non_objects() {
        let stub = StubTransport::default();
        let out = action(Mode::TaskList, &stub).run(&json!("everything"));
        assert!(out.contains("expected a JSON object"));
    }

    // ── Provider format tests ───────────────────────────────────────

    #[test]
    fn test_openai_format() {
        let tools = tools_openai(&all_tool_defs());
        assert_eq!(tools.len(), 20);
        assert_eq!(tools[0]["type"], "function");
        assert_eq!(tools[0]["function"]["name"], "task_update");
        let params = &tools[0]["function"]["parameters"];
        assert!(params["properties"]["task_id"].is_object());
        assert_eq!(params["required"], json!(["task_id", "task_patch"]));
        assert_eq!(params["properties"]["task_patch"]["type"], "object");
    }

    #[test]
    fn test_anthropic_format() {
        let tools = tools_anthropic(&all_tool_defs());
        assert_eq!(tools.len(), 20);
        let create = tools.iter().find(|t| t["name"] == "task_create").unwrap();
        let post = &create["input_schema"]["properties"]["task_post"];
        assert_eq!(post["required"], json!(["name", "workspaceId"]));
        assert_eq!(post["properties"]["labels"]["items"]["type"], "string");
    }

    #[test]
    fn test_google_format() {
        let tools = tools_google(&all_tool_defs());
        assert_eq!(tools.len(), 20);
        assert_eq!(tools[19]["name"], "schedules_get");
        assert_eq!(tools[19]["parameters"]["properties"], json!({}));
    }
}
