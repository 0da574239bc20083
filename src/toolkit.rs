//! Toolkit assembly: one action per registered mode, all sharing a single
//! API wrapper.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::api::MotionApi;
use crate::config::MotionConfig;
use crate::error::ConfigError;
use crate::modes::{self, Mode};
use crate::tools::{self, MotionAction, ToolCall, ToolDef, ToolResult};

#[derive(Debug, Clone)]
pub struct MotionToolkit {
    api: Arc<MotionApi>,
    actions: Vec<MotionAction>,
}

impl MotionToolkit {
    /// Connect to Motion with `config` and expose every mode.
    pub fn from_config(config: &MotionConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_api(MotionApi::new(config)?))
    }

    pub fn from_api(api: MotionApi) -> Self {
        Self::from_shared(Arc::new(api))
    }

    pub fn from_shared(api: Arc<MotionApi>) -> Self {
        let actions: Vec<MotionAction> = modes::all_modes()
            .into_iter()
            .map(|mode| MotionAction::new(mode, Arc::clone(&api)))
            .collect();
        info!(
            tools = actions.len(),
            wired = api.supported_modes().len(),
            "toolkit assembled"
        );
        Self { api, actions }
    }

    /// Every action, in registry order.
    pub fn get_tools(&self) -> &[MotionAction] {
        &self.actions
    }

    pub fn api(&self) -> &MotionApi {
        &self.api
    }

    /// Find an action by tool name (`task_create`) or mode (`task.create`).
    pub fn get(&self, name: &str) -> Option<&MotionAction> {
        let mode = modes::find_mode(name)?;
        self.action(mode)
    }

    pub fn action(&self, mode: Mode) -> Option<&MotionAction> {
        self.actions.iter().find(|a| a.mode() == mode)
    }

    /// Run one model-issued call.
    pub fn execute(&self, call: &ToolCall) -> ToolResult {
        let (result, is_error) = match self.get(&call.name) {
            Some(action) => match action.try_run(&call.arguments) {
                Ok(output) => (output, false),
                Err(err) => (tools::handle_error(&err), true),
            },
            None => (format!("Unknown tool: {}", call.name), true),
        };
        ToolResult {
            id: call.id.clone(),
            name: call.name.clone(),
            result,
            is_error,
        }
    }

    pub fn defs(&self) -> Vec<ToolDef> {
        self.actions.iter().map(|a| a.def().clone()).collect()
    }

    pub fn tools_openai(&self) -> Vec<Value> {
        tools::tools_openai(&self.defs())
    }

    pub fn tools_anthropic(&self) -> Vec<Value> {
        tools::tools_anthropic(&self.defs())
    }

    pub fn tools_google(&self) -> Vec<Value> {
        tools::tools_google(&self.defs())
    }
}
