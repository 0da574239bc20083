//! API wrapper: routes a validated input to the handler for its resource
//! family and renders the outcome as a string.

mod tasks;
pub mod transport;
mod workspaces;

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{info, instrument};

use crate::config::MotionConfig;
use crate::error::{ConfigError, MotionError, Result};
use crate::input::{self, MotionInput};
use crate::modes::{Mode, Resource};

pub use tasks::{TASK_DELETED, TASK_UNASSIGNED, TasksHandler};
pub use transport::{ApiRequest, HttpTransport, RetryPolicy, Transport};
pub use workspaces::WorkspacesHandler;

/// Serves the modes of one resource family.
pub trait ResourceHandler: Send + Sync {
    fn resource(&self) -> Resource;

    /// Whether a call for `mode` would be served rather than rejected.
    fn handles(&self, mode: Mode) -> bool;

    fn call(&self, transport: &dyn Transport, input: &MotionInput) -> Result<Value>;
}

/// Entry point for running modes against Motion.
pub struct MotionApi {
    transport: Box<dyn Transport>,
    handlers: BTreeMap<Resource, Box<dyn ResourceHandler>>,
}

impl std::fmt::Debug for MotionApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionApi")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl MotionApi {
    /// Connect to the configured Motion instance over HTTP.
    pub fn new(config: &MotionConfig) -> std::result::Result<Self, ConfigError> {
        let transport = HttpTransport::from_config(config)?;
        info!(base_url = transport.base_url(), "Motion API client ready");
        Ok(Self::with_transport(transport))
    }

    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        let mut handlers: BTreeMap<Resource, Box<dyn ResourceHandler>> = BTreeMap::new();
        for handler in default_handlers() {
            handlers.insert(handler.resource(), handler);
        }
        Self {
            transport: Box::new(transport),
            handlers,
        }
    }

    /// Whether `mode` has a handler behind it.
    pub fn supports(&self, mode: Mode) -> bool {
        self.handler_for(mode).is_some()
    }

    pub fn supported_modes(&self) -> Vec<Mode> {
        crate::modes::all_modes()
            .into_iter()
            .filter(|m| self.supports(*m))
            .collect()
    }

    /// Run a validated input and return Motion's answer.
    #[instrument(skip(self, input), fields(mode = %input.mode()))]
    pub fn call(&self, input: &MotionInput) -> Result<Value> {
        let mode = input.mode();
        let handler = self
            .handler_for(mode)
            .ok_or(MotionError::NotImplemented(mode))?;
        info!(mode = %mode, input = %input.to_payload(), "dispatching");
        let value = handler.call(self.transport.as_ref(), input)?;
        info!(mode = %mode, response = %value, "mode completed");
        Ok(value)
    }

    /// Like [`call`](Self::call), rendered for the agent.
    pub fn run(&self, input: &MotionInput) -> Result<String> {
        self.call(input).map(|value| render(&value))
    }

    /// Validate `raw` for `mode`, then run it.
    pub fn run_mode(&self, mode: Mode, raw: &Value) -> Result<String> {
        let input = input::validate(mode, raw)?;
        self.run(&input)
    }

    fn handler_for(&self, mode: Mode) -> Option<&dyn ResourceHandler> {
        self.handlers
            .get(&mode.resource())
            .map(|h| &**h)
            .filter(|h| h.handles(mode))
    }
}

fn default_handlers() -> Vec<Box<dyn ResourceHandler>> {
    vec![Box::new(TasksHandler), Box::new(WorkspacesHandler)]
}

/// Whether a freshly built [`MotionApi`] would serve `mode`.
pub fn is_wired(mode: Mode) -> bool {
    default_handlers()
        .iter()
        .any(|h| h.resource() == mode.resource() && h.handles(mode))
}

/// Compact JSON, except that a bare string is returned as-is.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::StubTransport;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_wired_modes_are_supported() {
        let api = MotionApi::with_transport(StubTransport::default());
        let supported = api.supported_modes();
        assert_eq!(supported.len(), 8);
        assert!(supported.contains(&Mode::WorkspacesList));
        assert!(!api.supports(Mode::WorkspacesListStatuses));
        assert!(!api.supports(Mode::UsersGetMyUser));
        for mode in crate::modes::all_modes() {
            assert_eq!(is_wired(mode), api.supports(mode), "{mode}");
        }
    }

    #[test]
    fn test_unwired_modes_never_reach_the_network() {
        let stub = StubTransport::default();
        let api = MotionApi::with_transport(stub.clone());
        let err = api
            .run_mode(Mode::ProjectsList, &json!({"workspaceId": "w"}))
            .unwrap_err();
        assert!(matches!(err, MotionError::NotImplemented(Mode::ProjectsList)));
        assert!(err.to_string().contains("not yet implemented"));
        assert!(stub.sent().is_empty());
    }

    #[test]
    fn test_invalid_input_never_reaches_the_network() {
        let stub = StubTransport::default();
        let api = MotionApi::with_transport(stub.clone());
        let err = api.run_mode(Mode::TaskRetrieve, &json!({})).unwrap_err();
        assert!(matches!(err, MotionError::Validation(_)));
        assert!(stub.sent().is_empty());
    }

    #[test]
    fn test_rendering() {
        assert_eq!(render(&json!({"id": "t1", "n": 2})), r#"{"id":"t1","n":2}"#);
        assert_eq!(render(&json!("<html/>")), "<html/>");
        assert_eq!(render(&Value::Null), "null");
    }
}
