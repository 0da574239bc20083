use serde_json::Value;

use super::{ApiRequest, ResourceHandler, Transport};
use crate::error::{MotionError, Result};
use crate::input::MotionInput;
use crate::modes::{Mode, Resource};

/// `GET /workspaces`, one page per call. Status listing has no handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkspacesHandler;

impl ResourceHandler for WorkspacesHandler {
    fn resource(&self) -> Resource {
        Resource::Workspaces
    }

    fn handles(&self, mode: Mode) -> bool {
        mode == Mode::WorkspacesList
    }

    fn call(&self, transport: &dyn Transport, input: &MotionInput) -> Result<Value> {
        match input {
            MotionInput::ListWorkspaces(query) => {
                transport.send(&ApiRequest::get("/workspaces").with_query(query.query_pairs()))
            }
            other => Err(MotionError::NotImplemented(other.mode())),
        }
    }
}
