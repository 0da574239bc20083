//! Input model: turns an agent's argument map into a typed, validated
//! request for one mode.
//!
//! Validation never stops at the first problem. Every broken rule of a call
//! is collected and reported in a single [`ValidationError`], so the agent
//! can fix all of them in one retry.

pub mod dates;
mod payloads;

pub use payloads::{
    AutoScheduled, DEFAULT_MAX_TASKS, DeadlineType, MoveTask, Priority, TaskListQuery, TaskPatch,
    TaskPost, WorkspaceListQuery,
};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::error::{MotionError, ValidationError, Violation};
use crate::modes::Mode;

pub const MODE: &str = "mode";
pub const TASK_ID: &str = "task_id";
pub const TASK_POST: &str = "task_post";
pub const TASK_PATCH: &str = "task_patch";
pub const TASK_LIST: &str = "task_list";
pub const MOVE_TASK: &str = "move_task";
pub const WORKSPACE_LIST: &str = "workspace_list";

/// Fields rewritten to the canonical date form before deserializing.
const DATE_FIELDS: &[&str] = &["dueDate", "due_date"];

/// A request that passed validation. One variant per wired mode; modes with
/// no input schema keep their raw map.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionInput {
    CreateTask(TaskPost),
    RetrieveTask { task_id: String },
    UpdateTask { task_id: String, patch: TaskPatch },
    DeleteTask { task_id: String },
    ListTasks(TaskListQuery),
    UnassignTask { task_id: String },
    MoveTask { task_id: String, destination: MoveTask },
    ListWorkspaces(WorkspaceListQuery),
    Unstructured { mode: Mode, payload: Map<String, Value> },
}

impl MotionInput {
    pub fn mode(&self) -> Mode {
        match self {
            Self::CreateTask(_) => Mode::TaskCreate,
            Self::RetrieveTask { .. } => Mode::TaskRetrieve,
            Self::UpdateTask { .. } => Mode::TaskUpdate,
            Self::DeleteTask { .. } => Mode::TaskDelete,
            Self::ListTasks(_) => Mode::TaskList,
            Self::UnassignTask { .. } => Mode::TaskUnassign,
            Self::MoveTask { .. } => Mode::TaskMoveWorkspace,
            Self::ListWorkspaces(_) => Mode::WorkspacesList,
            Self::Unstructured { mode, .. } => *mode,
        }
    }

    /// The argument map this input was validated from (without `mode`).
    pub fn to_payload(&self) -> Value {
        match self {
            Self::CreateTask(post) => json!({ TASK_POST: post }),
            Self::RetrieveTask { task_id }
            | Self::DeleteTask { task_id }
            | Self::UnassignTask { task_id } => json!({ TASK_ID: task_id }),
            Self::UpdateTask { task_id, patch } => json!({ TASK_ID: task_id, TASK_PATCH: patch }),
            Self::ListTasks(query) => json!({ TASK_LIST: query }),
            Self::MoveTask {
                task_id,
                destination,
            } => json!({ TASK_ID: task_id, MOVE_TASK: destination }),
            Self::ListWorkspaces(query) => json!({ WORKSPACE_LIST: query }),
            Self::Unstructured { payload, .. } => Value::Object(payload.clone()),
        }
    }
}

/// Validate an argument map that carries its own `mode` key.
pub fn validate_args(args: &Value) -> Result<MotionInput, MotionError> {
    let mode = match args.get(MODE).and_then(Value::as_str) {
        Some(raw) => Mode::parse(raw)?,
        None => {
            return Err(ValidationError {
                mode: None,
                violations: vec![Violation::new(MODE, "mode cant be none")],
            }
            .into());
        }
    };
    Ok(validate(mode, args)?)
}

/// Validate `raw` against the rules of `mode`.
pub fn validate(mode: Mode, raw: &Value) -> Result<MotionInput, ValidationError> {
    validate_at(mode, raw, Utc::now())
}

/// Like [`validate`], resolving relative dates against `now`.
pub fn validate_at(
    mode: Mode,
    raw: &Value,
    now: DateTime<Utc>,
) -> Result<MotionInput, ValidationError> {
    let Some(args) = raw.as_object() else {
        return Err(ValidationError {
            mode: Some(mode),
            violations: vec![Violation::new("input", "expected a JSON object")],
        });
    };

    let mut checker = Checker::new(now);
    let input = match mode {
        Mode::TaskCreate => checker
            .payload::<TaskPost>(args, TASK_POST, &["workspaceId", "name"])
            .map(MotionInput::CreateTask),
        Mode::TaskRetrieve => checker
            .task_id(args)
            .map(|task_id| MotionInput::RetrieveTask { task_id }),
        Mode::TaskUpdate => {
            let task_id = checker.task_id(args);
            let patch = checker.payload::<TaskPatch>(args, TASK_PATCH, &[]);
            task_id
                .zip(patch)
                .map(|(task_id, patch)| MotionInput::UpdateTask { task_id, patch })
        }
        Mode::TaskDelete => checker
            .task_id(args)
            .map(|task_id| MotionInput::DeleteTask { task_id }),
        Mode::TaskList => checker
            .payload::<TaskListQuery>(args, TASK_LIST, &[])
            .and_then(|query| {
                if query.max_tasks == 0 {
                    checker.violate(format!("{TASK_LIST} -> max_tasks"), "must be at least 1");
                    None
                } else {
                    Some(MotionInput::ListTasks(query))
                }
            }),
        Mode::TaskUnassign => checker
            .task_id(args)
            .map(|task_id| MotionInput::UnassignTask { task_id }),
        Mode::TaskMoveWorkspace => {
            let task_id = checker.task_id(args);
            let destination = checker.payload::<MoveTask>(args, MOVE_TASK, &["workspaceId"]);
            task_id
                .zip(destination)
                .map(|(task_id, destination)| MotionInput::MoveTask {
                    task_id,
                    destination,
                })
        }
        Mode::WorkspacesList => checker
            .payload::<WorkspaceListQuery>(args, WORKSPACE_LIST, &[])
            .map(MotionInput::ListWorkspaces),
        Mode::RecurringTaskCreate
        | Mode::RecurringTaskList
        | Mode::RecurringTaskDelete
        | Mode::CommentsCreate
        | Mode::CommentsList
        | Mode::ProjectsRetrieve
        | Mode::ProjectsList
        | Mode::ProjectsCreate
        | Mode::WorkspacesListStatuses
        | Mode::UsersList
        | Mode::UsersGetMyUser
        | Mode::SchedulesGet => {
            let mut payload = args.clone();
            payload.remove(MODE);
            Some(MotionInput::Unstructured { mode, payload })
        }
    };

    match input {
        Some(input) if checker.violations.is_empty() => Ok(input),
        _ => Err(ValidationError {
            mode: Some(mode),
            violations: checker.violations,
        }),
    }
}

/// Accumulates violations while pulling typed values out of the map.
struct Checker {
    now: DateTime<Utc>,
    violations: Vec<Violation>,
}

impl Checker {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            violations: Vec::new(),
        }
    }

    fn violate(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation::new(field, message));
    }

    fn task_id(&mut self, args: &Map<String, Value>) -> Option<String> {
        match args.get(TASK_ID) {
            Some(Value::String(id)) if !id.trim().is_empty() => Some(id.trim().to_string()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => {
                self.violate(TASK_ID, "task_id cant be none");
                None
            }
        }
    }

    /// Pull the nested object under `key`, check its required fields,
    /// normalize its dates, then deserialize it.
    fn payload<T: DeserializeOwned>(
        &mut self,
        args: &Map<String, Value>,
        key: &str,
        required: &[&str],
    ) -> Option<T> {
        let mut object = match args.get(key) {
            None | Some(Value::Null) => {
                self.violate(key, format!("{key} cant be none"));
                return None;
            }
            Some(Value::Object(object)) => object.clone(),
            Some(other) => {
                self.violate(key, format!("expected an object, got {}", type_name(other)));
                return None;
            }
        };

        let before = self.violations.len();
        for field in required {
            let present = lookup(&object, field).is_some_and(|value| match value {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                _ => true,
            });
            if !present {
                self.violate(format!("{key} -> {field}"), "field required");
            }
        }

        for field in DATE_FIELDS {
            let Some(value) = object.get_mut(*field) else {
                continue;
            };
            match value {
                Value::Null => {}
                Value::String(raw) => {
                    match dates::iso_date_string_at(raw, self.now) {
                        Ok(normalized) => *value = Value::String(normalized),
                        Err(err) => self.violate(format!("{key} -> {field}"), err.to_string()),
                    }
                }
                other => {
                    let message = format!("expected a date string, got {}", type_name(other));
                    self.violate(format!("{key} -> {field}"), message);
                }
            }
        }

        if self.violations.len() > before {
            return None;
        }

        match serde_json::from_value(Value::Object(object)) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                self.violate(key, err.to_string());
                None
            }
        }
    }
}

/// Find a camelCase field under either spelling.
fn lookup<'a>(object: &'a Map<String, Value>, camel: &str) -> Option<&'a Value> {
    object
        .get(camel)
        .or_else(|| object.get(&to_snake_case(camel)))
}

fn to_snake_case(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for ch in camel.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
