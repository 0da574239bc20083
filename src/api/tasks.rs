//! Task endpoints.

use serde_json::Value;
use tracing::{debug, info};

use super::{ApiRequest, ResourceHandler, Transport};
use crate::error::{MotionError, Result};
use crate::input::{MotionInput, TaskListQuery};
use crate::modes::{Mode, Resource};

pub const TASK_DELETED: &str = "Task deleted successfully";
pub const TASK_UNASSIGNED: &str = "Task unassigned successfully";

#[derive(Debug, Clone, Copy, Default)]
pub struct TasksHandler;

impl ResourceHandler for TasksHandler {
    fn resource(&self) -> Resource {
        Resource::Task
    }

    fn handles(&self, mode: Mode) -> bool {
        mode.resource() == Resource::Task
    }

    fn call(&self, transport: &dyn Transport, input: &MotionInput) -> Result<Value> {
        match input {
            MotionInput::CreateTask(post) => {
                let body = to_body(post)?;
                transport.send(&ApiRequest::post("/tasks", body))
            }
            MotionInput::RetrieveTask { task_id } => {
                transport.send(&ApiRequest::get(task_path(task_id)))
            }
            MotionInput::UpdateTask { task_id, patch } => {
                let body = to_body(patch)?;
                transport.send(&ApiRequest::patch(task_path(task_id), body))
            }
            MotionInput::DeleteTask { task_id } => {
                transport.send(&ApiRequest::delete(task_path(task_id)))?;
                info!(task_id = %task_id, "task deleted");
                Ok(Value::String(TASK_DELETED.to_string()))
            }
            MotionInput::ListTasks(query) => list_tasks(transport, query),
            MotionInput::UnassignTask { task_id } => {
                let path = format!("{}/assignee", task_path(task_id));
                transport.send(&ApiRequest::delete(path))?;
                info!(task_id = %task_id, "task unassigned");
                Ok(Value::String(TASK_UNASSIGNED.to_string()))
            }
            MotionInput::MoveTask {
                task_id,
                destination,
            } => {
                let path = format!("{}/move", task_path(task_id));
                let body = to_body(destination)?;
                transport.send(&ApiRequest::patch(path, body))
            }
            other => Err(MotionError::NotImplemented(other.mode())),
        }
    }
}

fn task_path(task_id: &str) -> String {
    format!("/tasks/{}", urlencoding::encode(task_id))
}

fn to_body<T: serde::Serialize>(payload: &T) -> Result<Value> {
    serde_json::to_value(payload).map_err(|e| MotionError::Decode(e.to_string()))
}

/// Follow `meta.nextCursor` until the cap is reached or the pages run out.
///
/// The result is the last page with its `tasks` replaced by the aggregate.
fn list_tasks(transport: &dyn Transport, query: &TaskListQuery) -> Result<Value> {
    let cap = query.max_tasks;
    let mut filters = query.clone();
    let mut tasks: Vec<Value> = Vec::new();
    let mut pages = 0usize;

    let mut last_page = loop {
        let request = ApiRequest::get("/tasks")
            .with_query(filters.query_pairs())
            .with_headers(filters.headers.clone());
        let mut page = transport.send(&request)?;
        pages += 1;

        let fetched = take_tasks(&mut page)?;
        let fetched_count = fetched.len();
        tasks.extend(fetched);

        if tasks.len() >= cap {
            tasks.truncate(cap);
            break page;
        }
        match next_cursor(&page) {
            Some(cursor) if fetched_count > 0 => filters.cursor = Some(cursor),
            _ => break page,
        }
    };

    debug!(pages, total = tasks.len(), cap, "task list aggregated");
    last_page["tasks"] = Value::Array(tasks);
    Ok(last_page)
}

fn take_tasks(page: &mut Value) -> Result<Vec<Value>> {
    let Some(object) = page.as_object_mut() else {
        return Err(MotionError::Decode(format!(
            "expected a task list page, got {}",
            super::render(page)
        )));
    };
    match object.remove("tasks") {
        Some(Value::Array(tasks)) => Ok(tasks),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(other) => Err(MotionError::Decode(format!(
            "expected `tasks` to be an array, got {other}"
        ))),
    }
}

fn next_cursor(page: &Value) -> Option<String> {
    page.pointer("/meta/nextCursor")
        .and_then(Value::as_str)
        .filter(|cursor| !cursor.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::super::MotionApi;
    use super::super::testing::StubTransport;
    use super::*;
    use crate::input::{DEFAULT_MAX_TASKS, validate};
    use reqwest::Method;
    use serde_json::json;

    fn page(ids: std::ops::Range<usize>, cursor: Option<&str>) -> Value {
        let tasks: Vec<Value> = ids.map(|i| json!({"id": format!("t{i}")})).collect();
        let page_size = tasks.len();
        json!({
            "tasks": tasks,
            "meta": {"nextCursor": cursor, "pageSize": page_size}
        })
    }

    fn run(stub: &StubTransport, mode: Mode, args: Value) -> Result<Value> {
        let api = MotionApi::with_transport(stub.clone());
        api.call(&validate(mode, &args).unwrap())
    }

    #[test]
    fn test_list_stops_at_default_cap_with_endless_cursors() {
        let stub = StubTransport::repeating(page(0..10, Some("again")));
        let out = run(&stub, Mode::TaskList, json!({"task_list": {}})).unwrap();

        assert_eq!(out["tasks"].as_array().unwrap().len(), DEFAULT_MAX_TASKS);
        assert_eq!(stub.sent().len(), 3);
    }

    #[test]
    fn test_list_follows_cursors_until_exhausted() {
        let stub = StubTransport::new([
            page(0..2, Some("c1")),
            page(2..4, Some("c2")),
            page(4..5, None),
        ]);
        let out = run(&stub, Mode::TaskList, json!({"task_list": {"status": "Todo"}})).unwrap();

        let ids: Vec<&str> = out["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["t0", "t1", "t2", "t3", "t4"]);
        assert_eq!(out["meta"]["nextCursor"], Value::Null);

        let sent = stub.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent[0].query.iter().all(|(k, _)| k != "cursor"));
        assert!(sent[1].query.contains(&("cursor".into(), "c1".into())));
        assert!(sent[2].query.contains(&("cursor".into(), "c2".into())));
        assert!(sent.iter().all(|r| r.query.contains(&("status".into(), "Todo".into()))));
    }

    #[test]
    fn test_list_truncates_to_exact_cap() {
        let stub = StubTransport::new([page(0..4, Some("c1")), page(4..8, Some("c2"))]);
        let out = run(&stub, Mode::TaskList, json!({"task_list": {"max_tasks": 6}})).unwrap();

        assert_eq!(out["tasks"].as_array().unwrap().len(), 6);
        assert_eq!(out["meta"]["nextCursor"], "c2");
        assert_eq!(stub.sent().len(), 2);
    }

    #[test]
    fn test_list_cap_cuts_through_a_page() {
        let stub = StubTransport::new([page(0..10, Some("c1")), page(10..30, None)]);
        let out = run(
            &stub,
            Mode::TaskList,
            json!({"task_list": {"assignee_id": "cdq", "max_tasks": 25}}),
        )
        .unwrap();

        let tasks = out["tasks"].as_array().unwrap();
        assert_eq!(tasks.len(), 25);
        assert_eq!(tasks[24]["id"], "t24");
        assert!(stub.sent()[0].query.contains(&("assigneeId".into(), "cdq".into())));
    }

    #[test]
    fn test_list_stops_on_an_empty_page() {
        let stub = StubTransport::repeating(page(0..0, Some("stuck")));
        let out = run(&stub, Mode::TaskList, json!({"task_list": {}})).unwrap();
        assert_eq!(out["tasks"], json!([]));
        assert_eq!(stub.sent().len(), 1);
    }

    #[test]
    fn test_list_forwards_headers() {
        let stub = StubTransport::new([page(0..1, None)]);
        run(
            &stub,
            Mode::TaskList,
            json!({"task_list": {"headers": {"Prefer": "code=200, dynamic=true"}}}),
        )
        .unwrap();
        assert_eq!(
            stub.sent()[0].headers,
            vec![("Prefer".to_string(), "code=200, dynamic=true".to_string())]
        );
    }

    #[test]
    fn test_list_rejects_malformed_pages() {
        let stub = StubTransport::new([json!("<html>oops</html>")]);
        let err = run(&stub, Mode::TaskList, json!({"task_list": {}})).unwrap_err();
        assert!(matches!(err, MotionError::Decode(_)));
    }

    #[test]
    fn test_delete_and_unassign_confirm() {
        let stub = StubTransport::default();
        let deleted = run(&stub, Mode::TaskDelete, json!({"task_id": "t1"})).unwrap();
        assert_eq!(deleted, json!(TASK_DELETED));
        let unassigned = run(&stub, Mode::TaskUnassign, json!({"task_id": "t1"})).unwrap();
        assert_eq!(unassigned, json!(TASK_UNASSIGNED));

        let sent = stub.sent();
        assert_eq!(sent[0].method, Method::DELETE);
        assert_eq!(sent[0].path, "/tasks/t1");
        assert_eq!(sent[1].path, "/tasks/t1/assignee");
    }

    #[test]
    fn test_create_posts_normalized_body() {
        let stub = StubTransport::new([json!({"id": "new"})]);
        let out = run(
            &stub,
            Mode::TaskCreate,
            json!({"task_post": {"name": "Write", "workspace_id": "w1", "dueDate": "2024-02-01"}}),
        )
        .unwrap();
        assert_eq!(out["id"], "new");

        let sent = stub.sent();
        assert_eq!(sent[0].method, Method::POST);
        assert_eq!(sent[0].path, "/tasks");
        assert_eq!(
            sent[0].body,
            Some(json!({"name": "Write", "workspaceId": "w1", "dueDate": "2024-02-01T00:00:00Z"}))
        );
    }

    #[test]
    fn test_update_and_move_patch() {
        let stub = StubTransport::default();
        run(
            &stub,
            Mode::TaskUpdate,
            json!({"task_id": "a/b", "task_patch": {"status": "Done"}}),
        )
        .unwrap();
        run(
            &stub,
            Mode::TaskMoveWorkspace,
            json!({"task_id": "t1", "move_task": {"workspaceId": "w2"}}),
        )
        .unwrap();

        let sent = stub.sent();
        assert_eq!(sent[0].method, Method::PATCH);
        assert_eq!(sent[0].path, "/tasks/a%2Fb");
        assert_eq!(sent[0].body, Some(json!({"status": "Done"})));
        assert_eq!(sent[1].path, "/tasks/t1/move");
        assert_eq!(sent[1].body, Some(json!({"workspaceId": "w2"})));
    }

    #[test]
    fn test_foreign_inputs_are_not_implemented() {
        let err = TasksHandler
            .call(
                &StubTransport::default(),
                &MotionInput::ListWorkspaces(Default::default()),
            )
            .unwrap_err();
        assert!(matches!(err, MotionError::NotImplemented(Mode::WorkspacesList)));
    }
}
