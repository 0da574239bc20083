//! Request bodies and list filters, shaped like the Motion REST API.
//!
//! Motion speaks camelCase; agents tend to answer in snake_case, so every
//! multi-word field takes both spellings on the way in. Unknown fields are
//! ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Default ceiling on tasks aggregated across pages.
pub const DEFAULT_MAX_TASKS: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    #[serde(alias = "asap")]
    Asap,
    #[serde(alias = "high")]
    High,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeadlineType {
    #[serde(alias = "hard")]
    Hard,
    #[serde(alias = "soft")]
    Soft,
    #[serde(alias = "none")]
    None,
}

/// Auto-scheduling settings attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoScheduled {
    #[serde(default, alias = "start_date", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, alias = "deadline_type", skip_serializing_if = "Option::is_none")]
    pub deadline_type: Option<DeadlineType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPost {
    pub name: String,
    #[serde(alias = "workspace_id")]
    pub workspace_id: String,
    #[serde(default, alias = "due_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// `"NONE"`, `"REMINDER"` or a number of minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, alias = "auto_scheduled", skip_serializing_if = "Option::is_none")]
    pub auto_scheduled: Option<AutoScheduled>,
    #[serde(default, alias = "project_id", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default, alias = "assignee_id", skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
}

/// Body of `PATCH /tasks/{id}`; only the fields being changed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "workspace_id", skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(default, alias = "due_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, alias = "auto_scheduled", skip_serializing_if = "Option::is_none")]
    pub auto_scheduled: Option<AutoScheduled>,
    #[serde(default, alias = "project_id", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default, alias = "assignee_id", skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
}

/// Body of `PATCH /tasks/{id}/move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTask {
    #[serde(alias = "workspace_id")]
    pub workspace_id: String,
    #[serde(default, alias = "assignee_id", skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
}

/// Filters and pagination state for `GET /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<Vec<String>>,
    #[serde(
        default,
        alias = "include_all_statuses",
        skip_serializing_if = "Option::is_none"
    )]
    pub include_all_statuses: Option<bool>,
    #[serde(default, alias = "workspace_id", skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(default, alias = "project_id", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "assignee_id", skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    /// Client-side cap on tasks aggregated across pages.
    #[serde(default = "default_max_tasks", alias = "max_tasks")]
    pub max_tasks: usize,
    /// Extra request headers; used to steer mock servers in tests.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl Default for TaskListQuery {
    fn default() -> Self {
        Self {
            cursor: None,
            label: None,
            status: None,
            include_all_statuses: None,
            workspace_id: None,
            project_id: None,
            name: None,
            assignee_id: None,
            max_tasks: DEFAULT_MAX_TASKS,
            headers: BTreeMap::new(),
        }
    }
}

impl TaskListQuery {
    /// Query-string pairs in Motion's parameter names.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "cursor", self.cursor.as_deref());
        push(&mut pairs, "label", self.label.as_deref());
        for status in self.status.iter().flatten() {
            pairs.push(("status".to_string(), status.clone()));
        }
        if let Some(all) = self.include_all_statuses {
            pairs.push(("includeAllStatuses".to_string(), all.to_string()));
        }
        push(&mut pairs, "workspaceId", self.workspace_id.as_deref());
        push(&mut pairs, "projectId", self.project_id.as_deref());
        push(&mut pairs, "name", self.name.as_deref());
        push(&mut pairs, "assigneeId", self.assignee_id.as_deref());
        pairs
    }
}

/// Filters for `GET /workspaces`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkspaceListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub ids: Option<Vec<String>>,
}

impl WorkspaceListQuery {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "cursor", self.cursor.as_deref());
        for id in self.ids.iter().flatten() {
            pairs.push(("ids".to_string(), id.clone()));
        }
        pairs
    }
}

fn push(pairs: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        pairs.push((key.to_string(), value.to_string()));
    }
}

fn default_max_tasks() -> usize {
    DEFAULT_MAX_TASKS
}

/// Accept `"a"` as well as `["a", "b"]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(value)) => Some(vec![value]),
        Some(OneOrMany::Many(values)) => Some(values),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_post_accepts_both_spellings() {
        let camel: TaskPost =
            serde_json::from_value(json!({"name": "a", "workspaceId": "w", "dueDate": "d"}))
                .unwrap();
        let snake: TaskPost =
            serde_json::from_value(json!({"name": "a", "workspace_id": "w", "due_date": "d"}))
                .unwrap();
        assert_eq!(camel, snake);
        let body = serde_json::to_value(&camel).unwrap();
        assert_eq!(body, json!({"name": "a", "workspaceId": "w", "dueDate": "d"}));
    }

    #[test]
    fn test_priority_is_case_tolerant() {
        let post: TaskPost = serde_json::from_value(
            json!({"name": "a", "workspaceId": "w", "priority": "high"}),
        )
        .unwrap();
        assert_eq!(post.priority, Some(Priority::High));
        assert!(
            serde_json::from_value::<TaskPost>(
                json!({"name": "a", "workspaceId": "w", "priority": "URGENT"})
            )
            .is_err()
        );
    }

    #[test]
    fn test_list_query_defaults_and_pairs() {
        let query: TaskListQuery = serde_json::from_value(json!({
            "assignee_id": "cdq",
            "status": "Todo",
            "include_all_statuses": false
        }))
        .unwrap();
        assert_eq!(query.max_tasks, DEFAULT_MAX_TASKS);
        assert_eq!(
            query.query_pairs(),
            vec![
                ("status".to_string(), "Todo".to_string()),
                ("includeAllStatuses".to_string(), "false".to_string()),
                ("assigneeId".to_string(), "cdq".to_string()),
            ]
        );
    }

    #[test]
    fn test_workspace_ids_repeat() {
        let query: WorkspaceListQuery =
            serde_json::from_value(json!({"ids": ["a", "b"]})).unwrap();
        assert_eq!(
            query.query_pairs(),
            vec![
                ("ids".to_string(), "a".to_string()),
                ("ids".to_string(), "b".to_string()),
            ]
        );
    }
}
