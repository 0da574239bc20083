//! Argument schemas, one list per mode.

use super::ToolParam;
use crate::input::{MOVE_TASK, TASK_ID, TASK_LIST, TASK_PATCH, TASK_POST, WORKSPACE_LIST};
use crate::modes::Mode;

pub fn params_for(mode: Mode) -> Vec<ToolParam> {
    match mode {
        Mode::TaskCreate => vec![ToolParam::object(
            TASK_POST,
            "The task to create.",
            true,
            task_fields(true),
        )],
        Mode::TaskUpdate => vec![
            task_id(),
            ToolParam::object(
                TASK_PATCH,
                "Only the fields to change.",
                true,
                task_fields(false),
            ),
        ],
        Mode::TaskRetrieve | Mode::TaskDelete | Mode::TaskUnassign => vec![task_id()],
        Mode::TaskList => vec![ToolParam::object(
            TASK_LIST,
            "Filters for the list; pass {} for no filtering.",
            true,
            list_fields(),
        )],
        Mode::TaskMoveWorkspace => vec![
            task_id(),
            ToolParam::object(
                MOVE_TASK,
                "Where to move the task.",
                true,
                vec![
                    ToolParam::new("workspaceId", "Destination workspace id.", "string", true),
                    ToolParam::new(
                        "assigneeId",
                        "User to assign in the destination workspace.",
                        "string",
                        false,
                    ),
                ],
            ),
        ],
        Mode::WorkspacesList => vec![ToolParam::object(
            WORKSPACE_LIST,
            "Filters for the list; pass {} for every workspace.",
            true,
            vec![
                ToolParam::new("cursor", "Cursor from a previous page.", "string", false),
                ToolParam::new("ids", "Workspace ids to fetch.", "array", false),
            ],
        )],
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
        | Mode::SchedulesGet => vec![],
    }
}

fn task_id() -> ToolParam {
    ToolParam::new(TASK_ID, "Id of the Motion task.", "string", true)
}

fn task_fields(creating: bool) -> Vec<ToolParam> {
    vec![
        ToolParam::new("name", "Title of the task.", "string", creating),
        ToolParam::new(
            "workspaceId",
            "Workspace the task belongs to.",
            "string",
            creating,
        ),
        ToolParam::new(
            "dueDate",
            "Due date, ISO 8601 or plain words such as 'tomorrow' or 'next monday'.",
            "string",
            false,
        ),
        ToolParam::new(
            "duration",
            "'NONE', 'REMINDER' or a number of minutes.",
            "string",
            false,
        ),
        ToolParam::new("status", "Status name.", "string", false),
        ToolParam::new(
            "priority",
            "One of ASAP, HIGH, MEDIUM, LOW.",
            "string",
            false,
        ),
        ToolParam::new("description", "Task description, markdown allowed.", "string", false),
        ToolParam::new("labels", "Label names.", "array", false),
        ToolParam::new("projectId", "Project the task belongs to.", "string", false),
        ToolParam::new("assigneeId", "User the task is assigned to.", "string", false),
    ]
}

fn list_fields() -> Vec<ToolParam> {
    vec![
        ToolParam::new("workspaceId", "Only tasks in this workspace.", "string", false),
        ToolParam::new("projectId", "Only tasks in this project.", "string", false),
        ToolParam::new("assigneeId", "Only tasks assigned to this user.", "string", false),
        ToolParam::new("label", "Only tasks with this label.", "string", false),
        ToolParam::new("name", "Only tasks whose name contains this text.", "string", false),
        ToolParam::new("status", "Only tasks in these statuses.", "array", false),
        ToolParam::new(
            "includeAllStatuses",
            "Include tasks in every status.",
            "boolean",
            false,
        ),
        ToolParam::new(
            "max_tasks",
            "Most tasks to return across pages (default 25).",
            "integer",
            false,
        ),
    ]
}
