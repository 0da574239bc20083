//! Descriptions shown to the agent, one per mode.

use crate::modes::Mode;

pub fn description(mode: Mode) -> &'static str {
    match mode {
        Mode::TaskUpdate => {
            "Useful when you need to update a calendar task. Pass the task's `task_id` \
             and a `task_patch` object holding only the fields to change (name, dueDate, \
             status, priority, description, labels, assigneeId, ...). dueDate may be \
             written naturally, e.g. 'next friday'."
        }
        Mode::TaskRetrieve => {
            "Useful when you need to retrieve a calendar task. Pass the task's `task_id`."
        }
        Mode::TaskDelete => {
            "Useful when you need to delete a calendar task. Pass the task's `task_id`. \
             This cannot be undone."
        }
        Mode::TaskCreate => {
            "Useful when you need to create a calendar task. Pass a `task_post` object \
             with at least `name` and `workspaceId`; dueDate, duration, priority \
             (ASAP, HIGH, MEDIUM, LOW), description, labels, projectId and assigneeId \
             are optional. dueDate may be written naturally, e.g. 'tomorrow'."
        }
        Mode::TaskList => {
            "Useful when you need a list of calendar tasks. Pass a `task_list` object, \
             empty for no filtering, or with any of workspaceId, projectId, assigneeId, \
             label, name, status and includeAllStatuses. At most `max_tasks` tasks \
             (default 25) are returned."
        }
        Mode::TaskUnassign => {
            "Useful when you need to delete an assignee from a calendar task. Pass the \
             task's `task_id`."
        }
        Mode::TaskMoveWorkspace => {
            "Useful when you need to move a Motion task to a workspace. Pass the task's \
             `task_id` and a `move_task` object with the destination `workspaceId` and \
             an optional `assigneeId`."
        }
        Mode::RecurringTaskCreate => {
            "Useful when you need to create a recurring Motion task."
        }
        Mode::RecurringTaskList => "Useful when you need a list of recurring Motion tasks.",
        Mode::RecurringTaskDelete => "Useful when you need to delete a recurring Motion task.",
        Mode::CommentsCreate => "Useful when you need to create a comment on a Motion task.",
        Mode::CommentsList => "Useful when you need a list of Motion comments.",
        Mode::ProjectsRetrieve => "Useful when you need to retrieve a Motion project.",
        Mode::ProjectsList => "Useful when you need a list of Motion projects.",
        Mode::ProjectsCreate => "Useful when you need to create a Motion project.",
        Mode::WorkspacesListStatuses => {
            "Useful when you need a list of Motion workspaces filtered by a status."
        }
        Mode::WorkspacesList => {
            "Useful when you need a list of Motion workspaces. Pass a `workspace_list` \
             object, empty for all workspaces, or with `ids` to fetch specific ones. \
             Workspace ids are needed to create or move tasks."
        }
        Mode::UsersList => "Useful when you need a list of Motion users.",
        Mode::UsersGetMyUser => {
            "Useful when you need the Motion user that represents the current user."
        }
        Mode::SchedulesGet => "Useful when you need a Motion schedule.",
    }
}
