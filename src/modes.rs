//! Mode registry.
//!
//! Single source of truth for the operations the toolkit exposes. Every
//! mode is a dotted `<resource>.<verb>` string; the prefix names one of the
//! Motion resource families.

use std::str::FromStr;

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::error::ModeError;

/// A remote API section.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Resource {
    Task,
    RecurringTask,
    Comments,
    Projects,
    Workspaces,
    Users,
    Schedules,
}

impl Resource {
    /// Human-readable family name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Task => "Tasks",
            Self::RecurringTask => "Recurring tasks",
            Self::Comments => "Comments",
            Self::Projects => "Projects",
            Self::Workspaces => "Workspaces",
            Self::Users => "Users",
            Self::Schedules => "Schedules",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Verb {
    Create,
    Retrieve,
    Update,
    Delete,
    List,
    Unassign,
    MoveWorkspace,
    ListStatuses,
    GetMyUser,
    Get,
}

/// One operation in the master list.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Mode {
    #[strum(serialize = "task.update")]
    TaskUpdate,
    #[strum(serialize = "task.retrieve")]
    TaskRetrieve,
    #[strum(serialize = "task.delete")]
    TaskDelete,
    #[strum(serialize = "task.create")]
    TaskCreate,
    #[strum(serialize = "task.list")]
    TaskList,
    #[strum(serialize = "task.unassign")]
    TaskUnassign,
    #[strum(serialize = "task.move_workspace")]
    TaskMoveWorkspace,

    #[strum(serialize = "recurring_task.create")]
    RecurringTaskCreate,
    #[strum(serialize = "recurring_task.list")]
    RecurringTaskList,
    #[strum(serialize = "recurring_task.delete")]
    RecurringTaskDelete,

    #[strum(serialize = "comments.create")]
    CommentsCreate,
    #[strum(serialize = "comments.list")]
    CommentsList,

    #[strum(serialize = "projects.retrieve")]
    ProjectsRetrieve,
    #[strum(serialize = "projects.list")]
    ProjectsList,
    #[strum(serialize = "projects.create")]
    ProjectsCreate,

    #[strum(serialize = "workspaces.list_statuses")]
    WorkspacesListStatuses,
    #[strum(serialize = "workspaces.list")]
    WorkspacesList,

    #[strum(serialize = "users.list")]
    UsersList,
    #[strum(serialize = "users.get_my_user")]
    UsersGetMyUser,

    #[strum(serialize = "schedules.get")]
    SchedulesGet,
}

impl Mode {
    /// Parse a mode string, failing with the full list of valid values.
    pub fn parse(value: &str) -> Result<Self, ModeError> {
        Mode::from_str(value.trim()).map_err(|_| ModeError {
            value: value.to_string(),
        })
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn resource(self) -> Resource {
        self.parts().0
    }

    pub fn verb(self) -> Verb {
        self.parts().1
    }

    fn parts(self) -> (Resource, Verb) {
        use Resource as R;
        use Verb as V;
        match self {
            Self::TaskUpdate => (R::Task, V::Update),
            Self::TaskRetrieve => (R::Task, V::Retrieve),
            Self::TaskDelete => (R::Task, V::Delete),
            Self::TaskCreate => (R::Task, V::Create),
            Self::TaskList => (R::Task, V::List),
            Self::TaskUnassign => (R::Task, V::Unassign),
            Self::TaskMoveWorkspace => (R::Task, V::MoveWorkspace),
            Self::RecurringTaskCreate => (R::RecurringTask, V::Create),
            Self::RecurringTaskList => (R::RecurringTask, V::List),
            Self::RecurringTaskDelete => (R::RecurringTask, V::Delete),
            Self::CommentsCreate => (R::Comments, V::Create),
            Self::CommentsList => (R::Comments, V::List),
            Self::ProjectsRetrieve => (R::Projects, V::Retrieve),
            Self::ProjectsList => (R::Projects, V::List),
            Self::ProjectsCreate => (R::Projects, V::Create),
            Self::WorkspacesListStatuses => (R::Workspaces, V::ListStatuses),
            Self::WorkspacesList => (R::Workspaces, V::List),
            Self::UsersList => (R::Users, V::List),
            Self::UsersGetMyUser => (R::Users, V::GetMyUser),
            Self::SchedulesGet => (R::Schedules, V::Get),
        }
    }

    /// Tool name shown to the agent (`task.create` -> `task_create`).
    pub fn title(self) -> String {
        mode_to_title(self.as_str())
    }

    /// Modes that address one existing task by `task_id`.
    pub fn requires_task_id(self) -> bool {
        matches!(
            self,
            Self::TaskUpdate
                | Self::TaskRetrieve
                | Self::TaskDelete
                | Self::TaskUnassign
                | Self::TaskMoveWorkspace
        )
    }
}

/// Every registered mode, in registry order.
pub fn all_modes() -> Vec<Mode> {
    Mode::iter().collect()
}

pub fn all_mode_names() -> Vec<&'static str> {
    Mode::iter().map(Mode::as_str).collect()
}

/// Modes belonging to one resource family.
pub fn modes_for(resource: Resource) -> Vec<Mode> {
    Mode::iter().filter(|m| m.resource() == resource).collect()
}

/// Split a mode string into its resource family and verb.
pub fn split_mode(value: &str) -> Result<(Resource, Verb), ModeError> {
    let mode = Mode::parse(value)?;
    Ok((mode.resource(), mode.verb()))
}

/// Replace the dots of a mode string with underscores.
pub fn mode_to_title(mode: &str) -> String {
    mode.replace('.', "_")
}

/// Display name for a resource/verb pair.
pub fn display_name(resource: Resource, verb: Verb) -> String {
    format!("{}_{}", resource.as_ref(), verb.as_ref())
}

/// Look a mode up by either its dotted form or its title.
pub fn find_mode(name: &str) -> Option<Mode> {
    let name = name.trim();
    Mode::iter().find(|m| m.as_str() == name || m.title() == name)
}
