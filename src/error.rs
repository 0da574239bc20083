//! Error types shared across the toolkit.
//!
//! Nothing in here crosses the agent boundary: the tool adapter renders
//! every [`MotionError`] into a plain string before returning.

use crate::modes::Mode;

/// A mode string that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("mode: '{value}' is not one of enum values: [{}]", crate::modes::all_mode_names().join(", "))]
pub struct ModeError {
    pub value: String,
}

/// A date-like field that the lenient parser could not make sense of.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid datetime as string: '{raw}'")]
pub struct DateParseError {
    pub raw: String,
}

/// One violated input rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path into the payload, e.g. `task_post -> workspaceId`.
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every rule a payload broke, reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub mode: Option<Mode>,
    pub violations: Vec<Violation>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.violations.len();
        let plural = if count == 1 { "" } else { "s" };
        match self.mode {
            Some(mode) => write!(f, "{count} validation error{plural} for mode {mode}")?,
            None => write!(f, "{count} validation error{plural}")?,
        }
        for violation in &self.violations {
            write!(f, "\n  {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("MOTION_API_KEY is not set; export it or pass --api-key")]
    MissingApiKey,
    #[error("invalid Motion instance URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error("http.timeout_secs must be at least 1")]
    ZeroTimeout,
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Anything that can go wrong while running a mode.
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("mode {0} is not yet implemented for this tool")]
    NotImplemented(Mode),
    #[error("not found: {path}")]
    NotFound { path: String },
    #[error("Motion API returned {status} for {method} {path}: {body}")]
    Api {
        status: u16,
        method: String,
        path: String,
        body: String,
    },
    #[error("request to Motion failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected response from Motion: {0}")]
    Decode(String),
}

impl MotionError {
    /// True for failures that happened before any request left the process.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Mode(_) | Self::Validation(_) | Self::NotImplemented(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MotionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_violation() {
        let err = ValidationError {
            mode: Some(Mode::TaskCreate),
            violations: vec![
                Violation::new("task_post -> workspaceId", "field required"),
                Violation::new("task_post -> name", "field required"),
            ],
        };
        let text = err.to_string();
        assert!(text.starts_with("2 validation errors for mode task.create"));
        assert!(text.contains("task_post -> workspaceId: field required"));
        assert!(text.contains("task_post -> name: field required"));
    }

    #[test]
    fn test_mode_error_names_all_modes() {
        let err = ModeError {
            value: "task.explode".into(),
        };
        let text = err.to_string();
        assert!(text.contains("'task.explode' is not one of enum values"));
        assert!(text.contains("task.create"));
        assert!(text.contains("schedules.get"));
    }

    #[test]
    fn test_local_errors_are_flagged() {
        assert!(MotionError::NotImplemented(Mode::UsersList).is_local());
        assert!(
            !MotionError::NotFound {
                path: "/tasks/x".into()
            }
            .is_local()
        );
    }
}
