//! Motion calendar and task tools for LLM agents.
//!
//! The [`toolkit::MotionToolkit`] exposes one tool per [`modes::Mode`].
//! A tool call validates its arguments into an [`input::MotionInput`],
//! the [`api::MotionApi`] sends it to Motion, and the answer comes back as
//! a string.

pub mod api;
pub mod args;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod modes;
pub mod toolkit;
pub mod tools;

pub use api::MotionApi;
pub use config::MotionConfig;
pub use error::{MotionError, ValidationError};
pub use input::MotionInput;
pub use modes::Mode;
pub use toolkit::MotionToolkit;
