//! Pomobar engine
//!
//! The session timer, its event stream and the seams to the host UI.

pub mod command;
pub mod config;
pub mod prompt;
pub mod surfaces;
pub mod timer;

pub use command::{Command, CommandOutcome};
pub use config::ConfigManager;
pub use prompt::{duration_prompt, DurationPrompt, DurationReply};
pub use surfaces::{DetailPanel, NotificationSink, StatusIndicator, Surfaces};
pub use timer::{Notice, SessionTimer, TimerEvent, TimerEventType};
