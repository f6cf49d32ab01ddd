pub mod config;
pub mod display;
pub mod duration;
pub mod session;

pub use config::{validate_log_level, Config, NotificationConfig};
pub use display::{format_clock, status_text, DisplayPayload};
pub use duration::{minutes_to_seconds, parse_minutes};
pub use session::{
    DurationKind, Phase, SessionState, TickOutcome, DEFAULT_BREAK_SECONDS, DEFAULT_WORK_SECONDS,
};
