pub mod engine;
pub mod events;

pub use engine::SessionTimer;
pub use events::{Notice, Severity, TimerEvent, TimerEventType};
