//! Timer events

use chrono::{DateTime, Utc};
use pomobar_core::models::{DisplayPayload, DurationKind, Phase};
use serde::{Deserialize, Serialize};

/// Event emitted by the session timer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerEvent {
    pub event_type: TimerEventType,
    /// Generation of the countdown that produced the event
    pub generation: u64,
    pub timestamp: DateTime<Utc>,
}

/// Types of timer events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEventType {
    /// New countdown value for the status line and the detail panel
    Display { payload: DisplayPayload },
    /// Display surfaces should be hidden
    Hidden,
    /// Human-readable notification
    Notice { notice: Notice },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    Started { phase: Phase },
    Restarted { phase: Phase },
    Stopped,
    Reset,
    PhaseCompleted { finished: Phase },
    DurationSet { kind: DurationKind, minutes: u64 },
    InvalidDuration { kind: DurationKind },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::Started { phase } => format!("Pomodoro {} interval started", phase),
            Notice::Restarted { phase } => format!("Pomodoro {} interval restarted", phase),
            Notice::Stopped => "Pomodoro Timer stopped".to_string(),
            Notice::Reset => "Pomodoro Timer reset and restarted".to_string(),
            Notice::PhaseCompleted { finished } => finished.completion_message().to_string(),
            Notice::DurationSet { kind, minutes } => {
                format!("{} Duration set to {} minutes", kind.label(), minutes)
            }
            Notice::InvalidDuration { .. } => {
                "Invalid input. Please enter a positive number.".to_string()
            }
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Notice::InvalidDuration { .. } => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl TimerEvent {
    /// Create a new timer event
    pub fn new(event_type: TimerEventType, generation: u64) -> Self {
        Self {
            event_type,
            generation,
            timestamp: Utc::now(),
        }
    }

    pub fn display(generation: u64, payload: DisplayPayload) -> Self {
        Self::new(TimerEventType::Display { payload }, generation)
    }

    pub fn hidden(generation: u64) -> Self {
        Self::new(TimerEventType::Hidden, generation)
    }

    pub fn notice(generation: u64, notice: Notice) -> Self {
        Self::new(TimerEventType::Notice { notice }, generation)
    }

    pub fn as_notice(&self) -> Option<&Notice> {
        match &self.event_type {
            TimerEventType::Notice { notice } => Some(notice),
            _ => None,
        }
    }

    pub fn as_display(&self) -> Option<&DisplayPayload> {
        match &self.event_type {
            TimerEventType::Display { payload } => Some(payload),
            _ => None,
        }
    }
}
