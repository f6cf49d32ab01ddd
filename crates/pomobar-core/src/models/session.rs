use crate::Result;
use serde::{Deserialize, Serialize};

use super::{minutes_to_seconds, DisplayPayload};

/// 45 minutes
pub const DEFAULT_WORK_SECONDS: u64 = 2700;
/// 15 minutes
pub const DEFAULT_BREAK_SECONDS: u64 = 900;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Work,
    Break,
}

/// Which of the two configurable durations an input applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationKind {
    Work,
    Break,
}

/// Result of advancing the countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing is running; the tick was ignored.
    Idle,
    Counting { remaining: u64 },
    /// `remaining_seconds` just reached zero in `finished`.
    PhaseComplete { finished: Phase },
}

/// Plain countdown state. All transitions are synchronous; scheduling
/// lives in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub work_duration: u64,
    pub break_duration: u64,
    pub remaining_seconds: u64,
    pub running: bool,
    /// Bumped every time a phase countdown begins.
    pub generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Work,
            work_duration: DEFAULT_WORK_SECONDS,
            break_duration: DEFAULT_BREAK_SECONDS,
            remaining_seconds: 0,
            running: false,
            generation: 0,
        }
    }

    pub fn duration_for(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_duration,
            Phase::Break => self.break_duration,
        }
    }

    pub fn current_duration(&self) -> u64 {
        self.duration_for(self.phase)
    }

    /// Load the full duration of the current phase and mark the countdown
    /// as running. Returns the new generation.
    pub fn begin_phase(&mut self) -> u64 {
        self.remaining_seconds = self.current_duration();
        self.running = true;
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    pub fn halt(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);

        if self.remaining_seconds == 0 {
            TickOutcome::PhaseComplete {
                finished: self.phase,
            }
        } else {
            TickOutcome::Counting {
                remaining: self.remaining_seconds,
            }
        }
    }

    /// Switch to the other phase and return it.
    pub fn flip_phase(&mut self) -> Phase {
        self.phase = self.phase.next();
        self.phase
    }

    /// Apply a duration in minutes. Takes effect the next time that
    /// phase begins; the running countdown is left alone.
    pub fn set_duration(&mut self, kind: DurationKind, minutes: u64) -> Result<u64> {
        let seconds = minutes_to_seconds(minutes)?;
        match kind {
            DurationKind::Work => self.work_duration = seconds,
            DurationKind::Break => self.break_duration = seconds,
        }
        Ok(seconds)
    }

    pub fn restore_defaults(&mut self) {
        self.phase = Phase::Work;
        self.work_duration = DEFAULT_WORK_SECONDS;
        self.break_duration = DEFAULT_BREAK_SECONDS;
    }

    pub fn display(&self) -> DisplayPayload {
        DisplayPayload::new(self.remaining_seconds, self.current_duration(), self.phase)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl Phase {
    pub fn next(&self) -> Phase {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::Break => "Break",
        }
    }

    /// Message shown when this phase runs out.
    pub fn completion_message(&self) -> &'static str {
        match self {
            Phase::Work => "Time for a break!",
            Phase::Break => "Work interval starts now!",
        }
    }

    pub fn is_work(&self) -> bool {
        matches!(self, Phase::Work)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DurationKind {
    pub fn phase(&self) -> Phase {
        match self {
            DurationKind::Work => Phase::Work,
            DurationKind::Break => Phase::Break,
        }
    }

    pub fn label(&self) -> &'static str {
        self.phase().as_str()
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            DurationKind::Work => "Enter Work Duration in Minutes",
            DurationKind::Break => "Enter Break Duration in Minutes",
        }
    }
}
