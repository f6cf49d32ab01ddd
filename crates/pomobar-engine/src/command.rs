//! Named host commands

use std::fmt;

use pomobar_core::models::DurationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Start,
    Stop,
    Reset,
    SetWorkDuration,
    SetBreakDuration,
    ShowPanel,
}

/// What the host still has to do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Done,
    /// Ask the user for a number of minutes, then answer the prompt.
    NeedsDuration(DurationKind),
    /// Create the detail panel and attach it.
    NeedsPanel,
}

impl Command {
    pub const ALL: [Self; 6] = [
        Self::Start,
        Self::Stop,
        Self::Reset,
        Self::SetWorkDuration,
        Self::SetBreakDuration,
        Self::ShowPanel,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Command::Start => "pomobar.start",
            Command::Stop => "pomobar.stop",
            Command::Reset => "pomobar.reset",
            Command::SetWorkDuration => "pomobar.setWorkDuration",
            Command::SetBreakDuration => "pomobar.setBreakDuration",
            Command::ShowPanel => "pomobar.showPanel",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Command::Start => "Start",
            Command::Stop => "Stop",
            Command::Reset => "Reset",
            Command::SetWorkDuration => "Set Work Duration",
            Command::SetBreakDuration => "Set Break Duration",
            Command::ShowPanel => "Show Panel",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
