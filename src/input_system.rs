use std::io::{self, BufRead};
use std::str::FromStr;
use tracing::warn;

/// Actions the player can trigger from the console
///
/// This enum decouples reading input from executing it. The frame loop
/// takes at most one action per frame, so a save and a load never run in
/// the same frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    // === Persistence ===
    SaveGame,
    LoadGame,
    NewGame,

    // === Simulation ===
    AdvanceDay,
    /// Seconds of simulated time
    Tick(f32),

    // === System ===
    Status,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseActionError {
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("Invalid duration '{0}', expected seconds")]
    InvalidDuration(String),
}

impl FromStr for ControlAction {
    type Err = ParseActionError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default().to_lowercase();

        match command.as_str() {
            "save" | "f5" => Ok(ControlAction::SaveGame),
            "load" | "f9" => Ok(ControlAction::LoadGame),
            "new" => Ok(ControlAction::NewGame),
            "day" => Ok(ControlAction::AdvanceDay),
            "tick" => {
                let Some(arg) = words.next() else {
                    return Ok(ControlAction::Tick(1.0));
                };
                match arg.parse::<f32>() {
                    Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(ControlAction::Tick(secs)),
                    _ => Err(ParseActionError::InvalidDuration(arg.to_string())),
                }
            }
            "status" => Ok(ControlAction::Status),
            "quit" | "exit" => Ok(ControlAction::Quit),
            _ => Err(ParseActionError::UnknownCommand(line.trim().to_string())),
        }
    }
}

/// Console help shown at startup
pub const CONTROLS: &[(&str, &str)] = &[
    ("save | f5", "save the game"),
    ("load | f9", "load the last save"),
    ("new", "start fresh (save file untouched)"),
    ("day", "advance the farm by one day"),
    ("tick <secs>", "advance timers"),
    ("status", "print world state"),
    ("quit", "exit"),
];

/// InputSystem reads console lines and produces ControlActions
///
/// Blank lines are ignored and unparsable ones are reported and skipped,
/// so `next_action` only returns once it has a real action or input ends.
pub struct InputSystem<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> InputSystem<R> {
    pub fn new(reader: R) -> Self {
        InputSystem {
            reader,
            line: String::new(),
        }
    }

    /// Blocks for the next action; `None` at end of input
    pub fn next_action(&mut self) -> io::Result<Option<ControlAction>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            if self.line.trim().is_empty() {
                continue;
            }
            match self.line.parse::<ControlAction>() {
                Ok(action) => return Ok(Some(action)),
                Err(e) => warn!("{e}"),
            }
        }
    }
}
