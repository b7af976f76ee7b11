//! Command — one line of operator input, parsed.

use std::str::FromStr;

use crate::error::UnknownCommandError;

/// An operator command understood by the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Turn the LED on.
    LedOn,
    /// Turn the LED off.
    LedOff,
    /// Spin in place to the left.
    PivotLeft,
    /// Spin in place to the right.
    PivotRight,
    /// Drive both wheels forward.
    Forward,
    /// Drive both wheels backward.
    Backward,
}

impl Command {
    /// Every command, in keyword-table order.
    pub const ALL: [Self; 6] = [
        Self::LedOn,
        Self::LedOff,
        Self::PivotLeft,
        Self::PivotRight,
        Self::Forward,
        Self::Backward,
    ];

    /// The keyword the operator types for this command.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::LedOn => "on",
            Self::LedOff => "off",
            Self::PivotLeft => "l",
            Self::PivotRight => "r",
            Self::Forward => "f",
            Self::Backward => "b",
        }
    }
}

/// Parses a raw input line. Surrounding whitespace is ignored; keywords are
/// case-sensitive.
impl FromStr for Command {
    type Err = UnknownCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let trimmed = line.trim();
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.keyword() == trimmed)
            .ok_or_else(|| UnknownCommandError {
                input: line.to_string(),
            })
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}
