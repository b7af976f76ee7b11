//! Robot state — the LED and wheel-drive values mirrored to the robot.
//!
//! The robot exposes its live control state as a single 3-byte GATT
//! characteristic value:
//!
//! | Byte | Type | Field |
//! |------|------|-------|
//! | 0 | u8 (0 or 1) | LED on |
//! | 1 | i8 | Left wheel drive |
//! | 2 | i8 | Right wheel drive |
//!
//! A positive drive value turns the wheel forward, a negative one backward.

use crate::command::Command;

/// Drive magnitude applied by the movement commands.
pub const SPEED: i8 = 50;

/// Size of the characteristic value, in bytes.
pub const PAYLOAD_LEN: usize = 3;

/// In-memory copy of the robot's control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RobotState {
    /// Whether the LED should be lit.
    pub led_on: bool,
    /// Left wheel drive, within `-SPEED..=SPEED`.
    pub left_drive: i8,
    /// Right wheel drive, within `-SPEED..=SPEED`.
    pub right_drive: i8,
}

impl RobotState {
    /// Decode a characteristic value read from the robot.
    ///
    /// Missing bytes fall back to the safe default (LED off, wheel stopped),
    /// so an empty or short read yields a usable state. Bytes past the third
    /// are ignored and drive values are clamped to `-SPEED..=SPEED`.
    #[must_use]
    pub fn from_payload(data: &[u8]) -> Self {
        let drive = |index: usize| {
            data.get(index)
                .map_or(0, |byte| i8::from_ne_bytes([*byte]))
                .clamp(-SPEED, SPEED)
        };

        Self {
            led_on: data.first().is_some_and(|byte| *byte > 0),
            left_drive: drive(1),
            right_drive: drive(2),
        }
    }

    /// Encode the full state as the 3-byte characteristic value.
    #[must_use]
    pub fn to_payload(self) -> [u8; PAYLOAD_LEN] {
        [
            u8::from(self.led_on),
            self.left_drive.to_ne_bytes()[0],
            self.right_drive.to_ne_bytes()[0],
        ]
    }

    /// Apply a command, returning the resulting state.
    ///
    /// LED commands leave the drives untouched; movement commands overwrite
    /// both drives and leave the LED untouched.
    #[must_use]
    pub fn apply(self, command: Command) -> Self {
        match command {
            Command::LedOn => Self {
                led_on: true,
                ..self
            },
            Command::LedOff => Self {
                led_on: false,
                ..self
            },
            Command::PivotLeft => self.with_drives(SPEED, -SPEED),
            Command::PivotRight => self.with_drives(-SPEED, SPEED),
            Command::Forward => self.with_drives(SPEED, SPEED),
            Command::Backward => self.with_drives(-SPEED, -SPEED),
        }
    }

    fn with_drives(self, left_drive: i8, right_drive: i8) -> Self {
        Self {
            left_drive,
            right_drive,
            ..self
        }
    }
}

impl std::fmt::Display for RobotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}, {}]",
            self.led_on, self.left_drive, self.right_drive
        )
    }
}
