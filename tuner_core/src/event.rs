//! Interaction events and the device writes they turn into.

use tuner_traits::Param;

/// Sign applied to the velocity magnitude by the three velocity actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Negative,
    Zero,
    Positive,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::Negative, Direction::Zero, Direction::Positive];

    pub fn apply(self, magnitude: f32) -> f32 {
        match self {
            Direction::Negative => -magnitude,
            Direction::Zero => 0.0,
            Direction::Positive => magnitude,
        }
    }
}

/// One operator interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Re-render without changing anything.
    Refresh,
    SetParam {
        axis: usize,
        param: Param,
        value: f32,
    },
    SelectMode {
        axis: usize,
        mode: u8,
    },
    /// Edit the velocity magnitude used by the velocity actions.
    SetMagnitude(f32),
    CommandVelocity {
        axis: usize,
        direction: Direction,
    },
    SelectState {
        axis: usize,
        state: u8,
    },
    /// One-click shortcut to a state from `labels::SHORTCUT_STATES`.
    SwitchTo {
        axis: usize,
        state: u8,
    },
    ClearErrors,
    SaveConfiguration,
    Reboot,
}

/// A single write against the live device.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    SetParam {
        axis: usize,
        param: Param,
        value: f32,
    },
    SetControlMode {
        axis: usize,
        mode: u8,
    },
    SetInputVel {
        axis: usize,
        vel: f32,
    },
    SetRequestedState {
        axis: usize,
        state: u8,
    },
    ClearErrors,
    SaveConfiguration,
    Reboot,
}
