//! Code-to-label tables for axis states and control modes.
//!
//! A device code is the index of its label. Tables are fixed for the life of
//! the process.

/// Ordered, fixed label table.
#[derive(Debug, Clone, Copy)]
pub struct LabelTable {
    labels: &'static [&'static str],
}

impl LabelTable {
    pub const fn new(labels: &'static [&'static str]) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, code: u8) -> bool {
        usize::from(code) < self.labels.len()
    }

    pub fn label(&self, code: u8) -> Option<&'static str> {
        self.labels.get(usize::from(code)).copied()
    }

    /// Inverse of `label`.
    pub fn index_of(&self, label: &str) -> Option<u8> {
        self.labels
            .iter()
            .position(|l| *l == label)
            .and_then(|i| u8::try_from(i).ok())
    }

    /// Label for display; codes outside the table show as `unknown (N)`.
    pub fn describe(&self, code: u8) -> String {
        match self.label(code) {
            Some(l) => l.to_string(),
            None => format!("unknown ({code})"),
        }
    }
}

pub static STATES: LabelTable = LabelTable::new(&[
    "undefined",
    "idle",
    "startup sequence",
    "full calibration sequence",
    "motor calibration",
    "sensorless control",
    "encoder index search",
    "encoder offset calibration",
    "closed loop control",
    "lockin spin",
    "encoder dir find",
    "homing",
]);

pub static MODES: LabelTable = LabelTable::new(&[
    "voltage control",
    "torque control",
    "velocity control",
    "position control",
]);

pub const UNDEFINED: u8 = 0;
pub const IDLE: u8 = 1;
pub const CLOSED_LOOP_CONTROL: u8 = 8;
pub const VELOCITY_CONTROL: u8 = 2;

/// States offered as one-click shortcuts, in display order.
pub const SHORTCUT_STATES: [u8; 2] = [IDLE, CLOSED_LOOP_CONTROL];
