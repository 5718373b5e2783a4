//! Rendered output of one refresh.
//!
//! `render` is pure: the same session and telemetry always yield the same
//! view. Widgets carry the event they emit when activated so front ends do
//! not need to know how a widget maps back to an interaction.

use crate::apply::shortcut_visible;
use crate::event::{Direction, Event};
use crate::labels::{self, MODES, SHORTCUT_STATES, STATES};
use crate::session::Session;
use crate::telemetry::{Telemetry, round2, serial_hex};
use serde::Serialize;
use tuner_traits::{AXIS_COUNT, Param};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberInput {
    pub label: &'static str,
    pub value: f32,
    pub min: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selector {
    pub label: &'static str,
    pub options: &'static [&'static str],
    /// `None` when the stored code has no label.
    pub selected: Option<usize>,
    pub selected_label: String,
}

impl Selector {
    fn new(label: &'static str, table: &labels::LabelTable, code: u8) -> Self {
        Self {
            label,
            options: table.labels(),
            selected: table.contains(code).then_some(usize::from(code)),
            selected_label: table.describe(code),
        }
    }
}

/// A momentary control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub label: String,
    #[serde(skip)]
    pub event: Event,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VelocityPanel {
    /// Last commanded velocity, read-only.
    pub input_vel: f32,
    pub magnitude: NumberInput,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisPanel {
    pub axis: usize,
    pub header: String,
    /// Lower-case hex error bitmask, present only when non-zero.
    pub error: Option<String>,
    pub settings: Vec<NumberInput>,
    pub mode: Selector,
    pub velocity: Option<VelocityPanel>,
    pub state: Selector,
    pub shortcuts: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sidebar {
    pub header: &'static str,
    pub serial_number: String,
    pub hardware_version: String,
    pub firmware_version: String,
    pub voltage: f64,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub axes: Vec<AxisPanel>,
    pub sidebar: Sidebar,
    /// Outcome of the last device action, if any.
    pub notice: Option<String>,
}

impl View {
    /// Every action currently on screen, in display order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.axes
            .iter()
            .flat_map(|p| {
                p.velocity
                    .iter()
                    .flat_map(|v| v.actions.iter())
                    .chain(p.shortcuts.iter())
            })
            .chain(self.sidebar.actions.iter())
    }
}

fn velocity_label(vel: f32) -> String {
    format!("Set input_vel = {vel:?}")
}

fn axis_panel(session: &Session, telemetry: &Telemetry, axis: usize) -> AxisPanel {
    let error_bits = telemetry.axis_errors[axis];
    let settings = Param::ALL
        .iter()
        .map(|&p| NumberInput {
            label: p.name(),
            value: session.param(axis, p),
            min: 0.0,
        })
        .collect();

    let velocity = (session.control_mode(axis) == labels::VELOCITY_CONTROL).then(|| {
        VelocityPanel {
            input_vel: session.input_vel(axis),
            magnitude: NumberInput {
                label: "new value",
                value: session.vel(),
                min: 0.0,
            },
            actions: Direction::ALL
                .iter()
                .map(|&direction| Action {
                    label: velocity_label(direction.apply(session.vel())),
                    event: Event::CommandVelocity { axis, direction },
                })
                .collect(),
        }
    });

    let shortcuts = SHORTCUT_STATES
        .iter()
        .filter(|&&state| shortcut_visible(session, axis, state))
        .map(|&state| Action {
            label: format!("Switch to \"{}\" state", STATES.describe(state)),
            event: Event::SwitchTo { axis, state },
        })
        .collect();

    AxisPanel {
        axis,
        header: format!("Axis {axis}"),
        error: (error_bits != 0).then(|| format!("{error_bits:#x}")),
        settings,
        mode: Selector::new("Mode", &MODES, session.control_mode(axis)),
        velocity,
        state: Selector::new("State", &STATES, session.axis_state(axis)),
        shortcuts,
    }
}

fn sidebar(telemetry: &Telemetry) -> Sidebar {
    let id = &telemetry.identity;
    let mut firmware_version = id.fw_version.to_string();
    if id.fw_version.unreleased {
        firmware_version.push_str(" (dev)");
    }
    Sidebar {
        header: "ODrive",
        serial_number: serial_hex(id.serial_number),
        hardware_version: id.hw_version.to_string(),
        firmware_version,
        voltage: round2(telemetry.vbus_voltage),
        actions: vec![
            Action {
                label: "Clear errors".to_string(),
                event: Event::ClearErrors,
            },
            Action {
                label: "Save configuration".to_string(),
                event: Event::SaveConfiguration,
            },
            Action {
                label: "Reboot".to_string(),
                event: Event::Reboot,
            },
        ],
    }
}

/// Build the view for `session` seeded widgets and current `telemetry`.
pub fn render(session: &Session, telemetry: &Telemetry) -> View {
    View {
        axes: (0..AXIS_COUNT)
            .map(|a| axis_panel(session, telemetry, a))
            .collect(),
        sidebar: sidebar(telemetry),
        notice: None,
    }
}
