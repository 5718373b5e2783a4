//! The pure half of a refresh: validate an event against the session and
//! compute the next session plus the device writes it implies.

use crate::error::{Result, TunerError};
use crate::event::{DeviceCommand, Event};
use crate::labels::{self, MODES, SHORTCUT_STATES, STATES};
use crate::session::Session;
use tuner_traits::AXIS_COUNT;

fn invalid(msg: String) -> eyre::Report {
    eyre::Report::new(TunerError::InvalidInput(msg))
}

fn unavailable(msg: String) -> eyre::Report {
    eyre::Report::new(TunerError::Unavailable(msg))
}

fn check_axis(axis: usize) -> Result<()> {
    if axis >= AXIS_COUNT {
        return Err(eyre::Report::new(TunerError::UnknownAxis(axis)));
    }
    Ok(())
}

/// Numeric inputs accept finite values >= 0.
fn check_non_negative(what: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(format!("{what} must be a finite value >= 0, got {value}")));
    }
    Ok(())
}

/// Apply `event` to `session`.
///
/// Edits take effect immediately: every accepted change to a field is
/// mirrored by a `DeviceCommand` writing the same value to the device.
pub fn apply(session: &Session, event: &Event) -> Result<(Session, Vec<DeviceCommand>)> {
    if !session.is_initialized() {
        return Err(unavailable("session is not initialized".to_string()));
    }
    let mut next = session.clone();
    let mut writes = Vec::new();

    match *event {
        Event::Refresh => {}
        Event::SetParam { axis, param, value } => {
            check_axis(axis)?;
            check_non_negative(param.name(), value)?;
            next.set_param(axis, param, value);
            writes.push(DeviceCommand::SetParam { axis, param, value });
        }
        Event::SelectMode { axis, mode } => {
            check_axis(axis)?;
            if !MODES.contains(mode) {
                return Err(invalid(format!("unknown control mode {mode}")));
            }
            next.set_control_mode(axis, mode);
            writes.push(DeviceCommand::SetControlMode { axis, mode });
        }
        Event::SetMagnitude(value) => {
            check_non_negative("velocity magnitude", value)?;
            if !(0..AXIS_COUNT).any(|a| session.control_mode(a) == labels::VELOCITY_CONTROL) {
                return Err(unavailable(
                    "velocity magnitude needs an axis in velocity control".to_string(),
                ));
            }
            next.set_vel(value);
        }
        Event::CommandVelocity { axis, direction } => {
            check_axis(axis)?;
            if session.control_mode(axis) != labels::VELOCITY_CONTROL {
                return Err(unavailable(format!(
                    "velocity actions need axis {axis} in velocity control, it is in {}",
                    MODES.describe(session.control_mode(axis))
                )));
            }
            let vel = direction.apply(session.vel());
            next.set_input_vel(axis, vel);
            writes.push(DeviceCommand::SetInputVel { axis, vel });
        }
        Event::SelectState { axis, state } => {
            check_axis(axis)?;
            if !STATES.contains(state) {
                return Err(invalid(format!("unknown axis state {state}")));
            }
            next.set_axis_state(axis, state);
            writes.push(DeviceCommand::SetRequestedState { axis, state });
        }
        Event::SwitchTo { axis, state } => {
            check_axis(axis)?;
            if !SHORTCUT_STATES.contains(&state) {
                return Err(invalid(format!(
                    "no shortcut for state {}",
                    STATES.describe(state)
                )));
            }
            if !shortcut_visible(session, axis, state) {
                return Err(unavailable(format!(
                    "axis {axis} is already in {}",
                    STATES.describe(state)
                )));
            }
            next.set_axis_state(axis, state);
            writes.push(DeviceCommand::SetRequestedState { axis, state });
        }
        Event::ClearErrors => writes.push(DeviceCommand::ClearErrors),
        Event::SaveConfiguration => writes.push(DeviceCommand::SaveConfiguration),
        Event::Reboot => writes.push(DeviceCommand::Reboot),
    }

    Ok((next, writes))
}

/// A shortcut is offered only while the axis' selection differs from it.
pub fn shortcut_visible(session: &Session, axis: usize, state: u8) -> bool {
    session.axis_state(axis) != state
}
