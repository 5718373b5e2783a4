//! Owns the device and the committed session; runs one refresh per event.

use crate::apply::apply;
use crate::error::Result;
use crate::event::{DeviceCommand, Event};
use crate::hw_error::check;
use crate::session::Session;
use crate::telemetry::Telemetry;
use crate::view::{View, render};
use tuner_traits::{AXIS_COUNT, MotorController};

pub struct Dashboard<D: MotorController> {
    device: D,
    session: Session,
}

impl<D: MotorController> Dashboard<D> {
    /// Dashboard with a fresh, uninitialized session.
    pub fn new(device: D) -> Self {
        Self::with_session(device, Session::new())
    }

    /// Resume an existing user session against `device`.
    pub fn with_session(device: D, session: Session) -> Self {
        Self { device, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_parts(self) -> (D, Session) {
        (self.device, self.session)
    }

    /// Run one refresh for `event`.
    ///
    /// The first refresh reads the device into the session; that step is
    /// committed on its own. The edited session is committed once its device
    /// writes have gone through, so session and device hold the same values
    /// even if reading telemetry afterwards fails. A rejected event or a
    /// failed write leaves the session as it was.
    pub fn handle(&mut self, event: &Event) -> Result<View> {
        if self.session.initialize(&mut self.device)? {
            tracing::info!("session initialized from device");
        }

        let (next, commands) = apply(&self.session, event)?;
        let mut notice = None;
        for cmd in &commands {
            if let Some(n) = self.execute(cmd)? {
                notice = Some(n);
            }
        }
        self.session = next;

        let telemetry = Telemetry::read(&mut self.device)?;
        let mut view = render(&self.session, &telemetry);
        view.notice = notice;
        Ok(view)
    }

    fn execute(&mut self, cmd: &DeviceCommand) -> Result<Option<String>> {
        let dev = &mut self.device;
        match *cmd {
            DeviceCommand::SetParam { axis, param, value } => {
                check(dev.set_param(axis, param, value))?;
                tracing::info!(axis, %param, value, "param written");
            }
            DeviceCommand::SetControlMode { axis, mode } => {
                check(dev.set_control_mode(axis, mode))?;
                tracing::info!(axis, mode, "control mode written");
            }
            DeviceCommand::SetInputVel { axis, vel } => {
                check(dev.set_input_vel(axis, vel))?;
                tracing::info!(axis, vel, "input_vel written");
            }
            DeviceCommand::SetRequestedState { axis, state } => {
                check(dev.set_requested_state(axis, state))?;
                tracing::info!(axis, state, "requested state written");
            }
            DeviceCommand::ClearErrors => return self.dump_errors().map(Some),
            DeviceCommand::SaveConfiguration => {
                check(dev.save_configuration())?;
                tracing::info!("configuration saved");
                return Ok(Some("Configuration saved".to_string()));
            }
            DeviceCommand::Reboot => {
                check(dev.reboot())?;
                tracing::warn!("device rebooted");
                return Ok(Some("Device rebooted".to_string()));
            }
        }
        Ok(None)
    }

    /// Report the latched error flags of every axis, then clear them.
    fn dump_errors(&mut self) -> Result<String> {
        let mut found = Vec::new();
        for axis in 0..AXIS_COUNT {
            let bits = check(self.device.axis_error(axis))?;
            if bits != 0 {
                tracing::warn!(axis, error = %format!("{bits:#x}"), "axis error");
                found.push(format!("axis{axis}: {bits:#x}"));
            }
        }
        check(self.device.clear_errors())?;
        tracing::info!(count = found.len(), "errors cleared");
        Ok(if found.is_empty() {
            "No errors".to_string()
        } else {
            format!("Cleared errors: {}", found.join(", "))
        })
    }
}
