pub mod error;

use error::{HwError, Result};
use tuner_traits::{
    AXIS_COUNT, DeviceIdentity, DeviceResult, FwVersion, HwVersion, MotorController, Param,
};

/// Raw axis state codes understood by the simulated firmware.
pub mod codes {
    pub const UNDEFINED: u8 = 0;
    pub const IDLE: u8 = 1;
    pub const STARTUP_SEQUENCE: u8 = 2;
    pub const FULL_CALIBRATION_SEQUENCE: u8 = 3;
    pub const MOTOR_CALIBRATION: u8 = 4;
    pub const SENSORLESS_CONTROL: u8 = 5;
    pub const ENCODER_INDEX_SEARCH: u8 = 6;
    pub const ENCODER_OFFSET_CALIBRATION: u8 = 7;
    pub const CLOSED_LOOP_CONTROL: u8 = 8;
    pub const LOCKIN_SPIN: u8 = 9;
    pub const ENCODER_DIR_FIND: u8 = 10;
    pub const HOMING: u8 = 11;

    pub const STATE_COUNT: u8 = 12;
    pub const MODE_COUNT: u8 = 4;

    pub const VELOCITY_CONTROL: u8 = 2;
    pub const POSITION_CONTROL: u8 = 3;
}

/// Initial values for a simulated device.
#[derive(Debug, Clone, PartialEq)]
pub struct SimSettings {
    pub serial_number: u64,
    pub hw_version: HwVersion,
    pub fw_version: FwVersion,
    pub vbus_voltage: f32,
    pub pos_gain: f32,
    pub vel_gain: f32,
    pub vel_integrator_gain: f32,
    pub vel_limit: f32,
    pub control_mode: u8,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            serial_number: 0x2063_3593_4D4B,
            hw_version: HwVersion {
                major: 3,
                minor: 6,
                variant: 56,
            },
            fw_version: FwVersion {
                major: 0,
                minor: 5,
                revision: 1,
                unreleased: false,
            },
            vbus_voltage: 24.0,
            pos_gain: 20.0,
            vel_gain: 0.16,
            vel_integrator_gain: 0.32,
            vel_limit: 2.0,
            control_mode: codes::POSITION_CONTROL,
        }
    }
}

/// Persistent part of an axis configuration (what `save_configuration` stores).
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisConfig {
    control_mode: u8,
    params: [f32; 4],
}

#[derive(Debug, Clone, Copy)]
struct SimAxis {
    error: u32,
    current_state: u8,
    requested_state: u8,
    input_vel: f32,
    config: AxisConfig,
}

fn param_slot(param: Param) -> usize {
    match param {
        Param::PosGain => 0,
        Param::VelGain => 1,
        Param::VelIntegratorGain => 2,
        Param::VelLimit => 3,
    }
}

/// In-memory two-axis controller.
///
/// Requested states settle immediately: calibration and startup sequences
/// run to completion and fall back to idle, while an axis carrying an error
/// refuses anything but idle.
pub struct SimulatedController {
    identity: DeviceIdentity,
    vbus_voltage: f32,
    axes: [SimAxis; AXIS_COUNT],
    saved: [AxisConfig; AXIS_COUNT],
    connected: bool,
    stalled: bool,
    saves: u32,
    reboots: u32,
}

impl Default for SimulatedController {
    fn default() -> Self {
        Self::new(SimSettings::default())
    }
}

impl SimulatedController {
    pub fn new(settings: SimSettings) -> Self {
        let config = AxisConfig {
            control_mode: settings.control_mode,
            params: [
                settings.pos_gain,
                settings.vel_gain,
                settings.vel_integrator_gain,
                settings.vel_limit,
            ],
        };
        let axis = SimAxis {
            error: 0,
            current_state: codes::IDLE,
            requested_state: codes::IDLE,
            input_vel: 0.0,
            config,
        };
        tracing::debug!(serial = settings.serial_number, "simulated controller created");
        Self {
            identity: DeviceIdentity {
                serial_number: settings.serial_number,
                hw_version: settings.hw_version,
                fw_version: settings.fw_version,
            },
            vbus_voltage: settings.vbus_voltage,
            axes: [axis; AXIS_COUNT],
            saved: [config; AXIS_COUNT],
            connected: true,
            stalled: false,
            saves: 0,
            reboots: 0,
        }
    }

    /// Latch error bits on an axis, as a fault in the drive would.
    pub fn inject_error(&mut self, axis: usize, bits: u32) -> Result<()> {
        let ax = self.axis_mut(axis)?;
        ax.error |= bits;
        if ax.current_state != codes::IDLE {
            ax.current_state = codes::IDLE;
        }
        Ok(())
    }

    /// Put the axis straight into `state`, bypassing the request path.
    pub fn force_current_state(&mut self, axis: usize, state: u8) -> Result<()> {
        let ax = self.axis_mut(axis)?;
        ax.current_state = state;
        ax.requested_state = state;
        Ok(())
    }

    /// Drop the link; every later call fails with `HwError::Disconnected`.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Stop answering; every later call fails with `HwError::Timeout` until
    /// `resume` is called.
    pub fn stall(&mut self) {
        self.stalled = true;
    }

    pub fn resume(&mut self) {
        self.stalled = false;
    }

    pub fn set_vbus_voltage(&mut self, volts: f32) {
        self.vbus_voltage = volts;
    }

    pub fn save_count(&self) -> u32 {
        self.saves
    }

    pub fn reboot_count(&self) -> u32 {
        self.reboots
    }

    fn link(&self) -> Result<()> {
        if !self.connected {
            Err(HwError::Disconnected)
        } else if self.stalled {
            Err(HwError::Timeout)
        } else {
            Ok(())
        }
    }

    fn axis(&self, axis: usize) -> Result<&SimAxis> {
        self.link()?;
        self.axes.get(axis).ok_or(HwError::UnknownAxis(axis))
    }

    fn axis_mut(&mut self, axis: usize) -> Result<&mut SimAxis> {
        self.link()?;
        self.axes.get_mut(axis).ok_or(HwError::UnknownAxis(axis))
    }

    fn settle(ax: &mut SimAxis, requested: u8) {
        ax.requested_state = requested;
        ax.current_state = match requested {
            codes::UNDEFINED => ax.current_state,
            _ if ax.error != 0 => codes::IDLE,
            codes::IDLE
            | codes::SENSORLESS_CONTROL
            | codes::CLOSED_LOOP_CONTROL
            | codes::LOCKIN_SPIN => requested,
            // Sequences and calibrations complete instantly.
            _ => codes::IDLE,
        };
    }
}

impl MotorController for SimulatedController {
    fn axis_error(&mut self, axis: usize) -> DeviceResult<u32> {
        Ok(self.axis(axis)?.error)
    }

    fn current_state(&mut self, axis: usize) -> DeviceResult<u8> {
        Ok(self.axis(axis)?.current_state)
    }

    fn requested_state(&mut self, axis: usize) -> DeviceResult<u8> {
        Ok(self.axis(axis)?.requested_state)
    }

    fn set_requested_state(&mut self, axis: usize, state: u8) -> DeviceResult<()> {
        if state >= codes::STATE_COUNT {
            return Err(HwError::InvalidCode {
                what: "axis state",
                code: state,
            }
            .into());
        }
        let ax = self.axis_mut(axis)?;
        Self::settle(ax, state);
        tracing::trace!(axis, requested = state, current = ax.current_state, "sim state");
        Ok(())
    }

    fn control_mode(&mut self, axis: usize) -> DeviceResult<u8> {
        Ok(self.axis(axis)?.config.control_mode)
    }

    fn set_control_mode(&mut self, axis: usize, mode: u8) -> DeviceResult<()> {
        if mode >= codes::MODE_COUNT {
            return Err(HwError::InvalidCode {
                what: "control mode",
                code: mode,
            }
            .into());
        }
        self.axis_mut(axis)?.config.control_mode = mode;
        Ok(())
    }

    fn param(&mut self, axis: usize, param: Param) -> DeviceResult<f32> {
        Ok(self.axis(axis)?.config.params[param_slot(param)])
    }

    fn set_param(&mut self, axis: usize, param: Param, value: f32) -> DeviceResult<()> {
        self.axis_mut(axis)?.config.params[param_slot(param)] = value;
        Ok(())
    }

    fn input_vel(&mut self, axis: usize) -> DeviceResult<f32> {
        Ok(self.axis(axis)?.input_vel)
    }

    fn set_input_vel(&mut self, axis: usize, vel: f32) -> DeviceResult<()> {
        self.axis_mut(axis)?.input_vel = vel;
        Ok(())
    }

    fn identity(&mut self) -> DeviceResult<DeviceIdentity> {
        self.link()?;
        Ok(self.identity)
    }

    fn vbus_voltage(&mut self) -> DeviceResult<f32> {
        self.link()?;
        Ok(self.vbus_voltage)
    }

    fn clear_errors(&mut self) -> DeviceResult<()> {
        self.link()?;
        for ax in &mut self.axes {
            ax.error = 0;
        }
        Ok(())
    }

    fn save_configuration(&mut self) -> DeviceResult<()> {
        self.link()?;
        if let Some(axis) = self
            .axes
            .iter()
            .position(|ax| ax.current_state != codes::IDLE)
        {
            return Err(HwError::NotIdle(axis).into());
        }
        for (slot, ax) in self.saved.iter_mut().zip(self.axes.iter()) {
            *slot = ax.config;
        }
        self.saves += 1;
        tracing::debug!(saves = self.saves, "sim configuration saved");
        Ok(())
    }

    fn reboot(&mut self) -> DeviceResult<()> {
        self.link()?;
        for (ax, saved) in self.axes.iter_mut().zip(self.saved.iter()) {
            *ax = SimAxis {
                error: 0,
                current_state: codes::IDLE,
                requested_state: codes::IDLE,
                input_vel: 0.0,
                config: *saved,
            };
        }
        self.reboots += 1;
        tracing::debug!(reboots = self.reboots, "sim rebooted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_idle_position_control() {
        let mut dev = SimulatedController::default();
        for axis in 0..AXIS_COUNT {
            assert_eq!(dev.current_state(axis).unwrap(), codes::IDLE);
            assert_eq!(dev.control_mode(axis).unwrap(), codes::POSITION_CONTROL);
            assert_eq!(dev.param(axis, Param::PosGain).unwrap(), 20.0);
        }
    }

    #[test]
    fn unknown_axis_is_rejected() {
        let mut dev = SimulatedController::default();
        let err = dev.axis_error(2).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HwError>(),
            Some(HwError::UnknownAxis(2))
        ));
    }
}
