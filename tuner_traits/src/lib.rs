pub mod clock;

pub use clock::{Clock, MonotonicClock};

use std::fmt;

/// Number of independently controlled axes on the device.
pub const AXIS_COUNT: usize = 2;

/// Error type crossing the device boundary.
pub type DeviceError = Box<dyn std::error::Error + Send + Sync>;
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Tunable numeric controller settings of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    PosGain,
    VelGain,
    VelIntegratorGain,
    VelLimit,
}

impl Param {
    /// Display order of the settings block.
    pub const ALL: [Param; 4] = [
        Param::PosGain,
        Param::VelGain,
        Param::VelIntegratorGain,
        Param::VelLimit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Param::PosGain => "pos_gain",
            Param::VelGain => "vel_gain",
            Param::VelIntegratorGain => "vel_integrator_gain",
            Param::VelLimit => "vel_limit",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HwVersion {
    pub major: u8,
    pub minor: u8,
    pub variant: u8,
}

impl fmt::Display for HwVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.variant)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FwVersion {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
    /// Built from a development tree rather than a tagged release.
    pub unreleased: bool,
}

impl fmt::Display for FwVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

/// Static identity of a connected device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceIdentity {
    pub serial_number: u64,
    pub hw_version: HwVersion,
    pub fw_version: FwVersion,
}

/// Handle to a two-axis motor controller.
///
/// Axis arguments are `0..AXIS_COUNT`; implementations reject anything else.
/// State and mode values are the device's raw integer codes.
pub trait MotorController {
    fn axis_error(&mut self, axis: usize) -> DeviceResult<u32>;
    fn current_state(&mut self, axis: usize) -> DeviceResult<u8>;
    fn requested_state(&mut self, axis: usize) -> DeviceResult<u8>;
    fn set_requested_state(&mut self, axis: usize, state: u8) -> DeviceResult<()>;

    fn control_mode(&mut self, axis: usize) -> DeviceResult<u8>;
    fn set_control_mode(&mut self, axis: usize, mode: u8) -> DeviceResult<()>;
    fn param(&mut self, axis: usize, param: Param) -> DeviceResult<f32>;
    fn set_param(&mut self, axis: usize, param: Param, value: f32) -> DeviceResult<()>;
    fn input_vel(&mut self, axis: usize) -> DeviceResult<f32>;
    fn set_input_vel(&mut self, axis: usize, vel: f32) -> DeviceResult<()>;

    fn identity(&mut self) -> DeviceResult<DeviceIdentity>;
    fn vbus_voltage(&mut self) -> DeviceResult<f32>;

    /// Reset the error flags on every axis.
    fn clear_errors(&mut self) -> DeviceResult<()>;
    fn save_configuration(&mut self) -> DeviceResult<()>;
    fn reboot(&mut self) -> DeviceResult<()>;
}

impl<T: MotorController + ?Sized> MotorController for Box<T> {
    fn axis_error(&mut self, axis: usize) -> DeviceResult<u32> {
        (**self).axis_error(axis)
    }
    fn current_state(&mut self, axis: usize) -> DeviceResult<u8> {
        (**self).current_state(axis)
    }
    fn requested_state(&mut self, axis: usize) -> DeviceResult<u8> {
        (**self).requested_state(axis)
    }
    fn set_requested_state(&mut self, axis: usize, state: u8) -> DeviceResult<()> {
        (**self).set_requested_state(axis, state)
    }
    fn control_mode(&mut self, axis: usize) -> DeviceResult<u8> {
        (**self).control_mode(axis)
    }
    fn set_control_mode(&mut self, axis: usize, mode: u8) -> DeviceResult<()> {
        (**self).set_control_mode(axis, mode)
    }
    fn param(&mut self, axis: usize, param: Param) -> DeviceResult<f32> {
        (**self).param(axis, param)
    }
    fn set_param(&mut self, axis: usize, param: Param, value: f32) -> DeviceResult<()> {
        (**self).set_param(axis, param, value)
    }
    fn input_vel(&mut self, axis: usize) -> DeviceResult<f32> {
        (**self).input_vel(axis)
    }
    fn set_input_vel(&mut self, axis: usize, vel: f32) -> DeviceResult<()> {
        (**self).set_input_vel(axis, vel)
    }
    fn identity(&mut self) -> DeviceResult<DeviceIdentity> {
        (**self).identity()
    }
    fn vbus_voltage(&mut self) -> DeviceResult<f32> {
        (**self).vbus_voltage()
    }
    fn clear_errors(&mut self) -> DeviceResult<()> {
        (**self).clear_errors()
    }
    fn save_configuration(&mut self) -> DeviceResult<()> {
        (**self).save_configuration()
    }
    fn reboot(&mut self) -> DeviceResult<()> {
        (**self).reboot()
    }
}
