//! Test and helper mocks for tuner_core

use tuner_traits::{DeviceIdentity, DeviceResult, MotorController, Param};

/// A controller whose link is down: every call fails.
///
/// Useful for exercising the failure path of a refresh without hardware.
pub struct OfflineController;

fn offline<T>() -> DeviceResult<T> {
    Err(Box::new(std::io::Error::other("device disconnected")))
}

impl MotorController for OfflineController {
    fn axis_error(&mut self, _axis: usize) -> DeviceResult<u32> {
        offline()
    }
    fn current_state(&mut self, _axis: usize) -> DeviceResult<u8> {
        offline()
    }
    fn requested_state(&mut self, _axis: usize) -> DeviceResult<u8> {
        offline()
    }
    fn set_requested_state(&mut self, _axis: usize, _state: u8) -> DeviceResult<()> {
        offline()
    }
    fn control_mode(&mut self, _axis: usize) -> DeviceResult<u8> {
        offline()
    }
    fn set_control_mode(&mut self, _axis: usize, _mode: u8) -> DeviceResult<()> {
        offline()
    }
    fn param(&mut self, _axis: usize, _param: Param) -> DeviceResult<f32> {
        offline()
    }
    fn set_param(&mut self, _axis: usize, _param: Param, _value: f32) -> DeviceResult<()> {
        offline()
    }
    fn input_vel(&mut self, _axis: usize) -> DeviceResult<f32> {
        offline()
    }
    fn set_input_vel(&mut self, _axis: usize, _vel: f32) -> DeviceResult<()> {
        offline()
    }
    fn identity(&mut self) -> DeviceResult<DeviceIdentity> {
        offline()
    }
    fn vbus_voltage(&mut self) -> DeviceResult<f32> {
        offline()
    }
    fn clear_errors(&mut self) -> DeviceResult<()> {
        offline()
    }
    fn save_configuration(&mut self) -> DeviceResult<()> {
        offline()
    }
    fn reboot(&mut self) -> DeviceResult<()> {
        offline()
    }
}
