//! Per-user session state that survives across refreshes.

use crate::error::Result;
use crate::hw_error::check;
use tuner_traits::{AXIS_COUNT, MotorController, Param};

/// Remembered widget values, one slot per axis.
///
/// A fresh session is uninitialized; `initialize` fills it from the device
/// once and never again. Axis arguments must be `< AXIS_COUNT`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    is_initialized: bool,
    axis_states: [u8; AXIS_COUNT],
    control_modes: [u8; AXIS_COUNT],
    input_vels: [f32; AXIS_COUNT],
    pos_gains: [f32; AXIS_COUNT],
    vel_gains: [f32; AXIS_COUNT],
    vel_integrator_gains: [f32; AXIS_COUNT],
    vel_limits: [f32; AXIS_COUNT],
    vel: f32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the device into an initialized session.
    pub fn from_device<D: MotorController + ?Sized>(device: &mut D) -> Result<Self> {
        let mut s = Self::new();
        for a in 0..AXIS_COUNT {
            s.axis_states[a] = check(device.current_state(a))?;
            s.control_modes[a] = check(device.control_mode(a))?;
            s.input_vels[a] = check(device.input_vel(a))?;
            for p in Param::ALL {
                *s.slot_mut(a, p) = check(device.param(a, p))?;
            }
        }
        s.vel = s.input_vels.iter().fold(0.0_f32, |m, v| m.max(v.abs()));
        s.is_initialized = true;
        Ok(s)
    }

    /// Fill from the device unless already initialized.
    ///
    /// Returns whether the device was read. On error the session is left
    /// untouched and still uninitialized.
    pub fn initialize<D: MotorController + ?Sized>(&mut self, device: &mut D) -> Result<bool> {
        if self.is_initialized {
            return Ok(false);
        }
        *self = Self::from_device(device)?;
        Ok(true)
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }

    pub fn axis_state(&self, axis: usize) -> u8 {
        self.axis_states[axis]
    }

    pub fn control_mode(&self, axis: usize) -> u8 {
        self.control_modes[axis]
    }

    pub fn input_vel(&self, axis: usize) -> f32 {
        self.input_vels[axis]
    }

    pub fn param(&self, axis: usize, param: Param) -> f32 {
        match param {
            Param::PosGain => self.pos_gains[axis],
            Param::VelGain => self.vel_gains[axis],
            Param::VelIntegratorGain => self.vel_integrator_gains[axis],
            Param::VelLimit => self.vel_limits[axis],
        }
    }

    /// Velocity magnitude shared by both axes' velocity actions.
    pub fn vel(&self) -> f32 {
        self.vel
    }

    pub(crate) fn set_axis_state(&mut self, axis: usize, state: u8) {
        self.axis_states[axis] = state;
    }

    pub(crate) fn set_control_mode(&mut self, axis: usize, mode: u8) {
        self.control_modes[axis] = mode;
    }

    pub(crate) fn set_input_vel(&mut self, axis: usize, vel: f32) {
        self.input_vels[axis] = vel;
    }

    pub(crate) fn set_param(&mut self, axis: usize, param: Param, value: f32) {
        *self.slot_mut(axis, param) = value;
    }

    pub(crate) fn set_vel(&mut self, vel: f32) {
        self.vel = vel;
    }

    fn slot_mut(&mut self, axis: usize, param: Param) -> &mut f32 {
        match param {
            Param::PosGain => &mut self.pos_gains[axis],
            Param::VelGain => &mut self.vel_gains[axis],
            Param::VelIntegratorGain => &mut self.vel_integrator_gains[axis],
            Param::VelLimit => &mut self.vel_limits[axis],
        }
    }
}
