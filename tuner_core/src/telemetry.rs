//! Read-only device readings gathered on every refresh.

use crate::error::Result;
use crate::hw_error::check;
use tuner_traits::{AXIS_COUNT, DeviceIdentity, MotorController};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub axis_errors: [u32; AXIS_COUNT],
    pub identity: DeviceIdentity,
    pub vbus_voltage: f32,
}

impl Telemetry {
    pub fn read<D: MotorController + ?Sized>(device: &mut D) -> Result<Self> {
        let mut axis_errors = [0; AXIS_COUNT];
        for (a, slot) in axis_errors.iter_mut().enumerate() {
            *slot = check(device.axis_error(a))?;
        }
        Ok(Self {
            axis_errors,
            identity: check(device.identity())?,
            vbus_voltage: check(device.vbus_voltage())?,
        })
    }
}

/// Serial number as upper-case hex without prefix.
pub fn serial_hex(serial: u64) -> String {
    format!("{serial:X}")
}

/// Round to two decimals, as shown in the sidebar.
pub fn round2(v: f32) -> f64 {
    (f64::from(v) * 100.0).round() / 100.0
}
