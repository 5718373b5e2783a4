//! Maps `Box<dyn Error>` from the device trait boundary to typed `TunerError`.
//!
//! `tuner_traits::MotorController` returns `Box<dyn Error + Send + Sync>`;
//! this module converts those to our typed error enum, with an optional
//! feature-gated path for `tuner_hardware::HwError` downcasting.

use crate::error::{Result, TunerError};
use tuner_traits::DeviceResult;

/// Map a trait-boundary error to a typed `TunerError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> TunerError {
    #[cfg(feature = "hardware-errors")]
    {
        use tuner_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::Timeout => TunerError::Timeout,
                HwError::Disconnected => TunerError::Disconnected,
                HwError::UnknownAxis(axis) => TunerError::UnknownAxis(*axis),
                other => TunerError::DeviceFault(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    let lower = s.to_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        TunerError::Timeout
    } else if lower.contains("disconnect") {
        TunerError::Disconnected
    } else {
        TunerError::Device(s)
    }
}

/// Lift a device call result into the crate `Result`, typing its error.
pub fn check<T>(r: DeviceResult<T>) -> Result<T> {
    r.map_err(|e| eyre::Report::new(map_hw_error(e.as_ref())))
}
