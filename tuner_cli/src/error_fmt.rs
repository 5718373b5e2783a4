//! Human-readable error descriptions and structured JSON error formatting.

use tuner_core::TunerError;

/// Stable reason name used in JSON error frames.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<TunerError>() {
        Some(TunerError::Device(_)) => "Device",
        Some(TunerError::DeviceFault(_)) => "DeviceFault",
        Some(TunerError::Disconnected) => "Disconnected",
        Some(TunerError::Timeout) => "Timeout",
        Some(TunerError::UnknownAxis(_)) => "UnknownAxis",
        Some(TunerError::InvalidInput(_)) => "InvalidInput",
        Some(TunerError::Unavailable(_)) => "Unavailable",
        Some(TunerError::Config(_)) => "Config",
        None if is_config_error(err) => "Config",
        None => "Error",
    }
}

fn is_config_error(err: &eyre::Report) -> bool {
    let lower = err.to_string().to_ascii_lowercase();
    lower.contains("invalid configuration") || lower.contains("read config")
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(te) = err.downcast_ref::<TunerError>() {
        return match te {
            TunerError::Disconnected => {
                "What happened: Lost connection to the motor controller.\nLikely causes: USB cable unplugged, device rebooting, or powered off.\nHow to fix: Reconnect the device and press refresh; restart the dashboard if it stays unreachable.".to_string()
            }
            TunerError::Timeout => {
                "What happened: The motor controller did not answer in time.\nLikely causes: Device busy or a flaky USB link.\nHow to fix: Retry the action; check the cable and power supply.".to_string()
            }
            TunerError::DeviceFault(msg) | TunerError::Device(msg) => format!(
                "What happened: The device rejected the request ({msg}).\nLikely causes: The axis is not idle, or the value is outside what the firmware accepts.\nHow to fix: Put the axes in idle, run clear-errors, then try again."
            ),
            TunerError::UnknownAxis(axis) => format!(
                "What happened: Axis {axis} does not exist.\nLikely causes: A typo in the command.\nHow to fix: Use axis 0 or 1."
            ),
            TunerError::InvalidInput(msg) => format!(
                "What happened: Input rejected ({msg}).\nLikely causes: A negative or non-numeric value, or a code outside the table.\nHow to fix: Type 'help' for the accepted commands and ranges."
            ),
            TunerError::Unavailable(msg) => format!(
                "What happened: That control is not on screen ({msg}).\nLikely causes: The axis is in a different mode or state.\nHow to fix: Switch the axis to the right mode or state first."
            ),
            TunerError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if is_config_error(err) {
        return format!(
            "What happened: Invalid configuration ({msg}).\nLikely causes: A typo or out-of-range value in the TOML.\nHow to fix: Edit the config file, then rerun."
        );
    }

    if lower.contains("no device with serial number") {
        return format!(
            "What happened: {msg}.\nLikely causes: A different controller is plugged in, or device.serial_number is wrong.\nHow to fix: Fix device.serial_number in the config or remove it to accept any device."
        );
    }

    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Invalid configuration exits with 2, device problems with 3, anything else with 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<TunerError>() {
        Some(TunerError::Config(_)) => 2,
        Some(
            TunerError::Device(_)
            | TunerError::DeviceFault(_)
            | TunerError::Disconnected
            | TunerError::Timeout,
        ) => 3,
        Some(_) => 1,
        None if is_config_error(err) => 2,
        None if err.to_string().contains("no device with serial number") => 3,
        None => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    tuner_ui::json::encode_failure(reason_name(err), &humanize(err))
}
