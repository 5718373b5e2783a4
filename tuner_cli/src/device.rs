//! Open the configured motor controller.

use eyre::WrapErr;
use tuner_config::{Backend, Config, SimCfg};
use tuner_core::hw_error::check;
use tuner_hardware::{SimSettings, SimulatedController};
use tuner_traits::{FwVersion, HwVersion, MotorController};

fn sim_settings(sim: &SimCfg) -> SimSettings {
    SimSettings {
        serial_number: sim.serial_number,
        hw_version: HwVersion {
            major: sim.hw_version.major,
            minor: sim.hw_version.minor,
            variant: sim.hw_version.variant,
        },
        fw_version: FwVersion {
            major: sim.fw_version.major,
            minor: sim.fw_version.minor,
            revision: sim.fw_version.revision,
            unreleased: sim.fw_unreleased,
        },
        vbus_voltage: sim.vbus_voltage,
        pos_gain: sim.pos_gain,
        vel_gain: sim.vel_gain,
        vel_integrator_gain: sim.vel_integrator_gain,
        vel_limit: sim.vel_limit,
        control_mode: sim.control_mode,
    }
}

/// Parse `TUNER_TEST_SIM_ERROR` (`"<axis>:<bits>"`, bits in hex or decimal).
fn parse_error_spec(spec: &str) -> eyre::Result<(usize, u32)> {
    let (axis, bits) = spec
        .split_once(':')
        .ok_or_else(|| eyre::eyre!("TUNER_TEST_SIM_ERROR must look like <axis>:<bits>"))?;
    let axis = axis.trim().parse().wrap_err("TUNER_TEST_SIM_ERROR axis")?;
    let bits = bits.trim();
    let bits = match bits.strip_prefix("0x").or_else(|| bits.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => bits.parse(),
    }
    .wrap_err("TUNER_TEST_SIM_ERROR bits")?;
    Ok((axis, bits))
}

fn apply_test_knobs(sim: &mut SimulatedController) -> eyre::Result<()> {
    if let Ok(spec) = std::env::var("TUNER_TEST_SIM_ERROR") {
        let (axis, bits) = parse_error_spec(&spec)?;
        sim.inject_error(axis, bits)
            .map_err(|e| eyre::eyre!("TUNER_TEST_SIM_ERROR: {e}"))?;
        tracing::warn!(axis, bits, "test fault injected into simulated device");
    }
    if std::env::var("TUNER_TEST_SIM_TIMEOUT").is_ok_and(|v| v == "1") {
        sim.stall();
        tracing::warn!("simulated device starts unresponsive");
    }
    if std::env::var("TUNER_TEST_SIM_DISCONNECT").is_ok_and(|v| v == "1") {
        sim.disconnect();
        tracing::warn!("simulated device starts disconnected");
    }
    Ok(())
}

/// Connect to the device the config selects, honouring the serial filter.
pub fn open(cfg: &Config) -> eyre::Result<Box<dyn MotorController>> {
    let mut device: Box<dyn MotorController> = match cfg.device.backend {
        Backend::Sim => {
            let mut sim = SimulatedController::new(sim_settings(&cfg.sim));
            apply_test_knobs(&mut sim)?;
            Box::new(sim)
        }
    };

    let identity = check(device.identity())?;
    if let Some(wanted) = cfg.device.serial_number
        && wanted != identity.serial_number
    {
        eyre::bail!(
            "no device with serial number {wanted:X} found (got {:X})",
            identity.serial_number
        );
    }
    tracing::info!(
        serial = %format!("{:X}", identity.serial_number),
        hw = %identity.hw_version,
        fw = %identity.fw_version,
        "device connected"
    );
    Ok(device)
}
