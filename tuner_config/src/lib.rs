#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the tuning dashboard.
//!
//! Every section is optional; an empty document yields the defaults.
//! `Config::validate` rejects values the dashboard cannot work with and
//! names the offending key in the error.
use serde::Deserialize;
use serde::de::Deserializer;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-memory simulated controller
    #[default]
    Sim,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct DeviceCfg {
    pub backend: Backend,
    /// Only accept a device with this serial number (hex string or integer)
    #[serde(deserialize_with = "de_opt_serial")]
    pub serial_number: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct HwVersionCfg {
    pub major: u8,
    pub minor: u8,
    pub variant: u8,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct FwVersionCfg {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
}

/// Initial state of the simulated controller.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimCfg {
    #[serde(deserialize_with = "de_serial")]
    pub serial_number: u64,
    pub vbus_voltage: f32,
    pub hw_version: HwVersionCfg,
    pub fw_version: FwVersionCfg,
    pub fw_unreleased: bool,
    pub pos_gain: f32,
    pub vel_gain: f32,
    pub vel_integrator_gain: f32,
    pub vel_limit: f32,
    /// Raw control mode code (0 voltage, 1 torque, 2 velocity, 3 position)
    pub control_mode: u8,
}

impl Default for SimCfg {
    fn default() -> Self {
        Self {
            serial_number: 0x2063_3593_4D4B,
            vbus_voltage: 24.0,
            hw_version: HwVersionCfg {
                major: 3,
                minor: 6,
                variant: 56,
            },
            fw_version: FwVersionCfg {
                major: 0,
                minor: 5,
                revision: 1,
            },
            fw_unreleased: false,
            pos_gain: 20.0,
            vel_gain: 0.16,
            vel_integrator_gain: 0.32,
            vel_limit: 2.0,
            control_mode: 3,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiCfg {
    /// Heartbeat cadence in milliseconds
    pub heartbeat_ms: u64,
    /// Emit JSON frames instead of text panels
    pub json: bool,
}

impl Default for UiCfg {
    fn default() -> Self {
        Self {
            heartbeat_ms: 100,
            json: false,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub device: DeviceCfg,
    pub sim: SimCfg,
    pub ui: UiCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a config file. A missing file yields the defaults.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    load_toml(&text).map_err(|e| eyre::eyre!("invalid configuration in {:?}: {}", path, e))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SerialToml {
    Int(u64),
    Hex(String),
}

fn parse_serial(raw: SerialToml) -> Result<u64, String> {
    match raw {
        SerialToml::Int(v) => Ok(v),
        SerialToml::Hex(s) => {
            let t = s.trim();
            let digits = t
                .strip_prefix("0x")
                .or_else(|| t.strip_prefix("0X"))
                .unwrap_or(t);
            u64::from_str_radix(digits, 16).map_err(|e| format!("serial_number {s:?}: {e}"))
        }
    }
}

fn de_serial<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = SerialToml::deserialize(deserializer)?;
    parse_serial(raw).map_err(serde::de::Error::custom)
}

fn de_opt_serial<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<SerialToml> = Option::deserialize(deserializer)?;
    opt.map(parse_serial)
        .transpose()
        .map_err(serde::de::Error::custom)
}

fn non_negative(key: &str, v: f32) -> eyre::Result<()> {
    if !v.is_finite() || v < 0.0 {
        eyre::bail!("{key} must be a finite value >= 0");
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // UI
        if self.ui.heartbeat_ms == 0 {
            eyre::bail!("ui.heartbeat_ms must be >= 1");
        }
        if self.ui.heartbeat_ms > 10_000 {
            eyre::bail!("ui.heartbeat_ms is unreasonably large (>10s)");
        }

        // Simulated device
        non_negative("sim.vbus_voltage", self.sim.vbus_voltage)?;
        non_negative("sim.pos_gain", self.sim.pos_gain)?;
        non_negative("sim.vel_gain", self.sim.vel_gain)?;
        non_negative("sim.vel_integrator_gain", self.sim.vel_integrator_gain)?;
        non_negative("sim.vel_limit", self.sim.vel_limit)?;
        if self.sim.control_mode > 3 {
            eyre::bail!("sim.control_mode must be in [0, 3]");
        }

        // Device filter must match what the simulated backend reports
        if let Some(serial) = self.device.serial_number
            && self.device.backend == Backend::Sim
            && serial != self.sim.serial_number
        {
            eyre::bail!(
                "device.serial_number {:X} does not match sim.serial_number {:X}",
                serial,
                self.sim.serial_number
            );
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
