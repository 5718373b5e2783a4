//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether output is JSON frames (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "tuner", version, about = "Motor controller tuning dashboard")]
pub struct Cli {
    /// Path to config TOML; a missing file means defaults
    #[arg(long, value_name = "FILE", default_value = "etc/tuner.toml")]
    pub config: PathBuf,

    /// Emit JSON frames instead of text panels
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Log level for stderr (error|warn|info|debug|trace); overrides [logging] level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive dashboard driven by commands on stdin
    Dashboard {
        /// Heartbeat cadence in ms (takes precedence over config)
        #[arg(
            long,
            value_name = "MS",
            value_parser = clap::value_parser!(u64).range(1..=10_000)
        )]
        heartbeat_ms: Option<u64>,
    },
    /// Render the dashboard once and exit
    Status,
    /// Open the device and read its identity
    SelfCheck,
}
