#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod cli;
mod dashboard;
mod device;
mod error_fmt;
mod logging;

use clap::Parser;
use cli::{Cli, Commands, JSON_MODE};
use error_fmt::{exit_code_for_error, format_error_json, humanize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tuner_core::TunerError;
use tuner_traits::MotorController;

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let cli_json = cli.json;

    if let Err(e) = run(cli) {
        let json = JSON_MODE.get().copied().unwrap_or(cli_json);
        tracing::error!(error = %e, "tuner failed");
        if json {
            println!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn load_config(cli: &Cli) -> eyre::Result<tuner_config::Config> {
    let as_config_error = |e: eyre::Report| eyre::Report::new(TunerError::Config(e.to_string()));
    let cfg = tuner_config::load_file(&cli.config).map_err(as_config_error)?;
    cfg.validate().map_err(as_config_error)?;
    Ok(cfg)
}

fn run(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(&cli)?;
    let json = cli.json || cfg.ui.json;
    let _ = JSON_MODE.set(json);

    let level = cli
        .log_level
        .as_deref()
        .or(cfg.logging.level.as_deref())
        .unwrap_or("warn");
    logging::init(level, json, &cfg.logging)?;
    tracing::debug!(config = ?cli.config, json, "starting");

    match cli.cmd {
        Commands::Dashboard { heartbeat_ms } => {
            let device = device::open(&cfg)?;
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = shutdown.clone();
            ctrlc::set_handler(move || {
                tracing::info!("received shutdown signal");
                flag.store(true, Ordering::Relaxed);
            })
            .map_err(|e| eyre::eyre!("failed to install Ctrl-C handler: {e}"))?;

            let period = Duration::from_millis(heartbeat_ms.unwrap_or(cfg.ui.heartbeat_ms));
            dashboard::run_dashboard(device, json, period, shutdown)?;
        }
        Commands::Status => {
            let device = device::open(&cfg)?;
            dashboard::run_status(device, json)?;
        }
        Commands::SelfCheck => {
            let mut device = device::open(&cfg)?;
            let identity = tuner_core::hw_error::check(device.identity())?;
            let vbus = tuner_core::hw_error::check(device.vbus_voltage())?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "type": "self-check",
                        "ok": true,
                        "serial_number": tuner_core::telemetry::serial_hex(identity.serial_number),
                        "hardware_version": identity.hw_version.to_string(),
                        "firmware_version": identity.fw_version.to_string(),
                        "vbus_voltage": vbus,
                    })
                );
            } else {
                println!(
                    "OK serial={} hw={} fw={} vbus={vbus:.2}V",
                    tuner_core::telemetry::serial_hex(identity.serial_number),
                    identity.hw_version,
                    identity.fw_version,
                );
            }
        }
    }
    Ok(())
}
