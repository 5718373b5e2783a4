//! Interactive dashboard: stdin commands in, panels or JSON frames out.

use crate::error_fmt::{format_error_json, humanize};
use crossbeam_channel as xch;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tuner_core::runner::{self, Frame, RunParams, RunSummary};
use tuner_core::{Dashboard, Event, View};
use tuner_traits::MotorController;
use tuner_traits::clock::MonotonicClock;
use tuner_ui::input::HELP;
use tuner_ui::{Command, json, parse_line, render_text};

/// Feed parsed events from `input` into a channel.
///
/// The channel closes on end of input or `quit`. Help and parse errors are
/// answered directly and never reach the event loop.
pub fn spawn_reader<R>(input: R, json: bool) -> xch::Receiver<Event>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = xch::unbounded();
    std::thread::spawn(move || {
        for line in input.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            };
            match parse_line(&line) {
                Ok(Some(Command::Event(event))) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(Some(Command::Quit)) => {
                    tracing::debug!("quit requested");
                    break;
                }
                Ok(Some(Command::Help)) => {
                    if json {
                        println!("{}", serde_json::json!({ "type": "help", "text": HELP }));
                    } else {
                        println!("{HELP}");
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(error = %e, line, "unparsable input");
                    if json {
                        println!("{}", json::encode_failure("Parse", &e.to_string()));
                    } else {
                        eprintln!("error: {e}");
                    }
                }
            }
        }
        tracing::debug!("input reader finished");
    });
    rx
}

/// Writes frames to stdout. In text mode ticks overwrite one status line.
pub struct FrameWriter {
    json: bool,
    on_tick_line: bool,
}

impl FrameWriter {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            on_tick_line: false,
        }
    }

    pub fn view(&mut self, out: &mut impl Write, view: &View) -> std::io::Result<()> {
        self.end_tick_line(out)?;
        if self.json {
            writeln!(out, "{}", json::encode_view(view))?;
        } else {
            write!(out, "{}", render_text(view))?;
        }
        out.flush()
    }

    pub fn emit(&mut self, frame: Frame) -> eyre::Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match frame {
            Frame::View(view) => self.view(&mut out, &view)?,
            Frame::Tick(tick) => {
                if self.json {
                    writeln!(out, "{}", json::encode_tick(&tick))?;
                } else {
                    write!(out, "\r{:.3}", tick.t)?;
                    self.on_tick_line = true;
                }
                out.flush()?;
            }
            Frame::Failure(err) => {
                self.end_tick_line(&mut out)?;
                if self.json {
                    writeln!(out, "{}", format_error_json(&err))?;
                    out.flush()?;
                } else {
                    eprintln!("{}", humanize(&err));
                }
            }
        }
        Ok(())
    }

    fn end_tick_line(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        if self.on_tick_line {
            writeln!(out)?;
            self.on_tick_line = false;
        }
        Ok(())
    }
}

pub fn run_dashboard(
    device: Box<dyn MotorController>,
    json: bool,
    heartbeat: Duration,
    shutdown: Arc<AtomicBool>,
) -> eyre::Result<RunSummary> {
    let events = spawn_reader(std::io::BufReader::new(std::io::stdin()), json);
    let mut dashboard = Dashboard::new(device);
    let mut writer = FrameWriter::new(json);
    let summary = runner::run(
        &mut dashboard,
        events,
        MonotonicClock::new(),
        RunParams {
            heartbeat_period: heartbeat,
        },
        shutdown,
        |frame| writer.emit(frame),
    )?;
    let mut out = std::io::stdout().lock();
    writer.end_tick_line(&mut out)?;
    tracing::info!(
        refreshes = summary.refreshes,
        failures = summary.failures,
        ticks = summary.ticks,
        "dashboard closed"
    );
    Ok(summary)
}

/// Render the dashboard once.
pub fn run_status(device: Box<dyn MotorController>, json: bool) -> eyre::Result<()> {
    let mut dashboard = Dashboard::new(device);
    let view = dashboard.handle(&Event::Refresh)?;
    let mut out = std::io::stdout().lock();
    FrameWriter::new(json).view(&mut out, &view)?;
    Ok(())
}
