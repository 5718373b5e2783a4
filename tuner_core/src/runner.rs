use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::event::Event;
use crate::heartbeat::{Heartbeat, Tick};
use crate::view::View;
use crossbeam_channel as xch;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tuner_traits::MotorController;
use tuner_traits::clock::Clock;

/// How often the loop wakes up to look at the shutdown flag.
const SHUTDOWN_POLL: Duration = Duration::from_millis(50);

/// One unit of output from the event loop.
#[derive(Debug)]
pub enum Frame {
    View(View),
    Tick(Tick),
    /// The refresh for an event failed; the session was not committed.
    Failure(eyre::Report),
}

#[derive(Debug, Clone, Copy)]
pub struct RunParams {
    pub heartbeat_period: Duration,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            heartbeat_period: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Refreshes run, including the initial one.
    pub refreshes: usize,
    pub failures: usize,
    pub ticks: usize,
}

/// Drive `dashboard` from `events` until the channel closes or `shutdown`
/// is raised.
///
/// An initial refresh renders the dashboard before the first event. Each
/// event cancels the running heartbeat, runs one refresh and emits its frame;
/// a successful refresh starts a new heartbeat. Errors returned by `emit`
/// end the loop and are returned.
pub fn run<D, C, F>(
    dashboard: &mut Dashboard<D>,
    events: xch::Receiver<Event>,
    clock: C,
    params: RunParams,
    shutdown: Arc<AtomicBool>,
    mut emit: F,
) -> Result<RunSummary>
where
    D: MotorController,
    C: Clock + Clone + Send + 'static,
    F: FnMut(Frame) -> Result<()>,
{
    let mut summary = RunSummary::default();
    let mut heartbeat =
        refresh(dashboard, &Event::Refresh, &clock, params, &mut summary, &mut emit)?;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("shutdown requested, leaving event loop");
            break;
        }

        let ticks = heartbeat
            .as_ref()
            .map(|h| h.receiver().clone())
            .unwrap_or_else(xch::never);

        xch::select! {
            recv(events) -> msg => match msg {
                Ok(event) => {
                    // Cancel the previous pass before touching the device.
                    drop(heartbeat.take());
                    tracing::debug!(?event, "event");
                    heartbeat = refresh(dashboard, &event, &clock, params, &mut summary, &mut emit)?;
                }
                Err(_) => {
                    tracing::info!("event source closed");
                    break;
                }
            },
            recv(ticks) -> tick => {
                if let Ok(tick) = tick {
                    summary.ticks += 1;
                    emit(Frame::Tick(tick))?;
                }
            },
            default(SHUTDOWN_POLL) => {},
        }
    }

    Ok(summary)
}

fn refresh<D, C, F>(
    dashboard: &mut Dashboard<D>,
    event: &Event,
    clock: &C,
    params: RunParams,
    summary: &mut RunSummary,
    emit: &mut F,
) -> Result<Option<Heartbeat>>
where
    D: MotorController,
    C: Clock + Clone + Send + 'static,
    F: FnMut(Frame) -> Result<()>,
{
    summary.refreshes += 1;
    match dashboard.handle(event) {
        Ok(view) => {
            emit(Frame::View(view))?;
            Ok(Some(Heartbeat::spawn(
                params.heartbeat_period,
                clock.clone(),
            )))
        }
        Err(e) => {
            summary.failures += 1;
            tracing::error!(error = %e, "refresh failed");
            emit(Frame::Failure(e))?;
            Ok(None)
        }
    }
}
