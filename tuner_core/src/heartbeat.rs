//! Live timestamp ticker shown while the dashboard waits for input.
//!
//! Spawns one thread that pushes a `Tick` every period over a bounded
//! channel. The thread belongs to a single render pass: dropping the
//! `Heartbeat` cancels it and joins the thread.
use crossbeam_channel as xch;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tuner_traits::clock::Clock;

/// Longest uninterrupted sleep, so cancellation is noticed promptly.
const SLEEP_SLICE: Duration = Duration::from_millis(10);

/// Wall-clock timestamp in seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tick {
    pub t: f64,
}

pub struct Heartbeat {
    rx: xch::Receiver<Tick>,
    sent: Arc<AtomicU64>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Heartbeat {
    pub fn spawn<C: Clock + Send + 'static>(period: Duration, clock: C) -> Self {
        let (tx, rx) = xch::bounded(1);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let sent = Arc::new(AtomicU64::new(0));
        let sent_clone = sent.clone();
        let period = period.max(Duration::from_millis(1));

        let join_handle = std::thread::spawn(move || {
            'outer: loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("heartbeat received shutdown signal");
                    break;
                }

                match tx.try_send(Tick {
                    t: clock.unix_secs(),
                }) {
                    Ok(()) => {
                        sent_clone.fetch_add(1, Ordering::Relaxed);
                    }
                    // Consumer has not drained the previous tick; skip this one.
                    Err(xch::TrySendError::Full(_)) => {}
                    Err(xch::TrySendError::Disconnected(_)) => {
                        tracing::debug!("heartbeat consumer disconnected, exiting thread");
                        break;
                    }
                }

                let mut remaining = period;
                while !remaining.is_zero() {
                    if shutdown_clone.load(Ordering::Relaxed) {
                        break 'outer;
                    }
                    let slice = remaining.min(SLEEP_SLICE);
                    clock.sleep(slice);
                    remaining = remaining.saturating_sub(slice);
                }
            }
            tracing::trace!("heartbeat thread exiting cleanly");
        });

        Self {
            rx,
            sent,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Channel to select on for ticks.
    pub fn receiver(&self) -> &xch::Receiver<Tick> {
        &self.rx
    }

    /// Most recent pending tick, if any.
    pub fn latest(&self) -> Option<Tick> {
        self.rx.try_iter().last()
    }

    /// Number of ticks handed to the channel so far.
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Stop the ticker and wait for its thread.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("heartbeat thread joined");
                }
                Err(e) => {
                    // Thread panicked; log but don't propagate (we're in Drop)
                    tracing::warn!(?e, "heartbeat thread panicked during shutdown");
                }
            }
        }
    }
}
