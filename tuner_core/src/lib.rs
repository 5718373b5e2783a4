#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Session-synchronized tuning dashboard logic (device-agnostic).
//!
//! All device access goes through `tuner_traits::MotorController`.
//!
//! ## Architecture
//!
//! - **Labels**: code↔label tables for axis states and control modes (`labels`)
//! - **Session**: remembered widget values, initialized once from the device (`session`)
//! - **Apply**: pure `(session, event) -> (session, device writes)` step (`apply`)
//! - **View**: pure rendering of session + telemetry into panels (`view`)
//! - **Dashboard**: one refresh per event against a live device (`dashboard`)
//! - **Runner**: event loop with a cancellable heartbeat (`runner`, `heartbeat`)

pub mod apply;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod heartbeat;
pub mod hw_error;
pub mod labels;
pub mod mocks;
pub mod runner;
pub mod session;
pub mod telemetry;
pub mod view;

pub use apply::apply;
pub use dashboard::Dashboard;
pub use error::{Result, TunerError};
pub use event::{DeviceCommand, Direction, Event};
pub use heartbeat::{Heartbeat, Tick};
pub use runner::{Frame, RunParams, RunSummary};
pub use session::Session;
pub use telemetry::Telemetry;
pub use view::{View, render};
