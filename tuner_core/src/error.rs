use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TunerError {
    #[error("device error: {0}")]
    Device(String),
    #[error("device fault: {0}")]
    DeviceFault(String),
    #[error("device disconnected")]
    Disconnected,
    #[error("timeout waiting for device")]
    Timeout,
    #[error("no such axis: {0}")]
    UnknownAxis(usize),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not available: {0}")]
    Unavailable(String),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
