use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("no such axis: {0}")]
    UnknownAxis(usize),
    #[error("invalid {what} code {code}")]
    InvalidCode { what: &'static str, code: u8 },
    #[error("axis {0} is not idle")]
    NotIdle(usize),
    #[error("device disconnected")]
    Disconnected,
    #[error("device response timeout")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, HwError>;
