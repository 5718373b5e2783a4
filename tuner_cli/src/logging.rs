//! Tracing setup: stderr console layer plus an optional JSON-lines file sink.

use crate::cli::FILE_GUARD;
use std::path::Path;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};
use tuner_config::Logging;

fn file_layer<S>(logging: &Logging) -> eyre::Result<Option<Box<dyn Layer<S> + Send + Sync>>>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let Some(file) = logging.file.as_deref() else {
        return Ok(None);
    };
    let path = Path::new(file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| eyre::eyre!("invalid configuration: logging.file {file:?} has no file name"))?;
    let appender = match logging.rotation.as_deref().unwrap_or("never") {
        "daily" => tracing_appender::rolling::daily(dir, name),
        "hourly" => tracing_appender::rolling::hourly(dir, name),
        _ => tracing_appender::rolling::never(dir, name),
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = FILE_GUARD.set(guard);
    Ok(Some(
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(writer)
            .boxed(),
    ))
}

/// Install the global subscriber. `RUST_LOG` wins over `level`.
pub fn init(level: &str, json: bool, logging: &Logging) -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| eyre::eyre!("invalid log level {level:?}: {e}"))?;

    let registry = tracing_subscriber::registry().with(filter);
    let console = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let result = if json {
        let registry = registry.with(console.json());
        let file = file_layer(logging)?;
        registry.with(file).try_init()
    } else {
        let registry = registry.with(console.compact());
        let file = file_layer(logging)?;
        registry.with(file).try_init()
    };
    result.map_err(|e| eyre::eyre!("failed to install tracing subscriber: {e}"))
}
