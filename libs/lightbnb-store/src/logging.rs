//! Logging initialization for LightBnB binaries
//!
//! Supports human-readable or JSON output, optional rotating log files and
//! `RUST_LOG` overrides.

use anyhow::Context as _;
use std::fs;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Keeps the non-blocking file writer flushing. Hold it for the lifetime of the program.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize logging from a `LoggingConfig`.
///
/// Console output goes to stderr. With `file_enabled`, the same events are also
/// written to a rolling file in the same format, without ANSI colours.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let (file_layer, file_guard) = if config.file_enabled {
        let (writer, guard) = create_file_appender(config)?;
        (Some(output_layer(config, writer, false)), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(build_env_filter(config))
        .with(output_layer(config, std::io::stderr, true))
        .with(file_layer)
        .try_init()?;

    tracing::info!(
        level = %config.level,
        json = config.json,
        file_enabled = config.file_enabled,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(config)))
}

fn default_directives(config: &LoggingConfig) -> String {
    // sqlx logs every statement at info; keep it quiet unless asked for
    format!(
        "lightbnb={},lightbnb_store={},sqlx=warn",
        config.level, config.level
    )
}

/// One fmt layer writing to `writer`, JSON or human per `config.json`.
fn output_layer<S, W>(
    config: &LoggingConfig,
    writer: W,
    ansi: bool,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);

    if config.json {
        layer
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .boxed()
    } else {
        layer.boxed()
    }
}

fn file_rotation(name: &str) -> Rotation {
    match name {
        "hourly" => Rotation::HOURLY,
        "minutely" => Rotation::MINUTELY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

fn create_file_appender(config: &LoggingConfig) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(&config.file_directory)
        .with_context(|| format!("create log directory {}", config.file_directory))?;

    let rotation = file_rotation(&config.file_rotation);
    // Rolled files get a date suffix; a single file needs its own extension.
    let file_name = if rotation == Rotation::NEVER {
        format!("{}.log", config.file_prefix)
    } else {
        config.file_prefix.clone()
    };

    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(file_name)
        .build(&config.file_directory)
        .context("open log file")?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Initialize logging from `RUST_LOG` only.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_simple_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lightbnb=info,lightbnb_store=info,sqlx=warn".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
