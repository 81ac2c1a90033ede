//! Logger Module
//!
//! A logging system based on `tracing-subscriber` with support for:
//! - Console output with color control
//! - File output with multiple formats (Full, Compact, JSON)
//! - A [`LogSink`] capability that components receive instead of a global logger

pub mod config;
pub mod error;
pub mod sink;
pub(crate) mod writer;


pub use config::*;
pub use error::LoggerError;
pub use sink::{LogSink, TracingSink};

use std::io::IsTerminal;
use tracing::Subscriber;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use writer::FileWriter;

/// Initialize the global subscriber with the given configuration
pub fn init_logger(config: LoggerConfig) -> anyhow::Result<()> {
    build_subscriber(&config)?.try_init()?;
    Ok(())
}

type BoxedSubscriber = Box<dyn Subscriber + Send + Sync>;

/// Assembles the filter and output layers without installing them
pub(crate) fn build_subscriber(config: &LoggerConfig) -> anyhow::Result<BoxedSubscriber> {
    config.validate()?;

    let filter = EnvFilter::try_new(config.filter_directive()?)?;

    match (config.console.enabled, config.file.enabled) {
        (true, true) => build_both(config, filter),
        (true, false) => Ok(Box::new(
            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer(&config.console)),
        )),
        (false, true) => build_file_only(&config.file, filter),
        (false, false) => anyhow::bail!("At least one output (console or file) must be enabled"),
    }
}

fn use_ansi(config: &ConsoleConfig) -> bool {
    config.colored && std::io::stdout().is_terminal()
}

fn console_layer<S>(config: &ConsoleConfig) -> fmt::Layer<S> {
    fmt::layer()
        .with_ansi(use_ansi(config))
        .with_target(true)
        .with_level(true)
}

fn build_file_only(config: &FileConfig, filter: EnvFilter) -> anyhow::Result<BoxedSubscriber> {
    let writer = FileWriter::new(config)?;

    let subscriber: BoxedSubscriber = match config.format {
        LogFormat::Full => Box::new(
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_target(true).with_writer(writer)),
        ),
        LogFormat::Compact => Box::new(
            tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .compact()
                    .with_writer(writer),
            ),
        ),
        LogFormat::Json => Box::new(
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).json().with_writer(writer)),
        ),
    };

    Ok(subscriber)
}

fn build_both(config: &LoggerConfig, filter: EnvFilter) -> anyhow::Result<BoxedSubscriber> {
    let writer = FileWriter::new(&config.file)?;

    // File layer goes first so span fields are not formatted with ANSI codes.
    // See: https://github.com/tokio-rs/tracing/issues/1817
    let subscriber: BoxedSubscriber = match config.file.format {
        LogFormat::Full => Box::new(
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_target(true).with_writer(writer))
                .with(console_layer(&config.console)),
        ),
        LogFormat::Compact => Box::new(
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(true)
                        .compact()
                        .with_writer(writer),
                )
                .with(console_layer(&config.console)),
        ),
        LogFormat::Json => Box::new(
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).json().with_writer(writer))
                .with(console_layer(&config.console)),
        ),
    };

    Ok(subscriber)
}
