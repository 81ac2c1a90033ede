//! Logger capability handed to the notifier.
//!
//! The notifier never reaches for a global logger on its own; it receives a
//! [`LogSink`] at construction and writes every diagnostic through it.

use std::backtrace::Backtrace;

/// Minimal logging interface consumed by [`Notifier`](crate::notify::Notifier)
///
/// Implementations must be safe to share across threads, since a single sink
/// may serve concurrent notifier calls.
pub trait LogSink: Send + Sync {
    fn info(&self, message: &str);

    fn debug(&self, message: &str);

    /// Records an error; `with_stack_trace` asks the sink to attach the
    /// current call stack to the entry
    fn error(&self, message: &str, with_stack_trace: bool);
}

/// [`LogSink`] that forwards to the `tracing` subscriber installed by
/// [`init_logger`](crate::logger::init_logger)
///
/// Events keep this module's `tracing` target, so `EnvFilter` directives
/// apply to them as usual. The sink name is recorded as a `logger` field on
/// every event instead.
#[derive(Debug, Clone)]
pub struct TracingSink {
    name: String,
}

impl TracingSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!(logger = %self.name, "{}", message);
    }

    fn debug(&self, message: &str) {
        tracing::debug!(logger = %self.name, "{}", message);
    }

    fn error(&self, message: &str, with_stack_trace: bool) {
        if with_stack_trace {
            let backtrace = Backtrace::force_capture();
            tracing::error!(logger = %self.name, backtrace = %backtrace, "{}", message);
        } else {
            tracing::error!(logger = %self.name, "{}", message);
        }
    }
}
