//! Fire-and-forget diagnostics for the locator.
//!
//! The locator never fails; problems it recovers from are reported through a
//! [`DiagnosticSink`]. The default sink forwards to the [`log`] facade, so the
//! application decides where messages end up by installing a logger.

/// Receives diagnostic messages from the locator. Implementations must not panic.
pub trait DiagnosticSink: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards messages to `log::info!` and `log::error!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn info(&self, message: &str) {
        log::info!("{message}");
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn info(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}
