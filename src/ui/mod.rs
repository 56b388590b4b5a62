//! User-facing progress reporting.
//!
//! Every helper reports through a [`Reporter`] instead of printing directly,
//! so scripts can pick the console rendering and tests can capture the
//! messages:
//! - `formatter` - colored console rendering
//! - `memory` - in-memory capture

pub mod formatter;
pub mod memory;

pub use formatter::ConsoleReporter;
pub use memory::MemoryReporter;

/// Severity of a reported status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// Sink for human-readable status lines.
///
/// Reporting is observability only; nothing in the crate branches on what a
/// reporter does with a message.
pub trait Reporter: Send + Sync {
    fn report(&self, severity: Severity, text: &str);

    fn success(&self, text: &str) {
        self.report(Severity::Success, text);
    }

    fn info(&self, text: &str) {
        self.report(Severity::Info, text);
    }

    fn warning(&self, text: &str) {
        self.report(Severity::Warning, text);
    }

    fn error(&self, text: &str) {
        self.report(Severity::Error, text);
    }
}
