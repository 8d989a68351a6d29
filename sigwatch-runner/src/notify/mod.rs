//! Notice delivery.
//!
//! The pipeline renders plain text and hands it to a Notifier. Delivery is
//! best-effort: errors are returned to the caller, which logs them and moves on.

pub mod message;
pub mod telegram;

pub use message::{render_execution_notice, render_status_notice, ExecutionNotice};
pub use telegram::{TelegramCredentials, TelegramNotifier};

use std::io::Write;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Transport(String),

    #[error("rejected by {service} (HTTP {status}): {description}")]
    Rejected {
        service: &'static str,
        status: u16,
        description: String,
    },

    #[error("failed to write notice: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for notice sinks (Telegram, stdout, test recorders).
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Prints notices to stdout. Used for dry runs.
#[derive(Debug, Clone, Default)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn name(&self) -> &str {
        "stdout"
    }

    fn send(&self, text: &str) -> Result<(), NotifyError> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{text}")?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdout_notifier_accepts_text() {
        assert!(StdoutNotifier.send("hello").is_ok());
        assert_eq!(StdoutNotifier.name(), "stdout");
    }
}
