//! Console notifier: prints notifications instead of delivering them.
//!
//! Used for dry runs, where the rendered mail is inspected locally.

use std::io::Write;
use std::sync::Mutex;

use crate::traits::{Notification, Notifier, NotifyError};

/// Writes each notification as a plain header block followed by the HTML body.
pub struct ConsoleNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleNotifier {
    /// Notifier writing to stdout.
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl std::fmt::Debug for ConsoleNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleNotifier").finish_non_exhaustive()
    }
}

/// Format a notification the way [`ConsoleNotifier`] prints it.
pub fn format_notification(notification: &Notification) -> String {
    format!(
        "To: {}\nSubject: {}\n\n{}\n",
        notification.to, notification.subject, notification.html_body
    )
}

#[async_trait::async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let text = format_notification(notification);
        let mut out = self
            .out
            .lock()
            .map_err(|_| NotifyError::Config("console output lock poisoned".to_string()))?;
        out.write_all(text.as_bytes())?;
        out.flush()?;

        tracing::debug!(channel = "console", subject = %notification.subject, "notification printed");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "console"
    }
}
