use std::sync::Mutex;

use futures::future::{BoxFuture, FutureExt};

use crate::error::{AppError, Result};

/// An outbound HTML email.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Hands messages to a mail transport.
pub trait Mailer: Send + Sync {
    fn send<'a>(&'a self, message: &'a EmailMessage) -> BoxFuture<'a, Result<()>>;
}

/// Writes each message to the log instead of delivering it.
#[derive(Debug, Default)]
pub struct TracingMailer;

impl Mailer for TracingMailer {
    fn send<'a>(&'a self, message: &'a EmailMessage) -> BoxFuture<'a, Result<()>> {
        async move {
            tracing::info!(
                from = %message.from,
                to = %message.to,
                subject = %message.subject,
                bytes = message.html.len(),
                "📧 Outbound email"
            );
            Ok(())
        }
        .boxed()
    }
}

/// Keeps sent messages in memory. Can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl RecordingMailer {
    /// A mailer whose every send fails.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Mailer for RecordingMailer {
    fn send<'a>(&'a self, message: &'a EmailMessage) -> BoxFuture<'a, Result<()>> {
        async move {
            if self.fail {
                return Err(AppError::Mail("transport unavailable".to_string()));
            }
            self.sent
                .lock()
                .map_err(|_| AppError::Internal("mailer lock poisoned".to_string()))?
                .push(message.clone());
            Ok(())
        }
        .boxed()
    }
}

/// Sends a message, logging rather than returning failures.
pub async fn send_best_effort(mailer: &dyn Mailer, message: EmailMessage) {
    if let Err(e) = mailer.send(&message).await {
        tracing::error!("❌ Failed to send '{}' to {}: {}", message.subject, message.to, e);
    }
}
