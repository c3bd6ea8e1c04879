//! Notification delivery: Slack incoming webhook, or a stdout preview for test mode.

use std::time::Duration;

use streak_engine::NotificationMessage;
use thiserror::Error;
use tracing::{debug, warn};

/// Network timeout for one webhook POST.
const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when delivering a notification.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request could not be built, sent, or timed out
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Webhook answered with a non-success status
    #[error("webhook returned {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Where notifications go.
pub trait Transport {
    fn name(&self) -> &'static str;

    /// Deliver one message. Failure never touches already-persisted state.
    fn send(&self, message: &NotificationMessage) -> Result<(), TransportError>;
}

/// Slack incoming webhook.
pub struct SlackWebhook {
    webhook_url: String,
    client: reqwest::blocking::Client,
}

impl SlackWebhook {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()?;
        Ok(Self {
            webhook_url: webhook_url.into(),
            client,
        })
    }
}

impl Transport for SlackWebhook {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn send(&self, message: &NotificationMessage) -> Result<(), TransportError> {
        debug!(channel = "slack", blocks = message.blocks.len(), "Sending notification");

        let response = self.client.post(&self.webhook_url).json(message).send()?;

        let status = response.status();
        if status.is_success() {
            debug!(channel = "slack", "Notification sent successfully");
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        warn!(
            channel = "slack",
            status = %status,
            body = %body,
            "Slack webhook request failed"
        );
        Err(TransportError::Rejected { status, body })
    }
}

/// Prints what would have been sent instead of sending it.
pub struct DryRun;

impl Transport for DryRun {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn send(&self, message: &NotificationMessage) -> Result<(), TransportError> {
        println!("{}", render_preview(message));
        Ok(())
    }
}

/// Framed, line-per-block preview of a message.
pub fn render_preview(message: &NotificationMessage) -> String {
    let rule = "=".repeat(50);
    let mut out = String::from("TEST MODE: would send this message to Slack:\n");
    out.push_str(&rule);
    out.push('\n');
    for line in message.preview_lines() {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&rule);
    out
}
