//! Outbound push delivery for alerts.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// Errors building a push client.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// An alert ready to leave the process.
#[derive(Debug, Clone)]
pub struct OutboundAlert {
    pub id: i64,
    pub post_id: i64,
    pub alert_type: String,
    pub message: String,
}

/// Delivers alerts to an external channel.
///
/// `notify` reports delivery with a bool rather than an error: a failed
/// notification must never abort the pipeline that produced the alert.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, alert: &OutboundAlert) -> bool;
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    message: &'a str,
    priority: &'a str,
    data: WebhookData<'a>,
}

#[derive(Serialize)]
struct WebhookData<'a> {
    alert_id: i64,
    post_id: i64,
    #[serde(rename = "type")]
    alert_type: &'a str,
}

/// POSTs alerts to a configured webhook URL.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the HTTP client cannot be built.
    pub fn new(url: String) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, alert: &OutboundAlert) -> bool {
        let priority = if alert.alert_type == "high_priority" {
            "high"
        } else {
            "normal"
        };
        let payload = WebhookPayload {
            message: &alert.message,
            priority,
            data: WebhookData {
                alert_id: alert.id,
                post_id: alert.post_id,
                alert_type: &alert.alert_type,
            },
        };

        match self.client.post(&self.url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(alert_id = alert.id, "webhook notification delivered");
                true
            }
            Ok(response) => {
                tracing::warn!(
                    alert_id = alert.id,
                    status = %response.status(),
                    "webhook rejected notification"
                );
                false
            }
            Err(e) => {
                tracing::warn!(alert_id = alert.id, error = %e, "webhook delivery failed");
                false
            }
        }
    }
}

/// Stand-in notifier used when no webhook URL is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, alert: &OutboundAlert) -> bool {
        tracing::info!(
            alert_id = alert.id,
            alert_type = alert.alert_type,
            message = alert.message,
            "alert (no webhook configured)"
        );
        true
    }
}

/// Render the user-facing notification text for an alert.
///
/// `content` is truncated to its first 100 characters.
#[must_use]
pub fn format_message(alert_type: &str, author_name: &str, content: &str) -> String {
    let preview: String = content.chars().take(100).collect();
    match alert_type {
        "high_priority" => {
            format!("High Priority: New post from {author_name}\n{preview}...")
        }
        "market_impact" => {
            format!("Market Alert: {author_name} posted about market conditions\n{preview}...")
        }
        _ => format!("{author_name} has posted: {preview}..."),
    }
}
