// src/notify/webhook.rs
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook responded with HTTP {0}")]
    UnexpectedStatus(u16),

    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Fire-and-forget delivery of a rendered alert.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str);
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    username: &'a str,
}

#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    webhook_url: String,
    username: String,
}

impl WebhookNotifier {
    pub fn new(
        webhook_url: impl Into<String>,
        username: impl Into<String>,
        request_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to create webhook HTTP client")?;

        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
            username: username.into(),
        })
    }

    /// Post one message. Only HTTP 204 counts as delivered.
    pub async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let payload = WebhookPayload {
            content: message,
            username: &self.username,
        };

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            other => Err(NotifyError::UnexpectedStatus(other.as_u16())),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str) {
        match self.send(message).await {
            Ok(()) => info!("Webhook notification delivered"),
            Err(e) => error!("Webhook notification failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn notifier(url: String) -> WebhookNotifier {
        WebhookNotifier::new(url, "Heartbeat Monitor", Duration::from_secs(10)).unwrap()
    }

    #[tokio::test]
    async fn test_send_posts_content_and_username() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "content": "🔴 down",
                "username": "Heartbeat Monitor",
            })))
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let result = notifier(format!("{}/hook", server.url())).send("🔴 down").await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_204_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/hook")
            .with_status(500)
            .create_async()
            .await;

        let err = notifier(format!("{}/hook", server.url()))
            .send("hello")
            .await
            .unwrap_err();

        assert!(matches!(err, NotifyError::UnexpectedStatus(500)));
    }

    #[tokio::test]
    async fn test_notify_swallows_failures() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        // No retry, no panic.
        notifier(format!("{}/hook", server.url())).notify("hello").await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_webhook_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = notifier(format!("http://{}/hook", addr))
            .send("hello")
            .await
            .unwrap_err();

        assert!(matches!(err, NotifyError::Transport(_)));
    }
}
