//! LINE Messaging API push client.
//!
//! Sends text messages through the push endpoint with a channel access
//! token. Delivery failure is reported as an error for the caller to log;
//! it never fails the run.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use common::{Error, NotificationSink, Result};

const PUSH_URL: &str = "https://api.line.me/v2/bot/message/push";

/// REST client for the LINE Messaging API push endpoint.
pub struct LinePush {
    token: String,
    http: Client,
}

impl LinePush {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            http: Client::builder()
                .timeout(Duration::from_secs(15))
                .use_rustls_tls()
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl NotificationSink for LinePush {
    async fn push(&self, to: &str, message: &str) -> Result<()> {
        let body = PushBody {
            to,
            messages: vec![TextMessage::text(message)],
        };

        debug!(to = %to, chars = message.chars().count(), "Pushing LINE message");

        let resp = self
            .http
            .post(PUSH_URL)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Notify(format!("HTTP {status}: {text}")));
        }
        Ok(())
    }
}

// ─── Request types ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct PushBody<'a> {
    to: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl<'a> TextMessage<'a> {
    fn text(text: &'a str) -> Self {
        Self { kind: "text", text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_body_matches_the_wire_format() {
        let body = PushBody {
            to: "U1234",
            messages: vec![TextMessage::text("hello")],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "to": "U1234",
                "messages": [{"type": "text", "text": "hello"}],
            })
        );
    }
}
