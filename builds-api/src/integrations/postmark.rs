use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::mailer::{Mailer, OutboundEmail};

const POSTMARK_API_URL: &str = "https://api.postmarkapp.com/email";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PostmarkMessage<'a> {
    from: &'a str,
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PostmarkResponse {
    error_code: i64,
    message: String,
}

pub struct PostmarkMailer {
    client: reqwest::Client,
    server_token: String,
    api_url: String,
}

impl PostmarkMailer {
    pub fn new(server_token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            server_token: server_token.into(),
            api_url: POSTMARK_API_URL.to_string(),
        })
    }
}

#[async_trait]
impl Mailer for PostmarkMailer {
    async fn send(&self, email: OutboundEmail) -> Result<()> {
        let message = PostmarkMessage {
            from: &email.from,
            to: &email.to,
            reply_to: email.reply_to.as_deref(),
            subject: &email.subject,
            html_body: &email.html_body,
            text_body: &email.text_body,
            message_stream: "outbound",
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Accept", "application/json")
            .header("X-Postmark-Server-Token", &self.server_token)
            .json(&message)
            .send()
            .await
            .context("Postmark request failed")?;

        let status = response.status();
        let body: PostmarkResponse = response
            .json()
            .await
            .with_context(|| format!("Unreadable Postmark response (HTTP {})", status))?;

        if !status.is_success() || body.error_code != 0 {
            anyhow::bail!(
                "Postmark rejected message (HTTP {}, code {}): {}",
                status,
                body.error_code,
                body.message
            );
        }

        tracing::debug!("Postmark accepted message to {}", email.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_uses_postmark_field_names() {
        let message = PostmarkMessage {
            from: "hello@100builds.com",
            to: "owner@example.com",
            reply_to: Some("fan@example.com"),
            subject: "Hi",
            html_body: "<p>Hi</p>",
            text_body: "Hi",
            message_stream: "outbound",
        };

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["From"], "hello@100builds.com");
        assert_eq!(json["ReplyTo"], "fan@example.com");
        assert_eq!(json["HtmlBody"], "<p>Hi</p>");
        assert_eq!(json["MessageStream"], "outbound");
    }

    #[test]
    fn test_reply_to_omitted_when_absent() {
        let message = PostmarkMessage {
            from: "a@b.com",
            to: "c@d.com",
            reply_to: None,
            subject: "s",
            html_body: "h",
            text_body: "t",
            message_stream: "outbound",
        };

        let json = serde_json::to_value(&message).unwrap();
        assert!(json.get("ReplyTo").is_none());
    }
}
