use anyhow::Result;
use async_trait::async_trait;

use crate::helpers::email_templates::EmailContent;

#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
    pub reply_to: Option<String>,
}

impl OutboundEmail {
    pub fn new(to: impl Into<String>, from: impl Into<String>, content: EmailContent) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            subject: content.subject,
            html_body: content.html_body,
            text_body: content.text_body,
            reply_to: None,
        }
    }

    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to = Some(address.into());
        self
    }
}

/// Outbound email capability. One attempt per call, no retries.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<()>;
}

/// Used when no delivery credentials are configured; every send fails.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, email: OutboundEmail) -> Result<()> {
        tracing::warn!("Email delivery is not configured, dropping mail to {}", email.to);
        Err(anyhow::anyhow!("email delivery is not configured"))
    }
}
