use chrono::Duration;
use shared_types::ContactRequest;
use std::sync::Arc;

use crate::config::{ApiConfig, ContactConfig};
use crate::database::BuildStore;
use crate::error::{BuildError, BuildResult};
use crate::helpers::clock::Clock;
use crate::helpers::email_templates;
use crate::helpers::spam_filter::SpamFilter;
use crate::helpers::validation::{is_blank, require_email};
use crate::integrations::{Mailer, OutboundEmail};

/// Relays visitor messages to build owners by email.
///
/// Every attempt that passes validation and lookup is recorded before
/// delivery and counts toward the sender's hourly limit even if delivery
/// then fails.
pub struct ContactRelay {
    store: Arc<dyn BuildStore>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    spam_filter: SpamFilter,
    max_message_length: usize,
    window: Duration,
    max_attempts: i64,
    from_address: String,
}

impl ContactRelay {
    pub fn new(
        store: Arc<dyn BuildStore>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
        contact: &ContactConfig,
        from_address: impl Into<String>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            store,
            mailer,
            clock,
            spam_filter: SpamFilter::new(&contact.spam_keywords)?,
            max_message_length: contact.max_message_length,
            window: Duration::minutes(contact.rate_limit_window_minutes),
            max_attempts: contact.rate_limit_max_attempts,
            from_address: from_address.into(),
        })
    }

    pub fn from_config(
        store: Arc<dyn BuildStore>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
        config: &ApiConfig,
    ) -> anyhow::Result<Self> {
        Self::new(
            store,
            mailer,
            clock,
            &config.contact,
            config.email.from_address.clone(),
        )
    }

    fn validate(&self, request: &ContactRequest) -> BuildResult<()> {
        if is_blank(&request.slug)
            || is_blank(&request.name)
            || is_blank(&request.email)
            || is_blank(&request.message)
        {
            return Err(BuildError::Validation(
                "All fields are required".to_string(),
            ));
        }

        require_email(request.email.trim())?;

        if request.message.chars().count() > self.max_message_length {
            return Err(BuildError::Validation(format!(
                "Message is too long (max {} characters)",
                self.max_message_length
            )));
        }

        if self.spam_filter.contains_markup(&request.message) {
            return Err(BuildError::Validation(
                "HTML and scripts are not allowed in messages".to_string(),
            ));
        }

        if self.spam_filter.is_spam(&request.message) {
            return Err(BuildError::SpamDetected);
        }

        Ok(())
    }

    pub async fn send_message(
        &self,
        request: &ContactRequest,
        origin_address: &str,
    ) -> BuildResult<()> {
        self.validate(request)?;

        let slug = request.slug.trim();
        let name = request.name.trim();
        let reply_to = request.email.trim();
        let now = self.clock.now();

        // Sliding lookback from now, not fixed buckets
        let since = (now - self.window).timestamp();
        let recent = self
            .store
            .count_contact_attempts_since(origin_address, since)
            .await?;
        if recent >= self.max_attempts {
            tracing::info!("Rate limited contact attempt from {}", origin_address);
            return Err(BuildError::RateLimited);
        }

        let project = self
            .store
            .find_by_slug(slug)
            .await?
            .ok_or_else(BuildError::project_not_found)?;

        if !project.allow_contact {
            return Err(BuildError::PermissionDenied(
                "The project owner has disabled contact for this listing".to_string(),
            ));
        }

        let Some(owner_email) = project.email.as_deref() else {
            return Err(BuildError::Validation(
                "This project does not have contact information available".to_string(),
            ));
        };

        self.store
            .record_contact_attempt(origin_address, slug, now.timestamp())
            .await?;

        let content = email_templates::contact_message(name, &project.name, &request.message);
        let message =
            OutboundEmail::new(owner_email, &self.from_address, content).reply_to(reply_to);

        if let Err(e) = self.mailer.send(message).await {
            tracing::error!("Failed to relay contact message for {}: {:#}", slug, e);
            return Err(BuildError::DeliveryFailed);
        }

        tracing::info!("Contact email sent to owner of {}", slug);
        Ok(())
    }
}
