pub mod mailer;
pub mod postmark;

pub use mailer::{DisabledMailer, Mailer, OutboundEmail};
pub use postmark::PostmarkMailer;

use std::sync::Arc;

use crate::config::EmailConfig;

/// Postmark when a server token is configured, otherwise a mailer that refuses
pub fn build_mailer(config: &EmailConfig) -> anyhow::Result<Arc<dyn Mailer>> {
    match config
        .postmark_server_token
        .as_deref()
        .filter(|t| !t.trim().is_empty())
    {
        Some(token) => Ok(Arc::new(PostmarkMailer::new(token)?)),
        None => {
            tracing::warn!("No Postmark server token configured, outbound email is disabled");
            Ok(Arc::new(DisabledMailer))
        }
    }
}
