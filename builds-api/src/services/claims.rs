use chrono::Duration;
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;

use crate::config::{ApiConfig, SiteConfig};
use crate::database::{BuildStore, ProjectRecord};
use crate::error::{BuildError, BuildResult};
use crate::helpers::clock::Clock;
use crate::helpers::email_templates;
use crate::helpers::validation::{is_blank, require_email};
use crate::integrations::{Mailer, OutboundEmail};

/// Claim tokens carry 256 bits from the OS random source
const CLAIM_TOKEN_BYTES: usize = 32;

pub fn generate_claim_token() -> String {
    let mut bytes = [0u8; CLAIM_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[derive(Debug, Clone)]
pub struct ClaimSettings {
    pub site: SiteConfig,
    pub from_address: String,
    pub admin_address: Option<String>,
    pub token_ttl_hours: i64,
}

impl ClaimSettings {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            site: config.site.clone(),
            from_address: config.email.from_address.clone(),
            admin_address: config.email.admin_address.clone(),
            token_ttl_hours: config.claim.token_ttl_hours,
        }
    }
}

/// Moves a build from unclaimed, through pending verification, to claimed.
///
/// A repeated request while unclaimed replaces the outstanding token, so only
/// the most recently emailed link can be redeemed.
pub struct ClaimManager {
    store: Arc<dyn BuildStore>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    settings: ClaimSettings,
}

impl ClaimManager {
    pub fn new(
        store: Arc<dyn BuildStore>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
        settings: ClaimSettings,
    ) -> Self {
        Self {
            store,
            mailer,
            clock,
            settings,
        }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.settings.site
    }

    pub fn verification_url(&self, slug: &str, token: &str) -> String {
        self.settings
            .site
            .url(&format!(
                "/api/verify-claim?token={}&slug={}",
                urlencoding::encode(token),
                urlencoding::encode(slug)
            ))
    }

    /// Issue a claim token for `slug` and email the verification link.
    ///
    /// Delivery failure is logged but does not fail the request: the token is
    /// already stored and the link is written to the log instead.
    pub async fn request_claim(
        &self,
        slug: &str,
        email: &str,
        allow_contact: bool,
    ) -> BuildResult<()> {
        let slug = slug.trim();
        let email = email.trim();

        if is_blank(slug) || is_blank(email) {
            return Err(BuildError::Validation(
                "Slug and email are required".to_string(),
            ));
        }
        require_email(email)?;

        let project = self
            .store
            .find_by_slug(slug)
            .await?
            .ok_or_else(BuildError::project_not_found)?;

        if project.claimed {
            return Err(already_claimed());
        }

        let token = generate_claim_token();
        let issued_at = self.clock.now().timestamp();

        // Guarded on claimed = 0, so a claim completed in between loses here
        if !self
            .store
            .begin_claim(slug, email, &token, allow_contact, issued_at)
            .await?
        {
            return Err(already_claimed());
        }

        let verification_url = self.verification_url(slug, &token);
        let content =
            email_templates::claim_verification(&verification_url, self.settings.token_ttl_hours);
        let message = OutboundEmail::new(email, &self.settings.from_address, content);

        match self.mailer.send(message).await {
            Ok(()) => tracing::info!("Verification email sent to {} for build {}", email, slug),
            Err(e) => {
                tracing::error!("Failed to send verification email to {}: {:#}", email, e);
                tracing::warn!("Verification link (email failed): {}", verification_url);
            }
        }

        Ok(())
    }

    /// Redeem a claim token. Succeeds at most once per token.
    pub async fn verify_claim(&self, slug: &str, token: &str) -> BuildResult<ProjectRecord> {
        let slug = slug.trim();
        let token = token.trim();

        if is_blank(slug) || is_blank(token) {
            return Err(BuildError::InvalidToken);
        }

        let mut project = self
            .store
            .find_by_claim_token(slug, token)
            .await?
            .ok_or(BuildError::InvalidToken)?;

        let now = self.clock.now();

        if let Some(issued_at) = project.claim_token_issued_at {
            let age = now.timestamp() - issued_at;
            if age > Duration::hours(self.settings.token_ttl_hours).num_seconds() {
                tracing::info!("Rejected expired claim token for build {}", slug);
                return Err(BuildError::ExpiredToken);
            }
        }

        if !self
            .store
            .complete_claim(slug, token, now.timestamp())
            .await?
        {
            return Err(BuildError::InvalidToken);
        }

        project.claimed = true;
        project.claim_token = None;
        project.claim_token_issued_at = None;

        tracing::info!("Build {} claimed", slug);
        self.notify_admin(&project).await;

        Ok(project)
    }

    async fn notify_admin(&self, project: &ProjectRecord) {
        let Some(admin) = self.settings.admin_address.as_deref() else {
            return;
        };

        let build_url = self.settings.site.url(&format!("/build/{}", project.slug));
        let content = email_templates::claim_notice(
            &project.name,
            project.email.as_deref().unwrap_or("unknown"),
            &build_url,
        );
        let message = OutboundEmail::new(admin, &self.settings.from_address, content);

        if let Err(e) = self.mailer.send(message).await {
            tracing::warn!("Failed to send claim notice for {}: {:#}", project.slug, e);
        }
    }
}

fn already_claimed() -> BuildError {
    BuildError::Conflict("This build has already been claimed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_project, FixedClock, RecordingMailer, TestDb};

    struct Fixture {
        _db: TestDb,
        store: Arc<dyn BuildStore>,
        mailer: Arc<RecordingMailer>,
        clock: Arc<FixedClock>,
        manager: ClaimManager,
    }

    async fn fixture(admin: Option<&str>) -> Fixture {
        let db = TestDb::new();
        let store: Arc<dyn BuildStore> = Arc::new(db.store());
        store
            .insert_project(&sample_project("foo"), 1)
            .await
            .unwrap();

        let mailer = Arc::new(RecordingMailer::default());
        let clock = Arc::new(FixedClock::at(1_700_000_000));
        let settings = ClaimSettings {
            site: SiteConfig {
                base_url: "https://100builds.test".to_string(),
            },
            from_address: "hello@100builds.test".to_string(),
            admin_address: admin.map(str::to_string),
            token_ttl_hours: 24,
        };
        let manager = ClaimManager::new(store.clone(), mailer.clone(), clock.clone(), settings);

        Fixture {
            _db: db,
            store,
            mailer,
            clock,
            manager,
        }
    }

    async fn pending_token(store: &Arc<dyn BuildStore>) -> String {
        store
            .find_by_slug("foo")
            .await
            .unwrap()
            .unwrap()
            .claim_token
            .expect("token should be pending")
    }

    #[test]
    fn test_generated_tokens_are_256_bit_hex() {
        let a = generate_claim_token();
        let b = generate_claim_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_verification_url_encodes_query_values() {
        let f = fixture(None).await;

        assert_eq!(
            f.manager.verification_url("foo", "abc123"),
            "https://100builds.test/api/verify-claim?token=abc123&slug=foo"
        );
        assert_eq!(
            f.manager.verification_url("a&b c", "x=y#z"),
            "https://100builds.test/api/verify-claim?token=x%3Dy%23z&slug=a%26b%20c"
        );
    }

    #[tokio::test]
    async fn test_request_claim_persists_token_and_emails_link() {
        let f = fixture(None).await;

        f.manager.request_claim("foo", "a@b.com", false).await.unwrap();

        let project = f.store.find_by_slug("foo").await.unwrap().unwrap();
        let token = project.claim_token.clone().unwrap();
        assert!(!token.is_empty());
        assert!(!project.claimed);
        assert!(!project.allow_contact);
        assert_eq!(project.email.as_deref(), Some("a@b.com"));

        let sent = f.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@b.com");
        assert!(sent[0].text_body.contains(&format!(
            "https://100builds.test/api/verify-claim?token={}&slug=foo",
            token
        )));
    }

    #[tokio::test]
    async fn test_request_claim_validation_and_lookup_errors() {
        let f = fixture(None).await;

        assert!(matches!(
            f.manager.request_claim("", "a@b.com", true).await,
            Err(BuildError::Validation(_))
        ));
        assert!(matches!(
            f.manager.request_claim("foo", "not-an-email", true).await,
            Err(BuildError::Validation(_))
        ));
        assert!(matches!(
            f.manager.request_claim("missing", "a@b.com", true).await,
            Err(BuildError::NotFound(_))
        ));
        assert!(f.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_email_failure_does_not_fail_request() {
        let f = fixture(None).await;
        f.mailer.fail_sends(true);

        f.manager.request_claim("foo", "a@b.com", true).await.unwrap();

        assert!(!pending_token(&f.store).await.is_empty());
    }

    #[tokio::test]
    async fn test_repeat_request_replaces_token() {
        let f = fixture(None).await;

        f.manager.request_claim("foo", "a@b.com", true).await.unwrap();
        let first = pending_token(&f.store).await;
        f.manager.request_claim("foo", "c@d.com", true).await.unwrap();
        let second = pending_token(&f.store).await;

        assert_ne!(first, second);
        assert!(matches!(
            f.manager.verify_claim("foo", &first).await,
            Err(BuildError::InvalidToken)
        ));
        f.manager.verify_claim("foo", &second).await.unwrap();
    }

    #[tokio::test]
    async fn test_verify_claims_once_and_clears_token() {
        let f = fixture(None).await;
        f.manager.request_claim("foo", "a@b.com", true).await.unwrap();
        let token = pending_token(&f.store).await;

        let claimed = f.manager.verify_claim("foo", &token).await.unwrap();
        assert!(claimed.claimed);
        assert!(claimed.claim_token.is_none());

        let stored = f.store.find_by_slug("foo").await.unwrap().unwrap();
        assert!(stored.claimed);
        assert!(stored.claim_token.is_none());

        assert!(matches!(
            f.manager.verify_claim("foo", &token).await,
            Err(BuildError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_verify_requires_exact_slug_and_token() {
        let f = fixture(None).await;
        f.store
            .insert_project(&sample_project("bar"), 2)
            .await
            .unwrap();
        f.manager.request_claim("foo", "a@b.com", true).await.unwrap();
        let token = pending_token(&f.store).await;

        assert!(matches!(
            f.manager.verify_claim("bar", &token).await,
            Err(BuildError::InvalidToken)
        ));
        assert!(matches!(
            f.manager.verify_claim("foo", "deadbeef").await,
            Err(BuildError::InvalidToken)
        ));
        assert!(matches!(
            f.manager.verify_claim("foo", "").await,
            Err(BuildError::InvalidToken)
        ));
        assert!(!f.store.find_by_slug("foo").await.unwrap().unwrap().claimed);
    }

    #[tokio::test]
    async fn test_already_claimed_is_conflict_and_leaves_state() {
        let f = fixture(None).await;
        f.manager.request_claim("foo", "a@b.com", true).await.unwrap();
        let token = pending_token(&f.store).await;
        f.manager.verify_claim("foo", &token).await.unwrap();
        let before = f.store.find_by_slug("foo").await.unwrap().unwrap();

        assert!(matches!(
            f.manager.request_claim("foo", "evil@x.com", false).await,
            Err(BuildError::Conflict(_))
        ));

        let after = f.store.find_by_slug("foo").await.unwrap().unwrap();
        assert_eq!(after.email, before.email);
        assert_eq!(after.allow_contact, before.allow_contact);
        assert!(after.claim_token.is_none());
        assert!(after.claimed);
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let f = fixture(None).await;
        f.manager.request_claim("foo", "a@b.com", true).await.unwrap();
        let token = pending_token(&f.store).await;

        f.clock.advance(24 * 3600 + 1);

        assert!(matches!(
            f.manager.verify_claim("foo", &token).await,
            Err(BuildError::ExpiredToken)
        ));
        assert!(!f.store.find_by_slug("foo").await.unwrap().unwrap().claimed);
    }

    #[tokio::test]
    async fn test_token_valid_right_up_to_ttl() {
        let f = fixture(None).await;
        f.manager.request_claim("foo", "a@b.com", true).await.unwrap();
        let token = pending_token(&f.store).await;

        f.clock.advance(24 * 3600);

        f.manager.verify_claim("foo", &token).await.unwrap();
    }

    #[tokio::test]
    async fn test_admin_notice_is_best_effort() {
        let f = fixture(Some("admin@100builds.test")).await;
        f.manager.request_claim("foo", "a@b.com", true).await.unwrap();
        let token = pending_token(&f.store).await;

        f.mailer.fail_sends(true);
        f.manager.verify_claim("foo", &token).await.unwrap();
        f.mailer.fail_sends(false);

        // Verification email went out, the failed notice was not recorded
        let sent = f.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(f.store.find_by_slug("foo").await.unwrap().unwrap().claimed);
    }

    #[tokio::test]
    async fn test_admin_notice_sent_when_configured() {
        let f = fixture(Some("admin@100builds.test")).await;
        f.manager.request_claim("foo", "a@b.com", true).await.unwrap();
        let token = pending_token(&f.store).await;

        f.manager.verify_claim("foo", &token).await.unwrap();

        let sent = f.mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].to, "admin@100builds.test");
        assert!(sent[1].text_body.contains("a@b.com"));
    }
}
