use shared_types::LikeStatus;
use std::sync::Arc;

use crate::database::BuildStore;
use crate::error::{BuildError, BuildResult};
use crate::helpers::clock::Clock;
use crate::helpers::validation::is_blank;

/// One like per originating address per project
pub struct LikeManager {
    store: Arc<dyn BuildStore>,
    clock: Arc<dyn Clock>,
}

impl LikeManager {
    pub fn new(store: Arc<dyn BuildStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    async fn require_project(&self, slug: &str) -> BuildResult<()> {
        if is_blank(slug) {
            return Err(BuildError::Validation("Slug is required".to_string()));
        }
        if !self.store.slug_exists(slug).await? {
            return Err(BuildError::project_not_found());
        }
        Ok(())
    }

    /// Flip the like for `(slug, address)`. Successive calls alternate.
    pub async fn toggle_like(&self, slug: &str, address: &str) -> BuildResult<LikeStatus> {
        let slug = slug.trim();
        self.require_project(slug).await?;

        if self.store.has_liked(slug, address).await? {
            let likes = self.store.remove_like(slug, address).await?;
            tracing::debug!("{} unliked {} ({} likes)", address, slug, likes);
            Ok(LikeStatus {
                liked: false,
                likes,
            })
        } else {
            let now = self.clock.now().timestamp();
            let likes = self.store.add_like(slug, address, now).await?;
            tracing::debug!("{} liked {} ({} likes)", address, slug, likes);
            Ok(LikeStatus { liked: true, likes })
        }
    }

    pub async fn like_status(&self, slug: &str, address: &str) -> BuildResult<LikeStatus> {
        let slug = slug.trim();
        if is_blank(slug) {
            return Err(BuildError::Validation("Slug is required".to_string()));
        }

        let project = self
            .store
            .find_by_slug(slug)
            .await?
            .ok_or_else(BuildError::project_not_found)?;
        let liked = self.store.has_liked(slug, address).await?;

        Ok(LikeStatus {
            liked,
            likes: project.likes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_project, FixedClock, TestDb};

    async fn manager(db: &TestDb) -> LikeManager {
        let store: Arc<dyn BuildStore> = Arc::new(db.store());
        store.insert_project(&sample_project("foo"), 1).await.unwrap();
        LikeManager::new(store, Arc::new(FixedClock::at(1_700_000_000)))
    }

    #[tokio::test]
    async fn test_toggle_alternates() {
        let db = TestDb::new();
        let likes = manager(&db).await;

        let first = likes.toggle_like("foo", "1.1.1.1").await.unwrap();
        assert_eq!(first, LikeStatus { liked: true, likes: 1 });

        let second = likes.toggle_like("foo", "1.1.1.1").await.unwrap();
        assert_eq!(second, LikeStatus { liked: false, likes: 0 });

        let third = likes.toggle_like("foo", "1.1.1.1").await.unwrap();
        assert_eq!(third, LikeStatus { liked: true, likes: 1 });
    }

    #[tokio::test]
    async fn test_status_is_per_address() {
        let db = TestDb::new();
        let likes = manager(&db).await;

        likes.toggle_like("foo", "1.1.1.1").await.unwrap();
        likes.toggle_like("foo", "2.2.2.2").await.unwrap();
        likes.toggle_like("foo", "2.2.2.2").await.unwrap();

        assert_eq!(
            likes.like_status("foo", "1.1.1.1").await.unwrap(),
            LikeStatus { liked: true, likes: 1 }
        );
        assert_eq!(
            likes.like_status("foo", "2.2.2.2").await.unwrap(),
            LikeStatus { liked: false, likes: 1 }
        );
    }

    #[tokio::test]
    async fn test_counter_never_negative() {
        let db = TestDb::new();
        let likes = manager(&db).await;

        for _ in 0..5 {
            let status = likes.toggle_like("foo", "1.1.1.1").await.unwrap();
            assert!(status.likes >= 0);
        }
        let status = likes.like_status("foo", "3.3.3.3").await.unwrap();
        assert_eq!(status.likes, 1);
    }

    #[tokio::test]
    async fn test_unknown_or_blank_slug() {
        let db = TestDb::new();
        let likes = manager(&db).await;

        assert!(matches!(
            likes.toggle_like("nope", "1.1.1.1").await,
            Err(BuildError::NotFound(_))
        ));
        assert!(matches!(
            likes.like_status("nope", "1.1.1.1").await,
            Err(BuildError::NotFound(_))
        ));
        assert!(matches!(
            likes.toggle_like(" ", "1.1.1.1").await,
            Err(BuildError::Validation(_))
        ));
    }
}
