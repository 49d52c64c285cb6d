use async_trait::async_trait;
use anyhow::Result;

use crate::database::{contact_attempts, likes, projects, AsyncDbConnection};

pub use projects::{NewProject, ProjectRecord};

/// Everything the services need from persistence.
///
/// Counter changes go through `add_like`/`remove_like`, which update the
/// ledger and the denormalized `likes` column atomically.
#[async_trait]
pub trait BuildStore: Send + Sync {
    /// Returns the number of stored projects, or `None` if the slug is taken
    async fn insert_project(&self, project: &NewProject, now: i64) -> Result<Option<i64>>;
    async fn list_projects(&self) -> Result<Vec<ProjectRecord>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ProjectRecord>>;
    async fn slug_exists(&self, slug: &str) -> Result<bool>;

    async fn begin_claim(
        &self,
        slug: &str,
        email: &str,
        token: &str,
        allow_contact: bool,
        issued_at: i64,
    ) -> Result<bool>;
    async fn find_by_claim_token(&self, slug: &str, token: &str) -> Result<Option<ProjectRecord>>;
    async fn complete_claim(&self, slug: &str, token: &str, now: i64) -> Result<bool>;

    async fn has_liked(&self, slug: &str, address: &str) -> Result<bool>;
    async fn add_like(&self, slug: &str, address: &str, now: i64) -> Result<i64>;
    async fn remove_like(&self, slug: &str, address: &str) -> Result<i64>;

    async fn record_contact_attempt(&self, address: &str, slug: &str, at: i64) -> Result<()>;
    async fn count_contact_attempts_since(&self, address: &str, since: i64) -> Result<i64>;
}

#[derive(Clone)]
pub struct SqliteBuildStore {
    conn: AsyncDbConnection,
}

impl SqliteBuildStore {
    pub fn new(conn: AsyncDbConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl BuildStore for SqliteBuildStore {
    async fn insert_project(&self, project: &NewProject, now: i64) -> Result<Option<i64>> {
        projects::insert_project(self.conn.clone(), project, now).await
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>> {
        projects::list_projects(self.conn.clone()).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ProjectRecord>> {
        projects::get_project(self.conn.clone(), slug).await
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool> {
        projects::slug_exists(self.conn.clone(), slug).await
    }

    async fn begin_claim(
        &self,
        slug: &str,
        email: &str,
        token: &str,
        allow_contact: bool,
        issued_at: i64,
    ) -> Result<bool> {
        projects::begin_claim(self.conn.clone(), slug, email, token, allow_contact, issued_at)
            .await
    }

    async fn find_by_claim_token(&self, slug: &str, token: &str) -> Result<Option<ProjectRecord>> {
        projects::find_by_claim_token(self.conn.clone(), slug, token).await
    }

    async fn complete_claim(&self, slug: &str, token: &str, now: i64) -> Result<bool> {
        projects::complete_claim(self.conn.clone(), slug, token, now).await
    }

    async fn has_liked(&self, slug: &str, address: &str) -> Result<bool> {
        likes::has_liked(self.conn.clone(), slug, address).await
    }

    async fn add_like(&self, slug: &str, address: &str, now: i64) -> Result<i64> {
        likes::add_like(self.conn.clone(), slug, address, now).await
    }

    async fn remove_like(&self, slug: &str, address: &str) -> Result<i64> {
        likes::remove_like(self.conn.clone(), slug, address).await
    }

    async fn record_contact_attempt(&self, address: &str, slug: &str, at: i64) -> Result<()> {
        contact_attempts::insert_attempt(self.conn.clone(), address, slug, at).await?;
        Ok(())
    }

    async fn count_contact_attempts_since(&self, address: &str, since: i64) -> Result<i64> {
        contact_attempts::count_attempts_since(self.conn.clone(), address, since).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_project, TestDb};

    #[tokio::test]
    async fn test_insert_rejects_duplicate_slug() {
        let db = TestDb::new();
        let store = db.store();

        assert_eq!(
            store.insert_project(&sample_project("foo"), 1).await.unwrap(),
            Some(1)
        );
        assert_eq!(
            store.insert_project(&sample_project("bar"), 2).await.unwrap(),
            Some(2)
        );
        assert_eq!(
            store.insert_project(&sample_project("foo"), 3).await.unwrap(),
            None
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_get_distinct_numbers() {
        let db = TestDb::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = db.store();
                tokio::spawn(async move {
                    store
                        .insert_project(&sample_project(&format!("build-{}", i)), i)
                        .await
                        .unwrap()
                        .unwrap()
                })
            })
            .collect();

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap());
        }
        numbers.sort();
        assert_eq!(numbers, (1..=8).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_round_trips_json_columns() {
        let db = TestDb::new();
        let store = db.store();

        let mut older = sample_project("older");
        older.tags = vec!["rust".to_string(), "cli".to_string()];
        older.links.github = Some("https://github.com/older".to_string());
        store.insert_project(&older, 100).await.unwrap();
        store.insert_project(&sample_project("newer"), 200).await.unwrap();

        let listed = store.list_projects().await.unwrap();
        let slugs: Vec<_> = listed.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newer", "older"]);

        let older = &listed[1];
        assert_eq!(older.tags, vec!["rust", "cli"]);
        assert_eq!(older.links.github.as_deref(), Some("https://github.com/older"));
        assert!(older.allow_contact);
        assert!(!older.claimed);
        assert_eq!(older.likes, 0);
    }

    #[tokio::test]
    async fn test_claim_columns_lifecycle() {
        let db = TestDb::new();
        let store = db.store();
        store.insert_project(&sample_project("foo"), 1).await.unwrap();

        assert!(store
            .begin_claim("foo", "a@b.com", "t1", false, 10)
            .await
            .unwrap());
        assert!(store
            .begin_claim("foo", "a@b.com", "t2", true, 11)
            .await
            .unwrap());

        // Only the latest token is live
        assert!(store.find_by_claim_token("foo", "t1").await.unwrap().is_none());
        let pending = store.find_by_claim_token("foo", "t2").await.unwrap().unwrap();
        assert_eq!(pending.claim_token_issued_at, Some(11));
        assert_eq!(pending.email.as_deref(), Some("a@b.com"));

        assert!(store.complete_claim("foo", "t2", 12).await.unwrap());
        assert!(!store.complete_claim("foo", "t2", 13).await.unwrap());

        let claimed = store.find_by_slug("foo").await.unwrap().unwrap();
        assert!(claimed.claimed);
        assert!(claimed.claim_token.is_none());
        assert!(claimed.claim_token_issued_at.is_none());

        assert!(!store
            .begin_claim("foo", "c@d.com", "t3", true, 14)
            .await
            .unwrap());
        assert!(!store
            .begin_claim("missing", "c@d.com", "t3", true, 14)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_like_counter_tracks_ledger() {
        let db = TestDb::new();
        let store = db.store();
        store.insert_project(&sample_project("foo"), 1).await.unwrap();

        assert_eq!(store.add_like("foo", "1.1.1.1", 1).await.unwrap(), 1);
        assert_eq!(store.add_like("foo", "1.1.1.1", 2).await.unwrap(), 1);
        assert_eq!(store.add_like("foo", "2.2.2.2", 3).await.unwrap(), 2);
        assert!(store.has_liked("foo", "1.1.1.1").await.unwrap());

        assert_eq!(store.remove_like("foo", "1.1.1.1").await.unwrap(), 1);
        assert_eq!(store.remove_like("foo", "1.1.1.1").await.unwrap(), 1);
        assert_eq!(store.remove_like("foo", "2.2.2.2").await.unwrap(), 0);
        assert_eq!(store.remove_like("foo", "2.2.2.2").await.unwrap(), 0);
        assert!(!store.has_liked("foo", "1.1.1.1").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_like_keeps_drifted_counter_at_zero() {
        let db = TestDb::new();
        let store = db.store();
        store.insert_project(&sample_project("foo"), 1).await.unwrap();

        {
            let conn = db.db.async_connection.lock().await.unwrap();
            conn.execute(
                "INSERT INTO project_likes (project_slug, ip_address, created_at)
                 VALUES ('foo', '1.1.1.1', 1)",
                [],
            )
            .unwrap();
            conn.execute("UPDATE projects SET likes = 0 WHERE slug = 'foo'", [])
                .unwrap();
        }

        assert_eq!(store.remove_like("foo", "1.1.1.1").await.unwrap(), 0);
        assert!(!store.has_liked("foo", "1.1.1.1").await.unwrap());
        assert_eq!(store.find_by_slug("foo").await.unwrap().unwrap().likes, 0);
    }

    #[tokio::test]
    async fn test_contact_attempt_window_is_exclusive() {
        let db = TestDb::new();
        let store = db.store();

        store.record_contact_attempt("1.1.1.1", "foo", 100).await.unwrap();
        store.record_contact_attempt("1.1.1.1", "bar", 200).await.unwrap();
        store.record_contact_attempt("2.2.2.2", "foo", 200).await.unwrap();

        assert_eq!(
            store.count_contact_attempts_since("1.1.1.1", 99).await.unwrap(),
            2
        );
        assert_eq!(
            store.count_contact_attempts_since("1.1.1.1", 100).await.unwrap(),
            1
        );
        assert_eq!(
            store.count_contact_attempts_since("3.3.3.3", 0).await.unwrap(),
            0
        );
    }
}
