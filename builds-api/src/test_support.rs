use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use shared_types::{ProjectLinks, ProjectType};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

use crate::database::{Database, NewProject, SqliteBuildStore};
use crate::helpers::clock::Clock;
use crate::integrations::{Mailer, OutboundEmail};

/// Throwaway on-disk database, removed on drop
pub struct TestDb {
    _dir: TempDir,
    pub db: Database,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let db = Database::new(&dir.path().join("builds.db")).unwrap();
        Self { _dir: dir, db }
    }

    pub fn store(&self) -> SqliteBuildStore {
        SqliteBuildStore::new(self.db.async_connection.clone())
    }
}

pub fn sample_project(slug: &str) -> NewProject {
    NewProject {
        id: format!("id-{}", slug),
        slug: slug.to_string(),
        project_type: ProjectType::Show,
        name: format!("Project {}", slug),
        description: "A thing I built".to_string(),
        avatar: None,
        featured_image: None,
        tags: Vec::new(),
        category: None,
        needs: None,
        links: ProjectLinks::default(),
        date: "2026-01-01T00:00:00Z".to_string(),
    }
}

pub struct FixedClock {
    secs: AtomicI64,
}

impl FixedClock {
    pub fn at(secs: i64) -> Self {
        Self {
            secs: AtomicI64::new(secs),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.secs.load(Ordering::SeqCst), 0).unwrap()
    }
}

/// Keeps every successfully sent email; failed sends are not recorded
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutboundEmail) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("simulated delivery failure");
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}
