use actix_web::web;
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::database::{BuildStore, Database, SqliteBuildStore};
use crate::helpers::clock::Clock;
use crate::integrations::Mailer;
use crate::services::{
    AvatarProxy, ClaimManager, ClaimSettings, ContactRelay, ImageUploads, LikeManager,
    ProjectManager,
};

/// Everything the handlers pull out of `web::Data`
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub projects: Arc<ProjectManager>,
    pub claims: Arc<ClaimManager>,
    pub contact: Arc<ContactRelay>,
    pub likes: Arc<LikeManager>,
    pub uploads: Arc<ImageUploads>,
    pub avatars: Arc<AvatarProxy>,
}

impl AppState {
    pub fn new(
        config: &ApiConfig,
        db: Arc<Database>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        let store: Arc<dyn BuildStore> =
            Arc::new(SqliteBuildStore::new(db.async_connection.clone()));
        let uploads = Arc::new(ImageUploads::new(store.clone(), &config.uploads));

        Ok(Self {
            projects: Arc::new(ProjectManager::new(store.clone(), clock.clone())),
            claims: Arc::new(ClaimManager::new(
                store.clone(),
                mailer.clone(),
                clock.clone(),
                ClaimSettings::from_config(config),
            )),
            contact: Arc::new(ContactRelay::from_config(
                store.clone(),
                mailer,
                clock.clone(),
                config,
            )?),
            likes: Arc::new(LikeManager::new(store.clone(), clock)),
            avatars: Arc::new(AvatarProxy::new(store, uploads.clone())?),
            uploads,
            db,
        })
    }

    /// Register shared state and all routes on an app or scope
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.db.clone()))
            .app_data(web::Data::new(self.projects.clone()))
            .app_data(web::Data::new(self.claims.clone()))
            .app_data(web::Data::new(self.contact.clone()))
            .app_data(web::Data::new(self.likes.clone()))
            .app_data(web::Data::new(self.uploads.clone()))
            .app_data(web::Data::new(self.avatars.clone()));

        crate::handlers::configure(cfg);
    }
}
