use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::database::BuildStore;
use crate::services::uploads::{content_type_for, image_extension, ImageUploads};

pub struct AvatarImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Serves a build's avatar as its favicon, either from local uploads or by
/// fetching the remote image.
pub struct AvatarProxy {
    store: Arc<dyn BuildStore>,
    uploads: Arc<ImageUploads>,
    client: reqwest::Client,
}

impl AvatarProxy {
    pub fn new(store: Arc<dyn BuildStore>, uploads: Arc<ImageUploads>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            store,
            uploads,
            client,
        })
    }

    /// `None` when the build is unknown, has no avatar, or the image is gone
    pub async fn avatar(&self, slug: &str) -> Result<Option<AvatarImage>> {
        let Some(project) = self.store.find_by_slug(slug.trim()).await? else {
            return Ok(None);
        };
        let Some(avatar) = project.avatar.filter(|a| !a.trim().is_empty()) else {
            return Ok(None);
        };

        if let Some(path) = self.uploads.stored_path(&avatar) {
            return read_local(&path).await;
        }

        if avatar.starts_with("http://") || avatar.starts_with("https://") {
            return self.fetch_remote(&avatar).await;
        }

        tracing::debug!("Avatar for {} is neither an upload nor a URL: {}", slug, avatar);
        Ok(None)
    }

    async fn fetch_remote(&self, url: &str) -> Result<Option<AvatarImage>> {
        let mut response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            tracing::debug!("Avatar fetch from {} returned {}", url, response.status());
            return Ok(None);
        }

        let limit = self.uploads.max_bytes();
        if response.content_length().is_some_and(|len| len > limit as u64) {
            tracing::debug!("Avatar at {} is larger than {} bytes", url, limit);
            return Ok(None);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > limit {
                tracing::debug!("Avatar at {} exceeded {} bytes, dropping it", url, limit);
                return Ok(None);
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(Some(AvatarImage {
            content_type,
            bytes,
        }))
    }
}

async fn read_local(path: &Path) -> Result<Option<AvatarImage>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let extension = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(image_extension)
        .unwrap_or_default();

    Ok(Some(AvatarImage {
        content_type: content_type_for(&extension).to_string(),
        bytes,
    }))
}
