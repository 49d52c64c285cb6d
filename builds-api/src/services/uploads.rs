use anyhow::Context;
use shared_types::{UploadKind, UploadResponse};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::UploadConfig;
use crate::database::BuildStore;
use crate::error::{BuildError, BuildResult};
use crate::helpers::validation::is_valid_slug;

pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Lowercased extension of `file_name` if it is an accepted image type
pub fn image_extension(file_name: &str) -> Option<String> {
    let extension = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();

    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

pub fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Writes build images to `{directory}/{slug}/{kind}.{ext}`.
///
/// Images are uploaded ahead of submission, so a slug that already belongs to
/// a stored build is refused and its files are never overwritten.
pub struct ImageUploads {
    store: Arc<dyn BuildStore>,
    directory: PathBuf,
    public_url_prefix: String,
    max_bytes: usize,
}

impl ImageUploads {
    pub fn new(store: Arc<dyn BuildStore>, config: &UploadConfig) -> Self {
        Self {
            store,
            directory: config.directory.clone(),
            public_url_prefix: config.public_url_prefix.trim_end_matches('/').to_string(),
            max_bytes: config.max_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn check_slug(&self, slug: &str) -> BuildResult<()> {
        if is_valid_slug(slug) {
            Ok(())
        } else {
            Err(BuildError::Validation("A valid slug is required".to_string()))
        }
    }

    pub fn too_large(&self) -> BuildError {
        BuildError::Validation(format!(
            "File is too large (max {} MB)",
            self.max_bytes / (1024 * 1024)
        ))
    }

    pub fn check_size(&self, size: usize) -> BuildResult<()> {
        if size > self.max_bytes {
            return Err(self.too_large());
        }
        Ok(())
    }

    /// Map a public URL produced by `save` back to the file on disk
    pub fn stored_path(&self, url: &str) -> Option<PathBuf> {
        let rest = url.strip_prefix(&self.public_url_prefix)?.strip_prefix('/')?;
        let (slug, file_name) = rest.split_once('/')?;
        let (kind, _) = file_name.split_once('.')?;

        if !is_valid_slug(slug) || kind.is_empty() {
            return None;
        }
        let kind = UploadKind::parse(kind)?;
        let extension = image_extension(file_name)?;
        if file_name != format!("{}.{}", kind.as_str(), extension) {
            return None;
        }

        Some(self.directory.join(slug).join(file_name))
    }

    pub async fn save(
        &self,
        slug: &str,
        kind: UploadKind,
        file_name: &str,
        bytes: &[u8],
    ) -> BuildResult<UploadResponse> {
        self.check_slug(slug)?;

        let extension = image_extension(file_name).ok_or_else(|| {
            BuildError::Validation(format!(
                "Unsupported file type, allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ))
        })?;

        if bytes.is_empty() {
            return Err(BuildError::Validation("File is empty".to_string()));
        }
        self.check_size(bytes.len())?;

        if self.store.slug_exists(slug).await? {
            return Err(BuildError::Conflict(
                "A build with this slug already exists".to_string(),
            ));
        }

        let project_dir = self.directory.join(slug);
        tokio::fs::create_dir_all(&project_dir)
            .await
            .with_context(|| format!("Failed to create {}", project_dir.display()))?;

        let stored_name = format!("{}.{}", kind.as_str(), extension);
        let target = project_dir.join(&stored_name);
        tokio::fs::write(&target, bytes)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;

        tracing::info!("Stored {} image for {} ({} bytes)", kind.as_str(), slug, bytes.len());

        Ok(UploadResponse {
            success: true,
            url: format!("{}/{}/{}", self.public_url_prefix, slug, stored_name),
        })
    }
}
