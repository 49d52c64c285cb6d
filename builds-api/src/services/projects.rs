use shared_types::{
    CheckSlugResponse, CreateProjectRequest, CreateProjectResponse, Project, ProjectType, MAX_TAGS,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::{BuildStore, NewProject};
use crate::error::{BuildError, BuildResult};
use crate::helpers::clock::Clock;
use crate::helpers::validation::{is_blank, slugify};

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Images are either remote `http(s)` URLs or site paths returned by an upload
fn image_reference(value: Option<String>) -> BuildResult<Option<String>> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };

    let remote = value.starts_with("http://") || value.starts_with("https://");
    let local = value.starts_with('/') && !value.starts_with("//");
    if !remote && !local {
        return Err(BuildError::Validation(
            "Images must be http(s) URLs or uploaded image paths".to_string(),
        ));
    }

    Ok(Some(value))
}

/// Trim tags, drop blanks and repeats while keeping submission order
fn normalize_tags(tags: Option<Vec<String>>) -> BuildResult<Vec<String>> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags.unwrap_or_default() {
        let tag = tag.trim();
        if tag.is_empty() || normalized.iter().any(|t| t == tag) {
            continue;
        }
        normalized.push(tag.to_string());
    }

    if normalized.len() > MAX_TAGS {
        return Err(BuildError::Validation(format!(
            "A build can have at most {} tags",
            MAX_TAGS
        )));
    }

    Ok(normalized)
}

pub struct ProjectManager {
    store: Arc<dyn BuildStore>,
    clock: Arc<dyn Clock>,
}

impl ProjectManager {
    pub fn new(store: Arc<dyn BuildStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn prepare(&self, request: CreateProjectRequest) -> BuildResult<NewProject> {
        let name = request.name.trim().to_string();
        let description = request.description.trim().to_string();

        if name.is_empty() || description.is_empty() {
            return Err(BuildError::Validation(
                "Name and description are required".to_string(),
            ));
        }

        let needs = non_blank(request.needs);
        if request.project_type == ProjectType::Help && needs.is_none() {
            return Err(BuildError::Validation(
                "Builds asking for help must say what they need".to_string(),
            ));
        }

        let slug = match non_blank(request.slug) {
            Some(requested) => slugify(&requested),
            None => slugify(&name),
        };
        if slug.is_empty() {
            return Err(BuildError::Validation(
                "Could not derive a slug from the build name".to_string(),
            ));
        }

        let date = non_blank(request.date).unwrap_or_else(|| self.clock.now().to_rfc3339());

        Ok(NewProject {
            id: Uuid::new_v4().to_string(),
            slug,
            project_type: request.project_type,
            name,
            description,
            avatar: image_reference(request.avatar)?,
            featured_image: image_reference(request.featured_image)?,
            tags: normalize_tags(request.tags)?,
            category: non_blank(request.category),
            needs,
            links: request.links.unwrap_or_default().normalized(),
            date,
        })
    }

    pub async fn submit(&self, request: CreateProjectRequest) -> BuildResult<CreateProjectResponse> {
        let project = self.prepare(request)?;
        let now = self.clock.now().timestamp();

        let Some(project_number) = self.store.insert_project(&project, now).await? else {
            return Err(BuildError::Conflict(
                "A build with this slug already exists".to_string(),
            ));
        };

        tracing::info!("Stored build {} as #{}", project.slug, project_number);

        Ok(CreateProjectResponse {
            success: true,
            project_number,
        })
    }

    /// Public listing, newest first
    pub async fn list(&self) -> BuildResult<Vec<Project>> {
        let records = self.store.list_projects().await?;
        Ok(records.into_iter().map(Project::from).collect())
    }

    /// Public view of a single build
    pub async fn find(&self, slug: &str) -> BuildResult<Project> {
        let record = self
            .store
            .find_by_slug(slug.trim())
            .await?
            .ok_or_else(BuildError::project_not_found)?;
        Ok(record.into())
    }

    pub async fn check_slug(&self, slug: &str) -> BuildResult<CheckSlugResponse> {
        if is_blank(slug) {
            return Err(BuildError::Validation("Slug is required".to_string()));
        }

        let taken = self.store.slug_exists(slug.trim()).await?;
        Ok(CheckSlugResponse { available: !taken })
    }
}
