use actix_web::{web, HttpResponse, Result};
use shared_types::{CreateProjectRequest, SlugQuery};
use std::sync::Arc;

use crate::error::BuildError;
use crate::services::ProjectManager;

pub async fn list_projects(projects: web::Data<Arc<ProjectManager>>) -> Result<HttpResponse> {
    let listed = projects.list().await?;
    Ok(HttpResponse::Ok().json(listed))
}

pub async fn get_project(
    projects: web::Data<Arc<ProjectManager>>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let project = projects.find(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

pub async fn create_project(
    projects: web::Data<Arc<ProjectManager>>,
    request: web::Json<CreateProjectRequest>,
) -> Result<HttpResponse> {
    let response = projects.submit(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn check_slug(
    projects: web::Data<Arc<ProjectManager>>,
    query: web::Query<SlugQuery>,
) -> Result<HttpResponse> {
    let slug = query
        .slug
        .as_deref()
        .ok_or_else(|| BuildError::Validation("Slug is required".to_string()))?;

    let response = projects.check_slug(slug).await?;
    Ok(HttpResponse::Ok().json(response))
}
