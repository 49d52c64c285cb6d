use actix_web::{web, HttpRequest, HttpResponse, Result};
use shared_types::{LikeRequest, SlugQuery};
use std::sync::Arc;

use crate::helpers::client_address::client_address;
use crate::services::LikeManager;

pub async fn toggle_like(
    likes: web::Data<Arc<LikeManager>>,
    request: web::Json<LikeRequest>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let status = likes
        .toggle_like(&request.slug, &client_address(&req))
        .await?;
    Ok(HttpResponse::Ok().json(status))
}

pub async fn like_status(
    likes: web::Data<Arc<LikeManager>>,
    query: web::Query<SlugQuery>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let slug = query.slug.as_deref().unwrap_or_default();
    let status = likes.like_status(slug, &client_address(&req)).await?;
    Ok(HttpResponse::Ok().json(status))
}
