use actix_web::http::header;
use actix_web::{web, HttpResponse, Result};
use shared_types::SlugQuery;
use std::sync::Arc;

use crate::services::AvatarProxy;

/// A build's avatar, served with long-lived cache headers
pub async fn favicon(
    proxy: web::Data<Arc<AvatarProxy>>,
    query: web::Query<SlugQuery>,
) -> Result<HttpResponse> {
    let Some(slug) = query.slug.as_deref().filter(|s| !s.trim().is_empty()) else {
        return Ok(HttpResponse::NotFound().finish());
    };

    match proxy.avatar(slug).await {
        Ok(Some(image)) => Ok(HttpResponse::Ok()
            .content_type(image.content_type)
            .insert_header((header::CACHE_CONTROL, "public, max-age=86400, immutable"))
            .body(image.bytes)),
        Ok(None) => Ok(HttpResponse::NotFound().finish()),
        Err(e) => {
            tracing::warn!("Favicon lookup failed for {}: {:#}", slug, e);
            Ok(HttpResponse::NotFound().finish())
        }
    }
}
