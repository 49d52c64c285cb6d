use actix_web::http::header;
use actix_web::{web, HttpResponse, Result};
use shared_types::{ActionResponse, ClaimBuildRequest, VerifyClaimQuery};
use std::sync::Arc;

use crate::error::BuildError;
use crate::services::ClaimManager;

pub async fn claim_build(
    claims: web::Data<Arc<ClaimManager>>,
    request: web::Json<ClaimBuildRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();

    claims
        .request_claim(
            &request.slug,
            &request.email,
            request.allow_contact.unwrap_or(true),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ActionResponse::ok(
        "Verification email sent! Check your inbox.",
    )))
}

fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Target of the emailed link. Always answers with a redirect back to the site.
pub async fn verify_claim(
    claims: web::Data<Arc<ClaimManager>>,
    query: web::Query<VerifyClaimQuery>,
) -> Result<HttpResponse> {
    let site = claims.site();

    let (Some(slug), Some(token)) = (query.slug.as_deref(), query.token.as_deref()) else {
        return Ok(redirect(site.url("/?error=invalid-token")));
    };

    let location = match claims.verify_claim(slug, token).await {
        Ok(project) => site.url(&format!("/build/{}?claimed=true", project.slug)),
        Err(BuildError::InvalidToken) => site.url("/?error=invalid-token"),
        Err(BuildError::ExpiredToken) => site.url("/?error=expired-token"),
        Err(e) => {
            tracing::error!("Claim verification failed for {}: {:?}", slug, e);
            site.url("/?error=verification-failed")
        }
    };

    Ok(redirect(location))
}
