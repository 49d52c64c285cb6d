use actix_web::{http::StatusCode, HttpResponse};
use shared_types::ErrorResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Too many messages sent. Please try again later.")]
    RateLimited,

    #[error("{0}")]
    PermissionDenied(String),

    #[error("Your message was flagged as potential spam. Please remove any links or suspicious content.")]
    SpamDetected,

    #[error("Failed to send message. Please try again later.")]
    DeliveryFailed,

    #[error("Invalid or already used claim link")]
    InvalidToken,

    #[error("This claim link has expired")]
    ExpiredToken,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl BuildError {
    pub fn project_not_found() -> Self {
        BuildError::NotFound("Project not found".to_string())
    }

    pub fn invalid_email() -> Self {
        BuildError::Validation("Invalid email format".to_string())
    }
}

pub type BuildResult<T> = Result<T, BuildError>;

impl actix_web::error::ResponseError for BuildError {
    fn status_code(&self) -> StatusCode {
        match self {
            BuildError::Validation(_) | BuildError::Conflict(_) | BuildError::SpamDetected => {
                StatusCode::BAD_REQUEST
            }
            BuildError::NotFound(_) | BuildError::InvalidToken => StatusCode::NOT_FOUND,
            BuildError::ExpiredToken => StatusCode::GONE,
            BuildError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            BuildError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            BuildError::DeliveryFailed | BuildError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let BuildError::Internal(e) = self {
            tracing::error!("Internal error: {:#}", e);
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
