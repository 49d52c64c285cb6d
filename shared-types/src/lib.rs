use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod claim;
pub mod contact;
pub mod like;
pub mod project;
pub mod upload;

pub use claim::{ActionResponse, ClaimBuildRequest, VerifyClaimQuery};
pub use contact::ContactRequest;
pub use like::{LikeRequest, LikeStatus};
pub use project::{
    CheckSlugResponse, CreateProjectRequest, CreateProjectResponse, Project, ProjectLinks,
    ProjectType, MAX_TAGS,
};
pub use upload::{UploadKind, UploadResponse};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query parameter naming a single build
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SlugQuery {
    pub slug: Option<String>,
}
