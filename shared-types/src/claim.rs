use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Request to start claiming a build by email
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClaimBuildRequest {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub email: String,
    pub allow_contact: Option<bool>,
}

/// Query parameters carried by the emailed verification link
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VerifyClaimQuery {
    pub token: Option<String>,
    pub slug: Option<String>,
}

/// Generic acknowledgement for mutations that only report success
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
