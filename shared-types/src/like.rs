use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LikeRequest {
    #[serde(default)]
    pub slug: String,
}

/// Like state of a build as seen from one caller address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LikeStatus {
    pub liked: bool,
    pub likes: i64,
}
