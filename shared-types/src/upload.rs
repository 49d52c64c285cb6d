use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which image slot of a build an upload fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    #[default]
    Avatar,
    Featured,
}

impl UploadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadKind::Avatar => "avatar",
            UploadKind::Featured => "featured",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" | "avatar" => Some(UploadKind::Avatar),
            "featured" => Some(UploadKind::Featured),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
}
