use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Maximum number of tags a build may carry
pub const MAX_TAGS: usize = 4;

/// Whether a build is being shown off or is asking for help
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Show,
    Help,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Show => "show",
            ProjectType::Help => "help",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "show" => Some(ProjectType::Show),
            "help" => Some(ProjectType::Help),
            _ => None,
        }
    }
}

/// Links to the places a build lives around the web
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProjectLinks {
    // Core identity & project links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    // Creative & design community
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dribbble: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    // Maker & indie ecosystems
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indiehackers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producthunt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reddit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
}

impl ProjectLinks {
    /// Drops links that are empty after trimming
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            site: clean(self.site),
            github: clean(self.github),
            threads: clean(self.threads),
            twitter: clean(self.twitter),
            linkedin: clean(self.linkedin),
            dribbble: clean(self.dribbble),
            behance: clean(self.behance),
            instagram: clean(self.instagram),
            indiehackers: clean(self.indiehackers),
            producthunt: clean(self.producthunt),
            reddit: clean(self.reddit),
            youtube: clean(self.youtube),
            blog: clean(self.blog),
            discord: clean(self.discord),
        }
    }
}

/// A build as shown on the public listing.
///
/// Owner email and the pending claim token are never part of this type.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub name: String,
    pub description: String,
    pub avatar: Option<String>,
    pub featured_image: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub needs: Option<String>,
    pub links: ProjectLinks,
    pub claimed: bool,
    pub allow_contact: bool,
    pub likes: i64,
    pub date: String,
}

/// Request to submit a new build
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub slug: Option<String>,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub avatar: Option<String>,
    pub featured_image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub needs: Option<String>,
    pub links: Option<ProjectLinks>,
    pub date: Option<String>,
}

/// Response after a build was stored
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectResponse {
    pub success: bool,
    pub project_number: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckSlugResponse {
    pub available: bool,
}
