use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub cors: Option<CorsConfig>,
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub claim: ClaimConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:8888".to_string()],
            }),
            server: Some(ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            }),
            database: DatabaseConfig::default(),
            site: SiteConfig::default(),
            email: EmailConfig::default(),
            claim: ClaimConfig::default(),
            contact: ContactConfig::default(),
            uploads: UploadConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Overrides the platform data directory location
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SiteConfig {
    /// Public origin used for verification links and redirects
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8888".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EmailConfig {
    pub postmark_server_token: Option<String>,
    pub from_address: String,
    /// Receives a notice whenever a build gets claimed
    pub admin_address: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            postmark_server_token: None,
            from_address: "hello@100builds.com".to_string(),
            admin_address: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ClaimConfig {
    pub token_ttl_hours: i64,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self { token_ttl_hours: 24 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ContactConfig {
    pub max_message_length: usize,
    pub rate_limit_window_minutes: i64,
    pub rate_limit_max_attempts: i64,
    pub spam_keywords: Vec<String>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            max_message_length: 200,
            rate_limit_window_minutes: 60,
            rate_limit_max_attempts: 3,
            spam_keywords: ["viagra", "cialis", "pharmacy", "casino", "lottery", "prize"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct UploadConfig {
    pub directory: PathBuf,
    pub public_url_prefix: String,
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("public/projects"),
            public_url_prefix: "/projects".to_string(),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

const DEFAULT_CONFIG: &str = r#"
[cors]
allowed_origins = ["http://localhost:8888"]

[server]
host = "127.0.0.1"
port = 8080

[site]
base_url = "http://localhost:8888"

[email]
from_address = "hello@100builds.com"
# postmark_server_token = "your-postmark-server-token"
# admin_address = "admin@100builds.com"

[claim]
token_ttl_hours = 24

[contact]
max_message_length = 200
rate_limit_window_minutes = 60
rate_limit_max_attempts = 3
spam_keywords = ["viagra", "cialis", "pharmacy", "casino", "lottery", "prize"]

[uploads]
directory = "public/projects"
public_url_prefix = "/projects"
max_bytes = 5242880
"#;

impl ApiConfig {
    /// Load config from `path` (or the platform default), writing a commented
    /// default file first if none exists. `BUILDS_*` environment variables
    /// override file values, e.g. `BUILDS_EMAIL__POSTMARK_SERVER_TOKEN`.
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .add_source(
                Environment::with_prefix("BUILDS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: ApiConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("100builds").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
