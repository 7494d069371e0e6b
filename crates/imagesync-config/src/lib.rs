// imagesync-config - Configuration for the image-sync custom resource
//
// Everything comes from the environment the provisioning engine sets on the
// function:
// 1. PROJECT_NAME / REPO_NAME (required, unprefixed)
// 2. IMAGESYNC_* overrides (image tag, log level/format)
// 3. Platform-specific defaults (lowest priority)

use anyhow::Result;
use serde::{Deserialize, Serialize};

mod platform;
mod sources;
mod validation;

pub use platform::{Platform, PlatformDefaults};
pub use sources::{EnvSource, StdEnvSource, ENV_PREFIX};

/// Tag the sync build pushes and teardown removes.
pub const DEFAULT_IMAGE_TAG: &str = "latest";

/// Resolved configuration for one deployed sync resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Build project started on Create
    pub project_name: String,

    /// Registry repository cleaned up on Delete
    pub repository_name: String,

    #[serde(default = "default_image_tag")]
    pub image_tag: String,

    #[serde(default)]
    pub log: LogSettings,
}

fn default_image_tag() -> String {
    DEFAULT_IMAGE_TAG.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

impl SyncConfig {
    /// Load configuration from the process environment for the detected platform
    pub fn load() -> Result<Self> {
        let env = StdEnvSource;
        sources::load_config(Platform::detect_from(&env), &env)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let config = SyncConfig {
            project_name: "sync-project".into(),
            repository_name: "nextcloud".into(),
            image_tag: DEFAULT_IMAGE_TAG.into(),
            log: LogSettings::default(),
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["project_name"], "sync-project");
        assert_eq!(value["log"]["format"], "text");

        let parsed: SyncConfig = serde_json::from_str(
            r#"{"project_name":"p","repository_name":"r"}"#,
        )
        .unwrap();
        assert_eq!(parsed.image_tag, "latest");
        assert_eq!(parsed.log.level, "info");
    }
}
