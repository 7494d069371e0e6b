// Environment-backed configuration loading.
//
// Priority order:
// 1. Environment variables (PROJECT_NAME, REPO_NAME, IMAGESYNC_* prefix)
// 2. Platform defaults (based on auto-detected Platform)

use crate::platform::Platform;
use crate::*;
use anyhow::{anyhow, Context, Result};
use std::env;

pub const ENV_PREFIX: &str = "IMAGESYNC_";

/// Abstraction over environment-variable lookups so tests and callers can
/// supply their own source instead of the process environment.
pub trait EnvSource {
    /// Get an environment variable with the IMAGESYNC_ prefix
    fn get(&self, key: &str) -> Option<String>;

    /// Get an environment variable WITHOUT the IMAGESYNC_ prefix
    /// Used for the names the deployment sets (PROJECT_NAME, REPO_NAME)
    fn get_raw(&self, key: &str) -> Option<String>;
}

/// Reads from `std::env`.
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// Build the configuration for `platform` from `env`, then validate it.
pub fn load_config<E: EnvSource>(platform: Platform, env: &E) -> Result<SyncConfig> {
    let defaults = platform.defaults();

    let project_name = required_raw(env, "PROJECT_NAME")?;
    let repository_name = required_raw(env, "REPO_NAME")?;

    let image_tag =
        get_env_string(env, "IMAGE_TAG").unwrap_or_else(|| DEFAULT_IMAGE_TAG.to_string());

    let mut log = LogSettings {
        level: defaults.log_level.to_string(),
        format: defaults.log_format,
    };
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        log.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        log.format = format
            .parse::<LogFormat>()
            .context("Invalid IMAGESYNC_LOG_FORMAT value")?;
    }

    let config = SyncConfig {
        project_name,
        repository_name,
        image_tag,
        log,
    };
    config.validate()?;
    Ok(config)
}

fn required_raw<E: EnvSource>(env: &E, key: &str) -> Result<String> {
    env.get_raw(key)
        .map(|value| value.trim().to_string())
        .ok_or_else(|| anyhow!("{} environment variable is required", key))
}

/// Blank values count as unset.
fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
