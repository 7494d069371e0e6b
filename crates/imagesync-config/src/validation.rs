// Configuration validation
//
// Names must be present; unusual tags only warn since the registry decides.

use crate::*;
use anyhow::{bail, Result};
use tracing::warn;

/// Docker limits tags to 128 characters; ECR allows longer but the sync build pushes with docker.
const MAX_IMAGE_TAG_LEN: usize = 128;

pub fn validate_config(config: &SyncConfig) -> Result<()> {
    if config.project_name.is_empty() {
        bail!("PROJECT_NAME must not be empty");
    }

    if config.repository_name.is_empty() {
        bail!("REPO_NAME must not be empty");
    }

    validate_image_tag(&config.image_tag)?;

    if config.log.level.is_empty() {
        bail!("log level must not be empty");
    }

    Ok(())
}

fn validate_image_tag(tag: &str) -> Result<()> {
    if tag.is_empty() {
        bail!("image tag must not be empty");
    }

    if tag.len() > MAX_IMAGE_TAG_LEN {
        bail!(
            "image tag is {} characters; the registry allows at most {}",
            tag.len(),
            MAX_IMAGE_TAG_LEN
        );
    }

    if tag != DEFAULT_IMAGE_TAG {
        warn!(
            image_tag = tag,
            "image tag differs from the tag the sync build pushes; teardown may leave it behind"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SyncConfig {
        SyncConfig {
            project_name: "sync-project".into(),
            repository_name: "nextcloud".into(),
            image_tag: DEFAULT_IMAGE_TAG.into(),
            log: LogSettings::default(),
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate_config(&config()).is_ok());
    }

    #[test]
    fn rejects_empty_repository() {
        let mut config = config();
        config.repository_name.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("REPO_NAME"));
    }

    #[test]
    fn rejects_oversized_tag() {
        let mut config = config();
        config.image_tag = "x".repeat(MAX_IMAGE_TAG_LEN + 1);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn custom_tag_is_allowed() {
        let mut config = config();
        config.image_tag = "stable".into();
        assert!(validate_config(&config).is_ok());
    }
}
