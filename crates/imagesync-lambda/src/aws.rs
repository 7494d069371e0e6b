// AWS SDK adapters for the collaborator traits
//
// CodeBuild starts the sync build; ECR holds the synced image.
// Credentials come from the function's execution role via aws-config.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_codebuild::error::DisplayErrorContext;
use aws_sdk_codebuild::operation::start_build::StartBuildOutput;
use aws_sdk_ecr::types::{ImageFailureCode, ImageIdentifier};
use imagesync_core::{
    BuildAck, BuildService, ImageDeletion, ImageFailure, ImageId, ImageRegistry, ServiceError,
};

/// Load the shared SDK configuration from the standard credential chain
pub async fn load_sdk_config() -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest()).load().await
}

/// Build service backed by CodeBuild `StartBuild`
pub struct CodeBuildService {
    client: aws_sdk_codebuild::Client,
}

impl CodeBuildService {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_codebuild::Client::new(config),
        }
    }
}

#[async_trait]
impl BuildService for CodeBuildService {
    async fn start_build(&self, project_name: &str) -> Result<BuildAck, ServiceError> {
        let output = self
            .client
            .start_build()
            .project_name(project_name)
            .send()
            .await
            .map_err(|err| {
                let message = DisplayErrorContext(&err).to_string();
                if err.into_service_error().is_resource_not_found_exception() {
                    ServiceError::not_found("build project", message)
                } else {
                    ServiceError::other(message)
                }
            })?;

        Ok(build_ack(&output))
    }
}

fn build_ack(output: &StartBuildOutput) -> BuildAck {
    BuildAck {
        build_id: output
            .build_value()
            .and_then(|build| build.id())
            .map(str::to_string),
    }
}

/// Image registry backed by ECR `BatchDeleteImage`
pub struct EcrRegistry {
    client: aws_sdk_ecr::Client,
}

impl EcrRegistry {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_ecr::Client::new(config),
        }
    }
}

#[async_trait]
impl ImageRegistry for EcrRegistry {
    async fn batch_delete_image(
        &self,
        repository_name: &str,
        image_ids: &[ImageId],
    ) -> Result<ImageDeletion, ServiceError> {
        let identifiers = image_ids
            .iter()
            .map(|id| ImageIdentifier::builder().image_tag(&id.image_tag).build())
            .collect::<Vec<_>>();

        let output = self
            .client
            .batch_delete_image()
            .repository_name(repository_name)
            .set_image_ids(Some(identifiers))
            .send()
            .await
            .map_err(|err| {
                let message = aws_sdk_ecr::error::DisplayErrorContext(&err).to_string();
                if err.into_service_error().is_repository_not_found_exception() {
                    ServiceError::not_found("repository", message)
                } else {
                    ServiceError::other(message)
                }
            })?;

        Ok(ImageDeletion {
            deleted: output
                .image_ids()
                .iter()
                .filter_map(|id| id.image_tag())
                .map(ImageId::tag)
                .collect(),
            failures: output.failures().iter().map(convert_failure).collect(),
        })
    }
}

fn convert_failure(failure: &aws_sdk_ecr::types::ImageFailure) -> ImageFailure {
    let code = failure.failure_code();
    ImageFailure {
        image_tag: failure
            .image_id()
            .and_then(|id| id.image_tag())
            .map(str::to_string),
        code: code.map(|c| c.as_str()).unwrap_or("Unknown").to_string(),
        reason: failure.failure_reason().map(str::to_string),
        not_found: matches!(code, Some(ImageFailureCode::ImageNotFound)),
    }
}
