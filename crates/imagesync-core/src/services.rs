//! Collaborator seams: the build-execution service and the image registry

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ServiceError;

/// Acknowledgment of a started build. Completion is never awaited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildAck {
    pub build_id: Option<String>,
}

/// Trait for starting a build of a named project
#[async_trait]
pub trait BuildService: Send + Sync {
    async fn start_build(&self, project_name: &str) -> Result<BuildAck, ServiceError>;
}

/// Reference to a tagged image inside a repository
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageId {
    pub image_tag: String,
}

impl ImageId {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            image_tag: tag.into(),
        }
    }
}

/// Per-image failure returned inside an otherwise successful batch delete
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFailure {
    pub image_tag: Option<String>,
    pub code: String,
    pub reason: Option<String>,
    /// Image was already absent
    pub not_found: bool,
}

/// Outcome of a batch delete
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageDeletion {
    pub deleted: Vec<ImageId>,
    pub failures: Vec<ImageFailure>,
}

/// Trait for deleting tagged images from a registry repository
#[async_trait]
pub trait ImageRegistry: Send + Sync {
    async fn batch_delete_image(
        &self,
        repository_name: &str,
        image_ids: &[ImageId],
    ) -> Result<ImageDeletion, ServiceError>;
}

#[async_trait]
impl<T: BuildService + ?Sized> BuildService for Arc<T> {
    async fn start_build(&self, project_name: &str) -> Result<BuildAck, ServiceError> {
        (**self).start_build(project_name).await
    }
}

#[async_trait]
impl<T: ImageRegistry + ?Sized> ImageRegistry for Arc<T> {
    async fn batch_delete_image(
        &self,
        repository_name: &str,
        image_ids: &[ImageId],
    ) -> Result<ImageDeletion, ServiceError> {
        (**self).batch_delete_image(repository_name, image_ids).await
    }
}
