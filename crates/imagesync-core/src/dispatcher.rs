//! Lifecycle dispatcher for the image-sync custom resource
//!
//! Each invocation handles exactly one phase and exits. Durable state (did the
//! build run, does the image exist) lives in the build service and the
//! registry, never here.

use imagesync_config::SyncConfig;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::SyncError;
use crate::event::{LifecycleEvent, LifecycleResult, RequestType};
use crate::services::{BuildService, ImageId, ImageRegistry};

/// Identifier reported for the resource. The sync is a singleton per stack,
/// so the id is constant rather than derived per call.
pub const PHYSICAL_RESOURCE_ID: &str = "TheCustomResource";

/// `Data` key carrying the started build's id on Create
pub const BUILD_ID_ATTRIBUTE: &str = "BuildId";

/// Routes lifecycle events to the create/update/delete handlers
pub struct LifecycleDispatcher<B, R> {
    config: SyncConfig,
    builds: B,
    registry: R,
}

impl<B, R> LifecycleDispatcher<B, R>
where
    B: BuildService,
    R: ImageRegistry,
{
    pub fn new(config: SyncConfig, builds: B, registry: R) -> Self {
        Self {
            config,
            builds,
            registry,
        }
    }

    /// Handle one lifecycle event
    pub async fn on_event(&self, event: &LifecycleEvent) -> Result<LifecycleResult, SyncError> {
        info!(
            request_type = %event.request_type,
            request_id = event.request_id.as_deref().unwrap_or(""),
            logical_resource_id = event.logical_resource_id.as_deref().unwrap_or(""),
            event = %serde_json::to_string(event).unwrap_or_default(),
            "Lifecycle event received"
        );

        let result = match event.request_type() {
            Ok(RequestType::Create) => self.on_create(event).await,
            Ok(RequestType::Update) => Ok(self.on_update(event)),
            Ok(RequestType::Delete) => self.on_delete(event).await,
            Err(err) => Err(err),
        };

        if let Err(ref err) = result {
            tracing::error!(
                error_type = err.error_type(),
                request_type = %event.request_type,
                "Lifecycle event failed: {}",
                err
            );
        }
        result
    }

    async fn on_create(&self, event: &LifecycleEvent) -> Result<LifecycleResult, SyncError> {
        let project = &self.config.project_name;
        info!(
            project,
            properties = ?event.resource_properties,
            "Creating resource; starting sync build"
        );

        let ack = self
            .builds
            .start_build(project)
            .await
            .map_err(|source| SyncError::BuildTrigger {
                project: project.clone(),
                source,
            })?;

        let mut result = LifecycleResult::new(PHYSICAL_RESOURCE_ID);
        match ack.build_id {
            Some(build_id) => {
                info!(project, build_id = %build_id, "Sync build started");
                result
                    .data
                    .insert(BUILD_ID_ATTRIBUTE.to_string(), Value::String(build_id));
            }
            None => info!(project, "Sync build started"),
        }
        Ok(result)
    }

    // No side effects: the image only needs syncing once per stack.
    fn on_update(&self, event: &LifecycleEvent) -> LifecycleResult {
        let physical_id = event.physical_resource_id_or_default();
        info!(
            physical_resource_id = physical_id,
            properties = ?event.resource_properties,
            old_properties = ?event.old_resource_properties,
            "Update requested; nothing to change"
        );
        LifecycleResult::new(physical_id)
    }

    async fn on_delete(&self, event: &LifecycleEvent) -> Result<LifecycleResult, SyncError> {
        let physical_id = event.physical_resource_id_or_default();
        let repository = &self.config.repository_name;
        let tag = &self.config.image_tag;
        info!(
            physical_resource_id = physical_id,
            repository,
            tag,
            "Deleting resource; removing synced image"
        );

        let image = ImageId::tag(tag.as_str());
        match self
            .registry
            .batch_delete_image(repository, std::slice::from_ref(&image))
            .await
        {
            Ok(outcome) => {
                for failure in &outcome.failures {
                    if failure.not_found {
                        warn!(
                            repository,
                            tag = failure.image_tag.as_deref().unwrap_or(tag),
                            "Image already absent; nothing to clean up"
                        );
                    } else {
                        warn!(
                            repository,
                            tag = failure.image_tag.as_deref().unwrap_or(tag),
                            code = %failure.code,
                            reason = failure.reason.as_deref().unwrap_or(""),
                            "Registry could not delete image; continuing teardown"
                        );
                    }
                }
                if !outcome.deleted.is_empty() {
                    info!(
                        repository,
                        deleted = outcome.deleted.len(),
                        "Synced image deleted"
                    );
                }
            }
            Err(err) if err.is_not_found() => {
                warn!(repository, error = %err, "Nothing to clean up");
            }
            Err(source) => {
                return Err(SyncError::ImageCleanup {
                    repository: repository.clone(),
                    tag: tag.clone(),
                    source,
                });
            }
        }

        Ok(LifecycleResult::new(physical_id))
    }
}
