// imagesync-core - Lifecycle handling for the image-sync custom resource
//
// The provisioning engine invokes the handler once per stack operation with a
// Create, Update or Delete event. Create starts the build that copies the
// upstream image into the private registry; Delete removes the synced tag.

mod dispatcher;
pub mod error;
pub mod event;
pub mod services;

pub use dispatcher::{LifecycleDispatcher, BUILD_ID_ATTRIBUTE, PHYSICAL_RESOURCE_ID};
pub use error::{ServiceError, SyncError};
pub use event::{LifecycleEvent, LifecycleResult, RequestType};
pub use services::{BuildAck, BuildService, ImageDeletion, ImageFailure, ImageId, ImageRegistry};

// Re-export so callers don't need a direct config dependency
pub use imagesync_config::SyncConfig;
