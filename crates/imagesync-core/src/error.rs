//! Error types for the lifecycle dispatcher

use thiserror::Error;

/// Failure reported by an external collaborator (build service, registry).
///
/// Adapters classify their SDK errors so the dispatcher can decide which
/// failures teardown tolerates without depending on any SDK.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The addressed project, repository or image does not exist
    #[error("{resource} not found: {message}")]
    NotFound { resource: String, message: String },

    /// Anything else: permissions, throttling, transport
    #[error("{0}")]
    Other(String),
}

impl ServiceError {
    pub fn not_found(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors that fail a lifecycle invocation
#[derive(Debug, Error)]
pub enum SyncError {
    /// The framework sent a phase other than Create/Update/Delete
    #[error("Unsupported request type: {request_type}")]
    UnsupportedRequestType { request_type: String },

    /// Starting the sync build failed; the resource was not created
    #[error("Failed to start build for project '{project}': {source}")]
    BuildTrigger {
        project: String,
        #[source]
        source: ServiceError,
    },

    /// Registry cleanup failed for a reason other than the image being gone
    #[error("Failed to delete image '{repository}:{tag}': {source}")]
    ImageCleanup {
        repository: String,
        tag: String,
        #[source]
        source: ServiceError,
    },
}

impl SyncError {
    /// Short machine-readable kind, used as a structured log field
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::UnsupportedRequestType { .. } => "UnsupportedRequestType",
            Self::BuildTrigger { .. } => "BuildTrigger",
            Self::ImageCleanup { .. } => "ImageCleanup",
        }
    }
}
