// AWS Lambda runtime adapter
//
// Runs the lifecycle dispatcher as the custom resource's onEvent handler.
// lambda_runtime provides the tokio runtime; configuration is read once per
// cold start and the dispatcher is shared across warm invocations.

use imagesync_config::SyncConfig;
use imagesync_core::{LifecycleDispatcher, LifecycleEvent, LifecycleResult};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::info;

pub mod aws;
pub mod init;

use aws::{CodeBuildService, EcrRegistry};

/// Dispatcher wired to the real build service and registry
pub type AwsDispatcher = LifecycleDispatcher<CodeBuildService, EcrRegistry>;

/// Construct the dispatcher from resolved configuration and SDK config
pub fn build_dispatcher(config: SyncConfig, sdk_config: &aws_config::SdkConfig) -> AwsDispatcher {
    LifecycleDispatcher::new(
        config,
        CodeBuildService::new(sdk_config),
        EcrRegistry::new(sdk_config),
    )
}

/// Lambda handler for custom-resource lifecycle events
async fn handle_event(
    event: LambdaEvent<LifecycleEvent>,
    dispatcher: &AwsDispatcher,
) -> Result<LifecycleResult, Error> {
    let (payload, context) = event.into_parts();
    tracing::debug!(aws_request_id = %context.request_id, "Invocation started");

    // Errors fail the invocation; the provider framework reports them to the stack
    let result = dispatcher.on_event(&payload).await?;
    Ok(result)
}

/// Lambda runtime entry point
pub async fn run() -> Result<(), Error> {
    let config = SyncConfig::load()
        .map_err(|e| Error::from(format!("Failed to load configuration: {:#}", e)))?;

    init::init_tracing(&config.log);

    let (version, git_hash, build_timestamp) = init::build_info();
    info!(
        version,
        git_hash,
        build_timestamp,
        project = %config.project_name,
        repository = %config.repository_name,
        image_tag = %config.image_tag,
        "Image sync handler starting"
    );

    let sdk_config = aws::load_sdk_config().await;
    let dispatcher = Arc::new(build_dispatcher(config, &sdk_config));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<LifecycleEvent>| {
        let dispatcher = dispatcher.clone();
        async move { handle_event(event, &dispatcher).await }
    }))
    .await
}
