//! End-to-end lifecycle scenarios
//!
//! Feeds raw provider-framework payloads through the dispatcher with recording
//! collaborators and checks the JSON handed back to the framework.

use async_trait::async_trait;
use imagesync_config::{LogSettings, SyncConfig};
use imagesync_core::{
    BuildAck, BuildService, ImageDeletion, ImageFailure, ImageId, ImageRegistry,
    LifecycleDispatcher, LifecycleEvent, ServiceError, SyncError,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Calls {
    builds: Mutex<Vec<String>>,
    deletes: Mutex<Vec<(String, Vec<String>)>>,
}

struct Builds(Arc<Calls>);

#[async_trait]
impl BuildService for Builds {
    async fn start_build(&self, project_name: &str) -> Result<BuildAck, ServiceError> {
        self.0.builds.lock().unwrap().push(project_name.to_string());
        Ok(BuildAck {
            build_id: Some(format!("{}:7f3a", project_name)),
        })
    }
}

/// Registry that never held the image
struct EmptyRegistry(Arc<Calls>);

#[async_trait]
impl ImageRegistry for EmptyRegistry {
    async fn batch_delete_image(
        &self,
        repository_name: &str,
        image_ids: &[ImageId],
    ) -> Result<ImageDeletion, ServiceError> {
        self.0.deletes.lock().unwrap().push((
            repository_name.to_string(),
            image_ids.iter().map(|id| id.image_tag.clone()).collect(),
        ));
        Ok(ImageDeletion {
            deleted: vec![],
            failures: image_ids
                .iter()
                .map(|id| ImageFailure {
                    image_tag: Some(id.image_tag.clone()),
                    code: "ImageNotFound".into(),
                    reason: Some("Requested image not found".into()),
                    not_found: true,
                })
                .collect(),
        })
    }
}

fn setup() -> (LifecycleDispatcher<Builds, EmptyRegistry>, Arc<Calls>) {
    let calls = Arc::new(Calls::default());
    let config = SyncConfig {
        project_name: "sync-project".into(),
        repository_name: "nextcloud".into(),
        image_tag: "latest".into(),
        log: LogSettings::default(),
    };
    let dispatcher = LifecycleDispatcher::new(
        config,
        Builds(calls.clone()),
        EmptyRegistry(calls.clone()),
    );
    (dispatcher, calls)
}

async fn dispatch(
    dispatcher: &LifecycleDispatcher<Builds, EmptyRegistry>,
    payload: Value,
) -> Result<Value, SyncError> {
    let event: LifecycleEvent = serde_json::from_value(payload).unwrap();
    let result = dispatcher.on_event(&event).await?;
    Ok(serde_json::to_value(result).unwrap())
}

#[tokio::test]
async fn create_triggers_build_for_configured_project() {
    let (dispatcher, calls) = setup();

    let response = dispatch(
        &dispatcher,
        json!({ "RequestType": "Create", "ResourceProperties": {} }),
    )
    .await
    .unwrap();

    assert_eq!(response["PhysicalResourceId"], "TheCustomResource");
    assert_eq!(response["Data"]["BuildId"], "sync-project:7f3a");
    assert_eq!(*calls.builds.lock().unwrap(), vec!["sync-project"]);
    assert!(calls.deletes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn delete_succeeds_when_image_is_absent() {
    let (dispatcher, calls) = setup();

    let response = dispatch(
        &dispatcher,
        json!({ "RequestType": "Delete", "PhysicalResourceId": "TheCustomResource" }),
    )
    .await
    .unwrap();

    assert_eq!(
        response,
        json!({ "PhysicalResourceId": "TheCustomResource" })
    );
    assert_eq!(
        *calls.deletes.lock().unwrap(),
        vec![("nextcloud".to_string(), vec!["latest".to_string()])]
    );
    assert!(calls.builds.lock().unwrap().is_empty());
}

#[tokio::test]
async fn delete_accepts_null_resource_properties() {
    let (dispatcher, calls) = setup();

    let response = dispatch(
        &dispatcher,
        json!({
            "RequestType": "Delete",
            "PhysicalResourceId": "TheCustomResource",
            "ResourceProperties": null
        }),
    )
    .await
    .unwrap();

    assert_eq!(response["PhysicalResourceId"], "TheCustomResource");
    assert_eq!(calls.deletes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn update_returns_existing_id_without_side_effects() {
    let (dispatcher, calls) = setup();

    let response = dispatch(
        &dispatcher,
        json!({
            "RequestType": "Update",
            "PhysicalResourceId": "TheCustomResource",
            "ResourceProperties": { "ServiceToken": "arn:provider", "Revision": "2" },
            "OldResourceProperties": { "ServiceToken": "arn:provider", "Revision": "1" }
        }),
    )
    .await
    .unwrap();

    assert_eq!(response["PhysicalResourceId"], "TheCustomResource");
    assert!(calls.builds.lock().unwrap().is_empty());
    assert!(calls.deletes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_request_type_fails_without_calls() {
    let (dispatcher, calls) = setup();

    let err = dispatch(&dispatcher, json!({ "RequestType": "Frobnicate" }))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::UnsupportedRequestType { .. }));
    assert!(err.to_string().contains("Frobnicate"));
    assert!(calls.builds.lock().unwrap().is_empty());
    assert!(calls.deletes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn full_stack_lifecycle() {
    let (dispatcher, calls) = setup();

    let created = dispatch(&dispatcher, json!({ "RequestType": "Create" }))
        .await
        .unwrap();
    let id = created["PhysicalResourceId"].as_str().unwrap().to_string();

    let updated = dispatch(
        &dispatcher,
        json!({ "RequestType": "Update", "PhysicalResourceId": id }),
    )
    .await
    .unwrap();
    assert_eq!(updated["PhysicalResourceId"], id.as_str());

    dispatch(
        &dispatcher,
        json!({ "RequestType": "Delete", "PhysicalResourceId": id }),
    )
    .await
    .unwrap();
    dispatch(
        &dispatcher,
        json!({ "RequestType": "Delete", "PhysicalResourceId": id }),
    )
    .await
    .unwrap();

    assert_eq!(calls.builds.lock().unwrap().len(), 1);
    assert_eq!(calls.deletes.lock().unwrap().len(), 2);
}
