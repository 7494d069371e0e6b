//! Wire types exchanged with the custom-resource provider framework

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::SyncError;
use crate::PHYSICAL_RESOURCE_ID;

/// Lifecycle phase requested by the provisioning engine
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Create => "Create",
            RequestType::Update => "Update",
            RequestType::Delete => "Delete",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = SyncError;

    // Case-sensitive: the framework only ever sends these exact spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Create" => Ok(RequestType::Create),
            "Update" => Ok(RequestType::Update),
            "Delete" => Ok(RequestType::Delete),
            other => Err(SyncError::UnsupportedRequestType {
                request_type: other.to_string(),
            }),
        }
    }
}

/// Incoming lifecycle request.
///
/// `request_type` stays a raw string so that an unknown phase reaches the
/// dispatcher and fails there instead of during payload decoding.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    pub request_type: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub resource_properties: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_resource_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

impl LifecycleEvent {
    pub fn new(request_type: impl Into<String>) -> Self {
        Self {
            request_type: request_type.into(),
            ..Default::default()
        }
    }

    pub fn with_physical_resource_id(mut self, id: impl Into<String>) -> Self {
        self.physical_resource_id = Some(id.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.resource_properties.insert(key.into(), value);
        self
    }

    /// Parse the declared phase, failing on anything outside Create/Update/Delete.
    pub fn request_type(&self) -> Result<RequestType, SyncError> {
        self.request_type.parse()
    }

    /// Identifier to report back when the event carries none.
    pub fn physical_resource_id_or_default(&self) -> &str {
        self.physical_resource_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(PHYSICAL_RESOURCE_ID)
    }
}

// Some callers send `"ResourceProperties": null` instead of omitting the field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response handed back to the provider framework
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleResult {
    pub physical_resource_id: String,

    /// Attributes readable from the stack via GetAtt
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl LifecycleResult {
    pub fn new(physical_resource_id: impl Into<String>) -> Self {
        Self {
            physical_resource_id: physical_resource_id.into(),
            data: Map::new(),
        }
    }
}
