//! OpenAPI document structs for serde deserialization.
//!
//! Only the parts needed to find JSON responses and request bodies are
//! typed. Schemas stay as `serde_json::Value` so property order survives
//! into the sampled JSON (the workspace enables `preserve_order`).

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Root OpenAPI document.
#[derive(Debug, Default, Deserialize)]
pub struct OpenApiDocument {
    /// Path template -> path item, in document order.
    #[serde(default)]
    pub paths: Map<String, Value>,
    #[serde(default)]
    pub components: Components,
}

/// Components section containing reusable schemas.
#[derive(Debug, Default, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: Map<String, Value>,
}

/// One operation under a path item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub responses: HashMap<String, Response>,
}

/// A request body definition.
#[derive(Debug, Deserialize)]
pub struct RequestBody {
    pub content: Option<HashMap<String, MediaType>>,
}

/// A response definition.
#[derive(Debug, Deserialize)]
pub struct Response {
    pub content: Option<HashMap<String, MediaType>>,
}

/// Media type content (e.g., application/json).
#[derive(Debug, Deserialize)]
pub struct MediaType {
    pub schema: Option<Value>,
}

fn json_schema(content: Option<&HashMap<String, MediaType>>) -> Option<&Value> {
    content?.get(JSON_MEDIA_TYPE)?.schema.as_ref()
}

impl Operation {
    /// Schema of the `200` JSON response.
    pub fn ok_json_schema(&self) -> Option<&Value> {
        json_schema(self.responses.get("200")?.content.as_ref())
    }

    /// Schema of the JSON request body.
    pub fn request_json_schema(&self) -> Option<&Value> {
        json_schema(self.request_body.as_ref()?.content.as_ref())
    }
}
