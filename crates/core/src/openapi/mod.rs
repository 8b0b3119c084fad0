//! OpenAPI mode: load a document and turn its operations into endpoints
//! that can be sampled and written like a live response.

mod sampler;
mod spec;

use std::path::Path;

use gogen_common::Config;
use serde_json::Value;
use tracing::{debug, warn};

pub use sampler::schema_to_sample;
pub use spec::{Components, JSON_MEDIA_TYPE, MediaType, OpenApiDocument, Operation, RequestBody, Response};

use crate::error::{GenError, Result};
use crate::naming::{pascal_case, sanitize_identifier, upper_first};
use crate::request_fn::HttpMethod;
use crate::typegen::generate_endpoint_declarations;
use crate::writer::{WriteOutcome, WriteRequest, write_files};

/// One operation with a `200` JSON response.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub url: String,
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub response_schema: Value,
    /// Present for bodies on POST, PUT and PATCH only.
    pub request_schema: Option<Value>,
}

impl Endpoint {
    /// `GetUsersIdResponse` for `GET /users/{id}`.
    pub fn default_type_name(&self) -> String {
        let method = upper_first(&self.method.as_str().to_ascii_lowercase());
        format!("{method}{}Response", url_identifier(&self.url))
    }

    /// The `operationId` when present, otherwise `getUsersId`.
    pub fn default_function_name(&self) -> String {
        match self.operation_id.as_deref().map(sanitize_identifier) {
            Some(id) if !id.is_empty() => id,
            _ => format!(
                "{}{}",
                self.method.as_str().to_ascii_lowercase(),
                url_identifier(&self.url)
            ),
        }
    }

    /// Sample response JSON for the type generator.
    pub fn sample_response(&self, document: &OpenApiDocument) -> Value {
        schema_to_sample(&self.response_schema, &document.components.schemas)
    }

    /// Sample request body JSON, when the operation takes one.
    pub fn sample_request(&self, document: &OpenApiDocument) -> Option<Value> {
        self.request_schema
            .as_ref()
            .map(|schema| schema_to_sample(schema, &document.components.schemas))
    }
}

/// Sample `endpoint`, generate its declarations and write them under
/// `<base_dir>/<api_name>/` with the configured prefixes.
pub fn write_endpoint(
    document: &OpenApiDocument,
    endpoint: &Endpoint,
    base_dir: &Path,
    api_name: &str,
    type_name: &str,
    config: &Config,
) -> Result<WriteOutcome> {
    let response = endpoint.sample_response(document);
    let request = endpoint.sample_request(document);
    let types_content = generate_endpoint_declarations(&response, request.as_ref(), type_name);

    let mut write = WriteRequest::new(base_dir, api_name, type_name, &endpoint.url, types_content)
        .with_config(config);
    write.method = endpoint.method;
    write.has_request_body = request.is_some();
    write_files(&write)
}

fn url_identifier(url: &str) -> String {
    sanitize_identifier(&pascal_case(&url.replace('/', "_")))
}

/// Whether `source` should be fetched rather than read from disk.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Load an OpenAPI document from an `http(s)://` URL or a local file.
///
/// Local files ending in `.yaml` / `.yml` are parsed as YAML, everything
/// else as JSON.
pub async fn load_document(client: &reqwest::Client, source: &str) -> Result<OpenApiDocument> {
    let raw: Value = if is_remote(source) {
        debug!(%source, "Fetching OpenAPI document.");
        let response = client.get(source).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenError::Http(status));
        }
        response.json().await?
    } else {
        let path = Path::new(source);
        if !path.is_file() {
            return Err(GenError::InvalidSource(source.to_string()));
        }
        debug!(path = %path.display(), "Reading OpenAPI document.");
        let content = std::fs::read_to_string(path)
            .map_err(|err| GenError::io(format!("Failed to read {}", path.display()), err))?;
        parse_document_text(&content, path)?
    };

    Ok(serde_json::from_value(raw)?)
}

fn parse_document_text(content: &str, path: &Path) -> Result<Value> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        Ok(serde_yaml::from_str(content)?)
    } else {
        Ok(serde_json::from_str(content)?)
    }
}

/// Flatten `paths` into endpoints, in document order.
///
/// Operations without a `200` `application/json` response schema are
/// skipped, as are keys under a path item that are not HTTP methods.
pub fn endpoints(document: &OpenApiDocument) -> Vec<Endpoint> {
    let mut out = Vec::new();

    for (url, item) in &document.paths {
        let Some(methods) = item.as_object() else {
            continue;
        };
        for (key, raw) in methods {
            let Ok(method) = key.parse::<HttpMethod>() else {
                continue;
            };
            let operation: Operation = match serde_json::from_value(raw.clone()) {
                Ok(operation) => operation,
                Err(err) => {
                    warn!(%url, method = %method, error = %err, "Skipping malformed operation.");
                    continue;
                }
            };
            let Some(response_schema) = operation.ok_json_schema() else {
                continue;
            };
            let request_schema = if method.allows_body() {
                operation.request_json_schema().cloned()
            } else {
                None
            };

            out.push(Endpoint {
                url: url.clone(),
                method,
                operation_id: operation.operation_id.clone(),
                summary: operation.summary.clone(),
                response_schema: response_schema.clone(),
                request_schema,
            });
        }
    }

    debug!(count = out.len(), "Collected OpenAPI endpoints.");
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DOCUMENT: &str = r##"{
  "openapi": "3.0.0",
  "info": { "title": "Test API", "version": "1.0.0" },
  "paths": {
    "/users": {
      "parameters": [],
      "get": {
        "operationId": "listUsers",
        "summary": "List users",
        "responses": {
          "200": { "content": { "application/json": { "schema": { "type": "array", "items": { "$ref": "#/components/schemas/User" } } } } }
        }
      },
      "post": {
        "requestBody": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/NewUser" } } } },
        "responses": {
          "200": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/User" } } } }
        }
      }
    },
    "/users/{id}": {
      "delete": {
        "responses": { "204": { "description": "Deleted" } }
      },
      "get": {
        "requestBody": { "content": { "application/json": { "schema": { "type": "object" } } } },
        "responses": {
          "200": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/User" } } } }
        }
      }
    },
    "/health": {
      "get": {
        "responses": { "200": { "content": { "text/plain": { "schema": { "type": "string" } } } } }
      }
    }
  },
  "components": {
    "schemas": {
      "User": { "type": "object", "properties": { "id": { "type": "integer" }, "name": { "type": "string" } } },
      "NewUser": { "type": "object", "properties": { "name": { "type": "string" } } }
    }
  }
}"##;

    fn document() -> OpenApiDocument {
        serde_json::from_str(DOCUMENT).unwrap()
    }

    #[test]
    fn flattens_json_operations_in_document_order() {
        let found = endpoints(&document());
        let summary: Vec<_> = found
            .iter()
            .map(|e| format!("{} {}", e.method, e.url))
            .collect();
        assert_eq!(summary, vec!["GET /users", "POST /users", "GET /users/{id}"]);
        assert_eq!(found[0].summary.as_deref(), Some("List users"));
    }

    #[test]
    fn request_schema_only_for_body_methods() {
        let found = endpoints(&document());
        assert!(found[0].request_schema.is_none());
        assert!(found[1].request_schema.is_some());
        // GET with a body is ignored.
        assert!(found[2].request_schema.is_none());
    }

    #[test]
    fn default_names() {
        let found = endpoints(&document());
        assert_eq!(found[0].default_type_name(), "GetUsersResponse");
        assert_eq!(found[0].default_function_name(), "listUsers");
        assert_eq!(found[1].default_type_name(), "PostUsersResponse");
        assert_eq!(found[1].default_function_name(), "postUsers");
        assert_eq!(found[2].default_type_name(), "GetUsersIdResponse");
        assert_eq!(found[2].default_function_name(), "getUsersId");
    }

    #[test]
    fn samples_follow_component_refs() {
        let doc = document();
        let found = endpoints(&doc);
        assert_eq!(found[0].sample_response(&doc), json!([{ "id": 0, "name": "example" }]));
        assert_eq!(found[1].sample_request(&doc), Some(json!({ "name": "example" })));
        assert_eq!(found[0].sample_request(&doc), None);
    }

    #[test]
    fn document_without_paths_has_no_endpoints() {
        let doc: OpenApiDocument = serde_json::from_str(r#"{ "openapi": "3.0.0" }"#).unwrap();
        assert!(endpoints(&doc).is_empty());
    }

    #[test]
    fn writes_endpoints_into_one_directory() {
        let doc = document();
        let found = endpoints(&doc);
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::default();

        for endpoint in &found[..2] {
            write_endpoint(
                &doc,
                endpoint,
                tmp.path(),
                "users",
                &endpoint.default_type_name(),
                &config,
            )
            .unwrap();
        }
        let outcome = write_endpoint(&doc, &found[2], tmp.path(), "users", "GetUsersIdResponse", &config).unwrap();
        assert!(outcome.dir_existed);
        assert_eq!(outcome.function_name, "users");
        assert!(outcome.api_skipped);

        let types = std::fs::read_to_string(tmp.path().join("users").join("types.ts")).unwrap();
        assert!(types.contains("export type GetUsersResponse = GetUsersResponseElement[];"));
        assert!(types.contains("export interface PostUsersResponse {"));
        assert!(types.contains("export interface PostUsersResponseRequest {\n    name: string;\n}"));
        assert!(types.contains("export interface GetUsersIdResponse {"));

        let api = std::fs::read_to_string(tmp.path().join("users").join("api.ts")).unwrap();
        assert_eq!(api.matches("export function").count(), 1);
        assert!(api.contains("request.get<GetUsersResponse>(\"/users\")"));
    }

    #[test]
    fn body_methods_take_data() {
        let doc = document();
        let found = endpoints(&doc);
        let tmp = tempfile::tempdir().unwrap();
        let outcome = write_endpoint(
            &doc,
            &found[1],
            tmp.path(),
            &found[1].default_function_name(),
            &found[1].default_type_name(),
            &Config::default(),
        )
        .unwrap();
        let api = std::fs::read_to_string(outcome.output_dir.join("api.ts")).unwrap();
        assert!(api.contains("export function postUsers(data: PostUsersResponseRequest)"));
        assert!(api.contains("request.post<PostUsersResponse>(\"/users\", data)"));
    }

    #[tokio::test]
    async fn loads_json_and_yaml_files() {
        let dir = tempfile::tempdir().unwrap();
        let client = reqwest::Client::new();

        let json_path = dir.path().join("openapi.json");
        std::fs::write(&json_path, DOCUMENT).unwrap();
        let doc = load_document(&client, json_path.to_str().unwrap()).await.unwrap();
        assert_eq!(endpoints(&doc).len(), 3);

        let yaml_path = dir.path().join("openapi.yaml");
        std::fs::write(
            &yaml_path,
            "paths:\n  /ping:\n    get:\n      responses:\n        '200':\n          content:\n            application/json:\n              schema:\n                type: object\n                properties:\n                  ok:\n                    type: boolean\n",
        )
        .unwrap();
        let doc = load_document(&client, yaml_path.to_str().unwrap()).await.unwrap();
        let found = endpoints(&doc);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sample_response(&doc), json!({ "ok": false }));
    }

    #[tokio::test]
    async fn missing_file_is_an_invalid_source() {
        let client = reqwest::Client::new();
        let err = load_document(&client, "./definitely/not/here.json").await.unwrap_err();
        assert!(matches!(err, GenError::InvalidSource(_)));
    }

    #[tokio::test]
    async fn loads_remote_documents() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/openapi.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(DOCUMENT, "application/json"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let doc = load_document(&client, &format!("{}/openapi.json", server.uri()))
            .await
            .unwrap();
        assert_eq!(endpoints(&doc).len(), 3);

        let err = load_document(&client, &format!("{}/missing.json", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, GenError::Http(status) if status.as_u16() == 404));
    }
}
