//! Live JSON fetching with per-attempt timeouts, retries and cancellation.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::error::{GenError, Result};
use crate::request_fn::HttpMethod;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Credentials attached to every attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Auth {
    #[default]
    None,
    Bearer(String),
    Cookie(String),
}

/// One request, as collected from the prompts.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: Url,
    pub method: HttpMethod,
    pub auth: Auth,
    /// JSON body, sent only when present.
    pub body: Option<Value>,
}

impl FetchRequest {
    pub fn new(url: Url, method: HttpMethod) -> Self {
        Self {
            url,
            method,
            auth: Auth::None,
            body: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Per attempt, in milliseconds. Zero disables the timeout.
    pub timeout_ms: u64,
    /// Total attempts, at least one.
    pub max_retries: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// HTTP client shared by fetch mode and remote OpenAPI loading.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("go-gen/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|err| {
            warn!(error = %err, "Failed to build HTTP client.");
            GenError::Request(err)
        })
}

/// Parse and check a user-supplied URL.
pub fn parse_url(input: &str) -> Result<Url> {
    Url::parse(input.trim()).map_err(|err| GenError::InvalidUrl(format!("{input}: {err}")))
}

/// Fetch `request` and decode the body as JSON.
///
/// Network errors, non-2xx statuses and bodies that are not JSON are retried
/// immediately, up to `max_retries` attempts in total. A timeout fails at
/// once. A cancelled token aborts the in-flight attempt and is never
/// retried.
pub async fn fetch_json(
    client: &reqwest::Client,
    request: &FetchRequest,
    options: FetchOptions,
    cancel: &CancellationToken,
) -> Result<Value> {
    let attempts = options.max_retries.max(1);
    let mut attempt = 1;

    loop {
        if cancel.is_cancelled() {
            return Err(GenError::Cancelled);
        }

        debug!(attempt, url = %request.url, method = %request.method, "Sending request.");
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(GenError::Cancelled),
            outcome = attempt_once(client, request, options.timeout_ms) => outcome,
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts && err.is_retryable() => {
                warn!(
                    attempt,
                    max_retries = attempts,
                    error = %err,
                    "Request failed, retrying"
                );
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

async fn attempt_once(client: &reqwest::Client, request: &FetchRequest, timeout_ms: u64) -> Result<Value> {
    let mut builder = client
        .request(request.method.into(), request.url.clone())
        .header(CONTENT_TYPE, "application/json");
    match &request.auth {
        Auth::None => {}
        Auth::Bearer(token) => builder = builder.header(AUTHORIZATION, format!("Bearer {token}")),
        Auth::Cookie(cookie) => builder = builder.header(COOKIE, cookie.as_str()),
    }
    if let Some(body) = &request.body {
        builder = builder.body(serde_json::to_vec(body)?);
    }

    let send = async {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenError::Http(status));
        }
        let bytes = response.bytes().await?;
        Ok::<Value, GenError>(serde_json::from_slice(&bytes)?)
    };

    if timeout_ms == 0 {
        return send.await;
    }
    tokio::time::timeout(Duration::from_millis(timeout_ms), send)
        .await
        .map_err(|_| GenError::Timeout(timeout_ms))?
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request_for(server: &MockServer, route: &str) -> FetchRequest {
        FetchRequest::new(parse_url(&format!("{}{route}", server.uri())).unwrap(), HttpMethod::Get)
    }

    fn options(max_retries: u32) -> FetchOptions {
        FetchOptions {
            timeout_ms: 2_000,
            max_retries,
        }
    }

    #[tokio::test]
    async fn returns_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "users": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let value = fetch_json(
            &reqwest::Client::new(),
            &request_for(&server, "/users"),
            options(3),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(value, json!({ "users": [] }));
    }

    #[tokio::test]
    async fn sends_auth_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({ "name": "a" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
            .expect(1)
            .mount(&server)
            .await;

        let mut request = request_for(&server, "/users");
        request.method = HttpMethod::Post;
        request.auth = Auth::Bearer("secret".to_string());
        request.body = Some(json!({ "name": "a" }));

        let value = fetch_json(&reqwest::Client::new(), &request, options(1), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(value, json!({ "id": 1 }));
    }

    #[tokio::test]
    async fn sends_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("cookie", "session=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let mut request = request_for(&server, "/me");
        request.auth = Auth::Cookie("session=abc".to_string());
        fetch_json(&reqwest::Client::new(), &request, options(1), &CancellationToken::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn server_errors_are_retried_then_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let err = fetch_json(
            &reqwest::Client::new(),
            &request_for(&server, "/broken"),
            options(3),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, GenError::Http(status) if status.as_u16() == 500));
        assert_eq!(err.to_string(), "HTTP 500 Internal Server Error");
    }

    #[tokio::test]
    async fn recovers_after_a_failed_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .mount(&server)
            .await;

        let value = fetch_json(
            &reqwest::Client::new(),
            &request_for(&server, "/flaky"),
            options(3),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(value, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn timeouts_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .expect(1)
            .mount(&server)
            .await;

        let err = fetch_json(
            &reqwest::Client::new(),
            &request_for(&server, "/slow"),
            FetchOptions {
                timeout_ms: 50,
                max_retries: 3,
            },
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, GenError::Timeout(50)));
    }

    #[tokio::test]
    async fn non_json_bodies_are_retried_then_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(2)
            .mount(&server)
            .await;

        let err = fetch_json(
            &reqwest::Client::new(),
            &request_for(&server, "/html"),
            options(2),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, GenError::Json(_)));
    }

    #[tokio::test]
    async fn cancellation_stops_in_flight_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = fetch_json(
            &reqwest::Client::new(),
            &request_for(&server, "/slow"),
            FetchOptions {
                timeout_ms: 10_000,
                max_retries: 3,
            },
            &cancel,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, GenError::Cancelled));
    }

    #[tokio::test]
    async fn already_cancelled_token_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = fetch_json(&reqwest::Client::new(), &request_for(&server, "/x"), options(3), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, GenError::Cancelled));
    }

    #[tokio::test]
    async fn built_client_identifies_itself() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", concat!("go-gen/", env!("CARGO_PKG_VERSION"))))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
            .expect(1)
            .mount(&server)
            .await;

        let value = fetch_json(
            &build_client().unwrap(),
            &request_for(&server, "/ua"),
            options(1),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn rejects_malformed_urls() {
        assert!(matches!(parse_url("not a url"), Err(GenError::InvalidUrl(_))));
        assert!(parse_url(" https://example.com/api ").is_ok());
    }
}
