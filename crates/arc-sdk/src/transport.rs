//! Transport layer for node communication
//!
//! The client speaks to an algod node over REST. `Transport` is the seam: the
//! HTTP implementation talks to a real node, the mock one replays scripted
//! responses for tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::SdkError;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
}

/// Content type of msgpack request bodies
pub const MSGPACK_CONTENT_TYPE: &str = "application/msgpack";

/// Content type of raw signed-transaction submissions
pub const BINARY_CONTENT_TYPE: &str = "application/x-binary";

/// One node request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Path including query string, e.g. `/v2/transactions/params`
    pub path: String,
    /// Request body
    pub body: Option<Vec<u8>>,
    /// Content type of the body
    pub content_type: Option<&'static str>,
}

impl Request {
    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            content_type: None,
        }
    }

    /// POST request with a body
    pub fn post(path: impl Into<String>, body: Vec<u8>, content_type: &'static str) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
            content_type: Some(content_type),
        }
    }

    /// Path without the query string
    pub fn route(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }
}

/// Transport trait for node communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and get the JSON response
    async fn request_json(&self, request: Request) -> Result<Value, SdkError>;
}

/// Helper to deserialize response
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, SdkError> {
    serde_json::from_value(value).map_err(|e| SdkError::Serialization(e.to_string()))
}

/// Request as seen by [`MockTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: Method,
    /// Path without the query string
    pub path: String,
    /// Request body
    pub body: Option<Vec<u8>>,
}

#[derive(Default)]
struct MockState {
    /// Fixed responses per route
    responses: HashMap<String, Value>,
    /// One-shot responses per route, consumed before fixed ones
    queued: HashMap<String, VecDeque<Result<Value, SdkError>>>,
    requests: Vec<RecordedRequest>,
}

/// Mock transport for testing
///
/// Cloning yields a handle onto the same script, so a test can keep one copy
/// for inspection while the client owns another.
#[derive(Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

/// Route of the suggested-parameters endpoint
pub const PARAMS_PATH: &str = "/v2/transactions/params";
/// Route of the simulate endpoint
pub const SIMULATE_PATH: &str = "/v2/transactions/simulate";
/// Route of the submission endpoint
pub const SEND_PATH: &str = "/v2/transactions";

impl MockTransport {
    /// Create a mock with default suggested parameters and an empty simulation
    pub fn new() -> Self {
        let mut responses = HashMap::new();
        responses.insert(
            PARAMS_PATH.to_string(),
            serde_json::json!({
                "consensus-version": "future",
                "fee": 0,
                "genesis-hash": "IXnoWtviVVJW5LGivNFc0Dq14V3kqaXuK2u5OQrdVZo=",
                "genesis-id": "voitest-v1",
                "last-round": 1000,
                "min-fee": 1000
            }),
        );
        responses.insert(
            SIMULATE_PATH.to_string(),
            serde_json::json!({"txn-groups": [{"txn-results": []}], "version": 2}),
        );

        Self {
            state: Arc::new(Mutex::new(MockState {
                responses,
                ..Default::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the fixed response for a route
    pub fn set_response(&self, path: &str, response: Value) {
        self.lock().responses.insert(path.to_string(), response);
    }

    /// Remove the fixed response for a route
    pub fn clear_response(&self, path: &str) {
        self.lock().responses.remove(path);
    }

    /// Queue a one-shot response for a route
    pub fn push_response(&self, path: &str, response: Value) {
        self.lock()
            .queued
            .entry(path.to_string())
            .or_default()
            .push_back(Ok(response));
    }

    /// Queue a one-shot error for a route
    pub fn push_error(&self, path: &str, error: SdkError) {
        self.lock()
            .queued
            .entry(path.to_string())
            .or_default()
            .push_back(Err(error));
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests received for one route
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(&self, request: Request) -> Result<Value, SdkError> {
        let route = request.route().to_string();
        let mut state = self.lock();
        state.requests.push(RecordedRequest {
            method: request.method,
            path: route.clone(),
            body: request.body,
        });

        if let Some(queued) = state.queued.get_mut(&route).and_then(VecDeque::pop_front) {
            return queued;
        }

        state.responses.get(&route).cloned().ok_or_else(|| SdkError::Http {
            status: 404,
            message: format!("no mock response for {}", route),
        })
    }
}

/// HTTP transport for a real algod node
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    token: String,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(url: &str, token: &str) -> Result<Self, SdkError> {
        Self::with_timeout(url, token, None)
    }

    /// Create a transport whose requests time out after `timeout`
    pub fn with_timeout(
        url: &str,
        token: &str,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self, SdkError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SdkError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(&self, request: Request) -> Result<Value, SdkError> {
        let url = format!("{}{}", self.url, request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if !self.token.is_empty() {
            builder = builder.header("X-Algo-API-Token", &self.token);
        }
        if let Some(content_type) = request.content_type {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        if !status.is_success() {
            // algod reports errors as {"message": "..."}
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(text);
            return Err(SdkError::Http {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| SdkError::Transport(e.to_string()))
    }
}
