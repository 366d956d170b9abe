//! Remote message API integration.
//!
//! This module provides the HTTP client for the bot's backend: relaying chat
//! messages, checking that the server is up, and reading its bot status.
//! Call failures are returned as values ([`ApiFailure`]) rather than errors,
//! since every failure is recovered by the caller.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::utils::validation::endpoint;

const MESSAGE_PATH: &str = "/api/message";
const HEALTH_PATH: &str = "/";
const STATUS_PATH: &str = "/api/bot/status";

/// Body of a message relay request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageRequest<'a> {
    pub message: &'a str,
    pub sender: &'a str,
    pub room: &'a str,
}

/// Standard `{ success, data }` envelope returned by every API endpoint.
///
/// `success` is kept loosely typed: the server is judged by the truthiness of
/// the flag, not by its JSON type.
#[derive(Deserialize, Debug)]
struct ApiEnvelope<T> {
    success: Option<Value>,
    data: Option<T>,
}

/// Payload of a successful message relay.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseData {
    /// Text to send back to the chat
    pub response: Option<Value>,
    /// Kind of handler that produced the reply (`"admin"`, `"memory"`, `"message"`)
    #[serde(rename = "type")]
    pub kind: Option<Value>,
}

impl ResponseData {
    /// The reply text, if `response` is truthy and can be rendered as text.
    ///
    /// Strings are relayed verbatim, non-zero numbers and `true` as their JSON
    /// text. Arrays and objects are never relayed.
    pub fn reply_text(&self) -> Option<String> {
        match self.response.as_ref()? {
            value if !is_truthy(value) => None,
            Value::String(text) => Some(text.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(_) => Some("true".to_string()),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.kind.as_ref(), Some(Value::String(kind)) if kind == "admin")
    }
}

/// JavaScript-style truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Bot status as reported by the remote server.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStatus {
    pub is_active: bool,
}

/// Why a remote call did not produce a usable payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// The call did not finish within its timeout
    Timeout,
    /// Connection or transport error
    Network(String),
    /// The server answered with a status other than 200
    Status(u16),
    /// The body was not the expected JSON shape
    Malformed(String),
    /// The server answered with a falsy or missing `success` flag
    Rejected,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Network(msg) => write!(f, "network error: {}", msg),
            Self::Status(code) => write!(f, "unexpected status {}", code),
            Self::Malformed(msg) => write!(f, "malformed response: {}", msg),
            Self::Rejected => write!(f, "server reported failure"),
        }
    }
}

impl From<reqwest::Error> for ApiFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Result of relaying one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome {
    /// The server handled the message
    Success(ResponseData),
    /// The server could not be used; the caller should fall back to offline replies
    Unavailable(ApiFailure),
}

/// HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
    health_timeout: Duration,
}

impl ApiClient {
    /// Create a client for the API described by `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.api_base_url.clone(),
            request_timeout: config.request_timeout,
            health_timeout: config.health_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Relay a chat message to `POST /api/message`.
    ///
    /// Never fails: transport errors, timeouts, non-200 statuses, bodies that are
    /// not the expected envelope, and `success: false` all come back as
    /// [`ApiOutcome::Unavailable`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use khhbot::api::{ApiClient, ApiOutcome, MessageRequest};
    /// use khhbot::config::Config;
    ///
    /// # async fn example() {
    /// let client = ApiClient::new(&Config::default());
    /// let request = MessageRequest { message: "크하학", sender: "하리", room: "기본방" };
    ///
    /// if let ApiOutcome::Success(data) = client.send_message(&request).await {
    ///     println!("{:?}", data.reply_text());
    /// }
    /// # }
    /// ```
    pub async fn send_message(&self, request: &MessageRequest<'_>) -> ApiOutcome {
        let url = endpoint(&self.base_url, MESSAGE_PATH);

        match self.post_message(&url, request).await {
            Ok(data) => {
                debug!(url = %url, kind = ?data.kind, "API handled message");
                ApiOutcome::Success(data)
            }
            Err(failure) => {
                warn!(url = %url, error = %failure, "API call failed");
                ApiOutcome::Unavailable(failure)
            }
        }
    }

    async fn post_message(&self, url: &str, request: &MessageRequest<'_>) -> Result<ResponseData, ApiFailure> {
        let resp = self
            .http
            .post(url)
            .json(request)
            .timeout(self.request_timeout)
            .send()
            .await?;
        Self::read_envelope::<ResponseData>(resp).await
    }

    /// Check that the API server answers `GET /` with HTTP 200.
    ///
    /// Any other status, or any error, counts as unhealthy.
    pub async fn check_health(&self) -> bool {
        let url = endpoint(&self.base_url, HEALTH_PATH);
        match self.http.get(&url).timeout(self.health_timeout).send().await {
            Ok(resp) => resp.status().as_u16() == 200,
            Err(e) => {
                debug!(url = %url, error = %e, "Health check failed");
                false
            }
        }
    }

    /// Read the server's bot status from `GET /api/bot/status`.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiFailure`] describing why the status could not be read.
    pub async fn fetch_status(&self) -> Result<RemoteStatus, ApiFailure> {
        let url = endpoint(&self.base_url, STATUS_PATH);
        let resp = self
            .http
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await?;
        Self::read_envelope::<RemoteStatus>(resp).await
    }

    /// Unwrap a `{ success, data }` envelope from an HTTP 200 response.
    async fn read_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiFailure> {
        let status = resp.status().as_u16();
        if status != 200 {
            return Err(ApiFailure::Status(status));
        }

        let envelope = resp.json::<ApiEnvelope<T>>().await?;
        if !envelope.success.as_ref().is_some_and(is_truthy) {
            return Err(ApiFailure::Rejected);
        }

        envelope
            .data
            .ok_or_else(|| ApiFailure::Malformed("missing data".to_string()))
    }
}
