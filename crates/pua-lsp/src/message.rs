//! JSON-RPC envelopes.
//!
//! Request ids are kept as the raw JSON value the client sent, so any id
//! (a 64-bit integer, a float, a string) is echoed back unchanged in the
//! response.

use lsp_server::{ErrorCode, Notification, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request id exactly as it appeared on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Value);

impl RequestId {
    /// The id as JSON.
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for RequestId {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        Self(Value::from(id))
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self(Value::from(id))
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// A client request: carries an id and expects exactly one response.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Id to echo in the response.
    pub id: RequestId,
    /// Method name.
    pub method: String,
    /// Raw parameters (`null` when absent).
    #[serde(skip_serializing_if = "Value::is_null")]
    pub params: Value,
}

impl Request {
    /// Build a request.
    pub fn new(id: RequestId, method: impl Into<String>, params: Value) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }
}

/// A response to a request.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// Id of the request being answered.
    pub id: RequestId,
    /// Result on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl Response {
    /// A successful response.
    pub const fn new_ok(id: RequestId, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// An error response.
    pub fn new_err(id: RequestId, code: ErrorCode, message: String) -> Self {
        Self {
            id,
            result: None,
            error: Some(ResponseError {
                code: code as i32,
                message,
                data: None,
            }),
        }
    }
}

/// Any message exchanged with the client.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Message {
    /// Has an id and a method.
    Request(Request),
    /// Has an id but no method.
    Response(Response),
    /// Has a method but no id.
    Notification(Notification),
}

/// Incoming body before classification.
#[derive(Deserialize)]
struct RawMessage {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Value,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ResponseError>,
}

impl Message {
    /// Decode a message body.
    ///
    /// A non-null `id` next to a `method` makes a request; a `method` alone
    /// makes a notification; anything else is treated as a response.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let raw: RawMessage = serde_json::from_str(text)?;

        let msg = match (raw.id, raw.method) {
            (Some(id), Some(method)) => Self::Request(Request::new(id.into(), method, raw.params)),
            (None, Some(method)) => Self::Notification(Notification {
                method,
                params: raw.params,
            }),
            (id, None) => Self::Response(Response {
                id: id.unwrap_or_default().into(),
                result: raw.result,
                error: raw.error,
            }),
        };
        Ok(msg)
    }
}
