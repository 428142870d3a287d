//! The normalized error returned by every `ApiClient` call.
//!
//! # Design
//! Each variant is one way a call can fail, but all of them answer the same
//! three questions through accessors: `status_code()`, `message()` and
//! `payload()`. The payload is whatever body the server sent, envelope or
//! not; `failure()` is the typed view of it when it is a failure envelope.
//! Failures without a response report status 500. A 401 gets its own variant
//! because the client clears stored credentials when it sees one.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::envelope::Failure;
use crate::http::TransportError;

/// Status reported when no response was received.
pub const DEFAULT_STATUS: u16 = 500;

/// Shown when neither the server nor the transport supplied a message.
pub const GENERIC_FAILURE_MESSAGE: &str = "알 수 없는 오류 발생";

/// Errors returned by `ApiClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status other than 401.
    #[error("HTTP {status}: {message}")]
    Server {
        status: u16,
        message: String,
        payload: Option<Value>,
        failure: Option<Failure>,
    },

    /// The server answered 401. Stored credentials have been cleared.
    #[error("HTTP 401: {message}")]
    Unauthorized {
        message: String,
        payload: Option<Value>,
        failure: Option<Failure>,
    },

    /// The request went out but no response came back.
    #[error("no response received: {message}")]
    Transport { message: String },

    /// The request was never sent.
    #[error("request not sent: {message}")]
    Request { message: String },

    /// A 2xx response whose body is not a usable success envelope.
    #[error("unexpected response body (HTTP {status}): {message}")]
    Decode { status: u16, message: String },
}

impl ApiError {
    /// Build the error for a response that carried a failure status.
    ///
    /// The message is the body's `message` string when it has a non-empty
    /// one, then `fallback`, then the generic message.
    pub fn from_status(status: u16, payload: Option<Value>, fallback: Option<String>) -> Self {
        let message = payload
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .or(fallback)
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
        let failure = payload.as_ref().and_then(failure_view);

        if status == 401 {
            ApiError::Unauthorized {
                message,
                payload,
                failure,
            }
        } else {
            ApiError::Server {
                status,
                message,
                payload,
                failure,
            }
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Server { status, .. } | ApiError::Decode { status, .. } => *status,
            ApiError::Unauthorized { .. } => 401,
            ApiError::Transport { .. } | ApiError::Request { .. } => DEFAULT_STATUS,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Server { message, .. }
            | ApiError::Unauthorized { message, .. }
            | ApiError::Transport { message }
            | ApiError::Request { message }
            | ApiError::Decode { message, .. } => message,
        }
    }

    /// The body the server sent with the failure, if there was one.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiError::Server { payload, .. } | ApiError::Unauthorized { payload, .. } => {
                payload.as_ref()
            }
            _ => None,
        }
    }

    /// The payload as a failure envelope, when it is one.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            ApiError::Server { failure, .. } | ApiError::Unauthorized { failure, .. } => {
                failure.as_ref()
            }
            _ => None,
        }
    }

    /// Per-field messages from the server, for showing next to form inputs.
    pub fn field_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        self.failure().and_then(|f| f.errors.as_ref())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// True when the call never produced a response.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Transport { .. } | ApiError::Request { .. })
    }
}

/// Bodies flagged `success: false` or carrying an `errors` map.
fn failure_view(body: &Value) -> Option<Failure> {
    let flagged = body.get("success") == Some(&Value::Bool(false));
    if !flagged && body.get("errors").is_none() {
        return None;
    }
    serde_json::from_value(body.clone()).ok()
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        let message = error.to_string();
        match error {
            TransportError::InvalidRequest(_) => ApiError::Request { message },
            TransportError::Timeout { .. }
            | TransportError::Connect(_)
            | TransportError::Other(_) => ApiError::Transport { message },
        }
    }
}
