//! The response envelope shared by every API endpoint.
//!
//! # Design
//! On the wire the envelope is a single JSON object whose `success` boolean
//! selects between two shapes. In Rust it is an enum, so callers match on the
//! variant instead of testing a flag. The `success` key is written on
//! serialization and required on deserialization.

use std::collections::BTreeMap;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Page metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Success<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Present only on paginated list responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Body of a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    /// Empty when the server sent only `errors`.
    #[serde(default)]
    pub message: String,
    /// Field name to violation messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Exactly one of the two response shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success(Success<T>),
    Failure(Failure),
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Envelope::Success(Success {
            data,
            message: None,
            timestamp: None,
            pagination: None,
        })
    }

    pub fn failure(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Envelope::Failure(Failure {
            message: message.into(),
            errors: None,
            status_code,
        })
    }

    pub fn into_result(self) -> Result<Success<T>, Failure> {
        match self {
            Envelope::Success(body) => Ok(body),
            Envelope::Failure(body) => Err(body),
        }
    }
}

#[derive(Serialize)]
struct Tagged<'a, B> {
    success: bool,
    #[serde(flatten)]
    body: &'a B,
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Envelope::Success(body) => Tagged {
                success: true,
                body,
            }
            .serialize(serializer),
            Envelope::Failure(body) => Tagged {
                success: false,
                body,
            }
            .serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Envelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value.get("success").and_then(Value::as_bool) {
            Some(true) => serde_json::from_value(value)
                .map(Envelope::Success)
                .map_err(D::Error::custom),
            Some(false) => serde_json::from_value(value)
                .map(Envelope::Failure)
                .map_err(D::Error::custom),
            None => Err(D::Error::custom(
                "envelope is missing the boolean `success` field",
            )),
        }
    }
}
