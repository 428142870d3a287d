//! Verify response normalization against JSON vectors in `test-vectors/`.
//!
//! Each case describes a simulated response and the expected outcome: the
//! unwrapped data or the normalized error, plus whether the stored token
//! survives. Parsed JSON is compared, not raw strings.

use std::sync::Arc;

use serde_json::Value;
use starter_core::{
    ApiClient, ApiError, HttpRequest, HttpResponse, MemoryTokenStore, Settings, TokenStore,
    Transport, TransportError,
};

#[derive(Debug)]
struct Unused;

#[async_trait::async_trait]
impl Transport for Unused {
    async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(TransportError::Other("vectors never hit the network".to_string()))
    }
}

fn kind(err: &ApiError) -> &'static str {
    match err {
        ApiError::Server { .. } => "server",
        ApiError::Unauthorized { .. } => "unauthorized",
        ApiError::Transport { .. } => "transport",
        ApiError::Request { .. } => "request",
        ApiError::Decode { .. } => "decode",
    }
}

#[test]
fn response_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let tokens = Arc::new(MemoryTokenStore::with_token("tok"));
        let client = ApiClient::new(&Settings::default(), Arc::new(Unused), tokens.clone());

        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };

        let expected = &case["expected"];
        let result = client.parse_response::<Value>("http://localhost:3000/api/example", response);

        if let Some(data) = expected.get("data") {
            let got = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));
            assert_eq!(&got, data, "{name}: data");
        } else {
            let want = &expected["error"];
            let err = result.expect_err(name);
            assert_eq!(kind(&err), want["kind"].as_str().unwrap(), "{name}: kind");
            let status = u64::from(err.status_code());
            assert_eq!(status, want["status"].as_u64().unwrap(), "{name}: status");
            if let Some(message) = want.get("message") {
                assert_eq!(err.message(), message.as_str().unwrap(), "{name}: message");
            }
            let has_payload = want["has_payload"].as_bool().unwrap();
            assert_eq!(err.payload().is_some(), has_payload, "{name}: payload");
            if let Some(fields) = want.get("field_errors") {
                let got = serde_json::to_value(err.field_errors()).unwrap();
                assert_eq!(&got, fields, "{name}: field errors");
            }
        }

        let token_kept = expected["token_kept"].as_bool().unwrap();
        assert_eq!(tokens.get().is_some(), token_kept, "{name}: token");
    }
}
