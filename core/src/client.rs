//! The API client: the single point of egress for network calls.
//!
//! # Design
//! `ApiClient` keeps the build/parse split. `build_request` turns a verb and
//! path into an `HttpRequest` (base URL, JSON headers, bearer token) and
//! `parse_response` turns an `HttpResponse` into either the unwrapped `data`
//! of a success envelope or a normalized `ApiError`. The async verb methods
//! run the two around a `Transport` round-trip.
//!
//! A 401 clears the token store as a side effect. There is no retry here;
//! callers that want one wrap the verb methods.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::envelope::{Envelope, Success};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::settings::{Environment, Settings};
use crate::storage::{FileTokenStore, MemoryTokenStore, TokenStore};
use crate::types::{Page, PaginationParams};

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    environment: Environment,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(
        settings: &Settings,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            environment: settings.environment,
            transport,
            tokens,
        }
    }

    /// Client with the reqwest transport and the token store `settings` selects.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        let transport = ReqwestTransport::new(settings.timeout())?;
        let tokens: Arc<dyn TokenStore> = match &settings.token_dir {
            Some(dir) => Arc::new(FileTokenStore::new(dir)),
            None => Arc::new(MemoryTokenStore::new()),
        };
        Ok(Self::new(settings, Arc::new(transport), tokens))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store the token replayed on every following request.
    pub fn login(&self, token: &str) {
        self.tokens.set(token);
    }

    pub fn logout(&self) {
        self.tokens.clear();
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }

    fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Absolute URL for `path`. Absolute `http(s)` paths are used as given.
    pub fn url_for(&self, path: &str, query: &[(String, String)]) -> String {
        let mut url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_owned()
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        };

        if !query.is_empty() {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query)
                .finish();
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&encoded);
        }
        url
    }

    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(String, String)],
        body: Option<String>,
    ) -> HttpRequest {
        let mut headers = vec![("accept".to_string(), "application/json".to_string())];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = self.tokens.get() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }

        let request = HttpRequest {
            method,
            url: self.url_for(path, query),
            headers,
            body,
        };

        if self.is_development() {
            tracing::info!(
                method = %request.method,
                url = %request.url,
                payload = request.body.as_deref().unwrap_or_default(),
                "API request"
            );
        }
        request
    }

    /// Unwrap the `data` of a success envelope, or normalize the failure.
    ///
    /// `url` is only used for logging.
    pub fn parse_response<T: DeserializeOwned>(
        &self,
        url: &str,
        response: HttpResponse,
    ) -> Result<T, ApiError> {
        self.parse_envelope(url, response).map(|body| body.data)
    }

    fn parse_envelope<T: DeserializeOwned>(
        &self,
        url: &str,
        response: HttpResponse,
    ) -> Result<Success<T>, ApiError> {
        if self.is_development() {
            tracing::debug!(status = response.status, body = %response.body, "API response");
        }

        if !response.is_success() {
            let payload = raw_payload(&response.body);
            let fallback = format!("Request failed with status code {}", response.status);
            let error = ApiError::from_status(response.status, payload, Some(fallback));
            return Err(self.fail(url, error));
        }

        if response.status == 204 && response.body.trim().is_empty() {
            return serde_json::from_value(Value::Null)
                .map(|data| Success {
                    data,
                    message: None,
                    timestamp: None,
                    pagination: None,
                })
                .map_err(|e| self.fail(url, decode_error(response.status, &e)));
        }

        match serde_json::from_str::<Envelope<T>>(&response.body) {
            Ok(Envelope::Success(body)) => Ok(body),
            Ok(Envelope::Failure(failure)) => {
                let status = failure.status_code.unwrap_or(response.status);
                let payload = raw_payload(&response.body);
                Err(self.fail(url, ApiError::from_status(status, payload, None)))
            }
            Err(e) => Err(self.fail(url, decode_error(response.status, &e))),
        }
    }

    /// Log a failure and apply its side effects before handing it back.
    fn fail(&self, url: &str, error: ApiError) -> ApiError {
        tracing::error!(
            status = error.status_code(),
            message = %error.message(),
            payload = ?error.payload(),
            url,
            "API request failed"
        );
        if error.is_unauthorized() {
            self.tokens.clear();
        }
        error
    }

    async fn execute(&self, request: HttpRequest) -> Result<(String, HttpResponse), ApiError> {
        let url = request.url.clone();
        match self.transport.execute(request).await {
            Ok(response) => Ok((url, response)),
            Err(e) => Err(self.fail(&url, ApiError::from(e))),
        }
    }

    /// Execute a built request and unwrap its data.
    pub async fn send<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, ApiError> {
        let (url, response) = self.execute(request).await?;
        self.parse_response(&url, response)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with_query(path, &[]).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        let request = self.build_request(HttpMethod::Get, path, query, None);
        self.send(request).await
    }

    /// GET a list endpoint that answers with pagination metadata.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &PaginationParams,
    ) -> Result<Page<T>, ApiError> {
        let request = self.build_request(HttpMethod::Get, path, &params.to_query(), None);
        let (url, response) = self.execute(request).await?;
        let status = response.status;
        let body = self.parse_envelope::<Vec<T>>(&url, response)?;
        match body.pagination {
            Some(pagination) => Ok(Page {
                items: body.data,
                pagination,
            }),
            None => Err(self.fail(
                &url,
                ApiError::Decode {
                    status,
                    message: "list response has no pagination".to_string(),
                },
            )),
        }
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(HttpMethod::Post, path, body).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(HttpMethod::Put, path, body).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(HttpMethod::Patch, path, body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.build_request(HttpMethod::Delete, path, &[], None);
        self.send(request).await
    }

    async fn send_json<T, B>(&self, method: HttpMethod, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_string(body).map_err(|e| {
            let error = ApiError::Request {
                message: format!("failed to serialize request body: {e}"),
            };
            self.fail(&self.url_for(path, &[]), error)
        })?;
        let request = self.build_request(method, path, &[], Some(payload));
        self.send(request).await
    }
}

fn decode_error(status: u16, error: &serde_json::Error) -> ApiError {
    ApiError::Decode {
        status,
        message: error.to_string(),
    }
}

/// The body of a failed response as JSON, or as a string when it is not JSON.
fn raw_payload(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
}
