//! Verb methods driven through a scripted transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use starter_core::{
    endpoints, ApiClient, ApiError, ContactForm, Environment, FormSchema, HttpMethod, HttpRequest,
    HttpResponse, MemoryTokenStore, PaginationParams, Settings, TokenStore, Transport,
    TransportError,
};

/// Replays queued outcomes and records every request it sees.
#[derive(Debug, Default)]
struct Scripted {
    outcomes: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl Scripted {
    fn respond(self, status: u16, body: Value) -> Self {
        self.outcomes.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }));
        self
    }

    fn fail(self, error: TransportError) -> Self {
        self.outcomes.lock().unwrap().push_back(Err(error));
        self
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for Scripted {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("script exhausted".to_string())))
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct Record {
    id: String,
}

fn settings() -> Settings {
    Settings {
        api_url: "http://api.test/api".to_string(),
        environment: Environment::Test,
        ..Settings::default()
    }
}

fn client(transport: Arc<Scripted>, tokens: Arc<MemoryTokenStore>) -> ApiClient {
    ApiClient::new(&settings(), transport, tokens)
}

#[tokio::test]
async fn get_returns_only_data() {
    let transport = Arc::new(
        Scripted::default()
            .respond(200, json!({"success": true, "data": {"id": "1"}, "message": "ok"})),
    );
    let api = client(transport.clone(), Arc::new(MemoryTokenStore::new()));

    let record: Record = api.get(endpoints::example::DATA).await.unwrap();
    assert_eq!(record, Record { id: "1".to_string() });

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert_eq!(requests[0].url, "http://api.test/api/example");
}

#[tokio::test]
async fn token_is_attached_after_login() {
    let transport = Arc::new(
        Scripted::default()
            .respond(200, json!({"success": true, "data": null}))
            .respond(200, json!({"success": true, "data": null})),
    );
    let api = client(transport.clone(), Arc::new(MemoryTokenStore::new()));

    let _: Value = api.get(endpoints::users::LIST).await.unwrap();
    api.login("secret-token");
    let _: Value = api.get(endpoints::users::LIST).await.unwrap();

    let requests = transport.requests();
    assert!(requests[0].header("authorization").is_none());
    assert_eq!(requests[1].header("authorization"), Some("Bearer secret-token"));
}

#[tokio::test]
async fn unauthorized_clears_stored_token() {
    let transport = Arc::new(Scripted::default().respond(
        401,
        json!({"success": false, "message": "토큰이 만료되었습니다", "statusCode": 401}),
    ));
    let tokens = Arc::new(MemoryTokenStore::with_token("stale"));
    let api = client(transport, tokens.clone());

    let err = api.get::<Value>(&endpoints::users::detail("me")).await.unwrap_err();
    assert_eq!(err.status_code(), 401);
    assert!(err.is_unauthorized());
    assert!(tokens.get().is_none());
    assert!(api.token().is_none());
}

#[tokio::test]
async fn network_failure_defaults_to_500() {
    let transport =
        Arc::new(Scripted::default().fail(TransportError::Connect("refused".to_string())));
    let tokens = Arc::new(MemoryTokenStore::with_token("kept"));
    let api = client(transport, tokens.clone());

    let err = api.get::<Value>(endpoints::posts::LIST).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }));
    assert_eq!(err.status_code(), 500);
    assert!(err.message().contains("refused"));
    assert_eq!(tokens.get().as_deref(), Some("kept"));
}

#[tokio::test]
async fn timeout_is_a_transport_error() {
    let transport = Arc::new(Scripted::default().fail(TransportError::Timeout {
        after: Duration::from_secs(10),
    }));
    let api = client(transport, Arc::new(MemoryTokenStore::new()));

    let err = api.delete::<Value>(&endpoints::posts::delete("3")).await.unwrap_err();
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.message(), "timeout of 10000ms exceeded");
}

#[tokio::test]
async fn unsent_request_is_its_own_kind() {
    let transport = Arc::new(
        Scripted::default().fail(TransportError::InvalidRequest("bad url".to_string())),
    );
    let api = client(transport, Arc::new(MemoryTokenStore::new()));

    let err = api.get::<Value>("/x").await.unwrap_err();
    assert!(matches!(err, ApiError::Request { .. }));
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn no_retry_inside_the_client() {
    let transport = Arc::new(
        Scripted::default()
            .respond(503, json!({"success": false, "message": "busy"}))
            .respond(200, json!({"success": true, "data": {"id": "late"}})),
    );
    let api = client(transport.clone(), Arc::new(MemoryTokenStore::new()));

    let err = api.get::<Record>("/example").await.unwrap_err();
    assert_eq!(err.status_code(), 503);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn validated_form_is_posted_as_json() {
    let transport = Arc::new(Scripted::default().respond(
        201,
        json!({"success": true, "data": {"id": "9"}, "message": "데이터 생성 성공"}),
    ));
    let api = client(transport.clone(), Arc::new(MemoryTokenStore::new()));

    let data = [
        ("name", "Lee"),
        ("email", "LEE@Example.com"),
        ("subject", "Partnership"),
        ("message", "Let's talk about working together."),
    ]
    .iter()
    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
    .collect();
    let form = ContactForm::validate(&data).unwrap();

    let created: Record = api.post(endpoints::example::DATA, &form).await.unwrap();
    assert_eq!(created.id, "9");

    let request = &transport.requests()[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.header("content-type"), Some("application/json"));
    let sent: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(sent["email"], "lee@example.com");
}

#[tokio::test]
async fn put_and_patch_use_their_verbs() {
    let transport = Arc::new(
        Scripted::default()
            .respond(200, json!({"success": true, "data": {"id": "1"}}))
            .respond(200, json!({"success": true, "data": {"id": "1"}})),
    );
    let api = client(transport.clone(), Arc::new(MemoryTokenStore::new()));

    let _: Record = api.put(&endpoints::users::update("1"), &json!({"name": "A"})).await.unwrap();
    let _: Record = api.patch(&endpoints::users::update("1"), &json!({"name": "B"})).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].method, HttpMethod::Put);
    assert_eq!(requests[1].method, HttpMethod::Patch);
    assert_eq!(requests[1].url, "http://api.test/api/users/1");
}

#[tokio::test]
async fn get_page_reads_pagination() {
    let transport = Arc::new(Scripted::default().respond(
        200,
        json!({
            "success": true,
            "data": [{"id": "1"}, {"id": "2"}],
            "pagination": {"page": 2, "limit": 2, "total": 6, "totalPages": 3}
        }),
    ));
    let api = client(transport.clone(), Arc::new(MemoryTokenStore::new()));

    let page = api
        .get_page::<Record>(endpoints::posts::LIST, &PaginationParams::new(2, 2))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.pagination.total_pages, 3);
    assert_eq!(transport.requests()[0].url, "http://api.test/api/posts?page=2&limit=2");
}

#[tokio::test]
async fn get_page_without_pagination_is_a_decode_error() {
    let transport =
        Arc::new(Scripted::default().respond(200, json!({"success": true, "data": []})));
    let api = client(transport, Arc::new(MemoryTokenStore::new()));

    let err = api
        .get_page::<Record>(endpoints::posts::LIST, &PaginationParams::new(1, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test]
async fn field_errors_without_message_reach_the_caller() {
    let transport = Arc::new(Scripted::default().respond(
        422,
        json!({"success": false, "errors": {"email": ["이미 사용 중인 이메일입니다"]}}),
    ));
    let api = client(transport, Arc::new(MemoryTokenStore::new()));

    let err = api.post::<Value, _>(endpoints::auth::REGISTER, &json!({})).await.unwrap_err();
    assert_eq!(err.status_code(), 422);
    assert_eq!(err.message(), "Request failed with status code 422");
    assert_eq!(err.field_errors().unwrap()["email"].len(), 1);
    assert_eq!(err.payload().unwrap()["success"], false);
}
