pub mod settings;

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use settings::{Environment, MockSettings, ServerSettings};

pub const READ_OK: &str = "데이터 조회 성공";
pub const CREATE_OK: &str = "데이터 생성 성공";
pub const CREATE_FAILED: &str = "데이터 생성 실패";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleData {
    pub id: String,
    pub title: String,
    pub description: String,
    pub features: Vec<String>,
    pub timestamp: String,
}

impl ExampleData {
    fn canned(timestamp: String) -> Self {
        Self {
            id: "1".to_string(),
            title: "Starter Kit 예시 API".to_string(),
            description: "이것은 예시 API 엔드포인트입니다.".to_string(),
            features: [
                "폼 유효성 검사",
                "응답 envelope 처리",
                "토큰 기반 요청 인증",
                "HTTP 에러 정규화",
                "개발 모드 요청 로깅",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            timestamp,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T, message: &str) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.to_string()),
            timestamp: Some(now()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

struct AppState {
    settings: MockSettings,
    example: ExampleData,
}

type SharedState = Arc<AppState>;

pub fn app() -> Router {
    app_with(MockSettings::default())
}

pub fn app_with(settings: MockSettings) -> Router {
    let state: SharedState = Arc::new(AppState {
        settings,
        example: ExampleData::canned(now()),
    });
    Router::new()
        .route("/api/example", get(get_example).post(create_example))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_with(listener: TcpListener, settings: MockSettings) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(settings)).await
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn get_example(State(state): State<SharedState>) -> Json<ApiResponse<ExampleData>> {
    if !state.settings.read_delay.is_zero() {
        tokio::time::sleep(state.settings.read_delay).await;
    }
    Json(ApiResponse::ok(state.example.clone(), READ_OK))
}

/// Fields a JSON value contributes when merged into a new record: an
/// object's own keys, array elements and string characters under their
/// index, nothing for scalars and null.
fn spread(payload: Value) -> Map<String, Value> {
    match payload {
        Value::Object(fields) => fields,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| (i.to_string(), item))
            .collect(),
        Value::String(text) => text
            .chars()
            .enumerate()
            .map(|(i, c)| (i.to_string(), Value::String(c.to_string())))
            .collect(),
        Value::Null | Value::Bool(_) | Value::Number(_) => Map::new(),
    }
}

async fn create_example(State(state): State<SharedState>, body: Bytes) -> Response {
    let mut record = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => spread(payload),
        Err(error) => {
            tracing::error!(%error, "rejecting example payload");
            let failure = ApiErrorResponse {
                success: false,
                message: CREATE_FAILED.to_string(),
                status_code: Some(400),
            };
            return (StatusCode::BAD_REQUEST, Json(failure)).into_response();
        }
    };

    if !state.settings.write_delay.is_zero() {
        tokio::time::sleep(state.settings.write_delay).await;
    }

    record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    record.insert("createdAt".to_string(), Value::String(now()));
    (
        StatusCode::CREATED,
        Json(ApiResponse::ok(Value::Object(record), CREATE_OK)),
    )
        .into_response()
}
