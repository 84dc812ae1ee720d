//! In-process search backend.
//!
//! Serves canned documents on an ephemeral port and records every request so
//! tests can assert on the exact query string and headers that were sent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::Value;
use sift_client::ClientConfig;

/// Canned responses.
#[derive(Debug, Clone)]
pub struct FakeData {
    /// Field configuration documents keyed by file name (`patient.json`).
    pub field_configs: HashMap<String, Value>,
    /// Sample values keyed by resource type.
    pub sample_values: HashMap<String, Value>,
    /// Status of search responses.
    pub search_status: u16,
    /// Body of search responses.
    pub search_body: String,
    /// Body of browse responses.
    pub browse_body: Value,
}

impl Default for FakeData {
    fn default() -> Self {
        Self {
            field_configs: HashMap::new(),
            sample_values: HashMap::new(),
            search_status: 200,
            search_body: super::search_response().to_string(),
            browse_body: serde_json::json!({ "items": [], "total": 0 }),
        }
    }
}

impl FakeData {
    /// Patient and Encounter configuration and sample values.
    pub fn standard() -> Self {
        let mut data = Self::default();
        data.field_configs
            .insert("patient.json".to_string(), super::patient_config());
        data.field_configs
            .insert("encounter.json".to_string(), super::encounter_config());
        data.sample_values
            .insert("Patient".to_string(), super::patient_samples());
        data.sample_values
            .insert("Encounter".to_string(), super::encounter_samples());
        data
    }
}

/// One request received by the fake backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
    pub search_mode: Option<String>,
    pub debug_filter: Option<String>,
}

struct FakeState {
    data: Mutex<FakeData>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeState {
    fn record(&self, path: String, query: Option<String>, headers: &HeaderMap) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().unwrap().push(RecordedRequest {
            path,
            query,
            search_mode: header("x-search-mode"),
            debug_filter: header("x-debug-filter"),
        });
    }
}

/// A running fake backend.
pub struct FakeBackend {
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeBackend {
    /// Starts serving `data` on an ephemeral port.
    pub async fn start(data: FakeData) -> Self {
        let state = Arc::new(FakeState {
            data: Mutex::new(data),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/fhir/{resource_type}", get(search))
            .route("/inspect/sample-values/{resource_type}", get(sample_values))
            .route("/inspect/resources", get(resources))
            .route("/fhir-config/{file}", get(field_config))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Client configuration pointed at this backend.
    pub fn config(&self) -> ClientConfig {
        ClientConfig::for_testing(&self.base_url)
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests received for paths starting with `prefix`.
    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with(prefix))
            .collect()
    }

    /// Changes the canned responses.
    pub fn update(&self, f: impl FnOnce(&mut FakeData)) {
        f(&mut self.state.data.lock().unwrap());
    }
}

type Shared = State<Arc<FakeState>>;

async fn search(
    State(state): Shared,
    Path(resource_type): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    state.record(format!("/fhir/{}", resource_type), query, &headers);
    let data = state.data.lock().unwrap();
    let status = StatusCode::from_u16(data.search_status).unwrap();
    (
        status,
        [("content-type", "application/json")],
        data.search_body.clone(),
    )
        .into_response()
}

async fn sample_values(
    State(state): Shared,
    Path(resource_type): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.record(
        format!("/inspect/sample-values/{}", resource_type),
        None,
        &headers,
    );
    let data = state.data.lock().unwrap();
    match data.sample_values.get(&resource_type) {
        Some(samples) => axum::Json(samples.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "no sample values").into_response(),
    }
}

async fn resources(State(state): Shared, RawQuery(query): RawQuery, headers: HeaderMap) -> Response {
    state.record("/inspect/resources".to_string(), query, &headers);
    let data = state.data.lock().unwrap();
    axum::Json(data.browse_body.clone()).into_response()
}

async fn field_config(
    State(state): Shared,
    Path(file): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.record(format!("/fhir-config/{}", file), None, &headers);
    let data = state.data.lock().unwrap();
    match data.field_configs.get(&file) {
        Some(config) => axum::Json(config.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}
