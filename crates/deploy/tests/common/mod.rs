//! In-process mock of the Pages REST API for integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use axum::extract::{Multipart, Path, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use url::Url;

pub const TOKEN: &str = "test-token-7f3a";
pub const ACCOUNT: &str = "acc-123";
pub const DEPLOYMENT_ID: &str = "d-1";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub project: String,
    pub files: Vec<UploadedFile>,
    pub manifest: Option<Value>,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub projects: Vec<String>,
    /// Stages returned by successive status polls; the last one repeats
    pub stages: VecDeque<String>,
    pub error_message: Option<String>,
    pub upload_failure: Option<(StatusCode, String)>,
    /// `METHOD /path` of every request received
    pub requests: Vec<String>,
    pub uploads: Vec<Upload>,
}

impl MockState {
    pub fn with_projects(mut self, names: &[&str]) -> Self {
        self.projects = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_stages(mut self, stages: &[&str]) -> Self {
        self.stages = stages.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = Some(message.to_string());
        self
    }

    pub fn with_upload_failure(mut self, status: StatusCode, message: &str) -> Self {
        self.upload_failure = Some((status, message.to_string()));
        self
    }
}

type SharedState = Arc<Mutex<MockState>>;

pub struct MockPlatform {
    pub api_url: Url,
    state: SharedState,
}

impl MockPlatform {
    pub async fn start(state: MockState) -> Self {
        let state = Arc::new(Mutex::new(state));

        let app = Router::new()
            .route(
                "/client/v4/accounts/:account/pages/projects",
                get(list_projects).post(create_project),
            )
            .route(
                "/client/v4/accounts/:account/pages/projects/:name",
                get(get_project),
            )
            .route(
                "/client/v4/accounts/:account/pages/projects/:name/deployments",
                post(create_deployment),
            )
            .route(
                "/client/v4/accounts/:account/pages/projects/:name/deployments/:id",
                get(get_deployment),
            )
            .layer(middleware::from_fn_with_state(state.clone(), authorize))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            api_url: Url::parse(&format!("http://{}/client/v4", addr)).unwrap(),
            state,
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().requests.clone()
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.state.lock().uploads.clone()
    }

    pub fn projects(&self) -> Vec<String> {
        self.state.lock().projects.clone()
    }

    pub fn projects_path(&self) -> String {
        format!("/client/v4/accounts/{}/pages/projects", ACCOUNT)
    }
}

/// An API root nothing is listening on.
pub async fn unreachable_api_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}/client/v4", addr)).unwrap()
}

/// Write a small static site with three files.
pub fn write_site(root: &std::path::Path) {
    std::fs::write(root.join("index.html"), "<h1>home</h1>").unwrap();
    std::fs::write(root.join("about.html"), "<h1>about</h1>").unwrap();
    std::fs::create_dir_all(root.join("css")).unwrap();
    std::fs::write(root.join("css/site.css"), "body { margin: 0 }").unwrap();
}

fn success(result: Value) -> Response {
    Json(json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result,
    }))
    .into_response()
}

fn failure(status: StatusCode, code: u32, message: &str) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "errors": [{ "code": code, "message": message }],
            "messages": [],
            "result": null,
        })),
    )
        .into_response()
}

async fn authorize(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    state
        .lock()
        .requests
        .push(format!("{} {}", request.method(), request.uri().path()));

    let token_ok = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value == format!("Bearer {}", TOKEN))
        .unwrap_or(false);
    let account_ok = request
        .uri()
        .path()
        .starts_with(&format!("/client/v4/accounts/{}/", ACCOUNT));

    if !token_ok || !account_ok {
        return failure(StatusCode::FORBIDDEN, 10000, "Authentication error");
    }
    next.run(request).await
}

async fn list_projects(State(state): State<SharedState>) -> Response {
    let projects: Vec<Value> = state
        .lock()
        .projects
        .iter()
        .map(|name| json!({ "name": name }))
        .collect();
    success(Value::Array(projects))
}

async fn get_project(
    State(state): State<SharedState>,
    Path((_account, name)): Path<(String, String)>,
) -> Response {
    if state.lock().projects.contains(&name) {
        success(json!({
            "name": name,
            "subdomain": format!("{}.pages.dev", name),
            "production_branch": "main",
        }))
    } else {
        failure(
            StatusCode::NOT_FOUND,
            8000007,
            "Project not found. The specified project name does not match any of your existing projects.",
        )
    }
}

async fn create_project(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    state.lock().projects.push(name.clone());
    success(json!({
        "name": name,
        "production_branch": body["production_branch"],
    }))
}

async fn create_deployment(
    State(state): State<SharedState>,
    Path((_account, name)): Path<(String, String)>,
    mut multipart: Multipart,
) -> Response {
    let mut files = Vec::new();
    let mut manifest = None;

    while let Some(field) = multipart.next_field().await.unwrap() {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let content = field.bytes().await.unwrap().to_vec();

        if field_name == "manifest" {
            manifest = Some(serde_json::from_slice(&content).unwrap());
        } else {
            files.push(UploadedFile {
                field: field_name,
                file_name,
                content_type,
                content,
            });
        }
    }

    let mut state = state.lock();
    state.uploads.push(Upload {
        project: name.clone(),
        files,
        manifest,
    });
    if let Some((status, message)) = state.upload_failure.clone() {
        return failure(status, 8000000, &message);
    }

    success(json!({
        "id": DEPLOYMENT_ID,
        "stage": "queued",
        "url": format!("https://{}.{}.pages.dev", DEPLOYMENT_ID, name),
    }))
}

async fn get_deployment(
    State(state): State<SharedState>,
    Path((_account, name, id)): Path<(String, String, String)>,
) -> Response {
    let mut state = state.lock();
    let stage = if state.stages.len() > 1 {
        state.stages.pop_front()
    } else {
        state.stages.front().cloned()
    }
    .unwrap_or_else(|| "queued".to_string());

    let error_message = match stage.as_str() {
        "failure" | "failed" | "canceled" => state.error_message.clone(),
        _ => None,
    };

    success(json!({
        "id": id,
        "stage": stage,
        "url": format!("https://{}.{}.pages.dev", id, name),
        "error_message": error_message,
    }))
}
