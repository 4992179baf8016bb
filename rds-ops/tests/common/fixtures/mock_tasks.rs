//! Mock task API for testing snapshot report delivery

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TASK_GID: &str = "1209999999999999";

pub struct MockTaskServer {
    pub server: MockServer,
}

impl MockTaskServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to configure as `api_base_url`
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Accept task creation for requests carrying `token`
    pub async fn mock_success(&self, token: &str) {
        Mock::given(method("POST"))
            .and(path("/tasks"))
            .and(header("authorization", format!("Bearer {}", token).as_str()))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {"gid": TASK_GID, "resource_type": "task"}
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_failure(&self, status_code: u16) {
        Mock::given(method("POST"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "errors": [{"message": "project: Not a recognized ID"}]
            })))
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every request received so far
    pub async fn received_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| request.body_json::<Value>().ok())
            .collect()
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}
