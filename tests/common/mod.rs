#![allow(dead_code)]

use axum::{
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use github_repos_demo::config::ClientConfig;
use github_repos_demo::logging::HttpLogLevel;
use github_repos_demo::{ApiClient, GitHubService, UiState};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// How long the `slow` user takes to answer.
pub const SLOW_DELAY: Duration = Duration::from_millis(1500);

/// Local stand-in for the GitHub API, on a random port.
pub struct MockGitHub {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl MockGitHub {
    pub async fn start() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app()).await {
                eprintln!("Mock GitHub server stopped: {}", e);
            }
        });

        Ok(MockGitHub {
            base_url: format!("http://{}/", addr),
            handle,
        })
    }

    pub fn service(&self) -> GitHubService {
        service_for(ClientConfig::default().with_base_url(self.base_url.clone()))
    }

    pub fn service_with_timeout(&self, timeout: Duration) -> GitHubService {
        service_for(
            ClientConfig::default()
                .with_base_url(self.base_url.clone())
                .with_timeouts(timeout),
        )
    }
}

impl Drop for MockGitHub {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn service_for(config: ClientConfig) -> GitHubService {
    let client = ApiClient::new(&config.with_log_level(HttpLogLevel::Body))
        .expect("Failed to create client");
    GitHubService::new(client)
}

/// Waits for the next published state, failing the test after five seconds.
pub async fn next_state(rx: &mut UnboundedReceiver<UiState>) -> UiState {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("Timed out waiting for a UI state")
        .expect("UI state stream closed")
}

/// Three repositories in a deliberately unsorted order; `id` 1 has no
/// description or language.
pub fn repos_json(user: &str) -> Value {
    json!([
        {
            "id": 3,
            "name": "okhttp",
            "full_name": format!("{}/okhttp", user),
            "description": "HTTP client",
            "html_url": format!("https://github.com/{}/okhttp", user),
            "stargazers_count": 45000,
            "language": "Kotlin",
            "private": false,
            "owner": { "login": user, "id": 82592, "avatar_url": "https://avatars.example.com/u/82592" }
        },
        {
            "id": 1,
            "name": "dotfiles",
            "full_name": format!("{}/dotfiles", user),
            "html_url": format!("https://github.com/{}/dotfiles", user),
            "stargazers_count": 0,
            "owner": { "login": user, "avatar_url": "https://avatars.example.com/u/82592" }
        },
        {
            "id": 2,
            "name": "retrofit",
            "full_name": format!("{}/retrofit", user),
            "description": "Type-safe HTTP client",
            "html_url": format!("https://github.com/{}/retrofit", user),
            "stargazers_count": 43000,
            "language": "Java",
            "owner": { "login": user, "avatar_url": "https://avatars.example.com/u/82592" }
        }
    ])
}

fn app() -> Router {
    Router::new().route("/users/:user/repos", get(list_repos))
}

async fn list_repos(Path(user): Path<String>, headers: HeaderMap) -> Response {
    // GitHub refuses requests without a User-Agent
    if !headers.contains_key(header::USER_AGENT) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "Request forbidden by administrative rules" })),
        )
            .into_response();
    }

    match user.as_str() {
        "ghost" => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest"
            })),
        )
            .into_response(),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        "empty" => Json(json!([])).into_response(),
        "null" => ([(header::CONTENT_TYPE, "application/json")], "null").into_response(),
        "nocontent" => StatusCode::NO_CONTENT.into_response(),
        "broken" => ([(header::CONTENT_TYPE, "application/json")], "[{\"id\":").into_response(),
        "slow" => {
            tokio::time::sleep(SLOW_DELAY).await;
            Json(repos_json(&user)).into_response()
        }
        _ => Json(repos_json(&user)).into_response(),
    }
}
