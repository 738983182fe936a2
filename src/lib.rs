pub mod call;
pub mod cli;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod orchestrator;
pub mod render;
pub mod service;
pub mod types;
pub mod ui;
pub mod ui_state;

pub use call::{Call, Callback, CallbackExecutor, Response};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{RepoClientError, Result};
pub use orchestrator::{FetchFailure, RequestOrchestrator, Strategy};
pub use service::GitHubService;
pub use types::{Owner, Repository};
pub use ui::MainThread;
pub use ui_state::UiState;
