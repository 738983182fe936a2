//! Turns a "list repositories for this user" action into `UiState`
//! transitions, using one of three invocation strategies.
//!
//! Every network strategy publishes `Loading` first and then exactly one
//! terminal state. Repeated invocations are not deduplicated; each one runs
//! on its own and the last terminal state to arrive is what the UI shows.

use crate::call::{Callback, CallbackExecutor, Response};
use crate::error::{error_trace, RepoClientError};
use crate::lifecycle::LifecycleScope;
use crate::service::GitHubService;
use crate::types::Repository;
use crate::ui::MainThread;
use crate::ui_state::UiState;
use clap::ValueEnum;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub const CALLBACK_LABEL: &str = "callback";
pub const COROUTINE_LABEL: &str = "coroutine";

pub const BLOCKING_WARNING: &str = "\
⚠️ Blocking call demo

A blocking call parks the thread that makes it until the response arrives.
Made on the UI-owning thread, it freezes the interface for the whole round trip.

Do this instead:
1. enqueue the call with a callback (strategy 1)
2. await the async variant (strategy 2, recommended)
3. if a blocking call is unavoidable, make it on a worker thread";

/// How a request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Deferred call, result delivered to callbacks on the UI context
    Callback,
    /// Awaited call inside a lifecycle-scoped task
    Coroutine,
    /// No request; shows why blocking the UI context is wrong
    Blocking,
}

/// Why a fetch did not produce a list of repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    EmptyBody,
    HttpStatus { code: u16, message: String },
    Transport { message: String, trace: String },
}

impl FetchFailure {
    pub fn from_error(err: &RepoClientError) -> Self {
        match err {
            RepoClientError::EmptyBody => FetchFailure::EmptyBody,
            RepoClientError::HttpStatus { code, message } => FetchFailure::HttpStatus {
                code: *code,
                message: message.clone(),
            },
            other => FetchFailure::Transport {
                message: other.to_string(),
                trace: error_trace(other),
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FetchFailure::EmptyBody => "empty_body",
            FetchFailure::HttpStatus { .. } => "http_status",
            FetchFailure::Transport { .. } => "transport",
        }
    }

    /// Text shown in `UiState::Error`.
    pub fn user_message(&self) -> String {
        match self {
            FetchFailure::EmptyBody => "empty response body".to_string(),
            FetchFailure::HttpStatus { code, message } => format!("error: {}\n{}", code, message),
            FetchFailure::Transport { message, trace } => format!("failure: {}\n\n{}", message, trace),
        }
    }

    /// `user_message` followed by the error's trace. Transport messages
    /// already carry one.
    pub fn message_with_trace(&self, err: &RepoClientError) -> String {
        match self {
            FetchFailure::Transport { .. } => self.user_message(),
            _ => format!("{}\n\n{}", self.user_message(), error_trace(err)),
        }
    }

    fn log(&self, username: &str, strategy: &str) {
        match self {
            FetchFailure::Transport { message, .. } => {
                error!(kind = self.kind(), username, strategy, "Fetch failed: {}", message)
            }
            _ => warn!(kind = self.kind(), username, strategy, "Fetch failed: {:?}", self),
        }
    }

    fn into_state(self, username: &str, strategy: &str) -> UiState {
        self.log(username, strategy);
        UiState::error(self.user_message())
    }
}

/// Maps a deferred call's response onto a terminal state.
pub fn state_from_response(response: Response<Vec<Repository>>, username: &str) -> UiState {
    if !response.is_successful() {
        return FetchFailure::HttpStatus {
            code: response.code(),
            message: response.message().to_string(),
        }
        .into_state(username, CALLBACK_LABEL);
    }

    match response.into_body() {
        Some(items) => {
            info!(username, count = items.len(), strategy = CALLBACK_LABEL, "Fetched repositories");
            UiState::success(items, CALLBACK_LABEL)
        }
        None => FetchFailure::EmptyBody.into_state(username, CALLBACK_LABEL),
    }
}

/// Callback that publishes the outcome of one enqueued call.
struct PublishingCallback {
    main: MainThread,
    username: String,
}

impl Callback<Vec<Repository>> for PublishingCallback {
    fn on_response(self, response: Response<Vec<Repository>>) {
        self.main
            .set_state(state_from_response(response, &self.username));
    }

    fn on_failure(self, error: RepoClientError) {
        debug!(timeout = error.is_timeout(), "Enqueued call failed before a response");
        // no status was received, so this is always a transport failure
        let failure = FetchFailure::Transport {
            message: error.to_string(),
            trace: error_trace(&error),
        };
        self.main
            .set_state(failure.into_state(&self.username, CALLBACK_LABEL));
    }
}

/// Awaits the suspending contract and publishes the terminal state. Every
/// failure is shown with its trace.
async fn fetch_and_publish(service: Arc<GitHubService>, main: MainThread, username: String) {
    let state = match service.list_repos_async(&username).await {
        Ok(items) => {
            info!(username = %username, count = items.len(), strategy = COROUTINE_LABEL, "Fetched repositories");
            UiState::success(items, COROUTINE_LABEL)
        }
        Err(e) => {
            debug!(timeout = e.is_timeout(), "Async call failed");
            let failure = FetchFailure::from_error(&e);
            failure.log(&username, COROUTINE_LABEL);
            UiState::error(failure.message_with_trace(&e))
        }
    };

    main.set_state(state);
}

/// Issues requests for the UI and publishes the resulting states.
pub struct RequestOrchestrator {
    service: Arc<GitHubService>,
    main: MainThread,
    scope: LifecycleScope,
}

impl RequestOrchestrator {
    pub fn new(service: Arc<GitHubService>, main: MainThread) -> Self {
        Self {
            service,
            main,
            scope: LifecycleScope::new(),
        }
    }

    pub fn launch(&self, strategy: Strategy, username: &str) {
        match strategy {
            Strategy::Callback => {
                self.fetch_with_callback(username);
            }
            Strategy::Coroutine => self.launch_coroutine(username),
            Strategy::Blocking => self.show_blocking_warning(),
        }
    }

    /// Publishes `Loading`, then enqueues the deferred call. The terminal
    /// state is published from the callback, on the UI context.
    pub fn fetch_with_callback(&self, username: &str) -> JoinHandle<()> {
        self.main.set_state(UiState::Loading);

        let executor: Arc<dyn CallbackExecutor> = Arc::new(self.main.clone());
        self.service.list_repos(username).enqueue(
            executor,
            PublishingCallback {
                main: self.main.clone(),
                username: username.to_string(),
            },
        )
    }

    /// Runs the async strategy on the caller's task.
    pub async fn fetch_with_coroutine(&self, username: &str) {
        self.main.set_state(UiState::Loading);
        fetch_and_publish(self.service.clone(), self.main.clone(), username.to_string()).await
    }

    /// Publishes `Loading`, then runs the async strategy in this
    /// orchestrator's lifecycle scope.
    pub fn launch_coroutine(&self, username: &str) {
        self.main.set_state(UiState::Loading);
        self.scope.launch(fetch_and_publish(
            self.service.clone(),
            self.main.clone(),
            username.to_string(),
        ));
    }

    pub fn show_blocking_warning(&self) {
        warn!("Blocking strategy selected; not issuing a request on the UI context");
        self.main.set_state(UiState::error(BLOCKING_WARNING));
    }

    /// Async tasks still running in the lifecycle scope.
    pub fn active_tasks(&self) -> usize {
        self.scope.active()
    }

    /// Tears down the UI context's scope, cancelling in-flight async fetches.
    /// Enqueued callback calls are not cancelled.
    pub fn destroy(&self) {
        self.scope.cancel_all();
    }
}
