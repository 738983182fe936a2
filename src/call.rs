//! Deferred request handles.
//!
//! A [`Call`] is an unstarted request. It can be started exactly once, either
//! by awaiting [`Call::execute`] or by handing it to [`Call::enqueue`] together
//! with a [`Callback`]. Both paths share the same execution core in
//! [`ApiClient`]; `enqueue` runs it on a transport task and hands the outcome
//! to a [`CallbackExecutor`], which decides where the callback runs.

use crate::client::ApiClient;
use crate::endpoint::{Endpoint, PathParams};
use crate::error::{RepoClientError, Result};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

/// A completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct Response<T> {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<T>,
    pub(crate) error_body: Option<String>,
}

impl<T> Response<T> {
    pub fn code(&self) -> u16 {
        self.status.as_u16()
    }

    /// The reason phrase for the status code, empty when there is none.
    pub fn message(&self) -> &str {
        self.status.canonical_reason().unwrap_or("")
    }

    pub fn is_successful(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Decoded body of a 2xx response, `None` if the server sent none.
    pub fn body(&self) -> Option<&T> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<T> {
        self.body
    }

    /// Raw body of a non-2xx response.
    pub fn error_body(&self) -> Option<&str> {
        self.error_body.as_deref()
    }

    /// Collapses the response into the body or a status error.
    pub fn into_result(self) -> Result<T> {
        if !self.is_successful() {
            return Err(RepoClientError::HttpStatus {
                code: self.code(),
                message: self.message().to_string(),
            });
        }
        self.body.ok_or(RepoClientError::EmptyBody)
    }
}

/// Completion handler for an enqueued call. Exactly one method runs, once.
pub trait Callback<T>: Send + 'static {
    /// Any HTTP response, whatever its status.
    fn on_response(self, response: Response<T>);

    /// No usable response: connect/read failure, timeout, or undecodable 2xx body.
    fn on_failure(self, error: RepoClientError);
}

/// A unit of work handed from the transport back to the caller's context.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Where enqueued callbacks are run.
pub trait CallbackExecutor: Send + Sync {
    fn execute(&self, task: Task);
}

/// Runs callbacks directly on the transport task.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

impl CallbackExecutor for InlineExecutor {
    fn execute(&self, task: Task) {
        task();
    }
}

/// An unstarted request against one endpoint.
pub struct Call<T: 'static> {
    client: Arc<ApiClient>,
    endpoint: &'static Endpoint<T>,
    params: PathParams,
}

impl<T: Send + 'static> Call<T> {
    pub(crate) fn new(client: Arc<ApiClient>, endpoint: &'static Endpoint<T>, params: PathParams) -> Self {
        Self {
            client,
            endpoint,
            params,
        }
    }

    /// The URL this call will hit.
    pub fn request_url(&self) -> Result<Url> {
        self.endpoint.resolve(self.client.base_url(), &self.params)
    }

    /// Runs the request on the current task.
    pub async fn execute(self) -> Result<Response<T>> {
        self.client.execute(self.endpoint, &self.params).await
    }

    /// Starts the request on a transport task; the outcome is delivered to
    /// `callback` through `executor`.
    pub fn enqueue<C>(self, executor: Arc<dyn CallbackExecutor>, callback: C) -> JoinHandle<()>
    where
        C: Callback<T>,
    {
        tokio::spawn(async move {
            let outcome = self.execute().await;
            debug!(ok = outcome.is_ok(), "Call finished, dispatching callback");
            executor.execute(Box::new(move || match outcome {
                Ok(response) => callback.on_response(response),
                Err(error) => callback.on_failure(error),
            }));
        })
    }
}

impl<T: 'static> std::fmt::Debug for Call<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Call")
            .field("endpoint", self.endpoint)
            .field("params", &self.params)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: StatusCode, body: Option<Vec<u32>>) -> Response<Vec<u32>> {
        Response {
            status,
            headers: HeaderMap::new(),
            body,
            error_body: None,
        }
    }

    #[test]
    fn successful_response_yields_body() {
        let result = response(StatusCode::OK, Some(vec![1, 2])).into_result();
        assert_eq!(result.unwrap(), vec![1, 2]);
    }

    #[test]
    fn successful_response_without_body_is_empty_body() {
        let result = response(StatusCode::OK, None).into_result();
        assert!(matches!(result, Err(RepoClientError::EmptyBody)));
    }

    #[test]
    fn error_status_carries_code_and_reason() {
        let result = response(StatusCode::NOT_FOUND, None).into_result();
        match result {
            Err(RepoClientError::HttpStatus { code, message }) => {
                assert_eq!(code, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("Expected HttpStatus error, got: {:?}", other),
        }
    }

    #[test]
    fn inline_executor_runs_immediately() {
        let (tx, rx) = std::sync::mpsc::channel();
        InlineExecutor.execute(Box::new(move || tx.send(7).unwrap()));
        assert_eq!(rx.try_recv().unwrap(), 7);
    }
}
