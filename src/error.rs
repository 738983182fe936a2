use std::error::Error as StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoClientError {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Missing path parameter: {0}")]
    MissingPathParam(String),

    #[error("Invalid value for path parameter {name}: {value:?}")]
    InvalidPathParam { name: String, value: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP {code} {message}")]
    HttpStatus { code: u16, message: String },

    #[error("Response body was empty")]
    EmptyBody,

    #[error("UI thread unavailable: {0}")]
    UiClosed(String),
}

impl RepoClientError {
    /// True when the error happened before any HTTP status was known.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            RepoClientError::NetworkError(_) | RepoClientError::JsonError(_)
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RepoClientError::NetworkError(e) if e.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, RepoClientError>;

/// Renders an error and its chain of sources, one cause per line.
pub fn error_trace(error: &(dyn StdError + 'static)) -> String {
    let mut trace = format!("{error:?}");
    let mut source = error.source();
    let mut depth = 0;
    while let Some(cause) = source {
        if depth == 0 {
            trace.push_str("\n\nCaused by:");
        }
        trace.push_str(&format!("\n    {depth}: {cause}"));
        depth += 1;
        source = cause.source();
    }
    trace
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("outer failure")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn trace_lists_source_chain() {
        let err = Outer(std::io::Error::new(std::io::ErrorKind::TimedOut, "socket stalled"));
        let trace = error_trace(&err);
        assert!(trace.starts_with("Outer("));
        assert!(trace.contains("Caused by:"));
        assert!(trace.contains("0: socket stalled"));
    }

    #[test]
    fn trace_without_source_has_no_cause_section() {
        let trace = error_trace(&RepoClientError::EmptyBody);
        assert_eq!(trace, "EmptyBody");
    }

    #[test]
    fn json_errors_are_transport_failures() {
        let err: RepoClientError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.is_transport());
        assert!(!err.is_timeout());
        assert!(!RepoClientError::EmptyBody.is_transport());
        assert!(!RepoClientError::HttpStatus { code: 404, message: "Not Found".into() }.is_transport());
    }
}
