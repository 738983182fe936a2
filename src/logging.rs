use clap::ValueEnum;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use std::time::Duration;
use tracing::info;
use url::Url;

/// How much of each exchange the HTTP logger writes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum HttpLogLevel {
    /// No logs.
    None,
    /// Request and response lines.
    Basic,
    /// Request and response lines plus headers.
    Headers,
    /// Everything, including response bodies.
    Body,
}

/// Request/response logger wrapped around every exchange.
#[derive(Debug, Clone, Copy)]
pub struct HttpLogger {
    level: HttpLogLevel,
}

impl HttpLogger {
    pub fn new(level: HttpLogLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> HttpLogLevel {
        self.level
    }

    pub fn log_request(&self, method: &Method, url: &Url, headers: &HeaderMap) {
        if self.level == HttpLogLevel::None {
            return;
        }

        info!(target: "http", "--> {} {}", method, url);

        if self.level >= HttpLogLevel::Headers {
            log_headers(headers);
            // GET requests carry no body
            info!(target: "http", "--> END {}", method);
        }
    }

    pub fn log_response(
        &self,
        url: &Url,
        status: StatusCode,
        elapsed: Duration,
        headers: &HeaderMap,
        body: &[u8],
    ) {
        if self.level == HttpLogLevel::None {
            return;
        }

        info!(
            target: "http",
            "<-- {} {} {} ({}ms)",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            url,
            elapsed.as_millis()
        );

        if self.level >= HttpLogLevel::Headers {
            log_headers(headers);
        }

        if self.level == HttpLogLevel::Body {
            if !body.is_empty() {
                info!(target: "http", "{}", String::from_utf8_lossy(body));
            }
            info!(target: "http", "<-- END HTTP ({}-byte body)", body.len());
        }
    }

    pub fn log_failure(&self, url: &Url, elapsed: Duration, error: &reqwest::Error) {
        if self.level == HttpLogLevel::None {
            return;
        }
        info!(target: "http", "<-- HTTP FAILED: {} {} ({}ms)", error, url, elapsed.as_millis());
    }
}

fn log_headers(headers: &HeaderMap) {
    for (name, value) in headers {
        let shown = if *name == AUTHORIZATION {
            "██"
        } else {
            value.to_str().unwrap_or("<binary>")
        };
        info!(target: "http", "{}: {}", name, shown);
    }
}
