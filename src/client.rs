use crate::call::Response;
use crate::config::ClientConfig;
use crate::endpoint::{Endpoint, PathParams};
use crate::error::{RepoClientError, Result};
use crate::logging::HttpLogger;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";

/// Shared transport: one connection pool, fixed base URL, timeouts and logging.
pub struct ApiClient {
    client: Client,
    base_url: Url,
    default_headers: HeaderMap,
    logger: HttpLogger,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.validate()?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .timeout(config.total_timeout())
            .build()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, header_value(&config.user_agent)?);
        default_headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_GITHUB_JSON));
        if let Some(token) = &config.token {
            let mut auth = header_value(&format!("Bearer {}", token))?;
            auth.set_sensitive(true);
            default_headers.insert(AUTHORIZATION, auth);
        }

        info!(
            base_url = %base_url,
            connect_timeout_ms = config.connect_timeout.as_millis() as u64,
            read_timeout_ms = config.read_timeout.as_millis() as u64,
            write_timeout_ms = config.write_timeout.as_millis() as u64,
            log_level = ?config.log_level,
            authenticated = config.token.is_some(),
            "HTTP client configured"
        );

        Ok(ApiClient {
            client,
            base_url,
            default_headers,
            logger: HttpLogger::new(config.log_level),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends one request and decodes the reply.
    ///
    /// Any HTTP status comes back as `Ok`; only failures before a usable
    /// response exists (connect, timeout, body read, 2xx decode) are `Err`.
    pub async fn execute<T>(&self, endpoint: &Endpoint<T>, params: &PathParams) -> Result<Response<T>> {
        let url = endpoint.resolve(&self.base_url, params)?;

        let request = self
            .client
            .request(endpoint.method.clone(), url.clone())
            .headers(self.default_headers.clone())
            .build()?;
        self.logger.log_request(request.method(), &url, request.headers());

        let started = Instant::now();
        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                self.logger.log_failure(&url, started.elapsed(), &e);
                return Err(RepoClientError::NetworkError(e));
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.logger.log_failure(&url, started.elapsed(), &e);
                return Err(RepoClientError::NetworkError(e));
            }
        };
        self.logger
            .log_response(&url, status, started.elapsed(), &headers, &bytes);

        if !status.is_success() {
            debug!(status = status.as_u16(), "Non-success response, keeping raw error body");
            return Ok(Response {
                status,
                headers,
                body: None,
                error_body: Some(String::from_utf8_lossy(&bytes).into_owned()),
            });
        }

        let body = if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            None
        } else {
            (endpoint.decode)(&bytes)?
        };

        Ok(Response {
            status,
            headers,
            body,
            error_body: None,
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("log_level", &self.logger.level())
            .finish()
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| RepoClientError::InvalidHeader(format!("{}: {}", value, e)))
}
