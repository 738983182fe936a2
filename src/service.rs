use crate::call::Call;
use crate::client::ApiClient;
use crate::endpoint::{decode_json, Endpoint, PathParams};
use crate::error::Result;
use crate::types::Repository;
use reqwest::Method;
use std::sync::Arc;
use tracing::debug;

/// `GET users/{user}/repos`, decoded as a JSON array in server order.
pub static LIST_REPOS: Endpoint<Vec<Repository>> = Endpoint {
    method: Method::GET,
    path: "users/{user}/repos",
    decode: decode_json::<Vec<Repository>>,
};

/// GitHub API surface bound to a configured client.
#[derive(Debug, Clone)]
pub struct GitHubService {
    client: Arc<ApiClient>,
}

impl GitHubService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Lists a user's repositories as an unstarted call.
    pub fn list_repos(&self, user: &str) -> Call<Vec<Repository>> {
        Call::new(
            self.client.clone(),
            &LIST_REPOS,
            PathParams::new().with("user", user),
        )
    }

    /// Lists a user's repositories, resolving to the decoded body.
    ///
    /// Fails with `HttpStatus` for non-2xx replies and `EmptyBody` when a 2xx
    /// reply has no body.
    pub async fn list_repos_async(&self, user: &str) -> Result<Vec<Repository>> {
        let response = self.list_repos(user).execute().await?;
        debug!(user, status = response.code(), "list_repos_async response");
        response.into_result()
    }
}
