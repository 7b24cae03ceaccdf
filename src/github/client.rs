//! GitHub REST API client
//!
//! Three endpoints cover the whole [`RepoInspector`] contract:
//! `/repos/{owner}/{repo}/languages`, `/repos/{owner}/{repo}` (for the
//! default branch) and `/repos/{owner}/{repo}/git/trees/{ref}?recursive=1`.
//! Requests carry a `Bearer` token when one was supplied.

use super::{InspectorError, RepoInspector};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct RepoInfo {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct Tree {
    #[serde(rename = "tree")]
    entries: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
}

/// [`RepoInspector`] backed by the GitHub REST API.
///
/// Holds a pooled HTTP client; each endpoint is hit at most once per run
/// (languages eagerly, the tree lazily via the matcher).
pub struct GitHubInspector {
    base_url: String,
    token: Option<String>,
    http_client: Client,
}

impl GitHubInspector {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_API_URL.to_string(), token)
    }

    /// Points the client at a different API root. Used by tests to target
    /// a stub server.
    pub fn with_base_url(base_url: String, token: Option<String>) -> Self {
        // Client::builder() with only a user agent set cannot fail.
        let http_client = Client::builder()
            .user_agent(concat!("tekgen/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url,
            token,
            http_client,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
    ) -> Result<T, InspectorError> {
        debug!("GET {}", url);

        let mut request = self
            .http_client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|source| InspectorError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InspectorError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|source| InspectorError::Decode { url, source })
    }
}

#[async_trait]
impl RepoInspector for GitHubInspector {
    async fn list_languages(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<HashMap<String, u64>, InspectorError> {
        self.get_json(format!("{}/repos/{}/{}/languages", self.base_url, owner, repo))
            .await
    }

    async fn default_ref(&self, owner: &str, repo: &str) -> Result<String, InspectorError> {
        let info: RepoInfo = self
            .get_json(format!("{}/repos/{}/{}", self.base_url, owner, repo))
            .await?;
        Ok(info.default_branch)
    }

    async fn list_all_files(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<Vec<String>, InspectorError> {
        let tree: Tree = self
            .get_json(format!(
                "{}/repos/{}/{}/git/trees/{}?recursive=1",
                self.base_url, owner, repo, reference
            ))
            .await?;
        Ok(tree.entries.into_iter().map(|entry| entry.path).collect())
    }
}
