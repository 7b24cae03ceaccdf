//! Repository inspection
//!
//! The detection core only needs three facts about a repository: its
//! declared languages, its default branch, and the flat listing of every
//! path in its tree. [`RepoInspector`] is that narrow contract;
//! [`GitHubInspector`] implements it over the GitHub REST API and
//! [`MockInspector`] backs the tests.

pub mod client;
pub mod mock;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

pub use client::GitHubInspector;
pub use mock::MockInspector;

/// Errors from the hosting-service API. Any of these is fatal for the run:
/// there is no retry or partial-success path.
#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Facts about a remote repository, as reported by the hosting service.
#[async_trait]
pub trait RepoInspector: Send + Sync {
    /// Declared languages with their byte counts.
    async fn list_languages(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<HashMap<String, u64>, InspectorError>;

    /// Default branch name, used when no explicit target ref is given.
    async fn default_ref(&self, owner: &str, repo: &str) -> Result<String, InspectorError>;

    /// Every path in the repository tree at `reference`, recursively.
    async fn list_all_files(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<Vec<String>, InspectorError>;
}
