//! Canned inspector for tests
//!
//! Returns fixed languages, default ref and file listing, and counts calls
//! per endpoint so tests can assert that the tree is fetched at most once
//! and that input errors short-circuit before any network call.

use super::{InspectorError, RepoInspector};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct MockInspector {
    languages: HashMap<String, u64>,
    default_ref: String,
    files: Vec<String>,
    fail_tree: bool,
    language_calls: AtomicUsize,
    ref_calls: AtomicUsize,
    tree_calls: AtomicUsize,
}

impl MockInspector {
    pub fn new(languages: &[(&str, u64)], files: &[&str]) -> Self {
        Self {
            languages: languages
                .iter()
                .map(|(name, bytes)| (name.to_string(), *bytes))
                .collect(),
            default_ref: "main".to_string(),
            files: files.iter().map(|f| f.to_string()).collect(),
            fail_tree: false,
            language_calls: AtomicUsize::new(0),
            ref_calls: AtomicUsize::new(0),
            tree_calls: AtomicUsize::new(0),
        }
    }

    /// Makes every tree fetch fail, for exercising fatal fetch errors.
    pub fn failing_tree(mut self) -> Self {
        self.fail_tree = true;
        self
    }

    pub fn language_calls(&self) -> usize {
        self.language_calls.load(Ordering::SeqCst)
    }

    pub fn ref_calls(&self) -> usize {
        self.ref_calls.load(Ordering::SeqCst)
    }

    pub fn tree_calls(&self) -> usize {
        self.tree_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.language_calls() + self.ref_calls() + self.tree_calls()
    }
}

#[async_trait]
impl RepoInspector for MockInspector {
    async fn list_languages(
        &self,
        _owner: &str,
        _repo: &str,
    ) -> Result<HashMap<String, u64>, InspectorError> {
        self.language_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.languages.clone())
    }

    async fn default_ref(&self, _owner: &str, _repo: &str) -> Result<String, InspectorError> {
        self.ref_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.default_ref.clone())
    }

    async fn list_all_files(
        &self,
        _owner: &str,
        _repo: &str,
        _reference: &str,
    ) -> Result<Vec<String>, InspectorError> {
        self.tree_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_tree {
            return Err(InspectorError::Status {
                url: "mock://tree".to_string(),
                status: 500,
            });
        }
        Ok(self.files.clone())
    }
}
