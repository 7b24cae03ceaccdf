//! Rule activation against a repository
//!
//! A language-keyed rule is active when its key appears in the declared
//! languages; a pattern rule when its regular expression matches at least
//! one path in the repository tree. The tree is fetched from the inspector
//! at most once, on the first pattern rule evaluated, and the resulting
//! [`RepoSnapshot`](crate::detection::types::RepoSnapshot) is reused for
//! every later pattern rule.

use super::types::{RepoSnapshot, Rule};
use crate::github::{InspectorError, RepoInspector};
use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Errors raised while evaluating rules.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid regular expression in a rule. Fatal: configuration
    /// correctness is a precondition, not a runtime contingency, so the
    /// rule is never silently skipped.
    #[error("rule '{key}' has an invalid pattern")]
    PatternCompile {
        key: String,
        #[source]
        source: regex::Error,
    },

    /// The one-time tree fetch failed; file-pattern detection cannot
    /// proceed without it.
    #[error(transparent)]
    Fetch(#[from] InspectorError),
}

/// Decides which rules are active for one repository.
pub struct RuleMatcher<'a> {
    inspector: &'a dyn RepoInspector,
    owner: &'a str,
    repo: &'a str,
    target_ref: Option<&'a str>,
    snapshot: RepoSnapshot,
}

impl<'a> RuleMatcher<'a> {
    /// `languages` must already be case-folded.
    pub fn new(
        inspector: &'a dyn RepoInspector,
        owner: &'a str,
        repo: &'a str,
        target_ref: Option<&'a str>,
        languages: HashSet<String>,
    ) -> Self {
        Self {
            inspector,
            owner,
            repo,
            target_ref,
            snapshot: RepoSnapshot {
                languages,
                file_paths: None,
            },
        }
    }

    /// The repository's declared languages, case-folded.
    pub fn languages(&self) -> &HashSet<String> {
        &self.snapshot.languages
    }

    /// Whether `rule` (stored under `key`) is active for the inspected
    /// repository.
    pub async fn is_active(&mut self, key: &str, rule: &Rule) -> Result<bool, MatchError> {
        match rule.pattern.as_deref().filter(|p| !p.is_empty()) {
            None => Ok(self.snapshot.languages.contains(&key.to_lowercase())),
            Some(pattern) => self.matches_any_path(key, pattern).await,
        }
    }

    async fn matches_any_path(&mut self, key: &str, pattern: &str) -> Result<bool, MatchError> {
        let regex = Regex::new(pattern).map_err(|source| MatchError::PatternCompile {
            key: key.to_string(),
            source,
        })?;

        let paths = self.file_paths().await?;
        // Short-circuits on the first hit.
        let matched = paths.iter().any(|path| regex.is_match(path));
        debug!(rule = key, matched, "evaluated pattern rule");
        Ok(matched)
    }

    /// Returns the memoized file listing, fetching it on first use.
    async fn file_paths(&mut self) -> Result<&[String], MatchError> {
        if self.snapshot.file_paths.is_none() {
            let reference = match self.target_ref {
                Some(reference) => reference.to_string(),
                None => self.inspector.default_ref(self.owner, self.repo).await?,
            };
            let paths = self
                .inspector
                .list_all_files(self.owner, self.repo, &reference)
                .await?;
            debug!(
                count = paths.len(),
                reference = %reference,
                "fetched repository tree"
            );
            self.snapshot.file_paths = Some(paths);
        }
        Ok(self.snapshot.file_paths.as_deref().unwrap_or_default())
    }
}
