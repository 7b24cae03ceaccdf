//! Detection-and-generation orchestration
//!
//! `GenerationService` runs one detection pass end to end: load the rule
//! set, fetch the declared languages, evaluate every rule (language pass
//! first, then the pattern pass, each in declaration order), aggregate the
//! active rules' tasks, and render the selected template.
//!
//! Data flows one direction: ConfigStore -> RuleMatcher -> TaskAggregator
//! -> PipelineRenderer, with the inspector supplying repository facts on
//! demand. Everything is fatal: there is no partial-success or retry path.
//!
//! # Example
//!
//! ```no_run
//! use tekgen::detection::service::{GenerateOptions, GenerationService};
//! use tekgen::github::GitHubInspector;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let inspector = GitHubInspector::new(None);
//! let service = GenerationService::new(&inspector);
//!
//! let document = service
//!     .generate(&GenerateOptions {
//!         owner: "tektoncd".to_string(),
//!         repo: "pipeline".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{}", document.trim_end());
//! # Ok(())
//! # }
//! ```

use crate::config::{ConfigError, RuleSet};
use crate::detection::aggregator::{aggregate, ActiveSet};
use crate::detection::matcher::{MatchError, RuleMatcher};
use crate::github::{InspectorError, RepoInspector};
use crate::render::{RenderError, Renderer};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from a generation run. Every variant aborts the run.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Match(#[from] MatchError),

    /// Failure fetching the declared languages.
    #[error("failed to fetch repository languages")]
    Languages(#[source] InspectorError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// One-shot generation options, mirroring the CLI flags.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub owner: String,
    pub repo: String,
    /// Reference to fetch the tree at; the repository's default branch
    /// when unset.
    pub target_ref: Option<String>,
    /// Rule document replacing the builtin one.
    pub rules_path: Option<PathBuf>,
    /// Template file replacing the builtin default template.
    pub pipeline_template: Option<PathBuf>,
    /// Directory searched for `<name>.yaml.tmpl` alternate templates.
    pub templates_dir: Option<PathBuf>,
}

/// Orchestrates one detection pass over a single repository.
pub struct GenerationService<'a> {
    inspector: &'a dyn RepoInspector,
}

impl<'a> GenerationService<'a> {
    pub fn new(inspector: &'a dyn RepoInspector) -> Self {
        Self { inspector }
    }

    /// Runs detection and returns the rendered pipeline document.
    pub async fn generate(&self, opts: &GenerateOptions) -> Result<String, ServiceError> {
        let rules = RuleSet::load(opts.rules_path.as_deref())?;

        let languages: HashSet<String> = self
            .inspector
            .list_languages(&opts.owner, &opts.repo)
            .await
            .map_err(ServiceError::Languages)?
            .into_keys()
            .map(|language| language.to_lowercase())
            .collect();
        info!(
            owner = %opts.owner,
            repo = %opts.repo,
            languages = languages.len(),
            "fetched declared languages"
        );

        let mut matcher = RuleMatcher::new(
            self.inspector,
            &opts.owner,
            &opts.repo,
            opts.target_ref.as_deref(),
            languages,
        );

        let mut active = ActiveSet::default();
        // Language pass: any rule whose key is a declared language,
        // pattern rules included.
        for (key, _) in rules.iter() {
            if matcher.languages().contains(key) {
                active.by_language.push(key.clone());
            }
        }
        // Pattern pass, in declaration order.
        for (key, rule) in rules.iter().filter(|(_, rule)| rule.is_pattern()) {
            if matcher.is_active(key, rule).await? {
                active.by_pattern.push(key.clone());
            }
        }
        debug!(
            by_language = active.by_language.len(),
            by_pattern = active.by_pattern.len(),
            "matched rules"
        );

        let aggregation = aggregate(&rules, &active);
        info!(
            detected = aggregation.configs.len(),
            tasks = aggregation.tasks.len(),
            template = aggregation.template_ref.as_deref().unwrap_or("default"),
            "aggregated active rules"
        );

        let renderer = Renderer::new(
            opts.pipeline_template.clone(),
            opts.templates_dir.clone(),
        );
        Ok(renderer.render(&aggregation)?)
    }
}
