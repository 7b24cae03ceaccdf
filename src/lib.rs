//! tekgen - Tekton pipeline generation from repository detection
//!
//! This library inspects a remote GitHub repository, determines which
//! programming languages and file patterns are present, and renders a
//! Tekton PipelineRun YAML document tailored to what was detected.
//!
//! # Core Concepts
//!
//! - **Rule**: a named detection unit pairing a language key or file
//!   pattern with the pipeline tasks it contributes
//! - **Snapshot**: the repository's declared languages and file listing,
//!   fetched from the hosting service at most once per run
//! - **Aggregation**: the merge of all active rules' task lists into one
//!   ordered sequence, fed to the template renderer
//!
//! # Example Usage
//!
//! ```no_run
//! use tekgen::{GenerateOptions, GenerationService, GitHubInspector};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let inspector = GitHubInspector::new(std::env::var("GITHUB_TOKEN").ok());
//! let service = GenerationService::new(&inspector);
//!
//! let document = service
//!     .generate(&GenerateOptions {
//!         owner: "tektoncd".to_string(),
//!         repo: "pipeline".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! println!("{}", document.trim_end());
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`config`]: rule document loading and validation
//! - [`detection`]: rule matching, task aggregation, orchestration
//! - [`github`]: the repository-inspection contract and its GitHub client
//! - [`render`]: template resolution and PipelineRun rendering

// Public modules
pub mod cli;
pub mod config;
pub mod detection;
pub mod github;
pub mod render;
pub mod util;

// Re-export key types for convenient access
pub use config::{ConfigError, RuleSet};
pub use detection::aggregator::{aggregate, ActiveSet, Aggregation};
pub use detection::matcher::{MatchError, RuleMatcher};
pub use detection::service::{GenerateOptions, GenerationService, ServiceError};
pub use detection::types::{Param, RepoSnapshot, Rule, Task, Workspace};
pub use github::{GitHubInspector, InspectorError, MockInspector, RepoInspector};
pub use render::{RenderError, Renderer};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
