//! CLI command execution
//!
//! Validates the `owner/repo` argument before anything touches the
//! network, runs the generation service, and maps results to exit codes.

use super::commands::CliArgs;
use crate::detection::service::{GenerateOptions, GenerationService, ServiceError};
use crate::github::GitHubInspector;
use thiserror::Error;
use tracing::debug;

/// Top-level error for one invocation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Malformed repository argument; raised before any network call.
    #[error("invalid repository argument '{0}': expected owner/repo")]
    InvalidOwnerRepo(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Runs the full detection pass and prints the rendered document.
///
/// Returns the process exit code: 0 on success, 1 on any fatal error.
pub async fn handle_generate(args: &CliArgs) -> i32 {
    match run(args).await {
        Ok(document) => {
            println!("{}", document.trim_end());
            0
        }
        Err(err) => {
            eprintln!("Error: {err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            1
        }
    }
}

async fn run(args: &CliArgs) -> Result<String, GenerateError> {
    let (owner, repo) = split_owner_repo(&args.owner_repo)?;
    debug!(owner, repo, "starting generation");

    let inspector = GitHubInspector::new(args.token.clone());
    let service = GenerationService::new(&inspector);
    let options = GenerateOptions {
        owner: owner.to_string(),
        repo: repo.to_string(),
        target_ref: args.target_ref.clone(),
        rules_path: args.rules.clone(),
        pipeline_template: args.pipeline_template.clone(),
        templates_dir: args.templates_dir.clone(),
    };
    Ok(service.generate(&options).await?)
}

/// Splits `owner/repo` into exactly two non-empty segments.
pub fn split_owner_repo(arg: &str) -> Result<(&str, &str), GenerateError> {
    match arg.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => Err(GenerateError::InvalidOwnerRepo(arg.to_string())),
    }
}
