use clap::Parser;
use std::path::PathBuf;

/// Generate Tekton PipelineRun definitions from repository detection
#[derive(Parser, Debug)]
#[command(
    name = "tekgen",
    about = "Generate a Tekton PipelineRun for a remote repository",
    version,
    long_about = "tekgen inspects a GitHub repository's declared languages and file tree, \
                  matches them against a rule configuration, and prints a rendered \
                  PipelineRun YAML document to standard output.\n\n\
                  Examples:\n  \
                  tekgen tektoncd/pipeline\n  \
                  tekgen myorg/myrepo --target-ref v1.2.0\n  \
                  tekgen myorg/myrepo --rules ./rules.yaml --templates-dir ./templates"
)]
pub struct CliArgs {
    #[arg(value_name = "OWNER/REPO", help = "GitHub repository as owner/repo")]
    pub owner_repo: String,

    #[arg(
        long,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        value_name = "TOKEN",
        help = "GitHub token for API access"
    )]
    pub token: Option<String>,

    #[arg(
        long,
        value_name = "REF",
        help = "Target reference when fetching the file tree (default: the repository's default branch)"
    )]
    pub target_ref: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Rule document replacing the builtin detection rules"
    )]
    pub rules: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        help = "PipelineRun template replacing the builtin default template"
    )]
    pub pipeline_template: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Directory searched for <name>.yaml.tmpl alternate templates"
    )]
    pub templates_dir: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}
