//! PipelineRun document rendering
//!
//! Rendering is a pure text-substitution pass: the template receives the
//! merged identity -> rule mapping as `configs` and the flattened task-name
//! sequence as `tasks`, plus one helper, `add(a, b)`, for positional
//! arithmetic (e.g. numbering workspace bindings). Nothing else is computed
//! during render.
//!
//! Template resolution order:
//! 1. a `pipelineRun` name selected during aggregation, looked up as
//!    `<name>.yaml.tmpl` in `--templates-dir` when given, otherwise in the
//!    embedded per-language set;
//! 2. the `--pipeline-template` file override;
//! 3. the embedded default template.

use crate::detection::aggregator::Aggregation;
use minijinja::{context, Environment};
use std::path::PathBuf;
use thiserror::Error;

/// Builtin default PipelineRun template.
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/pipelinerun.yaml.tmpl");

/// Builtin per-language alternates, looked up by `pipelineRun` name.
fn builtin_language_template(name: &str) -> Option<&'static str> {
    match name {
        "java" => Some(include_str!("../../templates/languages/java.yaml.tmpl")),
        "nodejs" => Some(include_str!("../../templates/languages/nodejs.yaml.tmpl")),
        _ => None,
    }
}

/// Errors raised while resolving or executing a template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A rule selected a named template that exists neither in the
    /// templates directory nor in the embedded set.
    #[error("pipeline template '{name}.yaml.tmpl' not found")]
    TemplateNotFound { name: String },

    /// A template file exists but could not be read.
    #[error("failed to read template {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template parse or execution failure (malformed template, undefined
    /// field reference).
    #[error("failed to render pipeline template")]
    Render {
        #[from]
        source: minijinja::Error,
    },
}

/// Renders an [`Aggregation`] through the selected template.
pub struct Renderer {
    pipeline_template: Option<PathBuf>,
    templates_dir: Option<PathBuf>,
}

impl Renderer {
    /// `pipeline_template` overrides the embedded default template;
    /// `templates_dir` overrides the embedded per-language set.
    pub fn new(pipeline_template: Option<PathBuf>, templates_dir: Option<PathBuf>) -> Self {
        Self {
            pipeline_template,
            templates_dir,
        }
    }

    pub fn render(&self, aggregation: &Aggregation) -> Result<String, RenderError> {
        let source = self.resolve(aggregation.template_ref.as_deref())?;

        let mut env = Environment::new();
        env.add_function("add", |a: i64, b: i64| a + b);
        env.add_template("pipelinerun", &source)?;

        let task_names: Vec<&str> = aggregation.tasks.iter().map(|t| t.name.as_str()).collect();
        let rendered = env.get_template("pipelinerun")?.render(context! {
            configs => aggregation.configs,
            tasks => task_names,
        })?;
        Ok(rendered)
    }

    fn resolve(&self, template_ref: Option<&str>) -> Result<String, RenderError> {
        if let Some(name) = template_ref {
            let file_name = format!("{name}.yaml.tmpl");
            if let Some(dir) = &self.templates_dir {
                let path = dir.join(&file_name);
                return std::fs::read_to_string(&path).map_err(|source| {
                    if source.kind() == std::io::ErrorKind::NotFound {
                        RenderError::TemplateNotFound {
                            name: name.to_string(),
                        }
                    } else {
                        RenderError::Read { path, source }
                    }
                });
            }
            return builtin_language_template(name)
                .map(str::to_string)
                .ok_or_else(|| RenderError::TemplateNotFound {
                    name: name.to_string(),
                });
        }

        match &self.pipeline_template {
            Some(path) => std::fs::read_to_string(path).map_err(|source| RenderError::Read {
                path: path.clone(),
                source,
            }),
            None => Ok(DEFAULT_TEMPLATE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::types::{Param, Rule, Task, Workspace};
    use indexmap::IndexMap;
    use std::io::Write;

    fn aggregation() -> Aggregation {
        let mut configs = IndexMap::new();
        configs.insert(
            "go".to_string(),
            Rule {
                tasks: vec![Task::named("golangci-lint")],
                ..Default::default()
            },
        );
        configs.insert(
            "docker".to_string(),
            Rule {
                name: Some("docker".to_string()),
                pattern: Some("(?i)dockerfile".to_string()),
                tasks: vec![Task {
                    name: "buildah".to_string(),
                    params: vec![Param {
                        name: "IMAGE".to_string(),
                        value: "registry/app:latest".to_string(),
                    }],
                    workspace: Workspace {
                        disabled: false,
                        name: Some("source".to_string()),
                    },
                    run_after: vec!["golangci-lint".to_string()],
                }],
                pipeline_run: None,
            },
        );
        let tasks = configs
            .values()
            .flat_map(|rule| rule.tasks.iter().cloned())
            .collect();
        Aggregation {
            configs,
            tasks,
            template_ref: None,
        }
    }

    #[test]
    fn test_default_template_renders_detected_rules() {
        let renderer = Renderer::new(None, None);
        let document = renderer.render(&aggregation()).unwrap();

        assert!(document.contains("kind: PipelineRun"));
        assert!(document.contains("tekgen.dev/detected: \"go,docker\""));
        assert!(document.contains("tekgen.dev/tasks: \"golangci-lint,buildah\""));
        assert!(document.contains("- name: golangci-lint"));
        assert!(document.contains("- name: buildah"));
        assert!(document.contains("value: \"registry/app:latest\""));
        assert!(document.contains("- golangci-lint"));
    }

    #[test]
    fn test_template_iterates_configs_in_insertion_order() {
        // "zeta" sorts after "alpha"; iteration must still follow the
        // order the entries were inserted in, not key order.
        let mut configs = IndexMap::new();
        for identity in ["zeta", "alpha"] {
            configs.insert(
                identity.to_string(),
                Rule {
                    tasks: vec![Task::named(identity)],
                    ..Default::default()
                },
            );
        }
        let aggregation = Aggregation {
            configs,
            tasks: vec![Task::named("zeta"), Task::named("alpha")],
            template_ref: None,
        };

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{{{ configs|list|join(',') }}}}").unwrap();

        let renderer = Renderer::new(Some(file.path().to_path_buf()), None);
        let document = renderer.render(&aggregation).unwrap();
        assert_eq!(document.trim(), "zeta,alpha");
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let renderer = Renderer::new(None, None);
        let aggregation = aggregation();
        let first = renderer.render(&aggregation).unwrap();
        let second = renderer.render(&aggregation).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_disabled_workspace_is_omitted() {
        let mut aggregation = aggregation();
        aggregation.configs["docker"].tasks[0].workspace = Workspace {
            disabled: true,
            name: None,
        };
        aggregation.tasks = aggregation.configs["docker"].tasks.clone();

        let renderer = Renderer::new(None, None);
        let document = renderer.render(&aggregation).unwrap();
        let buildah_section = document.split("- name: buildah").nth(1).unwrap();
        assert!(!buildah_section.contains("workspaces:"));
    }

    #[test]
    fn test_named_template_resolves_from_embedded_set() {
        let mut aggregation = aggregation();
        aggregation.template_ref = Some("java".to_string());

        let renderer = Renderer::new(None, None);
        let document = renderer.render(&aggregation).unwrap();
        assert!(document.contains("generateName: maven-pipeline-run-"));
        assert!(document.contains("- name: fetch-repository"));
    }

    #[test]
    fn test_named_template_missing_is_fatal() {
        let mut aggregation = aggregation();
        aggregation.template_ref = Some("cobol".to_string());

        let err = Renderer::new(None, None).render(&aggregation).unwrap_err();
        match err {
            RenderError::TemplateNotFound { name } => assert_eq!(name, "cobol"),
            other => panic!("expected TemplateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_templates_dir_takes_precedence_over_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("java.yaml.tmpl")).unwrap();
        writeln!(file, "custom: {{{{ tasks|join(',') }}}}").unwrap();

        let mut aggregation = aggregation();
        aggregation.template_ref = Some("java".to_string());

        let renderer = Renderer::new(None, Some(dir.path().to_path_buf()));
        let document = renderer.render(&aggregation).unwrap();
        assert!(document.starts_with("custom: golangci-lint,buildah"));
    }

    #[test]
    fn test_templates_dir_missing_named_template_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut aggregation = aggregation();
        aggregation.template_ref = Some("java".to_string());

        let renderer = Renderer::new(None, Some(dir.path().to_path_buf()));
        let err = renderer.render(&aggregation).unwrap_err();
        assert!(matches!(err, RenderError::TemplateNotFound { .. }));
    }

    #[test]
    fn test_pipeline_template_file_overrides_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tasks: {{{{ tasks|join(' ') }}}}").unwrap();

        let renderer = Renderer::new(Some(file.path().to_path_buf()), None);
        let document = renderer.render(&aggregation()).unwrap();
        assert!(document.starts_with("tasks: golangci-lint buildah"));
    }

    #[test]
    fn test_malformed_template_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{% for x in %}}").unwrap();

        let err = Renderer::new(Some(file.path().to_path_buf()), None)
            .render(&aggregation())
            .unwrap_err();
        assert!(matches!(err, RenderError::Render { .. }));
    }

    #[test]
    fn test_add_helper_is_available() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{{{ add(20, 22) }}}}").unwrap();

        let renderer = Renderer::new(Some(file.path().to_path_buf()), None);
        let document = renderer.render(&aggregation()).unwrap();
        assert_eq!(document.trim(), "42");
    }
}
