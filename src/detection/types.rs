use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A name/value pair forwarded verbatim to a pipeline task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: String,
}

/// Workspace binding for a task.
///
/// A task gets a workspace binding in the rendered document unless
/// `disabled` is set; `name` overrides the workspace it binds to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub name: Option<String>,
}

/// A pipeline step reference. Opaque beyond these fields: tekgen never
/// executes tasks, it only places them in the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub workspace: Workspace,
    #[serde(default)]
    pub run_after: Vec<String>,
}

impl Task {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            workspace: Workspace::default(),
            run_after: Vec::new(),
        }
    }
}

/// A named detection unit: a language key or file pattern paired with the
/// tasks it contributes to the generated pipeline.
///
/// The rule key itself lives as the map key in
/// [`RuleSet`](crate::config::RuleSet); a rule without a `pattern` is
/// activated by its key appearing in the repository's declared languages,
/// a rule with one by its pattern matching a path in the repository tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Output identity override. Required for pattern rules declared in
    /// user override documents.
    #[serde(default)]
    pub name: Option<String>,

    /// Regular expression matched against every repository file path.
    /// Absent for language-only rules.
    #[serde(default)]
    pub pattern: Option<String>,

    #[serde(default)]
    pub tasks: Vec<Task>,

    /// Name of an alternate render template (`<name>.yaml.tmpl`). The
    /// first pattern-active rule carrying one selects the template used
    /// for the whole document.
    #[serde(default)]
    pub pipeline_run: Option<String>,
}

impl Rule {
    /// Output identity: `name` when set and non-empty, the rule key
    /// otherwise.
    pub fn identity<'a>(&'a self, key: &'a str) -> &'a str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => key,
        }
    }

    /// Whether this rule is activated by a file pattern rather than a
    /// declared language.
    pub fn is_pattern(&self) -> bool {
        self.pattern.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Repository facts fetched from the hosting service, at most once per run.
///
/// `languages` is populated eagerly (it drives the language pass);
/// `file_paths` is populated lazily by the first pattern rule evaluated
/// and never mutated afterwards.
#[derive(Debug, Default)]
pub struct RepoSnapshot {
    /// Declared language names, case-folded.
    pub languages: HashSet<String>,

    /// Complete flat listing of every path in the tree at the resolved
    /// reference. `None` until the first pattern rule triggers the fetch.
    pub file_paths: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_prefers_name() {
        let rule = Rule {
            name: Some("docker".to_string()),
            ..Default::default()
        };
        assert_eq!(rule.identity("dockerfile"), "docker");
    }

    #[test]
    fn test_identity_falls_back_to_key() {
        assert_eq!(Rule::default().identity("go"), "go");

        let empty_name = Rule {
            name: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(empty_name.identity("go"), "go");
    }

    #[test]
    fn test_is_pattern_ignores_empty_pattern() {
        assert!(!Rule::default().is_pattern());
        assert!(!Rule {
            pattern: Some(String::new()),
            ..Default::default()
        }
        .is_pattern());
        assert!(Rule {
            pattern: Some("(?i)dockerfile".to_string()),
            ..Default::default()
        }
        .is_pattern());
    }

    #[test]
    fn test_task_yaml_round_trip() {
        let yaml = r#"
name: buildah
params:
  - name: IMAGE
    value: registry/app:latest
workspace:
  name: source
runAfter:
  - lint
"#;
        let task: Task = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(task.name, "buildah");
        assert_eq!(task.params[0].name, "IMAGE");
        assert_eq!(task.workspace.name.as_deref(), Some("source"));
        assert!(!task.workspace.disabled);
        assert_eq!(task.run_after, vec!["lint".to_string()]);
    }

    #[test]
    fn test_task_defaults() {
        let task: Task = serde_yaml::from_str("name: pytest").unwrap();
        assert!(task.params.is_empty());
        assert!(task.run_after.is_empty());
        assert_eq!(task.workspace, Workspace::default());
    }
}
