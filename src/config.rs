//! Rule configuration loading for tekgen
//!
//! The rule document is a YAML mapping from rule key to [`Rule`]. A builtin
//! document ships inside the binary; a user-supplied file replaces it
//! wholesale. Declaration order is preserved because the pattern pass and
//! template selection are order-sensitive (first match wins), so rules live
//! in an [`IndexMap`], never an unordered map.
//!
//! # Example
//!
//! ```
//! use tekgen::config::RuleSet;
//!
//! let rules = RuleSet::load(None).expect("builtin rules parse");
//! assert!(rules.get("go").is_some());
//! ```

use crate::detection::types::Rule;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Builtin rule document, used when no override file is given.
const DEFAULT_RULES: &str = include_str!("../templates/rules.yaml");

/// Errors raised while loading or validating a rule document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Override file does not exist.
    #[error("rules file not found: {0}")]
    NotFound(PathBuf),

    /// Override file exists but could not be read.
    #[error("failed to read rules file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid YAML or does not match the schema.
    #[error("failed to parse rules file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A pattern rule in an override document has no `name`. Its identity
    /// in the output would be ambiguous, so this is rejected at load time.
    #[error("rule '{key}' declares a pattern but no name")]
    MissingName { key: String },
}

/// Ordered rule set keyed by case-folded rule key.
///
/// Loaded once at process start and immutable thereafter.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: IndexMap<String, Rule>,
}

impl RuleSet {
    /// Loads the builtin rule document, or the override at `path` when
    /// given.
    ///
    /// Override documents are validated eagerly: every pattern rule must
    /// carry a non-empty `name`. The builtin document is trusted.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            let rules = parse(DEFAULT_RULES, Path::new("<builtin>"))?;
            debug!(rules = rules.len(), "loaded builtin rule document");
            return Ok(Self { rules });
        };

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let rules = parse(&content, path)?;
        for (key, rule) in &rules {
            if rule.is_pattern() && rule.name.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::MissingName { key: key.clone() });
            }
        }
        debug!(rules = rules.len(), path = %path.display(), "loaded rule document");
        Ok(Self { rules })
    }

    /// Constructs a rule set directly, preserving the given order.
    pub fn from_rules(rules: IndexMap<String, Rule>) -> Self {
        Self { rules }
    }

    /// Rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Rule)> {
        self.rules.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn parse(content: &str, path: &Path) -> Result<IndexMap<String, Rule>, ConfigError> {
    let raw: IndexMap<String, Rule> =
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    // Keys are case-folded so lookups against GitHub's language report
    // ("Go", "Python", ...) work; declaration order is kept.
    let mut rules = IndexMap::with_capacity(raw.len());
    for (key, rule) in raw {
        rules.insert(key.to_lowercase(), rule);
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_builtin_rules_parse() {
        let rules = RuleSet::load(None).unwrap();
        assert!(!rules.is_empty());
        assert!(rules.get("go").is_some());

        let docker = rules.get("dockerfile").unwrap();
        assert!(docker.is_pattern());
        assert_eq!(docker.identity("dockerfile"), "docker");
    }

    #[test]
    fn test_builtin_rules_preserve_declaration_order() {
        let rules = RuleSet::load(None).unwrap();
        let keys: Vec<&str> = rules.iter().map(|(k, _)| k.as_str()).collect();
        let go = keys.iter().position(|k| *k == "go").unwrap();
        let docker = keys.iter().position(|k| *k == "dockerfile").unwrap();
        assert!(go < docker, "go is declared before dockerfile");
    }

    #[test]
    fn test_override_file_missing() {
        let err = RuleSet::load(Some(Path::new("/nonexistent/rules.yaml"))).unwrap_err();
        match err {
            ConfigError::NotFound(path) => {
                assert_eq!(path, PathBuf::from("/nonexistent/rules.yaml"))
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_override_file_malformed() {
        let file = write_temp("go: [not, a, rule");
        let err = RuleSet::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_override_pattern_rule_requires_name() {
        let file = write_temp(
            r#"
dockerfile:
  pattern: "(?i)dockerfile"
  tasks:
    - name: build-image
"#,
        );
        let err = RuleSet::load(Some(file.path())).unwrap_err();
        match err {
            ConfigError::MissingName { key } => assert_eq!(key, "dockerfile"),
            other => panic!("expected MissingName, got {other:?}"),
        }
    }

    #[test]
    fn test_override_keys_are_case_folded() {
        let file = write_temp(
            r#"
Go:
  tasks:
    - name: lint
"#,
        );
        let rules = RuleSet::load(Some(file.path())).unwrap();
        assert!(rules.get("go").is_some());
        assert!(rules.get("Go").is_none());
    }

    #[test]
    fn test_override_preserves_declaration_order() {
        let file = write_temp(
            r#"
zlast:
  tasks: []
afirst:
  tasks: []
middle:
  tasks: []
"#,
        );
        let rules = RuleSet::load(Some(file.path())).unwrap();
        let keys: Vec<&str> = rules.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zlast", "afirst", "middle"]);
    }
}
