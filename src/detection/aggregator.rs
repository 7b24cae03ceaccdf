//! Merging active rules into a single ordered task list
//!
//! Aggregation is a pure function over the rule set and the recorded
//! activation results, so running it twice over the same inputs produces
//! byte-identical output. All ordering follows the rule document's
//! declaration order, never an unordered map's iteration order.

use super::types::{Rule, Task};
use crate::config::RuleSet;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Which rules matched, recorded in rule-document declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSet {
    /// Keys of rules whose key appeared in the declared languages.
    pub by_language: Vec<String>,
    /// Keys of pattern rules whose pattern matched at least one path.
    pub by_pattern: Vec<String>,
}

/// Output of one detection pass: everything the renderer consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Final identity -> rule mapping, insertion-ordered (language pass
    /// first, then pattern pass, each in declaration order).
    pub configs: IndexMap<String, Rule>,

    /// Concatenated task lists of every rule in `configs`, in declaration
    /// order. Task names appearing in two active rules appear twice:
    /// deduplication is left to downstream consumers.
    pub tasks: Vec<Task>,

    /// Alternate render template selected by the first pattern-active rule
    /// (in declaration order) carrying a `pipelineRun` name.
    pub template_ref: Option<String>,
}

/// Merges the active rules' task lists per the precedence policy.
pub fn aggregate(rules: &RuleSet, active: &ActiveSet) -> Aggregation {
    let mut configs: IndexMap<String, Rule> = IndexMap::new();
    // Identity -> key of the rule that last inserted under it. Two rules
    // with identical content must not both contribute tasks, so ownership
    // is tracked by key rather than recovered by comparing rule values.
    let mut owners: HashMap<String, String> = HashMap::new();

    for (key, rule) in rules.iter() {
        if active.by_language.iter().any(|k| k == key) {
            let identity = rule.identity(key).to_string();
            owners.insert(identity.clone(), key.to_string());
            configs.insert(identity, rule.clone());
        }
    }

    let mut template_ref = None;
    for (key, rule) in rules.iter() {
        if !active.by_pattern.iter().any(|k| k == key) {
            continue;
        }
        let identity = rule.identity(key).to_string();
        owners.insert(identity.clone(), key.to_string());
        configs.insert(identity, rule.clone());
        if template_ref.is_none() {
            if let Some(name) = rule.pipeline_run.as_deref().filter(|n| !n.is_empty()) {
                template_ref = Some(name.to_string());
            }
        }
    }

    // Task order follows the rule document, not the mapping: concatenate
    // the task lists of every rule that owns an entry in the final mapping.
    let mut tasks = Vec::new();
    for (key, rule) in rules.iter() {
        if owners.get(rule.identity(key)).is_some_and(|owner| owner == key) {
            tasks.extend(rule.tasks.iter().cloned());
        }
    }

    Aggregation {
        configs,
        tasks,
        template_ref,
    }
}
