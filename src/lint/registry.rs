//! The rule registry.

use std::collections::BTreeMap;

use crate::lint::rule::{Rule, RuleId};
use crate::lint::rules;

/// Holds every registered rule, keyed by id. Iteration order is the id order,
/// which keeps `rules` output and engine scheduling stable.
pub struct RuleRegistry {
    rules: BTreeMap<RuleId, Box<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Registry preloaded with every built-in rule.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for rule in rules::builtin_rules() {
            registry.register(rule);
        }
        registry
    }

    /// Later registrations win, so callers can shadow a built-in.
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.insert(rule.id(), rule);
    }

    pub fn get(&self, id: &RuleId) -> Option<&dyn Rule> {
        self.rules.get(id).map(|r| r.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.values().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
