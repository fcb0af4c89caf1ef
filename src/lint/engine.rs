//! Rule scheduling and execution.

use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::config::LintConfig;
use crate::document::Document;
use crate::index::Index;
use crate::lint::diagnostic::Diagnostic;
use crate::lint::registry::RuleRegistry;

/// Runs every applicable rule over a document and its index.
///
/// Rules execute sequentially in registry order. A panicking rule is isolated:
/// its diagnostics are dropped and the run continues. Output is sorted by
/// (line, column, rule id), so a given document and rule set always produce
/// the same diagnostics in the same order.
pub struct Engine<'a> {
    registry: &'a RuleRegistry,
    config: &'a LintConfig,
}

impl<'a> Engine<'a> {
    pub fn new(registry: &'a RuleRegistry, config: &'a LintConfig) -> Self {
        Self { registry, config }
    }

    pub fn run(&self, document: &Rc<Document>, index: &Index) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for rule in self.registry.iter() {
            let id = rule.id();
            if self.config.is_disabled(&id) {
                tracing::debug!(rule = %id, "rule disabled by configuration");
                continue;
            }
            if let Some(versions) = rule.versions() {
                if !versions.contains(&document.version()) {
                    continue;
                }
            }
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| rule.run(document, index, self.config)));
            let mut produced = match outcome {
                Ok(produced) => produced,
                Err(_) => {
                    tracing::warn!(rule = %id, "rule panicked; its diagnostics are dropped");
                    continue;
                }
            };
            if let Some(severity) = self.config.severity_for(&id) {
                for diagnostic in &mut produced {
                    diagnostic.severity = severity;
                }
            }
            diagnostics.extend(produced);
        }
        diagnostics.sort_by_cached_key(|d| d.sort_key());
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentLocation, SpecVersion};
    use crate::index::IndexOptions;
    use crate::lint::rule::{Category, Rule, RuleId, Severity};
    use crate::resolver::testing::resolver_with;

    struct FixedRule {
        id: &'static str,
        versions: Option<&'static [SpecVersion]>,
        panics: bool,
    }

    impl Rule for FixedRule {
        fn id(&self) -> RuleId {
            RuleId::from(self.id)
        }
        fn category(&self) -> Category {
            Category::Style
        }
        fn description(&self) -> &'static str {
            "test rule"
        }
        fn default_severity(&self) -> Severity {
            Severity::Warning
        }
        fn versions(&self) -> Option<&'static [SpecVersion]> {
            self.versions
        }
        fn run(
            &self,
            _document: &Rc<Document>,
            _index: &Index,
            _config: &LintConfig,
        ) -> Vec<Diagnostic> {
            if self.panics {
                panic!("boom");
            }
            vec![Diagnostic::new(self.id(), self.default_severity(), "found")]
        }
    }

    fn setup(source: &str) -> (Rc<Document>, Index) {
        let resolver = resolver_with(&[]);
        let doc = resolver
            .register(DocumentLocation::local("api.yml"), source)
            .unwrap();
        let index = Index::build(&doc, &resolver, &IndexOptions::default());
        (doc, index)
    }

    fn registry_of(rules: Vec<FixedRule>) -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        for rule in rules {
            registry.register(Box::new(rule));
        }
        registry
    }

    #[test]
    fn version_scoped_rule_skips_other_versions() {
        let registry = registry_of(vec![FixedRule {
            id: "style-only-v2",
            versions: Some(&[SpecVersion::V2]),
            panics: false,
        }]);
        let config = LintConfig::default();
        let engine = Engine::new(&registry, &config);

        let (doc, index) = setup("openapi: 3.0.3\npaths: {}\n");
        assert!(engine.run(&doc, &index).is_empty());

        let (doc, index) = setup("swagger: \"2.0\"\npaths: {}\n");
        assert_eq!(engine.run(&doc, &index).len(), 1);
    }

    #[test]
    fn panicking_rule_does_not_abort_the_run() {
        let registry = registry_of(vec![
            FixedRule {
                id: "style-panics",
                versions: None,
                panics: true,
            },
            FixedRule {
                id: "style-survives",
                versions: None,
                panics: false,
            },
        ]);
        let config = LintConfig::default();
        let engine = Engine::new(&registry, &config);
        let (doc, index) = setup("openapi: 3.0.3\npaths: {}\n");
        let diagnostics = engine.run(&doc, &index);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id.as_str(), "style-survives");
    }

    #[test]
    fn severity_override_replaces_rule_severity() {
        let registry = registry_of(vec![FixedRule {
            id: "style-overridden",
            versions: None,
            panics: false,
        }]);
        let mut config = LintConfig::default();
        config
            .severity
            .insert("style-overridden".to_string(), Severity::Error);
        let engine = Engine::new(&registry, &config);
        let (doc, index) = setup("openapi: 3.0.3\npaths: {}\n");
        let diagnostics = engine.run(&doc, &index);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn disabled_rule_produces_nothing() {
        let registry = registry_of(vec![FixedRule {
            id: "style-disabled",
            versions: None,
            panics: false,
        }]);
        let mut config = LintConfig::default();
        config.disabled.push("style-disabled".to_string());
        let engine = Engine::new(&registry, &config);
        let (doc, index) = setup("openapi: 3.0.3\npaths: {}\n");
        assert!(engine.run(&doc, &index).is_empty());
    }
}
