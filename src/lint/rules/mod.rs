//! Built-in rules, grouped by category.

mod security;
mod semantics;
mod style;

use crate::document::DocumentId;
use crate::index::{Index, IndexedNode};
use crate::lint::rule::Rule;

/// Every built-in rule, one instance each.
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> = Vec::new();
    rules.extend(style::rules());
    rules.extend(semantics::rules());
    rules.extend(security::rules());
    rules
}

/// Entries that live in the linted document itself. External documents are
/// walked for reachability but only the primary document gets diagnostics.
fn primary<'a, T>(
    index: &'a Index,
    entries: &'a [IndexedNode<T>],
) -> impl Iterator<Item = &'a IndexedNode<T>> {
    let document: DocumentId = index.document;
    entries
        .iter()
        .filter(move |entry| entry.location.document == document)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::rc::Rc;

    use crate::config::LintConfig;
    use crate::document::{Document, DocumentLocation};
    use crate::index::{Index, IndexOptions};
    use crate::lint::diagnostic::Diagnostic;
    use crate::lint::rule::Rule;
    use crate::resolver::testing::resolver_with;

    pub(crate) fn document_and_index(source: &str) -> (Rc<Document>, Index) {
        let resolver = resolver_with(&[]);
        let doc = resolver
            .register(DocumentLocation::local("api.yml"), source)
            .unwrap();
        let index = Index::build(&doc, &resolver, &IndexOptions::default());
        (doc, index)
    }

    pub(crate) fn run_rule(rule: &dyn Rule, source: &str) -> Vec<Diagnostic> {
        let (doc, index) = document_and_index(source);
        rule.run(&doc, &index, &LintConfig::default())
    }
}
