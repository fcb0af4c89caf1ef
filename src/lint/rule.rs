//! The rule contract.

use std::fmt;
use std::rc::Rc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::LintConfig;
use crate::document::{Document, SpecVersion};
use crate::index::Index;
use crate::lint::diagnostic::Diagnostic;

/// Stable identifier of a rule (`style-operation-tags`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub String);

impl RuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Diagnostic severity, ordered by how loud it is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hint,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Hint => "hint",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{label}")
    }
}

/// Rule family, also the id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Style,
    Semantics,
    Security,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Style => "style",
            Category::Semantics => "semantics",
            Category::Security => "security",
        };
        write!(f, "{label}")
    }
}

/// A single lint check.
///
/// Rules read the index, never the raw tree, and return diagnostics without
/// side effects. A rule limited to certain format versions reports them via
/// [`Rule::versions`]; the engine skips it elsewhere.
pub trait Rule {
    fn id(&self) -> RuleId;
    fn category(&self) -> Category;
    /// One-line summary shown by `rules` and in documentation.
    fn description(&self) -> &'static str;
    fn default_severity(&self) -> Severity;
    /// Format versions the rule applies to; `None` means all.
    fn versions(&self) -> Option<&'static [SpecVersion]> {
        None
    }
    fn run(&self, document: &Rc<Document>, index: &Index, config: &LintConfig)
        -> Vec<Diagnostic>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_hint_warning_error() {
        assert!(Severity::Hint < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Warning).unwrap(),
            "\"warning\""
        );
        let parsed: Severity = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(parsed, Severity::Error);
    }

    #[test]
    fn category_renders_lowercase() {
        assert_eq!(Category::Security.to_string(), "security");
    }
}
