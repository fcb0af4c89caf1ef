//! Diagnostics produced by rules.

use std::fmt;

use crate::fix::Fix;
use crate::index::Location;
use crate::lint::rule::{RuleId, Severity};

/// One finding: a rule id, a severity, a message, and (usually) a position.
/// A diagnostic may carry a fix capable of rewriting the document.
pub struct Diagnostic {
    pub rule_id: RuleId,
    pub severity: Severity,
    pub message: String,
    pub location: Option<Location>,
    pub fix: Option<Box<dyn Fix>>,
}

impl Diagnostic {
    pub fn new(rule_id: RuleId, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id,
            severity,
            message: message.into(),
            location: None,
            fix: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_fix(mut self, fix: Box<dyn Fix>) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Stable ordering key: position first, then rule id for ties.
    /// Diagnostics without a position sort before everything else.
    pub fn sort_key(&self) -> (usize, usize, String) {
        match &self.location {
            Some(location) => (
                location.span.line,
                location.span.column,
                self.rule_id.to_string(),
            ),
            None => (0, 0, self.rule_id.to_string()),
        }
    }

    pub fn has_fix(&self) -> bool {
        self.fix.is_some()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(
                f,
                "[{}:{}] {} {} {}",
                location.span.line, location.span.column, self.severity, self.rule_id, self.message
            ),
            None => write!(f, "{} {} {}", self.severity, self.rule_id, self.message),
        }
    }
}

impl fmt::Debug for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostic")
            .field("rule_id", &self.rule_id)
            .field("severity", &self.severity)
            .field("message", &self.message)
            .field("location", &self.location)
            .field("has_fix", &self.fix.is_some())
            .finish()
    }
}
