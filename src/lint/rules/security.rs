//! Security rules: open schemas, weak schemes, leaked internals.

use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::LintConfig;
use crate::document::{Document, SpecVersion};
use crate::fix::fixes::SetMaxPropertiesFix;
use crate::index::model::AdditionalProperties;
use crate::index::Index;
use crate::lint::diagnostic::Diagnostic;
use crate::lint::rule::{Category, Rule, RuleId, Severity};
use crate::lint::rules::primary;

pub(crate) fn rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(AdditionalPropertiesUnbounded),
        Box::new(SchemeTransport),
        Box::new(ForbiddenContent),
    ]
}

/// `additionalProperties: true` without a size bound lets clients grow
/// payloads without limit.
struct AdditionalPropertiesUnbounded;

impl Rule for AdditionalPropertiesUnbounded {
    fn id(&self) -> RuleId {
        RuleId::from("security-additional-properties")
    }
    fn category(&self) -> Category {
        Category::Security
    }
    fn description(&self) -> &'static str {
        "Open schemas should bound their size with maxProperties"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
    fn versions(&self) -> Option<&'static [SpecVersion]> {
        Some(&[SpecVersion::V30, SpecVersion::V31])
    }
    fn run(&self, _document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        primary(index, &index.schemas)
            .filter(|schema| {
                schema.value.additional_properties == Some(AdditionalProperties::Allowed(true))
                    && !schema.value.has_max_properties
            })
            .map(|schema| {
                Diagnostic::new(
                    self.id(),
                    self.default_severity(),
                    "`additionalProperties: true` without a `maxProperties` bound",
                )
                .with_location(schema.location.clone())
                .with_fix(Box::new(SetMaxPropertiesFix::new(schema.node)))
            })
            .collect()
    }
}

/// HTTP Basic sends credentials with every request; API keys in the query
/// string end up in access logs.
struct SchemeTransport;

impl Rule for SchemeTransport {
    fn id(&self) -> RuleId {
        RuleId::from("security-scheme-transport")
    }
    fn category(&self) -> Category {
        Category::Security
    }
    fn description(&self) -> &'static str {
        "Security schemes should not expose credentials in transport"
    }
    fn default_severity(&self) -> Severity {
        Severity::Error
    }
    fn run(&self, _document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for scheme in primary(index, &index.security_schemes) {
            let name = &scheme.value.name;
            let uses_basic = match scheme.value.scheme_type.as_deref() {
                Some("http") => scheme.value.scheme.as_deref() == Some("basic"),
                Some("basic") => true,
                _ => false,
            };
            if uses_basic {
                diagnostics.push(
                    Diagnostic::new(
                        self.id(),
                        self.default_severity(),
                        format!("security scheme `{name}` uses HTTP Basic authentication"),
                    )
                    .with_location(scheme.location.clone()),
                );
            }
            if scheme.value.scheme_type.as_deref() == Some("apiKey")
                && scheme.value.key_in.as_deref() == Some("query")
            {
                diagnostics.push(
                    Diagnostic::new(
                        self.id(),
                        self.default_severity(),
                        format!("security scheme `{name}` passes its API key in the query string"),
                    )
                    .with_location(scheme.location.clone()),
                );
            }
        }
        diagnostics
    }
}

static LEAKED_CREDENTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(api[_-]?key|secret|password|token)\s*[:=]\s*\S+")
        .expect("invalid credential pattern")
});

static INTERNAL_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(localhost|127\.0\.0\.1|[A-Za-z0-9.-]+\.(internal|local|corp)\b)")
        .expect("invalid internal host pattern")
});

/// Description text sometimes carries things that should never ship:
/// credentials pasted from a terminal, or internal hostnames.
struct ForbiddenContent;

impl Rule for ForbiddenContent {
    fn id(&self) -> RuleId {
        RuleId::from("security-forbidden-content")
    }
    fn category(&self) -> Category {
        Category::Security
    }
    fn description(&self) -> &'static str {
        "Descriptions must not contain credentials or internal hosts"
    }
    fn default_severity(&self) -> Severity {
        Severity::Error
    }
    fn run(&self, _document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for described in primary(index, &index.described) {
            let text = &described.value.text;
            if LEAKED_CREDENTIAL.is_match(text) {
                diagnostics.push(
                    Diagnostic::new(
                        self.id(),
                        self.default_severity(),
                        format!(
                            "{} text appears to contain a credential",
                            described.value.field
                        ),
                    )
                    .with_location(described.location.clone()),
                );
            } else if let Some(found) = INTERNAL_HOST.find(text) {
                diagnostics.push(
                    Diagnostic::new(
                        self.id(),
                        self.default_severity(),
                        format!(
                            "{} text references the internal host `{}`",
                            described.value.field,
                            found.as_str()
                        ),
                    )
                    .with_location(described.location.clone()),
                );
            }
        }
        diagnostics
    }
}
