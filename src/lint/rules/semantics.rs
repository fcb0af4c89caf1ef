//! Semantic rules: references, duplicates, reachability.

use std::collections::HashMap;
use std::rc::Rc;

use crate::config::LintConfig;
use crate::document::{Document, SpecVersion};
use crate::fix::fixes::{AddResponseFix, AppendServerFix};
use crate::index::{Index, Location};
use crate::lint::diagnostic::Diagnostic;
use crate::lint::rule::{Category, Rule, RuleId, Severity};
use crate::lint::rules::primary;

pub(crate) fn rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NoServers),
        Box::new(DuplicateEnum),
        Box::new(DuplicateOperationId),
        Box::new(UnusedComponent),
        Box::new(UnresolvedReference),
        Box::new(UnauthorizedResponse),
    ]
}

/// A 3.x document without servers silently defaults to `/`.
struct NoServers;

impl Rule for NoServers {
    fn id(&self) -> RuleId {
        RuleId::from("semantics-no-servers")
    }
    fn category(&self) -> Category {
        Category::Semantics
    }
    fn description(&self) -> &'static str {
        "Documents should declare at least one server"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
    fn versions(&self) -> Option<&'static [SpecVersion]> {
        Some(&[SpecVersion::V30, SpecVersion::V31])
    }
    fn run(&self, _document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        if primary(index, &index.servers).next().is_some() {
            return Vec::new();
        }
        vec![Diagnostic::new(
            self.id(),
            self.default_severity(),
            "no servers are declared; clients will default to `/`",
        )
        .with_fix(Box::new(AppendServerFix::new()))]
    }
}

/// Repeated values in an `enum` list are dead entries.
struct DuplicateEnum;

impl Rule for DuplicateEnum {
    fn id(&self) -> RuleId {
        RuleId::from("semantics-duplicate-enum")
    }
    fn category(&self) -> Category {
        Category::Semantics
    }
    fn description(&self) -> &'static str {
        "Enum lists should not repeat values"
    }
    fn default_severity(&self) -> Severity {
        Severity::Error
    }
    fn run(&self, _document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for schema in primary(index, &index.schemas) {
            let mut first_seen: HashMap<&str, usize> = HashMap::new();
            for value in &schema.value.enum_values {
                match first_seen.get(value.value.as_str()) {
                    Some(&first) => {
                        let location = Location::new(
                            schema.location.document,
                            schema
                                .location
                                .path
                                .push_key("enum")
                                .push_index(value.index),
                            value.span,
                        );
                        diagnostics.push(
                            Diagnostic::new(
                                self.id(),
                                self.default_severity(),
                                format!(
                                    "enum value `{}` at position {} repeats position {first}",
                                    value.value, value.index
                                ),
                            )
                            .with_location(location),
                        );
                    }
                    None => {
                        first_seen.insert(value.value.as_str(), value.index);
                    }
                }
            }
        }
        diagnostics
    }
}

/// `operationId` must be unique across the document.
struct DuplicateOperationId;

impl Rule for DuplicateOperationId {
    fn id(&self) -> RuleId {
        RuleId::from("semantics-duplicate-operation-id")
    }
    fn category(&self) -> Category {
        Category::Semantics
    }
    fn description(&self) -> &'static str {
        "operationId values must be unique"
    }
    fn default_severity(&self) -> Severity {
        Severity::Error
    }
    fn run(&self, _document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut first_seen: HashMap<&str, String> = HashMap::new();
        for op in primary(index, &index.operations) {
            let Some(id) = op.value.operation_id.as_deref() else {
                continue;
            };
            let label = format!("`{}` {}", op.value.method.to_uppercase(), op.value.path);
            match first_seen.get(id) {
                Some(first) => diagnostics.push(
                    Diagnostic::new(
                        self.id(),
                        self.default_severity(),
                        format!("operationId `{id}` is already used by the {first}"),
                    )
                    .with_location(op.location.clone()),
                ),
                None => {
                    first_seen.insert(id, label);
                }
            }
        }
        diagnostics
    }
}

/// Shared definitions nothing references are dead weight.
struct UnusedComponent;

impl Rule for UnusedComponent {
    fn id(&self) -> RuleId {
        RuleId::from("semantics-unused-component")
    }
    fn category(&self) -> Category {
        Category::Semantics
    }
    fn description(&self) -> &'static str {
        "Shared definitions should be referenced somewhere"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
    fn run(&self, _document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        index
            .components
            .iter()
            .filter(|component| !index.is_component_used(component))
            .map(|component| {
                Diagnostic::new(
                    self.id(),
                    self.default_severity(),
                    format!(
                        "component `{}/{}` is never referenced",
                        component.section, component.name
                    ),
                )
                .with_location(component.location.clone())
            })
            .collect()
    }
}

/// References that failed to resolve during indexing.
struct UnresolvedReference;

impl Rule for UnresolvedReference {
    fn id(&self) -> RuleId {
        RuleId::from("semantics-unresolved-reference")
    }
    fn category(&self) -> Category {
        Category::Semantics
    }
    fn description(&self) -> &'static str {
        "References must resolve to an existing node"
    }
    fn default_severity(&self) -> Severity {
        Severity::Error
    }
    fn run(&self, _document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        primary(index, &index.resolution_failures)
            .map(|failure| {
                Diagnostic::new(
                    self.id(),
                    self.default_severity(),
                    format!(
                        "`{}` cannot be resolved: {}",
                        failure.value.reference, failure.value.message
                    ),
                )
                .with_location(failure.location.clone())
            })
            .collect()
    }
}

/// Secured operations should document their rejection path.
struct UnauthorizedResponse;

impl Rule for UnauthorizedResponse {
    fn id(&self) -> RuleId {
        RuleId::from("semantics-unauthorized-response")
    }
    fn category(&self) -> Category {
        Category::Semantics
    }
    fn description(&self) -> &'static str {
        "Secured operations should document a 401 response"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
    fn run(&self, _document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        primary(index, &index.operations)
            .filter(|op| op.value.has_security || index.has_global_security())
            .filter(|op| {
                !op.value
                    .response_codes
                    .iter()
                    .any(|code| code == "401" || code == "default")
            })
            .map(|op| {
                Diagnostic::new(
                    self.id(),
                    self.default_severity(),
                    format!(
                        "the secured `{}` {} documents no 401 response",
                        op.value.method.to_uppercase(),
                        op.value.path
                    ),
                )
                .with_location(op.location.clone())
                .with_fix(Box::new(AddResponseFix::new(
                    op.node,
                    "401",
                    "Unauthorized",
                )))
            })
            .collect()
    }
}
