//! Style rules: naming, descriptions, ordering.

use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::LintConfig;
use crate::document::{Document, SpecVersion};
use crate::fix::fixes::{AddTagsFix, SetOperationIdFix, SortTagsFix, StripTrailingSlashFix};
use crate::index::{Index, Location};
use crate::lint::diagnostic::Diagnostic;
use crate::lint::rule::{Category, Rule, RuleId, Severity};
use crate::lint::rules::primary;

pub(crate) fn rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(OperationTags),
        Box::new(OperationId),
        Box::new(OperationDescription),
        Box::new(TagOrder),
        Box::new(TagName),
        Box::new(ServerTrailingSlash),
        Box::new(ParameterDescription),
        Box::new(InlineParameterDescription),
    ]
}

fn operation_label(method: &str, path: &str) -> String {
    format!("`{}` {}", method.to_uppercase(), path)
}

/// Every operation should carry at least one tag.
struct OperationTags;

impl Rule for OperationTags {
    fn id(&self) -> RuleId {
        RuleId::from("style-operation-tags")
    }
    fn category(&self) -> Category {
        Category::Style
    }
    fn description(&self) -> &'static str {
        "Operations should be grouped under at least one tag"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
    fn run(&self, _document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        let declared: Vec<String> = index.tags.iter().map(|t| t.value.name.clone()).collect();
        primary(index, &index.operations)
            .filter(|op| op.value.tags.is_empty())
            .map(|op| {
                Diagnostic::new(
                    self.id(),
                    self.default_severity(),
                    format!(
                        "the {} is missing tags",
                        operation_label(&op.value.method, &op.value.path)
                    ),
                )
                .with_location(op.location.clone())
                .with_fix(Box::new(AddTagsFix::new(op.node, declared.clone())))
            })
            .collect()
    }
}

/// Every operation should have a stable `operationId`.
struct OperationId;

impl Rule for OperationId {
    fn id(&self) -> RuleId {
        RuleId::from("style-operation-id")
    }
    fn category(&self) -> Category {
        Category::Style
    }
    fn description(&self) -> &'static str {
        "Operations should declare an operationId"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
    fn run(&self, _document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        primary(index, &index.operations)
            .filter(|op| op.value.operation_id.is_none())
            .map(|op| {
                Diagnostic::new(
                    self.id(),
                    self.default_severity(),
                    format!(
                        "the {} has no operationId",
                        operation_label(&op.value.method, &op.value.path)
                    ),
                )
                .with_location(op.location.clone())
                .with_fix(Box::new(SetOperationIdFix::new(op.node)))
            })
            .collect()
    }
}

/// Operations should explain themselves with a summary or description.
struct OperationDescription;

impl Rule for OperationDescription {
    fn id(&self) -> RuleId {
        RuleId::from("style-operation-description")
    }
    fn category(&self) -> Category {
        Category::Style
    }
    fn description(&self) -> &'static str {
        "Operations should have a summary or description"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
    fn run(&self, _document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        primary(index, &index.operations)
            .filter(|op| op.value.summary.is_none() && op.value.description.is_none())
            .map(|op| {
                Diagnostic::new(
                    self.id(),
                    self.default_severity(),
                    format!(
                        "the {} has neither a summary nor a description",
                        operation_label(&op.value.method, &op.value.path)
                    ),
                )
                .with_location(op.location.clone())
            })
            .collect()
    }
}

/// Declared tags should be alphabetical.
struct TagOrder;

impl Rule for TagOrder {
    fn id(&self) -> RuleId {
        RuleId::from("style-tag-order")
    }
    fn category(&self) -> Category {
        Category::Style
    }
    fn description(&self) -> &'static str {
        "Declared tags should be in alphabetical order"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
    fn run(&self, document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        let tags: Vec<_> = primary(index, &index.tags).collect();
        for pair in tags.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.value.name < prev.value.name {
                let tags_node = {
                    let tree = document.tree();
                    tree.get(document.root(), "tags")
                };
                let mut diagnostic = Diagnostic::new(
                    self.id(),
                    self.default_severity(),
                    format!(
                        "declared tags are not alphabetical: `{}` should come before `{}`",
                        next.value.name, prev.value.name
                    ),
                )
                .with_location(next.location.clone());
                if let Some(tags_node) = tags_node {
                    diagnostic = diagnostic.with_fix(Box::new(SortTagsFix::new(tags_node)));
                }
                return vec![diagnostic];
            }
        }
        Vec::new()
    }
}

static TAG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("invalid tag name pattern"));

/// Tag names should be lowercase kebab-case.
struct TagName;

impl Rule for TagName {
    fn id(&self) -> RuleId {
        RuleId::from("style-tag-name")
    }
    fn category(&self) -> Category {
        Category::Style
    }
    fn description(&self) -> &'static str {
        "Tag names should be lowercase kebab-case"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
    fn run(&self, _document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        primary(index, &index.tags)
            .filter(|tag| !tag.value.name.is_empty() && !TAG_NAME.is_match(&tag.value.name))
            .map(|tag| {
                Diagnostic::new(
                    self.id(),
                    self.default_severity(),
                    format!("tag `{}` should be lowercase kebab-case", tag.value.name),
                )
                .with_location(tag.location.clone())
            })
            .collect()
    }
}

/// Server URLs should not end with a slash; paths already start with one.
struct ServerTrailingSlash;

impl Rule for ServerTrailingSlash {
    fn id(&self) -> RuleId {
        RuleId::from("style-server-trailing-slash")
    }
    fn category(&self) -> Category {
        Category::Style
    }
    fn description(&self) -> &'static str {
        "Server URLs should not have a trailing slash"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
    fn versions(&self) -> Option<&'static [SpecVersion]> {
        Some(&[SpecVersion::V30, SpecVersion::V31])
    }
    fn run(&self, document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for server in primary(index, &index.servers) {
            let Some(url) = server.value.url.as_deref() else {
                continue;
            };
            if url.len() <= 1 || !url.ends_with('/') {
                continue;
            }
            let url_node = {
                let tree = document.tree();
                tree.get(server.node, "url")
            };
            let Some(url_node) = url_node else {
                continue;
            };
            let location = Location::new(
                server.location.document,
                server.location.path.push_key("url"),
                document.tree().span(url_node),
            );
            diagnostics.push(
                Diagnostic::new(
                    self.id(),
                    self.default_severity(),
                    format!("server URL `{url}` has a trailing slash"),
                )
                .with_location(location)
                .with_fix(Box::new(StripTrailingSlashFix::new(url_node))),
            );
        }
        diagnostics
    }
}

/// Shared parameter definitions should have a description.
struct ParameterDescription;

impl Rule for ParameterDescription {
    fn id(&self) -> RuleId {
        RuleId::from("style-parameter-description")
    }
    fn category(&self) -> Category {
        Category::Style
    }
    fn description(&self) -> &'static str {
        "Shared parameter definitions should have a description"
    }
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
    fn run(&self, _document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        primary(index, &index.component_parameters)
            .filter(|param| param.value.description.is_none())
            .map(|param| {
                let name = param.value.name.as_deref().unwrap_or("<unnamed>");
                Diagnostic::new(
                    self.id(),
                    self.default_severity(),
                    format!("shared parameter `{name}` has no description"),
                )
                .with_location(param.location.clone())
            })
            .collect()
    }
}

/// Inline parameters should have a description.
struct InlineParameterDescription;

impl Rule for InlineParameterDescription {
    fn id(&self) -> RuleId {
        RuleId::from("style-inline-parameter-description")
    }
    fn category(&self) -> Category {
        Category::Style
    }
    fn description(&self) -> &'static str {
        "Inline parameters should have a description"
    }
    fn default_severity(&self) -> Severity {
        Severity::Hint
    }
    fn run(&self, _document: &Rc<Document>, index: &Index, _config: &LintConfig) -> Vec<Diagnostic> {
        primary(index, &index.inline_parameters)
            .filter(|param| param.value.description.is_none())
            .map(|param| {
                let name = param.value.name.as_deref().unwrap_or("<unnamed>");
                let message = match param.location.operation() {
                    Some((method, path)) => {
                        format!("parameter `{name}` of the `{method}` {path} has no description")
                    }
                    None => format!("parameter `{name}` has no description"),
                };
                Diagnostic::new(self.id(), self.default_severity(), message)
                    .with_location(param.location.clone())
            })
            .collect()
    }
}
