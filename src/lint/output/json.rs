//! JSON output formatter.
//!
//! Machine-readable rendering for tooling integration.

use std::io::Write;

use serde::Serialize;

use super::LintFormatter;
use crate::lint::diagnostic::Diagnostic;
use crate::lint::rule::Severity;

/// Formats lint output as JSON.
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput {
    diagnostics: Vec<JsonDiagnostic>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonDiagnostic {
    rule_id: String,
    severity: Severity,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<usize>,
    fixable: bool,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    errors: usize,
    warnings: usize,
    hints: usize,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl LintFormatter for JsonFormatter {
    fn format<W: Write>(
        &self,
        diagnostics: &[Diagnostic],
        writer: &mut W,
    ) -> std::io::Result<()> {
        let json_diagnostics: Vec<_> = diagnostics
            .iter()
            .map(|d| JsonDiagnostic {
                rule_id: d.rule_id.to_string(),
                severity: d.severity,
                message: d.message.clone(),
                path: d.location.as_ref().map(|l| l.path.to_string()),
                line: d.location.as_ref().map(|l| l.span.line),
                column: d.location.as_ref().map(|l| l.span.column),
                fixable: d.has_fix(),
            })
            .collect();

        let count = |severity: Severity| {
            diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .count()
        };
        let output = JsonOutput {
            diagnostics: json_diagnostics,
            summary: JsonSummary {
                total: diagnostics.len(),
                errors: count(Severity::Error),
                warnings: count(Severity::Warning),
                hints: count(Severity::Hint),
            },
        };

        serde_json::to_writer_pretty(writer, &output).map_err(std::io::Error::other)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentId;
    use crate::index::Location;
    use crate::lint::rule::RuleId;
    use crate::tree::{NodePath, Span};

    #[test]
    fn produces_valid_json_with_summary() {
        let diagnostics = vec![
            Diagnostic::new(RuleId::from("semantics-no-servers"), Severity::Error, "no servers"),
            Diagnostic::new(RuleId::from("style-tag-name"), Severity::Warning, "bad tag")
                .with_location(Location::new(
                    DocumentId(0),
                    NodePath::parse_pointer("/tags/0").unwrap(),
                    Span::new(3, 5),
                )),
        ];
        let mut output = Vec::new();
        JsonFormatter::new().format(&diagnostics, &mut output).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["summary"]["total"], 2);
        assert_eq!(parsed["summary"]["errors"], 1);
        assert_eq!(parsed["diagnostics"][1]["path"], "/tags/0");
        assert_eq!(parsed["diagnostics"][1]["line"], 3);
        assert!(parsed["diagnostics"][0].get("path").is_none());
    }
}
