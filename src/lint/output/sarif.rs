//! SARIF output formatter.
//!
//! SARIF (Static Analysis Results Interchange Format) is an OASIS standard
//! for static analysis tools, supported by GitHub, VS Code, and other tools.

use std::collections::BTreeSet;
use std::io::Write;

use serde::Serialize;

use super::LintFormatter;
use crate::lint::diagnostic::Diagnostic;
use crate::lint::rule::Severity;

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

/// Formats lint output as SARIF.
pub struct SarifFormatter {
    pub tool_version: String,
    /// URI of the linted document, reported as the artifact location.
    pub artifact_uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLog {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDriver {
    name: &'static str,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: &'static str,
    message: SarifMessage,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    locations: Vec<SarifLocation>,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
    region: SarifRegion,
}

#[derive(Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRegion {
    start_line: usize,
    start_column: usize,
}

impl SarifFormatter {
    pub fn new(tool_version: impl Into<String>, artifact_uri: impl Into<String>) -> Self {
        Self {
            tool_version: tool_version.into(),
            artifact_uri: artifact_uri.into(),
        }
    }

    fn severity_to_level(severity: Severity) -> &'static str {
        match severity {
            Severity::Hint => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl LintFormatter for SarifFormatter {
    fn format<W: Write>(
        &self,
        diagnostics: &[Diagnostic],
        writer: &mut W,
    ) -> std::io::Result<()> {
        let rule_ids: BTreeSet<_> = diagnostics.iter().map(|d| d.rule_id.clone()).collect();
        let rules: Vec<_> = rule_ids
            .into_iter()
            .map(|id| SarifRule { id: id.to_string() })
            .collect();

        let results: Vec<_> = diagnostics
            .iter()
            .map(|d| {
                let locations = d
                    .location
                    .as_ref()
                    .map(|location| {
                        vec![SarifLocation {
                            physical_location: SarifPhysicalLocation {
                                artifact_location: SarifArtifactLocation {
                                    uri: self.artifact_uri.clone(),
                                },
                                region: SarifRegion {
                                    start_line: location.span.line,
                                    start_column: location.span.column,
                                },
                            },
                        }]
                    })
                    .unwrap_or_default();
                SarifResult {
                    rule_id: d.rule_id.to_string(),
                    level: Self::severity_to_level(d.severity),
                    message: SarifMessage {
                        text: d.message.clone(),
                    },
                    locations,
                }
            })
            .collect();

        let log = SarifLog {
            schema: SARIF_SCHEMA,
            version: SARIF_VERSION,
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: "oaslint",
                        version: self.tool_version.clone(),
                        rules,
                    },
                },
                results,
            }],
        };

        serde_json::to_writer_pretty(writer, &log).map_err(std::io::Error::other)?;
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
    fn produces_sarif_with_regions() {
        let diagnostics = vec![Diagnostic::new(
            RuleId::from("style-tag-name"),
            Severity::Warning,
            "tag `Users` should be lowercase kebab-case",
        )
        .with_location(Location::new(
            DocumentId(0),
            NodePath::parse_pointer("/tags/0").unwrap(),
            Span::new(3, 5),
        ))];
        let formatter = SarifFormatter::new("0.3.0", "api.yml");
        let mut output = Vec::new();
        formatter.format(&diagnostics, &mut output).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["version"], "2.1.0");
        let result = &parsed["runs"][0]["results"][0];
        assert_eq!(result["level"], "warning");
        assert_eq!(
            result["locations"][0]["physicalLocation"]["region"]["startLine"],
            3
        );
        assert_eq!(
            parsed["runs"][0]["tool"]["driver"]["rules"][0]["id"],
            "style-tag-name"
        );
    }
}
