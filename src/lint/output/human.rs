//! Human-readable output formatter.
//!
//! One line per diagnostic in the stable `[line:column] severity rule-id
//! message` shape, followed by a summary. Colors only affect the severity
//! word, never the line structure, so output stays grep-able.

use std::io::Write;

use console::style;

use super::LintFormatter;
use crate::lint::diagnostic::Diagnostic;
use crate::lint::rule::Severity;

/// Formats lint output for terminal display.
pub struct HumanFormatter {
    pub use_color: bool,
}

impl HumanFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn severity_word(&self, severity: Severity) -> String {
        if !self.use_color {
            return severity.to_string();
        }
        match severity {
            Severity::Hint => style("hint").dim().to_string(),
            Severity::Warning => style("warning").yellow().to_string(),
            Severity::Error => style("error").red().to_string(),
        }
    }
}

impl LintFormatter for HumanFormatter {
    fn format<W: Write>(
        &self,
        diagnostics: &[Diagnostic],
        writer: &mut W,
    ) -> std::io::Result<()> {
        for diagnostic in diagnostics {
            match &diagnostic.location {
                Some(location) => writeln!(
                    writer,
                    "[{}:{}] {} {} {}",
                    location.span.line,
                    location.span.column,
                    self.severity_word(diagnostic.severity),
                    diagnostic.rule_id,
                    diagnostic.message
                )?,
                None => writeln!(
                    writer,
                    "{} {} {}",
                    self.severity_word(diagnostic.severity),
                    diagnostic.rule_id,
                    diagnostic.message
                )?,
            }
        }

        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let warnings = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        if errors > 0 || warnings > 0 {
            writeln!(writer)?;
            writeln!(writer, "Found {} error(s) and {} warning(s)", errors, warnings)?;
        }

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

    fn render(diagnostics: &[Diagnostic]) -> String {
        let formatter = HumanFormatter::new(false);
        let mut output = Vec::new();
        formatter.format(diagnostics, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn renders_the_stable_line_shape() {
        let diagnostics = vec![Diagnostic::new(
            RuleId::from("style-operation-tags"),
            Severity::Warning,
            "the `POST` /users is missing tags",
        )
        .with_location(Location::new(
            DocumentId(0),
            NodePath::parse_pointer("/paths/~1users/post").unwrap(),
            Span::new(4, 10),
        ))];
        let output = render(&diagnostics);
        assert!(output.starts_with(
            "[4:10] warning style-operation-tags the `POST` /users is missing tags\n"
        ));
        assert!(output.contains("Found 0 error(s) and 1 warning(s)"));
    }

    #[test]
    fn hints_alone_skip_the_summary() {
        let diagnostics = vec![Diagnostic::new(
            RuleId::from("style-operation-description"),
            Severity::Hint,
            "no description",
        )];
        let output = render(&diagnostics);
        assert!(!output.contains("Found"));
    }
}
