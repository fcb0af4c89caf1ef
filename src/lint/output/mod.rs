//! Lint output formatters.
//!
//! Human-readable, JSON, and SARIF renderings of a diagnostic list.

pub mod human;
pub mod json;
pub mod sarif;

use std::io::Write;

use crate::lint::diagnostic::Diagnostic;

/// Trait for formatting lint output.
pub trait LintFormatter {
    fn format<W: Write>(
        &self,
        diagnostics: &[Diagnostic],
        writer: &mut W,
    ) -> std::io::Result<()>;
}

pub use human::HumanFormatter;
pub use json::JsonFormatter;
pub use sarif::SarifFormatter;
