//! Locations attached to index entries.

use crate::document::DocumentId;
use crate::tree::{NodePath, Span};

/// Where an indexed node lives: owning document, ancestor path, and source
/// position. The path carries enough structure to recover the operation
/// (method + path) or component name an entry belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub document: DocumentId,
    pub path: NodePath,
    pub span: Span,
}

impl Location {
    pub fn new(document: DocumentId, path: NodePath, span: Span) -> Self {
        Self {
            document,
            path,
            span,
        }
    }

    /// Recover `(METHOD, path)` for entries under `/paths/{path}/{method}`.
    pub fn operation(&self) -> Option<(String, String)> {
        if self.path.key_at(0) != Some("paths") {
            return None;
        }
        let path = self.path.key_at(1)?;
        let method = self.path.key_at(2)?;
        Some((method.to_uppercase(), path.to_string()))
    }

    /// Recover `(section, name)` for entries under a shared-definitions
    /// section (`/components/{section}/{name}`, or the 2.0 root sections).
    pub fn component(&self) -> Option<(String, String)> {
        match self.path.key_at(0) {
            Some("components") => Some((
                self.path.key_at(1)?.to_string(),
                self.path.key_at(2)?.to_string(),
            )),
            Some(section @ ("definitions" | "parameters" | "responses")) => {
                Some((section.to_string(), self.path.key_at(1)?.to_string()))
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.path, self.span)
    }
}
