//! Source location spans.
//!
//! Every node in the positional tree carries a [`Span`] so diagnostics can
//! point at the exact line and column of the offending construct.

/// A source position for a node, 1-indexed line and column.
///
/// Nodes synthesized by fixes carry the [`Span::synthetic`] position (0:0),
/// which sorts before any real position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Span {
    /// Line (1-indexed, 0 for synthetic nodes).
    pub line: usize,
    /// Column (1-indexed, 0 for synthetic nodes).
    pub column: usize,
}

impl Span {
    /// Create a span at a precise position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Span for nodes created programmatically (no source position).
    pub fn synthetic() -> Self {
        Self { line: 0, column: 0 }
    }

    /// Whether this span came from parsed source.
    pub fn is_real(&self) -> bool {
        self.line > 0
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
