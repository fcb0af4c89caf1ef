//! Structural linter for API description documents.
//!
//! oaslint parses a document into a positional tree, resolves references
//! across document boundaries, indexes every lint-relevant construct in a
//! single traversal, and runs a pluggable rule set over the result. Findings
//! carry exact source positions; many carry fixes that rewrite the document
//! in place.
//!
//! # Pipeline
//!
//! 1. [`tree`] - positional YAML tree with stable node handles
//! 2. [`resolver`] - `$ref` resolution with cross-document caching and cycle
//!    detection
//! 3. [`index`] - one walk producing typed, document-ordered collections
//! 4. [`lint`] - rules, engine, diagnostics, output formats
//! 5. [`fix`] - immediate and interactive repairs

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod fix;
pub mod index;
pub mod lint;
pub mod resolver;
pub mod tree;

pub use config::LintConfig;
pub use document::{Document, DocumentId, DocumentLocation, SpecVersion};
pub use error::{OaslintError, Result};
pub use fix::{Fix, Prompt, PromptKind};
pub use index::{Index, IndexOptions, IndexedNode, Location};
pub use lint::{Diagnostic, Engine, Rule, RuleId, RuleRegistry, Severity};
pub use resolver::{ReferenceTarget, Resolver};
pub use tree::{NodeId, NodePath, Span, YamlTree};
