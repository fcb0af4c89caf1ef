//! Structural linting.
//!
//! A pluggable rule system over the document index:
//!
//! - **Rules** - individual checks ([`Rule`] trait), grouped by category
//! - **Registry** - the set of available rules ([`RuleRegistry`])
//! - **Engine** - version filtering, severity overrides, deterministic
//!   ordering ([`Engine`])
//! - **Diagnostics** - findings with positions and optional fixes
//!   ([`Diagnostic`])
//!
//! # Example
//!
//! ```
//! use oaslint::lint::{RuleId, RuleRegistry, Severity};
//!
//! let registry = RuleRegistry::with_builtins();
//! assert!(registry.get(&RuleId::from("style-operation-tags")).is_some());
//!
//! // Severity has ordering
//! assert!(Severity::Hint < Severity::Warning);
//! assert!(Severity::Warning < Severity::Error);
//! ```

pub mod diagnostic;
pub mod engine;
pub mod output;
pub mod registry;
pub mod rule;
pub mod rules;

pub use diagnostic::Diagnostic;
pub use engine::Engine;
pub use output::{HumanFormatter, JsonFormatter, LintFormatter, SarifFormatter};
pub use registry::RuleRegistry;
pub use rule::{Category, Rule, RuleId, Severity};
