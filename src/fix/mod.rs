//! The fix framework.
//!
//! A fix is a self-contained repair attached to a diagnostic. Immediate fixes
//! need no input; interactive fixes declare prompts up front and receive the
//! collected answers through [`Fix::set_input`] before applying, so prompt
//! collection and application can live in different layers (a terminal, an
//! editor integration, a test harness).
//!
//! Every fix is idempotent: applying it to a document that already has the
//! repaired shape is a no-op, not an error. Fixes mutate the positional tree
//! in place through stable node handles; [`Fix::apply_model`] additionally
//! offers a typed-document path for fixes that can express their repair
//! against [`DocumentModel`].

pub mod fixes;
pub mod model;

pub use model::{DocumentModel, OpenApiModel, Server};

use crate::error::{OaslintError, Result};
use crate::tree::YamlTree;

/// How a prompt collects its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Free-form text input.
    FreeText,
    /// Selection from a fixed list.
    Choice,
}

/// One question an interactive fix asks before it can apply.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub message: String,
    /// Options for [`PromptKind::Choice`]; empty otherwise.
    pub choices: Vec<String>,
}

impl Prompt {
    pub fn free_text(message: impl Into<String>) -> Self {
        Self {
            kind: PromptKind::FreeText,
            message: message.into(),
            choices: Vec::new(),
        }
    }

    pub fn choice(message: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            kind: PromptKind::Choice,
            message: message.into(),
            choices,
        }
    }
}

/// A repair attached to a diagnostic.
pub trait Fix {
    /// Human-readable summary shown before applying.
    fn description(&self) -> String;

    /// Whether the fix needs answers before it can apply.
    fn interactive(&self) -> bool {
        false
    }

    /// Questions to ask, in order. One answer per prompt is expected by
    /// [`Fix::set_input`].
    fn prompts(&self) -> Vec<Prompt> {
        Vec::new()
    }

    /// Deliver collected answers, one per prompt. The default rejects any
    /// input since non-interactive fixes expect none.
    fn set_input(&mut self, input: &[String]) -> Result<()> {
        if input.is_empty() {
            Ok(())
        } else {
            Err(OaslintError::FixInput {
                fix: self.description(),
                expected: 0,
                actual: input.len(),
            })
        }
    }

    /// Apply against the positional tree. Must be idempotent.
    fn apply(&self, tree: &mut YamlTree) -> Result<()>;

    /// Apply against the typed document model, for integrations that hold a
    /// decoded document rather than a tree. Fixes expressed only on the
    /// positional tree leave this a no-op.
    fn apply_model(&self, _model: &mut DocumentModel) -> Result<()> {
        Ok(())
    }
}

/// Validate the answer count for an interactive fix.
pub(crate) fn expect_input(fix: &dyn Fix, input: &[String], expected: usize) -> Result<()> {
    if input.len() == expected {
        Ok(())
    } else {
        Err(OaslintError::FixInput {
            fix: fix.description(),
            expected,
            actual: input.len(),
        })
    }
}

/// Error for applying an interactive fix before its input arrived.
pub(crate) fn missing_input(fix: &dyn Fix) -> OaslintError {
    OaslintError::FixApply {
        message: format!("'{}' has not received its input yet", fix.description()),
    }
}
