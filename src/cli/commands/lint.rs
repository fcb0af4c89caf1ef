//! Lint command implementation.
//!
//! Loads the document, builds the index, runs the engine, optionally applies
//! fixes, and renders the diagnostics in the requested format.

use std::rc::Rc;

use console::Term;
use dialoguer::{Input, Select};

use crate::cli::args::{FormatArg, LintArgs};
use crate::config::LintConfig;
use crate::document::{Document, DocumentLocation};
use crate::error::{OaslintError, Result};
use crate::fix::PromptKind;
use crate::index::{Index, IndexOptions};
use crate::lint::diagnostic::Diagnostic;
use crate::lint::rule::Severity;
use crate::lint::{Engine, HumanFormatter, JsonFormatter, LintFormatter, RuleRegistry, SarifFormatter};
use crate::resolver::{Fetcher, Resolver};
use crate::tree::emit;

use super::CommandResult;

fn map_dialoguer_err(e: dialoguer::Error) -> OaslintError {
    OaslintError::Io(e.into())
}

/// The lint command implementation.
pub struct LintCommand {
    args: LintArgs,
}

impl LintCommand {
    pub fn new(args: LintArgs) -> Self {
        Self { args }
    }

    pub fn execute(&self, no_color: bool) -> Result<CommandResult> {
        let config = match &self.args.config {
            Some(path) => LintConfig::load(path)?,
            None => LintConfig::discover(&self.args.document)?,
        };

        let mut fetcher = Fetcher::new();
        if let Some(dir) = &self.args.cache_dir {
            fetcher = fetcher.with_cache_dir(dir.clone());
        }
        let resolver = Resolver::with_fetcher(Box::new(fetcher));
        let document = resolver.load(DocumentLocation::local(&self.args.document))?;

        let options = IndexOptions {
            follow_references: !self.args.no_follow,
        };
        let index = Index::build(&document, &resolver, &options);

        let registry = RuleRegistry::with_builtins();
        let engine = Engine::new(&registry, &config);
        let mut diagnostics = engine.run(&document, &index);
        tracing::debug!(count = diagnostics.len(), "lint run complete");

        if self.args.fix {
            let applied = self.apply_fixes(&document, &mut diagnostics)?;
            if applied > 0 {
                let emitted = {
                    let tree = document.tree();
                    emit::to_yaml_string(&tree)
                };
                std::fs::write(&self.args.document, emitted)?;
                eprintln!("Applied {applied} fix(es)");
                // node handles in the old index are stale after the splices
                let index = Index::build(&document, &resolver, &options);
                diagnostics = engine.run(&document, &index);
            }
        }

        self.print_output(&diagnostics, no_color)?;
        Ok(CommandResult {
            exit_code: self.exit_code(&diagnostics),
        })
    }

    /// Apply fixes in diagnostic order. Interactive fixes prompt on the
    /// terminal unless `--non-interactive` was given, in which case they are
    /// skipped.
    fn apply_fixes(
        &self,
        document: &Rc<Document>,
        diagnostics: &mut [Diagnostic],
    ) -> Result<usize> {
        let term = Term::stderr();
        let mut applied = 0;
        for diagnostic in diagnostics.iter_mut() {
            let Some(fix) = diagnostic.fix.as_mut() else {
                continue;
            };
            if fix.interactive() {
                if self.args.non_interactive {
                    tracing::debug!(rule = %diagnostic.rule_id, "skipping interactive fix");
                    continue;
                }
                eprintln!("{} {}", diagnostic.rule_id, diagnostic.message);
                let prompts = fix.prompts();
                let mut answers = Vec::with_capacity(prompts.len());
                for prompt in &prompts {
                    let answer = match prompt.kind {
                        PromptKind::FreeText => Input::<String>::new()
                            .with_prompt(&prompt.message)
                            .interact_on(&term)
                            .map_err(map_dialoguer_err)?,
                        PromptKind::Choice => {
                            let selection = Select::new()
                                .with_prompt(&prompt.message)
                                .items(&prompt.choices)
                                .default(0)
                                .interact_on(&term)
                                .map_err(map_dialoguer_err)?;
                            prompt.choices[selection].clone()
                        }
                    };
                    answers.push(answer);
                }
                fix.set_input(&answers)?;
            }
            {
                let mut tree = document.tree_mut();
                fix.apply(&mut tree)?;
            }
            applied += 1;
        }
        Ok(applied)
    }

    fn print_output(&self, diagnostics: &[Diagnostic], no_color: bool) -> Result<()> {
        let mut output = Vec::new();
        match self.args.format {
            FormatArg::Human => {
                let use_color = !no_color && console::colors_enabled();
                HumanFormatter::new(use_color).format(diagnostics, &mut output)?;
            }
            FormatArg::Json => JsonFormatter::new().format(diagnostics, &mut output)?,
            FormatArg::Sarif => {
                let formatter = SarifFormatter::new(
                    env!("CARGO_PKG_VERSION"),
                    self.args.document.display().to_string(),
                );
                formatter.format(diagnostics, &mut output)?;
            }
        }
        let mut stdout = std::io::stdout();
        use std::io::Write;
        stdout.write_all(&output)?;
        Ok(())
    }

    fn exit_code(&self, diagnostics: &[Diagnostic]) -> u8 {
        let errors = diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error);
        let warnings = diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning);
        if errors || (self.args.strict && warnings) {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::rule::RuleId;
    use std::path::PathBuf;

    fn args(strict: bool) -> LintArgs {
        LintArgs {
            document: PathBuf::from("api.yml"),
            format: FormatArg::Human,
            config: None,
            fix: false,
            non_interactive: false,
            strict,
            no_follow: false,
            cache_dir: None,
        }
    }

    fn diagnostic(severity: Severity) -> Diagnostic {
        Diagnostic::new(RuleId::from("style-test"), severity, "message")
    }

    #[test]
    fn warnings_pass_unless_strict() {
        let command = LintCommand::new(args(false));
        assert_eq!(command.exit_code(&[diagnostic(Severity::Warning)]), 0);
        let strict = LintCommand::new(args(true));
        assert_eq!(strict.exit_code(&[diagnostic(Severity::Warning)]), 1);
    }

    #[test]
    fn errors_always_fail() {
        let command = LintCommand::new(args(false));
        assert_eq!(command.exit_code(&[diagnostic(Severity::Error)]), 1);
    }

    #[test]
    fn hints_never_fail() {
        let strict = LintCommand::new(args(true));
        assert_eq!(strict.exit_code(&[diagnostic(Severity::Hint)]), 0);
    }
}
