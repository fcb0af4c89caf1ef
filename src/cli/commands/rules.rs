//! Rules listing command.

use serde::Serialize;

use crate::cli::args::{FormatArg, RulesArgs};
use crate::error::Result;
use crate::lint::rule::Severity;
use crate::lint::RuleRegistry;

use super::CommandResult;

#[derive(Serialize)]
struct RuleListing {
    id: String,
    category: String,
    severity: Severity,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    versions: Option<Vec<&'static str>>,
}

pub fn execute(args: &RulesArgs) -> Result<CommandResult> {
    let registry = RuleRegistry::with_builtins();
    match args.format {
        FormatArg::Json => {
            let listings: Vec<_> = registry
                .iter()
                .map(|rule| RuleListing {
                    id: rule.id().to_string(),
                    category: rule.category().to_string(),
                    severity: rule.default_severity(),
                    description: rule.description(),
                    versions: rule
                        .versions()
                        .map(|versions| versions.iter().map(|v| v.as_str()).collect()),
                })
                .collect();
            let rendered =
                serde_json::to_string_pretty(&listings).map_err(anyhow::Error::from)?;
            println!("{rendered}");
        }
        _ => {
            for rule in registry.iter() {
                println!(
                    "{:<42} {:<8} {}",
                    rule.id().to_string(),
                    rule.default_severity().to_string(),
                    rule.description()
                );
            }
        }
    }
    Ok(CommandResult::success())
}
