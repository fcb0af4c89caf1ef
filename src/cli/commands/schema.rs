//! Configuration schema command.
//!
//! Prints the JSON Schema of the configuration file, for IDE autocomplete
//! and validation.

use crate::config::LintConfig;
use crate::error::Result;

use super::CommandResult;

pub fn execute() -> Result<CommandResult> {
    let schema = schemars::schema_for!(LintConfig);
    let rendered = serde_json::to_string_pretty(&schema).map_err(anyhow::Error::from)?;
    println!("{rendered}");
    Ok(CommandResult::success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_names_both_fields() {
        let schema = schemars::schema_for!(LintConfig);
        let value = serde_json::to_value(&schema).unwrap();
        let properties = value.get("properties").unwrap();
        assert!(properties.get("severity").is_some());
        assert!(properties.get("disabled").is_some());
    }
}
