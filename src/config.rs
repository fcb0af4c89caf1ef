//! Lint configuration.
//!
//! Loaded from an `.oaslint.yml` file next to the linted document (or named
//! explicitly). Configuration adjusts rules, it never defines them: a rule id
//! can be disabled or have its severity replaced.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{OaslintError, Result};
use crate::lint::rule::{RuleId, Severity};

pub const CONFIG_FILE_NAME: &str = ".oaslint.yml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    /// Per-rule severity overrides, keyed by rule id.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub severity: HashMap<String, Severity>,
    /// Rule ids that never run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled: Vec<String>,
}

impl LintConfig {
    /// Load configuration from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| OaslintError::ConfigLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| OaslintError::ConfigLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Find and load `.oaslint.yml` next to the linted document; defaults
    /// apply when no file is present.
    pub fn discover(document_path: &Path) -> Result<Self> {
        let dir = document_path.parent().unwrap_or_else(|| Path::new("."));
        let candidate: PathBuf = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loaded lint configuration");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn severity_for(&self, id: &RuleId) -> Option<Severity> {
        self.severity.get(id.as_str()).copied()
    }

    pub fn is_disabled(&self, id: &RuleId) -> bool {
        self.disabled.iter().any(|d| d == id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_overrides_and_disabled() {
        let config: LintConfig = serde_yaml::from_str(concat!(
            "severity:\n",
            "  style-operation-tags: error\n",
            "disabled:\n",
            "  - semantics-no-servers\n",
        ))
        .unwrap();
        assert_eq!(
            config.severity_for(&RuleId::from("style-operation-tags")),
            Some(Severity::Error)
        );
        assert!(config.is_disabled(&RuleId::from("semantics-no-servers")));
        assert!(!config.is_disabled(&RuleId::from("style-operation-tags")));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: std::result::Result<LintConfig, _> = serde_yaml::from_str("rules: {}\n");
        assert!(result.is_err());
    }

    #[test]
    fn discover_defaults_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let config = LintConfig::discover(&dir.path().join("api.yml")).unwrap();
        assert!(config.severity.is_empty());
        assert!(config.disabled.is_empty());
    }

    #[test]
    fn discover_reads_sibling_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        writeln!(file, "disabled:\n  - style-tag-order").unwrap();
        let config = LintConfig::discover(&dir.path().join("api.yml")).unwrap();
        assert!(config.is_disabled(&RuleId::from("style-tag-order")));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "severity: [not, a, map]\n").unwrap();
        assert!(matches!(
            LintConfig::load(&path),
            Err(OaslintError::ConfigLoad { .. })
        ));
    }
}
