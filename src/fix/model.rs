//! Typed document model for fixes.
//!
//! A deliberately thin serde decoding of the document: the fields fixes can
//! repair are typed, everything else rides along untouched in a flattened
//! mapping and survives a serialize round trip.

use serde::{Deserialize, Serialize};

use crate::error::{OaslintError, Result};

/// A decoded document, tagged by format family.
#[derive(Debug, Clone)]
pub enum DocumentModel {
    OpenApi(OpenApiModel),
}

impl DocumentModel {
    /// Decode source text. Fails with [`OaslintError::FixApply`] when the
    /// document does not deserialize, since the only caller is the fix path.
    pub fn from_source(source: &str) -> Result<Self> {
        let model: OpenApiModel =
            serde_yaml::from_str(source).map_err(|e| OaslintError::FixApply {
                message: format!("document does not decode: {e}"),
            })?;
        Ok(Self::OpenApi(model))
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        match self {
            Self::OpenApi(model) => {
                serde_yaml::to_string(model).map_err(|e| OaslintError::FixApply {
                    message: format!("document does not serialize: {e}"),
                })
            }
        }
    }
}

/// The typed slice of an OpenAPI document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    #[serde(flatten)]
    pub rest: serde_yaml::Mapping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub rest: serde_yaml::Mapping,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
            rest: serde_yaml::Mapping::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_typed_and_passthrough_fields() {
        let model = DocumentModel::from_source(concat!(
            "openapi: 3.0.3\n",
            "info:\n",
            "  title: Pets\n",
            "servers:\n",
            "  - url: https://api.example.com\n",
            "paths: {}\n",
        ))
        .unwrap();
        let DocumentModel::OpenApi(model) = model;
        assert_eq!(model.openapi.as_deref(), Some("3.0.3"));
        assert_eq!(model.servers.len(), 1);
        assert!(model.rest.contains_key("info"));
        assert!(model.rest.contains_key("paths"));
    }

    #[test]
    fn round_trip_preserves_passthrough_content() {
        let source = "openapi: 3.0.3\ninfo:\n  title: Pets\npaths: {}\n";
        let model = DocumentModel::from_source(source).unwrap();
        let emitted = model.to_yaml_string().unwrap();
        assert!(emitted.contains("title: Pets"));
        assert!(emitted.contains("paths: {}"));
    }

    #[test]
    fn non_document_source_is_a_fix_apply_error() {
        let err = DocumentModel::from_source("- just\n- a\n- list\n").unwrap_err();
        assert!(matches!(err, OaslintError::FixApply { .. }));
    }
}
