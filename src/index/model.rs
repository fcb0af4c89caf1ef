//! Decoded values carried by index entries.
//!
//! Each type here is a lightweight projection of the fields rules actually
//! consume, decoded once during the index walk so rule bodies stay mechanical.

use crate::tree::{NodeId, Span, YamlTree};

/// An operation keyed by method + path.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Lowercase HTTP method as written in the document.
    pub method: String,
    /// Path template (`/users/{id}`).
    pub path: String,
    pub operation_id: Option<String>,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Operation-level `security` present and non-empty.
    pub has_security: bool,
    /// Response status codes in document order.
    pub response_codes: Vec<String>,
}

impl Operation {
    pub fn decode(tree: &YamlTree, node: NodeId, method: &str, path: &str) -> Self {
        let tags = tree
            .get(node, "tags")
            .map(|tags| {
                tree.sequence_items(tags)
                    .iter()
                    .filter_map(|&id| tree.scalar_str(id).map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        let response_codes = tree
            .get(node, "responses")
            .map(|responses| {
                tree.mapping_entries(responses)
                    .iter()
                    .filter_map(|e| tree.scalar_str(e.key).map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        let has_security = tree
            .get(node, "security")
            .map(|s| !tree.sequence_items(s).is_empty())
            .unwrap_or(false);
        Self {
            method: method.to_string(),
            path: path.to_string(),
            operation_id: tree.get_str(node, "operationId").map(str::to_string),
            tags,
            summary: tree.get_str(node, "summary").map(str::to_string),
            description: tree.get_str(node, "description").map(str::to_string),
            has_security,
            response_codes,
        }
    }
}

/// One entry of a schema's `enum` list, with its exact position.
#[derive(Debug, Clone)]
pub struct EnumValue {
    pub value: String,
    pub index: usize,
    pub span: Span,
}

/// The `additionalProperties` keyword of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdditionalProperties {
    /// Boolean form (`true` / `false`).
    Allowed(bool),
    /// Schema form; the schema itself is indexed separately.
    Schema,
}

/// A schema, inline or named.
#[derive(Debug, Clone)]
pub struct SchemaInfo {
    pub schema_type: Option<String>,
    pub title: Option<String>,
    pub enum_values: Vec<EnumValue>,
    pub additional_properties: Option<AdditionalProperties>,
    pub has_max_properties: bool,
}

impl SchemaInfo {
    pub fn decode(tree: &YamlTree, node: NodeId) -> Self {
        let enum_values = tree
            .get(node, "enum")
            .map(|e| {
                tree.sequence_items(e)
                    .iter()
                    .enumerate()
                    .filter_map(|(index, &id)| {
                        tree.scalar_str(id).map(|value| EnumValue {
                            value: value.to_string(),
                            index,
                            span: tree.span(id),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        let additional_properties = tree.get(node, "additionalProperties").map(|ap| {
            match tree.scalar_str(ap) {
                Some("true") => AdditionalProperties::Allowed(true),
                Some("false") => AdditionalProperties::Allowed(false),
                Some(_) => AdditionalProperties::Allowed(false),
                None => AdditionalProperties::Schema,
            }
        });
        Self {
            schema_type: tree.get_str(node, "type").map(str::to_string),
            title: tree.get_str(node, "title").map(str::to_string),
            enum_values,
            additional_properties,
            has_max_properties: tree.contains_key(node, "maxProperties"),
        }
    }
}

/// A reference node (`$ref: ...`) and where it landed.
#[derive(Debug, Clone)]
pub struct RefInfo {
    pub reference: String,
    /// Owning document + path of the resolved target, when resolution
    /// succeeded.
    pub resolved: Option<(crate::document::DocumentId, crate::tree::NodePath)>,
}

/// A `servers` entry.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub url: Option<String>,
    pub description: Option<String>,
}

impl ServerInfo {
    pub fn decode(tree: &YamlTree, node: NodeId) -> Self {
        Self {
            url: tree.get_str(node, "url").map(str::to_string),
            description: tree.get_str(node, "description").map(str::to_string),
        }
    }
}

/// A declared tag.
#[derive(Debug, Clone)]
pub struct TagInfo {
    pub name: String,
    pub description: Option<String>,
}

/// A parameter, inline or component.
#[derive(Debug, Clone)]
pub struct ParameterInfo {
    pub name: Option<String>,
    /// The `in` field (`query`, `header`, `path`, `cookie`).
    pub location_in: Option<String>,
    pub description: Option<String>,
    pub required: bool,
}

impl ParameterInfo {
    pub fn decode(tree: &YamlTree, node: NodeId) -> Self {
        Self {
            name: tree.get_str(node, "name").map(str::to_string),
            location_in: tree.get_str(node, "in").map(str::to_string),
            description: tree.get_str(node, "description").map(str::to_string),
            required: tree.get_str(node, "required") == Some("true"),
        }
    }
}

/// A security scheme definition.
#[derive(Debug, Clone)]
pub struct SecuritySchemeInfo {
    /// Component name.
    pub name: String,
    /// The `type` field (`http`, `apiKey`, `oauth2`, `openIdConnect`, or the
    /// 2.0 `basic`).
    pub scheme_type: Option<String>,
    /// The `scheme` field for `http` type (`basic`, `bearer`, ...).
    pub scheme: Option<String>,
    /// The `in` field for `apiKey` type.
    pub key_in: Option<String>,
}

impl SecuritySchemeInfo {
    pub fn decode(tree: &YamlTree, node: NodeId, name: &str) -> Self {
        Self {
            name: name.to_string(),
            scheme_type: tree.get_str(node, "type").map(str::to_string),
            scheme: tree.get_str(node, "scheme").map(str::to_string),
            key_in: tree.get_str(node, "in").map(str::to_string),
        }
    }
}

/// A link, inline or component.
#[derive(Debug, Clone)]
pub struct LinkInfo {
    pub operation_id: Option<String>,
    /// Cross-document operation references are indexed but not validated
    /// against the target document's operations (known gap).
    pub operation_ref: Option<String>,
}

impl LinkInfo {
    pub fn decode(tree: &YamlTree, node: NodeId) -> Self {
        Self {
            operation_id: tree.get_str(node, "operationId").map(str::to_string),
            operation_ref: tree.get_str(node, "operationRef").map(str::to_string),
        }
    }
}

/// A description- or summary-bearing node.
#[derive(Debug, Clone)]
pub struct Described {
    /// `description` or `summary`.
    pub field: &'static str,
    pub text: String,
}

/// A failed reference resolution, attached to the referencing node.
#[derive(Debug, Clone)]
pub struct ResolutionFailure {
    pub reference: String,
    pub message: String,
}
