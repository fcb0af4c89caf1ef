//! Conversion from `marked-yaml` parse output into the arena tree.
//!
//! The raw parser is an external collaborator; this is the only module that
//! touches its node types. Everything downstream works against [`YamlTree`].

use marked_yaml::types::Node as MarkedNode;

use super::{NodeKind, NodeId, Span, YamlTree};
use crate::error::{OaslintError, Result};

/// Parse YAML source into a positional tree.
pub fn parse(source: &str) -> Result<YamlTree> {
    parse_at("<input>", source)
}

/// Parse YAML source, labelling errors with the document location.
pub fn parse_at(location: &str, source: &str) -> Result<YamlTree> {
    let root = marked_yaml::parse_yaml(0, source).map_err(|e| OaslintError::Parse {
        location: location.to_string(),
        message: e.to_string(),
    })?;
    let mut tree = YamlTree::new();
    let root_id = convert(&mut tree, &root);
    tree.set_root(root_id);
    Ok(tree)
}

fn convert(tree: &mut YamlTree, node: &MarkedNode) -> NodeId {
    match node {
        MarkedNode::Scalar(scalar) => {
            let text: &str = scalar;
            let span = span_of(scalar.span());
            tree.push_node(NodeKind::Scalar(text.to_string()), span)
        }
        MarkedNode::Sequence(sequence) => {
            let span = span_of(sequence.span());
            let items: Vec<NodeId> = sequence.iter().map(|item| convert(tree, item)).collect();
            tree.push_node(NodeKind::Sequence(items), span)
        }
        MarkedNode::Mapping(mapping) => {
            let span = span_of(mapping.span());
            let mut entries = Vec::with_capacity(mapping.len());
            for (key, value) in mapping.iter() {
                let key_text: &str = key;
                let key_id =
                    tree.push_node(NodeKind::Scalar(key_text.to_string()), span_of(key.span()));
                let value_id = convert(tree, value);
                entries.push(super::MappingEntry {
                    key: key_id,
                    value: value_id,
                });
            }
            tree.push_node(NodeKind::Mapping(entries), span)
        }
    }
}

fn span_of(span: &marked_yaml::types::Span) -> Span {
    match span.start() {
        Some(marker) => Span::new(marker.line(), marker.column()),
        None => Span::synthetic(),
    }
}
