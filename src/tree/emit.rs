//! Block-style YAML emission.
//!
//! After fixes splice into the tree, the CLI writes the document back out.
//! Emission is plain two-space block style; scalars are quoted only when the
//! plain form would change meaning on re-parse.

use super::{MappingEntry, NodeId, NodeKind, YamlTree};

/// Serialize a tree to YAML text.
pub fn to_yaml_string(tree: &YamlTree) -> String {
    let mut out = String::new();
    let root = tree.root();
    match tree.kind(root) {
        NodeKind::Scalar(s) => {
            out.push_str(&format_scalar(s));
            out.push('\n');
        }
        NodeKind::Mapping(entries) if entries.is_empty() => out.push_str("{}\n"),
        NodeKind::Sequence(items) if items.is_empty() => out.push_str("[]\n"),
        NodeKind::Mapping(_) => emit_mapping(tree, root, 0, &mut out),
        NodeKind::Sequence(_) => emit_sequence(tree, root, 0, &mut out),
    }
    out
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn emit_mapping(tree: &YamlTree, id: NodeId, depth: usize, out: &mut String) {
    for entry in tree.mapping_entries(id) {
        push_indent(out, depth);
        emit_entry(tree, entry, depth, out);
    }
}

/// Emit one `key: value` entry; the cursor is already at the key column.
fn emit_entry(tree: &YamlTree, entry: &MappingEntry, depth: usize, out: &mut String) {
    let key = tree.scalar_str(entry.key).unwrap_or_default();
    out.push_str(&format_scalar(key));
    out.push(':');
    match tree.kind(entry.value) {
        NodeKind::Scalar(s) => {
            out.push(' ');
            out.push_str(&format_scalar(s));
            out.push('\n');
        }
        NodeKind::Mapping(entries) if entries.is_empty() => out.push_str(" {}\n"),
        NodeKind::Sequence(items) if items.is_empty() => out.push_str(" []\n"),
        NodeKind::Mapping(_) => {
            out.push('\n');
            emit_mapping(tree, entry.value, depth + 1, out);
        }
        NodeKind::Sequence(_) => {
            out.push('\n');
            emit_sequence(tree, entry.value, depth + 1, out);
        }
    }
}

fn emit_sequence(tree: &YamlTree, id: NodeId, depth: usize, out: &mut String) {
    for &item in tree.sequence_items(id) {
        push_indent(out, depth);
        out.push('-');
        match tree.kind(item) {
            NodeKind::Scalar(s) => {
                out.push(' ');
                out.push_str(&format_scalar(s));
                out.push('\n');
            }
            NodeKind::Mapping(entries) if entries.is_empty() => out.push_str(" {}\n"),
            NodeKind::Sequence(items) if items.is_empty() => out.push_str(" []\n"),
            NodeKind::Mapping(entries) => {
                // first entry rides the dash, the rest align below it
                out.push(' ');
                let mut first = true;
                for entry in entries {
                    if first {
                        first = false;
                    } else {
                        push_indent(out, depth + 1);
                    }
                    emit_entry(tree, entry, depth + 1, out);
                }
            }
            NodeKind::Sequence(_) => {
                out.push('\n');
                emit_sequence(tree, item, depth + 1, out);
            }
        }
    }
}

fn format_scalar(s: &str) -> String {
    if needs_quotes(s) {
        let escaped = s
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n");
        format!("\"{}\"", escaped)
    } else {
        s.to_string()
    }
}

fn needs_quotes(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    let first = s.chars().next().unwrap_or(' ');
    " \t-?:,[]{}#&*!|>'\"%@`".contains(first)
        || s.ends_with(' ')
        || s.ends_with(':')
        || s.contains(": ")
        || s.contains(" #")
        || s.contains('\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::load;

    #[test]
    fn round_trips_nested_document() {
        let src = "openapi: 3.0.3\npaths:\n  /users:\n    get:\n      summary: list users\n";
        let tree = load::parse(src).unwrap();
        let emitted = to_yaml_string(&tree);
        let reparsed = load::parse(&emitted).unwrap();
        let path = crate::tree::NodePath::parse_pointer("/paths/~1users/get/summary").unwrap();
        assert_eq!(
            reparsed.scalar_str(path.resolve(&reparsed).unwrap()),
            Some("list users")
        );
    }

    #[test]
    fn emits_sequence_of_mappings_inline() {
        let src = "servers:\n  - url: https://a\n    description: first\n";
        let tree = load::parse(src).unwrap();
        let emitted = to_yaml_string(&tree);
        assert!(emitted.contains("- url: https://a"));
        assert!(emitted.contains("    description: first"));
    }

    #[test]
    fn quotes_scalars_that_would_reparse_differently() {
        assert_eq!(format_scalar(""), "\"\"");
        assert_eq!(format_scalar("{id}"), "\"{id}\"");
        assert_eq!(format_scalar("a: b"), "\"a: b\"");
        assert_eq!(format_scalar("https://api.example.com"), "https://api.example.com");
        assert_eq!(format_scalar("/users"), "/users");
    }

    #[test]
    fn empty_collections_emit_flow_style() {
        let tree = load::parse("paths: {}\ntags: []\n").unwrap();
        let emitted = to_yaml_string(&tree);
        assert!(emitted.contains("paths: {}"));
        assert!(emitted.contains("tags: []"));
    }

    #[test]
    fn mutated_tree_emits_inserted_entries() {
        let mut tree = load::parse("responses:\n  \"200\":\n    description: ok\n").unwrap();
        let responses = tree.get(tree.root(), "responses").unwrap();
        let desc = tree.new_scalar("Unauthorized");
        let body = tree.new_mapping();
        tree.insert_entry(body, "description", desc);
        tree.insert_entry(responses, "401", body);
        let emitted = to_yaml_string(&tree);
        assert!(emitted.contains("401:"));
        assert!(emitted.contains("description: Unauthorized"));
    }
}
