//! The index walk.
//!
//! One traversal from the document root, descending into every lint-relevant
//! construct. References are resolved through the [`Resolver`] and each
//! distinct resolved target is descended exactly once, deduplicated by
//! (document, node) identity rather than by reference text, so diamond-shaped
//! graphs do not produce duplicate entries. Resolution failures become
//! node-attached entries instead of aborting the walk.

use std::collections::HashSet;
use std::rc::Rc;

use super::location::Location;
use super::model::{
    Described, LinkInfo, Operation, ParameterInfo, RefInfo, ResolutionFailure, SchemaInfo,
    SecuritySchemeInfo, ServerInfo, TagInfo,
};
use super::{ComponentEntry, Index, IndexOptions, IndexedNode};
use crate::document::{Document, DocumentId, SpecVersion};
use crate::resolver::{ReferenceTarget, Resolver};
use crate::tree::{NodeId, NodeKind, NodePath};

const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Marker that pins a component as used regardless of reachability. Only the
/// exact scalar `true` counts.
pub const FORCE_INCLUDE_KEY: &str = "x-linter-include";

fn location_of(doc: &Rc<Document>, node: NodeId, path: &NodePath) -> Location {
    Location::new(doc.id(), path.clone(), doc.tree().span(node))
}

pub(crate) struct Builder<'a> {
    resolver: &'a Resolver,
    options: &'a IndexOptions,
    visited: HashSet<(DocumentId, NodeId)>,
    index: Index,
}

impl<'a> Builder<'a> {
    pub(crate) fn build(
        document: &Rc<Document>,
        resolver: &'a Resolver,
        options: &'a IndexOptions,
    ) -> Index {
        let mut builder = Builder {
            resolver,
            options,
            visited: HashSet::new(),
            index: Index::empty(document.id()),
        };
        builder.walk_root(document);
        tracing::debug!(
            operations = builder.index.operations.len(),
            schemas = builder.index.schemas.len(),
            components = builder.index.components.len(),
            failures = builder.index.resolution_failures.len(),
            "index built"
        );
        builder.index
    }

    /// First visit wins; returns false when the node was already walked.
    fn visit(&mut self, doc: &Rc<Document>, node: NodeId) -> bool {
        self.visited.insert((doc.id(), node))
    }

    fn ref_of(&self, doc: &Rc<Document>, node: NodeId) -> Option<String> {
        doc.tree().get_str(node, "$ref").map(str::to_string)
    }

    /// Resolve a reference met during the walk. Success marks the target's
    /// component root used; failure records a node-attached entry.
    fn resolve_ref(
        &mut self,
        doc: &Rc<Document>,
        node: NodeId,
        path: &NodePath,
        reference: &str,
    ) -> Option<ReferenceTarget> {
        if !self.options.follow_references {
            return None;
        }
        match self.resolver.resolve(doc, reference) {
            Ok(target) => {
                self.mark_used(&target);
                Some(target)
            }
            Err(e) => {
                let location = location_of(doc, node, path);
                self.index.resolution_failures.push(IndexedNode {
                    value: ResolutionFailure {
                        reference: reference.to_string(),
                        message: e.to_string(),
                    },
                    location,
                    node,
                });
                None
            }
        }
    }

    fn mark_used(&mut self, target: &ReferenceTarget) {
        if let Some(root) = component_root(&target.path) {
            self.index
                .used_components
                .insert((target.document.id(), root));
        }
    }

    fn index_described(&mut self, doc: &Rc<Document>, node: NodeId, path: &NodePath) {
        for field in ["description", "summary"] {
            let value = {
                let tree = doc.tree();
                tree.get(node, field)
                    .and_then(|id| tree.scalar_str(id).map(|text| (id, text.to_string())))
            };
            if let Some((value_id, text)) = value {
                let field_path = path.push_key(field);
                let location = location_of(doc, value_id, &field_path);
                self.index.described.push(IndexedNode {
                    value: Described { field, text },
                    location,
                    node: value_id,
                });
            }
        }
    }

    // --- Root ---

    fn walk_root(&mut self, doc: &Rc<Document>) {
        let root = doc.root();
        let root_path = NodePath::root();

        let global_security = {
            let tree = doc.tree();
            tree.get(root, "security")
                .map(|s| !tree.sequence_items(s).is_empty())
                .unwrap_or(false)
        };
        self.index.global_security = global_security;

        if let Some(info) = doc.tree().get(root, "info") {
            self.index_described(doc, info, &root_path.push_key("info"));
        }
        if let Some(servers) = doc.tree().get(root, "servers") {
            self.walk_servers(doc, servers, &root_path.push_key("servers"));
        }
        if let Some(tags) = doc.tree().get(root, "tags") {
            self.walk_tags(doc, tags, &root_path.push_key("tags"));
        }
        if let Some(paths) = doc.tree().get(root, "paths") {
            self.walk_paths(doc, paths, &root_path.push_key("paths"));
        }
        self.walk_components(doc);
    }

    fn walk_servers(&mut self, doc: &Rc<Document>, servers: NodeId, path: &NodePath) {
        let items: Vec<NodeId> = doc.tree().sequence_items(servers).to_vec();
        for (i, item) in items.into_iter().enumerate() {
            let item_path = path.push_index(i);
            let value = ServerInfo::decode(&doc.tree(), item);
            let location = location_of(doc, item, &item_path);
            self.index.servers.push(IndexedNode {
                value,
                location,
                node: item,
            });
            self.index_described(doc, item, &item_path);
        }
    }

    fn walk_tags(&mut self, doc: &Rc<Document>, tags: NodeId, path: &NodePath) {
        let items: Vec<NodeId> = doc.tree().sequence_items(tags).to_vec();
        for (i, item) in items.into_iter().enumerate() {
            let item_path = path.push_index(i);
            let value = {
                let tree = doc.tree();
                TagInfo {
                    name: tree.get_str(item, "name").unwrap_or_default().to_string(),
                    description: tree.get_str(item, "description").map(str::to_string),
                }
            };
            let location = location_of(doc, item, &item_path);
            self.index.tags.push(IndexedNode {
                value,
                location,
                node: item,
            });
            self.index_described(doc, item, &item_path);
        }
    }

    // --- Paths and operations ---

    fn walk_paths(&mut self, doc: &Rc<Document>, paths: NodeId, base: &NodePath) {
        let entries: Vec<(String, NodeId)> = {
            let tree = doc.tree();
            tree.mapping_entries(paths)
                .iter()
                .filter_map(|e| {
                    tree.scalar_str(e.key)
                        .map(|k| (k.to_string(), e.value))
                })
                .collect()
        };
        for (path_str, item) in entries {
            if path_str.starts_with("x-") {
                continue;
            }
            let item_path = base.push_key(&path_str);
            self.walk_path_item(doc, item, &item_path, &path_str);
        }
    }

    fn walk_path_item(&mut self, doc: &Rc<Document>, node: NodeId, path: &NodePath, path_str: &str) {
        if !self.visit(doc, node) {
            return;
        }
        if let Some(reference) = self.ref_of(doc, node) {
            if let Some(target) = self.resolve_ref(doc, node, path, &reference) {
                let target_doc = Rc::clone(&target.document);
                self.walk_path_item(&target_doc, target.node, &target.path, path_str);
            }
            return;
        }
        self.index_described(doc, node, path);
        if let Some(servers) = doc.tree().get(node, "servers") {
            self.walk_servers(doc, servers, &path.push_key("servers"));
        }
        if let Some(parameters) = doc.tree().get(node, "parameters") {
            self.walk_parameter_list(doc, parameters, &path.push_key("parameters"));
        }
        let methods: Vec<(String, NodeId)> = {
            let tree = doc.tree();
            HTTP_METHODS
                .iter()
                .filter_map(|&m| tree.get(node, m).map(|op| (m.to_string(), op)))
                .collect()
        };
        for (method, op_node) in methods {
            self.walk_operation(doc, op_node, &path.push_key(&method), &method, path_str);
        }
    }

    fn walk_operation(
        &mut self,
        doc: &Rc<Document>,
        node: NodeId,
        path: &NodePath,
        method: &str,
        path_str: &str,
    ) {
        if !self.visit(doc, node) {
            return;
        }
        let value = Operation::decode(&doc.tree(), node, method, path_str);
        let location = location_of(doc, node, path);
        self.index.operations.push(IndexedNode {
            value,
            location,
            node,
        });
        self.index_described(doc, node, path);

        if let Some(parameters) = doc.tree().get(node, "parameters") {
            self.walk_parameter_list(doc, parameters, &path.push_key("parameters"));
        }
        if let Some(body) = doc.tree().get(node, "requestBody") {
            self.walk_body(doc, body, &path.push_key("requestBody"));
        }
        if let Some(responses) = doc.tree().get(node, "responses") {
            self.walk_responses(doc, responses, &path.push_key("responses"));
        }
    }

    fn walk_responses(&mut self, doc: &Rc<Document>, responses: NodeId, base: &NodePath) {
        let entries: Vec<(String, NodeId)> = mapping_keys(doc, responses);
        for (code, response) in entries {
            self.walk_response(doc, response, &base.push_key(&code));
        }
    }

    fn walk_response(&mut self, doc: &Rc<Document>, node: NodeId, path: &NodePath) {
        if !self.visit(doc, node) {
            return;
        }
        if let Some(reference) = self.ref_of(doc, node) {
            if let Some(target) = self.resolve_ref(doc, node, path, &reference) {
                let target_doc = Rc::clone(&target.document);
                self.walk_response(&target_doc, target.node, &target.path);
            }
            return;
        }
        self.index_described(doc, node, path);
        self.walk_content(doc, node, path);
        if let Some(headers) = doc.tree().get(node, "headers") {
            let entries = mapping_keys(doc, headers);
            let headers_path = path.push_key("headers");
            for (name, header) in entries {
                self.walk_header(doc, header, &headers_path.push_key(&name));
            }
        }
        if let Some(links) = doc.tree().get(node, "links") {
            let entries = mapping_keys(doc, links);
            let links_path = path.push_key("links");
            for (name, link) in entries {
                self.walk_link(doc, link, &links_path.push_key(&name));
            }
        }
    }

    fn walk_header(&mut self, doc: &Rc<Document>, node: NodeId, path: &NodePath) {
        if !self.visit(doc, node) {
            return;
        }
        if let Some(reference) = self.ref_of(doc, node) {
            if let Some(target) = self.resolve_ref(doc, node, path, &reference) {
                let target_doc = Rc::clone(&target.document);
                self.walk_header(&target_doc, target.node, &target.path);
            }
            return;
        }
        self.index_described(doc, node, path);
        if let Some(schema) = doc.tree().get(node, "schema") {
            self.walk_schema(doc, schema, &path.push_key("schema"));
        }
    }

    fn walk_link(&mut self, doc: &Rc<Document>, node: NodeId, path: &NodePath) {
        if !self.visit(doc, node) {
            return;
        }
        if let Some(reference) = self.ref_of(doc, node) {
            if let Some(target) = self.resolve_ref(doc, node, path, &reference) {
                let target_doc = Rc::clone(&target.document);
                self.walk_link(&target_doc, target.node, &target.path);
            }
            return;
        }
        let value = LinkInfo::decode(&doc.tree(), node);
        let location = location_of(doc, node, path);
        self.index.links.push(IndexedNode {
            value,
            location,
            node,
        });
        self.index_described(doc, node, path);
    }

    /// Request bodies: either a reference or `content/<media-type>/schema`.
    fn walk_body(&mut self, doc: &Rc<Document>, node: NodeId, path: &NodePath) {
        if !self.visit(doc, node) {
            return;
        }
        if let Some(reference) = self.ref_of(doc, node) {
            if let Some(target) = self.resolve_ref(doc, node, path, &reference) {
                let target_doc = Rc::clone(&target.document);
                self.walk_body(&target_doc, target.node, &target.path);
            }
            return;
        }
        self.index_described(doc, node, path);
        self.walk_content(doc, node, path);
    }

    fn walk_content(&mut self, doc: &Rc<Document>, node: NodeId, path: &NodePath) {
        let Some(content) = doc.tree().get(node, "content") else {
            return;
        };
        let entries = mapping_keys(doc, content);
        let content_path = path.push_key("content");
        for (media_type, media_node) in entries {
            let schema = doc.tree().get(media_node, "schema");
            if let Some(schema) = schema {
                self.walk_schema(
                    doc,
                    schema,
                    &content_path.push_key(&media_type).push_key("schema"),
                );
            }
        }
    }

    // --- Parameters ---

    fn walk_parameter_list(&mut self, doc: &Rc<Document>, parameters: NodeId, base: &NodePath) {
        let items: Vec<NodeId> = doc.tree().sequence_items(parameters).to_vec();
        for (i, item) in items.into_iter().enumerate() {
            let item_path = base.push_index(i);
            if let Some(reference) = self.ref_of(doc, item) {
                if let Some(target) = self.resolve_ref(doc, item, &item_path, &reference) {
                    let target_doc = Rc::clone(&target.document);
                    self.walk_parameter(&target_doc, target.node, &target.path, true);
                }
            } else {
                self.walk_parameter(doc, item, &item_path, false);
            }
        }
    }

    /// Inline and component parameters land in separate collections: rules
    /// hold them to different description conventions.
    fn walk_parameter(&mut self, doc: &Rc<Document>, node: NodeId, path: &NodePath, component: bool) {
        if !self.visit(doc, node) {
            return;
        }
        let value = ParameterInfo::decode(&doc.tree(), node);
        let location = location_of(doc, node, path);
        let entry = IndexedNode {
            value,
            location,
            node,
        };
        if component {
            self.index.component_parameters.push(entry);
        } else {
            self.index.inline_parameters.push(entry);
        }
        self.index_described(doc, node, path);
        if let Some(schema) = doc.tree().get(node, "schema") {
            self.walk_schema(doc, schema, &path.push_key("schema"));
        }
        self.walk_content(doc, node, path);
    }

    // --- Schemas ---

    /// Schemas are a recursive capability, not one field type: reachable
    /// through properties, items, composition keywords, and
    /// additionalProperties-as-schema.
    fn walk_schema(&mut self, doc: &Rc<Document>, node: NodeId, path: &NodePath) {
        if !matches!(doc.tree().kind(node), NodeKind::Mapping(_)) {
            // additionalProperties: true/false and other scalar stand-ins
            return;
        }
        if !self.visit(doc, node) {
            return;
        }
        if let Some(reference) = self.ref_of(doc, node) {
            let target = self.resolve_ref(doc, node, path, &reference);
            let location = location_of(doc, node, path);
            self.index.schema_refs.push(IndexedNode {
                value: RefInfo {
                    reference,
                    resolved: target
                        .as_ref()
                        .map(|t| (t.document.id(), t.path.clone())),
                },
                location,
                node,
            });
            if let Some(target) = target {
                let target_doc = Rc::clone(&target.document);
                self.walk_schema(&target_doc, target.node, &target.path);
            }
            return;
        }

        let value = SchemaInfo::decode(&doc.tree(), node);
        let location = location_of(doc, node, path);
        self.index.schemas.push(IndexedNode {
            value,
            location,
            node,
        });
        self.index_described(doc, node, path);

        if let Some(properties) = doc.tree().get(node, "properties") {
            let entries = mapping_keys(doc, properties);
            let props_path = path.push_key("properties");
            for (name, prop) in entries {
                self.walk_schema(doc, prop, &props_path.push_key(&name));
            }
        }
        if let Some(items) = doc.tree().get(node, "items") {
            self.walk_schema(doc, items, &path.push_key("items"));
        }
        if let Some(ap) = doc.tree().get(node, "additionalProperties") {
            self.walk_schema(doc, ap, &path.push_key("additionalProperties"));
        }
        for keyword in ["allOf", "anyOf", "oneOf"] {
            if let Some(list) = doc.tree().get(node, keyword) {
                let items: Vec<NodeId> = doc.tree().sequence_items(list).to_vec();
                let list_path = path.push_key(keyword);
                for (i, item) in items.into_iter().enumerate() {
                    self.walk_schema(doc, item, &list_path.push_index(i));
                }
            }
        }
        if let Some(not) = doc.tree().get(node, "not") {
            self.walk_schema(doc, not, &path.push_key("not"));
        }
    }

    // --- Shared definitions ---

    /// Walk the primary document's shared-definitions sections. Definitions
    /// are indexed even when unreachable; reaching this section does not mark
    /// anything used.
    fn walk_components(&mut self, doc: &Rc<Document>) {
        let root = doc.root();
        if doc.version() == SpecVersion::V2 {
            for section in ["definitions", "parameters", "responses", "securityDefinitions"] {
                if let Some(section_node) = doc.tree().get(root, section) {
                    let base = NodePath::root().push_key(section);
                    self.walk_component_section(doc, section_node, &base, section);
                }
            }
            return;
        }
        let Some(components) = doc.tree().get(root, "components") else {
            return;
        };
        let components_path = NodePath::root().push_key("components");
        let sections = mapping_keys(doc, components);
        for (section, section_node) in sections {
            let base = components_path.push_key(&section);
            self.walk_component_section(doc, section_node, &base, &section);
        }
    }

    fn walk_component_section(
        &mut self,
        doc: &Rc<Document>,
        section_node: NodeId,
        base: &NodePath,
        section: &str,
    ) {
        let entries = mapping_keys(doc, section_node);
        for (name, def) in entries {
            let def_path = base.push_key(&name);
            let force_included =
                doc.tree().get_str(def, FORCE_INCLUDE_KEY) == Some("true");
            let location = location_of(doc, def, &def_path);
            self.index.components.push(ComponentEntry {
                section: section.to_string(),
                name: name.clone(),
                location,
                force_included,
            });
            match section {
                "schemas" | "definitions" => self.walk_schema(doc, def, &def_path),
                "parameters" => self.walk_parameter(doc, def, &def_path, true),
                "responses" => self.walk_response(doc, def, &def_path),
                "requestBodies" => self.walk_body(doc, def, &def_path),
                "headers" => self.walk_header(doc, def, &def_path),
                "links" => self.walk_link(doc, def, &def_path),
                "securitySchemes" | "securityDefinitions" => {
                    if self.visit(doc, def) {
                        let value = SecuritySchemeInfo::decode(&doc.tree(), def, &name);
                        let scheme_location = location_of(doc, def, &def_path);
                        self.index.security_schemes.push(IndexedNode {
                            value,
                            location: scheme_location,
                            node: def,
                        });
                        self.index_described(doc, def, &def_path);
                    }
                }
                _ => self.index_described(doc, def, &def_path),
            }
        }
    }
}

/// Mapping entries as owned (key, value) pairs, releasing the tree borrow.
fn mapping_keys(doc: &Rc<Document>, node: NodeId) -> Vec<(String, NodeId)> {
    let tree = doc.tree();
    tree.mapping_entries(node)
        .iter()
        .filter_map(|e| tree.scalar_str(e.key).map(|k| (k.to_string(), e.value)))
        .collect()
}

/// Truncate a path to the component definition it sits under, if any.
fn component_root(path: &NodePath) -> Option<NodePath> {
    match path.key_at(0) {
        Some("components") if path.len() >= 3 => Some(path.truncated(3)),
        Some("definitions" | "parameters" | "responses" | "securityDefinitions")
            if path.len() >= 2 =>
        {
            Some(path.truncated(2))
        }
        _ => None,
    }
}
