//! Positional YAML tree.
//!
//! This module owns the in-memory representation of a parsed document: an
//! arena of nodes addressed by stable [`NodeId`] handles. Handles stay valid
//! across in-place mutation (inserting a mapping key, deleting an entry,
//! appending a sequence element), which is what lets the fix framework splice
//! repaired subtrees into a live tree without invalidating sibling handles
//! held elsewhere.
//!
//! - [`load`] - conversion from `marked-yaml` parse output
//! - [`emit`] - block-style serialization of a (possibly mutated) tree
//! - [`path`] - JSON-Pointer style paths used as durable node addresses
//! - [`span`] - 1-indexed source positions

pub mod emit;
pub mod load;
pub mod path;
pub mod span;

pub use path::{NodePath, PathSegment};
pub use span::Span;

/// Stable handle to a node in a [`YamlTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// One key/value pair in a mapping. The key is itself a scalar node so
/// diagnostics can point at key positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingEntry {
    pub key: NodeId,
    pub value: NodeId,
}

/// The three YAML construct kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Scalar(String),
    Sequence(Vec<NodeId>),
    Mapping(Vec<MappingEntry>),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    span: Span,
}

/// Arena-backed positional tree for one document.
///
/// Nodes are never deallocated during a lint run; removal detaches a node
/// from its parent but leaves its handle resolvable, so index entries built
/// before a fix keep pointing at real data.
#[derive(Debug, Clone)]
pub struct YamlTree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl YamlTree {
    /// Create a tree whose root is an empty mapping.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Mapping(Vec::new()),
                span: Span::synthetic(),
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub(crate) fn push_node(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData { kind, span });
        id
    }

    /// Number of nodes in the arena (detached nodes included).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.0].span
    }

    // --- Construction (synthetic nodes created by fixes) ---

    pub fn new_scalar(&mut self, value: impl Into<String>) -> NodeId {
        self.push_node(NodeKind::Scalar(value.into()), Span::synthetic())
    }

    pub fn new_mapping(&mut self) -> NodeId {
        self.push_node(NodeKind::Mapping(Vec::new()), Span::synthetic())
    }

    pub fn new_sequence(&mut self) -> NodeId {
        self.push_node(NodeKind::Sequence(Vec::new()), Span::synthetic())
    }

    // --- Reads ---

    pub fn scalar_str(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Mapping entries in document order; empty for non-mappings.
    pub fn mapping_entries(&self, id: NodeId) -> &[MappingEntry] {
        match self.kind(id) {
            NodeKind::Mapping(entries) => entries,
            _ => &[],
        }
    }

    /// Sequence items in document order; empty for non-sequences.
    pub fn sequence_items(&self, id: NodeId) -> &[NodeId] {
        match self.kind(id) {
            NodeKind::Sequence(items) => items,
            _ => &[],
        }
    }

    /// Look up a mapping entry's value by key text.
    pub fn get(&self, mapping: NodeId, key: &str) -> Option<NodeId> {
        self.mapping_entries(mapping)
            .iter()
            .find(|e| self.scalar_str(e.key) == Some(key))
            .map(|e| e.value)
    }

    /// Look up a mapping entry's key node by key text.
    pub fn key_node(&self, mapping: NodeId, key: &str) -> Option<NodeId> {
        self.mapping_entries(mapping)
            .iter()
            .find(|e| self.scalar_str(e.key) == Some(key))
            .map(|e| e.key)
    }

    pub fn contains_key(&self, mapping: NodeId, key: &str) -> bool {
        self.get(mapping, key).is_some()
    }

    /// `get` followed by a scalar read.
    pub fn get_str(&self, mapping: NodeId, key: &str) -> Option<&str> {
        self.get(mapping, key).and_then(|id| self.scalar_str(id))
    }

    /// Resolve a [`NodePath`] from the root.
    pub fn node_at(&self, path: &NodePath) -> Option<NodeId> {
        path.resolve(self)
    }

    // --- Mutation ---

    /// Insert a key/value entry at the end of a mapping.
    ///
    /// Returns `false` without touching the tree when the key already exists
    /// or the target is not a mapping; fixes rely on this for idempotency.
    pub fn insert_entry(&mut self, mapping: NodeId, key: &str, value: NodeId) -> bool {
        if self.contains_key(mapping, key) {
            return false;
        }
        let key_id = self.push_node(NodeKind::Scalar(key.to_string()), Span::synthetic());
        match &mut self.nodes[mapping.0].kind {
            NodeKind::Mapping(entries) => {
                entries.push(MappingEntry {
                    key: key_id,
                    value,
                });
                true
            }
            _ => false,
        }
    }

    /// Remove a mapping entry by key, returning the detached value node.
    pub fn remove_entry(&mut self, mapping: NodeId, key: &str) -> Option<NodeId> {
        let pos = self
            .mapping_entries(mapping)
            .iter()
            .position(|e| self.scalar_str(e.key) == Some(key))?;
        match &mut self.nodes[mapping.0].kind {
            NodeKind::Mapping(entries) => Some(entries.remove(pos).value),
            _ => None,
        }
    }

    /// Append an element to a sequence. Returns `false` if not a sequence.
    pub fn push_element(&mut self, sequence: NodeId, value: NodeId) -> bool {
        match &mut self.nodes[sequence.0].kind {
            NodeKind::Sequence(items) => {
                items.push(value);
                true
            }
            _ => false,
        }
    }

    /// Replace a scalar's text in place.
    pub fn set_scalar(&mut self, id: NodeId, value: impl Into<String>) -> bool {
        match &mut self.nodes[id.0].kind {
            NodeKind::Scalar(s) => {
                *s = value.into();
                true
            }
            _ => false,
        }
    }

    /// Replace a sequence's item order. Intended for reorders of the
    /// sequence's own items; callers pass a permutation.
    pub fn set_sequence_items(&mut self, sequence: NodeId, items: Vec<NodeId>) -> bool {
        match &mut self.nodes[sequence.0].kind {
            NodeKind::Sequence(existing) => {
                *existing = items;
                true
            }
            _ => false,
        }
    }
}

impl Default for YamlTree {
    fn default() -> Self {
        Self::new()
    }
}
